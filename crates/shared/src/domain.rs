use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(BusinessId);
id_newtype!(RequestId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EWasteCategory {
    ComputersAndLaptops,
    MobilePhones,
    PrintersAndScanners,
    TelevisionsAndMonitors,
    Batteries,
    OtherElectronicEquipment,
}

impl EWasteCategory {
    pub const ALL: [EWasteCategory; 6] = [
        EWasteCategory::ComputersAndLaptops,
        EWasteCategory::MobilePhones,
        EWasteCategory::PrintersAndScanners,
        EWasteCategory::TelevisionsAndMonitors,
        EWasteCategory::Batteries,
        EWasteCategory::OtherElectronicEquipment,
    ];

    /// Human-readable label, also the value a choice field accepts.
    pub fn label(self) -> &'static str {
        match self {
            EWasteCategory::ComputersAndLaptops => "Computers and Laptops",
            EWasteCategory::MobilePhones => "Mobile Phones",
            EWasteCategory::PrintersAndScanners => "Printers and Scanners",
            EWasteCategory::TelevisionsAndMonitors => "Televisions and Monitors",
            EWasteCategory::Batteries => "Batteries",
            EWasteCategory::OtherElectronicEquipment => "Other Electronic Equipment",
        }
    }
}

impl fmt::Display for EWasteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown e-waste category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for EWasteCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

/// Visual emphasis a display surface uses for a status chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Warning,
    Success,
    Error,
    Info,
}

impl RequestStatus {
    pub fn tone(self) -> StatusTone {
        match self {
            RequestStatus::Pending => StatusTone::Warning,
            RequestStatus::Approved => StatusTone::Success,
            RequestStatus::Rejected => StatusTone::Error,
            RequestStatus::Completed => StatusTone::Info,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
