use std::{fs, io, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "portal.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub simulated_latency_ms: u64,
    pub redirect_delay_ms: u64,
    pub default_rows_per_page: usize,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            simulated_latency_ms: 1000,
            redirect_delay_ms: 2000,
            default_rows_per_page: 10,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

/// Keys accepted in `portal.toml`; anything left out keeps its default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    simulated_latency_ms: Option<u64>,
    redirect_delay_ms: Option<u64>,
    default_rows_per_page: Option<usize>,
    log_filter: Option<String>,
}

/// Defaults, then the config file if it exists, then the environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file.simulated_latency_ms {
        settings.simulated_latency_ms = v;
    }
    if let Some(v) = file.redirect_delay_ms {
        settings.redirect_delay_ms = v;
    }
    if let Some(v) = file.default_rows_per_page {
        settings.default_rows_per_page = v;
    }
    if let Some(v) = file.log_filter {
        settings.log_filter = v;
    }
    Ok(())
}

/// `PORTAL_<KEY>` is read first and `APP__<KEY>` wins when both are set.
fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    let read = |key: &str| {
        lookup(&format!("APP__{key}")).or_else(|| lookup(&format!("PORTAL_{key}")))
    };

    if let Some(v) = read("SIMULATED_LATENCY_MS") {
        settings.simulated_latency_ms = v
            .parse()
            .with_context(|| format!("invalid simulated latency '{v}'"))?;
    }
    if let Some(v) = read("REDIRECT_DELAY_MS") {
        settings.redirect_delay_ms = v
            .parse()
            .with_context(|| format!("invalid redirect delay '{v}'"))?;
    }
    if let Some(v) = read("DEFAULT_ROWS_PER_PAGE") {
        settings.default_rows_per_page = v
            .parse()
            .with_context(|| format!("invalid rows per page '{v}'"))?;
    }
    if let Some(v) = read("LOG_FILTER") {
        settings.log_filter = v;
    }
    Ok(())
}
