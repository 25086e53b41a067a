//! Static description of form inputs: kinds, rules and definitions.

use regex::Regex;

/// Semantic type of an input. Some kinds carry an implicit format rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Numeric,
    DateTime,
    Choice(Vec<String>),
    Multiline,
}

impl FieldKind {
    pub fn choices<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Choice(options.into_iter().map(Into::into).collect())
    }

    /// Values of this kind should be masked by a display surface.
    pub fn is_secret(&self) -> bool {
        matches!(self, FieldKind::Password)
    }

    pub(crate) fn implicit_rule(&self) -> Option<Rule> {
        match self {
            FieldKind::Email => Some(Rule::email("Enter a valid email")),
            FieldKind::Numeric => Some(Rule::Numeric {
                message: "Enter a number".into(),
            }),
            FieldKind::DateTime => Some(Rule::DateTime {
                message: "Enter a valid date and time".into(),
            }),
            FieldKind::Choice(options) => Some(Rule::OneOf {
                choices: options.clone(),
                message: "Select one of the listed options".into(),
            }),
            FieldKind::Text | FieldKind::Password | FieldKind::Multiline => None,
        }
    }
}

/// A single validation rule. Rules are evaluated in order; the first one
/// that fails produces the field's error.
#[derive(Debug, Clone)]
pub enum Rule {
    MinLength { min: usize, message: String },
    MaxLength { max: usize, message: String },
    Email { message: String },
    DigitsOnly { message: String },
    Pattern { regex: Regex, message: String },
    Numeric { message: String },
    WholeNumber { message: String },
    MinNumber { min: f64, message: String },
    MaxNumber { max: f64, message: String },
    OneOf { choices: Vec<String>, message: String },
    DateTime { message: String },
    /// Cross-field rule: the value must equal the value of `field`.
    MatchesField { field: String, message: String },
}

impl Rule {
    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Rule::MinLength {
            min,
            message: message.into(),
        }
    }

    pub fn max_length(max: usize, message: impl Into<String>) -> Self {
        Rule::MaxLength {
            max,
            message: message.into(),
        }
    }

    pub fn email(message: impl Into<String>) -> Self {
        Rule::Email {
            message: message.into(),
        }
    }

    pub fn digits_only(message: impl Into<String>) -> Self {
        Rule::DigitsOnly {
            message: message.into(),
        }
    }

    pub fn pattern(regex: Regex, message: impl Into<String>) -> Self {
        Rule::Pattern {
            regex,
            message: message.into(),
        }
    }

    pub fn whole_number(message: impl Into<String>) -> Self {
        Rule::WholeNumber {
            message: message.into(),
        }
    }

    pub fn min_number(min: f64, message: impl Into<String>) -> Self {
        Rule::MinNumber {
            min,
            message: message.into(),
        }
    }

    pub fn max_number(max: f64, message: impl Into<String>) -> Self {
        Rule::MaxNumber {
            max,
            message: message.into(),
        }
    }

    pub fn matches_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Rule::MatchesField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the other field this rule reads, if any.
    pub fn depends_on(&self) -> Option<&str> {
        match self {
            Rule::MatchesField { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub required_message: String,
    pub rules: Vec<Rule>,
    pub initial: String,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        let label = label.into();
        Self {
            name: name.into(),
            required_message: format!("{label} is required"),
            label,
            kind,
            required: false,
            rules: Vec::new(),
            initial: String::new(),
        }
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = true;
        self.required_message = message.into();
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn initial(mut self, value: impl Into<String>) -> Self {
        self.initial = value.into();
        self
    }

    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().filter_map(Rule::depends_on)
    }
}

/// Ordered table of field definitions describing one form.
#[derive(Debug, Clone)]
pub struct FormSchema {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
}

impl FormSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, definition: FieldDefinition) -> Self {
        self.fields.push(definition);
        self
    }
}
