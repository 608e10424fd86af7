//! Typed form schemas.
//!
//! Every input screen (stock adjustment, product, customer, login) is described
//! by a [`FormSchema`]: an ordered table mapping a field identifier to its
//! label, validation rule and input kind. A single generic validator consumes
//! the table, so screens never dispatch on stringly-typed field names.
//!
//! Raw values arrive as text exactly as typed by the user; validation trims
//! them, parses them into a [`FieldValue`] and collects **every** failing field
//! instead of stopping at the first one.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;
use uuid::Uuid;

/// Identifier of a form field (stable, used as the error key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(&'static str);

impl FieldId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl core::fmt::Display for FieldId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.0)
    }
}

/// How a field is rendered.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputKind {
    Text,
    TextArea,
    Integer,
    Decimal,
    Select,
    Email,
    Phone,
    Url,
    Checkbox,
}

/// Validation rule attached to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Text {
        required: bool,
        min_len: Option<usize>,
        max_len: Option<usize>,
    },
    Integer {
        required: bool,
        min: Option<i64>,
        max: Option<i64>,
    },
    Decimal {
        required: bool,
        min: Option<Decimal>,
        max: Option<Decimal>,
    },
    Email {
        required: bool,
    },
    /// International phone number: `+`, a country code and 8-12 digits.
    Phone {
        required: bool,
    },
    /// Absolute `http://` or `https://` URL.
    Url {
        required: bool,
    },
    /// Identifier of a record picked from a list (UUID).
    Reference {
        required: bool,
    },
    /// Checkbox; absent or blank means `false`.
    Flag,
}

impl Rule {
    pub fn is_required(&self) -> bool {
        match self {
            Rule::Text { required, .. }
            | Rule::Integer { required, .. }
            | Rule::Decimal { required, .. }
            | Rule::Email { required }
            | Rule::Phone { required }
            | Rule::Url { required }
            | Rule::Reference { required } => *required,
            Rule::Flag => false,
        }
    }
}

/// One row of a form schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: FieldId,
    pub label: &'static str,
    pub rule: Rule,
    pub kind: InputKind,
}

impl FieldSpec {
    pub fn new(id: FieldId, label: &'static str, rule: Rule, kind: InputKind) -> Self {
        Self {
            id,
            label,
            rule,
            kind,
        }
    }
}

/// Why a field was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    #[error("is required")]
    Required,
    #[error("must be at least {min} characters")]
    TooShort { min: usize },
    #[error("must be at most {max} characters")]
    TooLong { max: usize },
    #[error("must be a whole number")]
    NotAnInteger,
    #[error("must be a number")]
    NotANumber,
    #[error("must be at least {min}")]
    BelowMinimum { min: String },
    #[error("must be at most {max}")]
    AboveMaximum { max: String },
    #[error("must be a valid email address")]
    InvalidEmail,
    #[error("must start with a country code (+XX) followed by 8-12 digits")]
    InvalidPhone,
    #[error("must be an http(s) URL")]
    InvalidUrl,
    #[error("must reference an existing record")]
    InvalidReference,
    #[error("exceeds the available stock ({available})")]
    QuantityExceedsStock { requested: u32, available: u32 },
}

/// A field-level validation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{field}: {kind}")]
pub struct FieldError {
    pub field: FieldId,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: FieldId, kind: FieldErrorKind) -> Self {
        Self { field, kind }
    }
}

/// A parsed field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Reference(Uuid),
    Flag(bool),
}

/// Raw form input, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<FieldId, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: FieldId, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: FieldId, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    pub fn get(&self, field: FieldId) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }
}

/// Output of a successful validation: only fields that carried a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidForm(BTreeMap<FieldId, FieldValue>);

impl ValidForm {
    pub fn value(&self, field: FieldId) -> Option<&FieldValue> {
        self.0.get(&field)
    }

    pub fn text(&self, field: FieldId) -> Option<&str> {
        match self.0.get(&field) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn integer(&self, field: FieldId) -> Option<i64> {
        match self.0.get(&field) {
            Some(FieldValue::Integer(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn decimal(&self, field: FieldId) -> Option<Decimal> {
        match self.0.get(&field) {
            Some(FieldValue::Decimal(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn reference(&self, field: FieldId) -> Option<Uuid> {
        match self.0.get(&field) {
            Some(FieldValue::Reference(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn flag(&self, field: FieldId) -> bool {
        matches!(self.0.get(&field), Some(FieldValue::Flag(true)))
    }
}

/// Ordered field table for one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSchema {
    fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, id: FieldId) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Validate raw input against every field of the schema.
    pub fn validate(&self, values: &FormValues) -> Result<ValidForm, Vec<FieldError>> {
        let mut parsed = BTreeMap::new();
        let mut errors = Vec::new();

        for spec in &self.fields {
            match check(&spec.rule, values.get(spec.id)) {
                Ok(Some(value)) => {
                    parsed.insert(spec.id, value);
                }
                Ok(None) => {}
                Err(kind) => errors.push(FieldError::new(spec.id, kind)),
            }
        }

        if errors.is_empty() {
            Ok(ValidForm(parsed))
        } else {
            Err(errors)
        }
    }
}

fn check(rule: &Rule, raw: Option<&str>) -> Result<Option<FieldValue>, FieldErrorKind> {
    let text = raw.map(str::trim).filter(|s| !s.is_empty());

    let Some(text) = text else {
        return if rule.is_required() {
            Err(FieldErrorKind::Required)
        } else {
            Ok(None)
        };
    };

    let value = match rule {
        Rule::Text {
            min_len, max_len, ..
        } => {
            let len = text.chars().count();
            if let Some(min) = *min_len {
                if len < min {
                    return Err(FieldErrorKind::TooShort { min });
                }
            }
            if let Some(max) = *max_len {
                if len > max {
                    return Err(FieldErrorKind::TooLong { max });
                }
            }
            FieldValue::Text(text.to_string())
        }
        Rule::Integer { min, max, .. } => {
            let n = parse_integer(text)?;
            if let Some(min) = *min {
                if n < min {
                    return Err(FieldErrorKind::BelowMinimum {
                        min: min.to_string(),
                    });
                }
            }
            if let Some(max) = *max {
                if n > max {
                    return Err(FieldErrorKind::AboveMaximum {
                        max: max.to_string(),
                    });
                }
            }
            FieldValue::Integer(n)
        }
        Rule::Decimal { min, max, .. } => {
            let d = Decimal::from_str(text).map_err(|_| FieldErrorKind::NotANumber)?;
            if let Some(min) = *min {
                if d < min {
                    return Err(FieldErrorKind::BelowMinimum {
                        min: min.to_string(),
                    });
                }
            }
            if let Some(max) = *max {
                if d > max {
                    return Err(FieldErrorKind::AboveMaximum {
                        max: max.to_string(),
                    });
                }
            }
            FieldValue::Decimal(d)
        }
        Rule::Email { .. } => {
            if !is_email(text) {
                return Err(FieldErrorKind::InvalidEmail);
            }
            FieldValue::Text(text.to_string())
        }
        Rule::Phone { .. } => {
            if !is_international_phone(text) {
                return Err(FieldErrorKind::InvalidPhone);
            }
            FieldValue::Text(text.to_string())
        }
        Rule::Url { .. } => {
            if !is_http_url(text) {
                return Err(FieldErrorKind::InvalidUrl);
            }
            FieldValue::Text(text.to_string())
        }
        Rule::Reference { .. } => {
            let id = Uuid::parse_str(text).map_err(|_| FieldErrorKind::InvalidReference)?;
            FieldValue::Reference(id)
        }
        Rule::Flag => FieldValue::Flag(matches!(text, "true" | "on" | "1" | "yes")),
    };

    Ok(Some(value))
}

/// Whole numbers only; `"2.0"` counts as 2, `"2.5"` does not.
fn parse_integer(text: &str) -> Result<i64, FieldErrorKind> {
    if let Ok(n) = text.parse::<i64>() {
        return Ok(n);
    }
    let d = Decimal::from_str(text).map_err(|_| FieldErrorKind::NotANumber)?;
    if !d.fract().is_zero() {
        return Err(FieldErrorKind::NotAnInteger);
    }
    d.trunc().to_i64().ok_or(FieldErrorKind::NotANumber)
}

fn is_email(text: &str) -> bool {
    if text.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

// `+` then 10..=16 digits, first digit non-zero: a 1-4 digit country code
// followed by an 8-12 digit subscriber number.
fn is_international_phone(text: &str) -> bool {
    let Some(digits) = text.strip_prefix('+') else {
        return false;
    };
    (10..=16).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0')
}

fn is_http_url(text: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        text.strip_prefix(scheme)
            .is_some_and(|rest| !rest.is_empty() && !rest.chars().any(char::is_whitespace))
    })
}
