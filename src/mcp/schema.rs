//! Validated input primitives shared by the tool request structs.
//!
//! Each type rejects bad input while the runtime deserializes tool arguments,
//! so malformed calls fail as invalid-params errors before any tool runs.

use std::{borrow::Cow, fmt};

use chrono::NaiveDate;
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Number;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar date written exactly as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct IsoDate(NaiveDate);

impl TryFrom<String> for IsoDate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        // chrono accepts unpadded fields, the wire format does not
        let shaped = value.len() == 10
            && value.bytes().enumerate().all(|(i, b)| match i {
                4 | 7 => b == b'-',
                _ => b.is_ascii_digit(),
            });
        if !shaped {
            return Err(format!("Date must be in YYYY-MM-DD format, got '{value}'"));
        }
        NaiveDate::parse_from_str(&value, DATE_FORMAT)
            .map(Self)
            .map_err(|e| format!("'{value}' is not a valid calendar date: {e}"))
    }
}

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl Serialize for IsoDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl JsonSchema for IsoDate {
    fn schema_name() -> Cow<'static, str> {
        "IsoDate".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "format": "date",
            "pattern": r"^\d{4}-\d{2}-\d{2}$",
            "description": "Date in YYYY-MM-DD format"
        })
    }
}

/// A strictly positive number of days. The JSON number is kept as given so
/// that `2` is forwarded as `2`, not `2.0`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Number")]
pub struct PositiveAmount(Number);

impl TryFrom<Number> for PositiveAmount {
    type Error = String;

    fn try_from(value: Number) -> Result<Self, Self::Error> {
        match value.as_f64() {
            Some(amount) if amount > 0.0 && amount.is_finite() => Ok(Self(value)),
            _ => Err(format!("Amount must be positive, got {value}")),
        }
    }
}

impl fmt::Display for PositiveAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for PositiveAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl JsonSchema for PositiveAmount {
    fn schema_name() -> Cow<'static, str> {
        "PositiveAmount".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "number",
            "exclusiveMinimum": 0,
            "description": "Amount of time off in days, must be positive"
        })
    }
}

/// A string that must contain at least one non-whitespace character. Stored
/// trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Required(String);

impl Required {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Required {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err("value is required and cannot be empty".to_string())
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl fmt::Display for Required {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Required {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl JsonSchema for Required {
    fn schema_name() -> Cow<'static, str> {
        "Required".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({ "type": "string", "minLength": 1 })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimeOffStatus {
    Approved,
    Denied,
    Pending,
    Canceled,
    All,
}

impl TimeOffStatus {
    /// The value sent upstream, or `None` when the status does not filter.
    pub const fn as_filter(self) -> Option<&'static str> {
        match self {
            Self::Approved => Some("approved"),
            Self::Denied => Some("denied"),
            Self::Pending => Some("pending"),
            Self::Canceled => Some("canceled"),
            Self::All => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
    Xml,
}

impl ReportFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldType {
    Employee,
    Company,
    #[default]
    All,
}

impl CustomFieldType {
    /// Path segment under `/meta/fields`, `None` for the aggregate listing.
    pub const fn path_segment(self) -> Option<&'static str> {
        match self {
            Self::Employee => Some("employee"),
            Self::Company => Some("company"),
            Self::All => None,
        }
    }
}
