//! Records returned by BambooHR.
//!
//! BambooHR is loose about shapes: ids come back as strings or numbers and
//! several time-off members are either plain values or nested objects. The
//! models here flatten all of that into display text on the way in.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Keys tried, in order, when a nested object stands in for a plain value.
const NESTED_TEXT_KEYS: [&str; 5] = ["name", "status", "amount", "employee", "id"];

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => NESTED_TEXT_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(value_text)),
        Value::Array(_) => Some(value.to_string()),
    }
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(&Value::deserialize(deserializer)?).unwrap_or_default())
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(&Value::deserialize(deserializer)?).filter(|s| !s.is_empty()))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default, deserialize_with = "text")]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub first_name: String,
    #[serde(default, deserialize_with = "text")]
    pub last_name: String,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<String>,
    /// Every other field BambooHR returned, in response order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Employee {
    /// Looks up a field by its BambooHR name, covering both the typed
    /// members and the open-ended remainder.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.clone()),
            "firstName" => Some(self.first_name.clone()).filter(|s| !s.is_empty()),
            "lastName" => Some(self.last_name.clone()).filter(|s| !s.is_empty()),
            "email" => self.email.clone(),
            "department" => self.department.clone(),
            "jobTitle" => self.job_title.clone(),
            "status" => self.status.clone(),
            "hireDate" => self.hire_date.clone(),
            other => self.extra.get(other).and_then(value_text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOffRequest {
    #[serde(default, deserialize_with = "text")]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub employee_id: String,
    #[serde(default, alias = "startDate", deserialize_with = "text")]
    pub start: String,
    #[serde(default, alias = "endDate", deserialize_with = "text")]
    pub end: String,
    #[serde(default, rename = "type", deserialize_with = "text")]
    pub kind: String,
    #[serde(default, deserialize_with = "text")]
    pub status: String,
    /// Days, as text: BambooHR sends either a number or `{"unit","amount"}`.
    #[serde(default, deserialize_with = "text")]
    pub amount: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Department {
    #[serde(default, deserialize_with = "text")]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    /// Filled by the client-side join, never by BambooHR.
    #[serde(skip)]
    pub employees: Option<Vec<Employee>>,
}

/// One row of the who's-out calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WhosOutEntry {
    #[serde(rename_all = "camelCase")]
    Holiday { holiday_name: String, start: String },
    #[serde(rename_all = "camelCase")]
    TimeOff {
        employee_id: String,
        employee_name: String,
        start: String,
        end: String,
    },
}

/// Body of a company report: parsed JSON for `json`, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportBody {
    Json(Value),
    Text(String),
}

/// Renders an opaque upstream member (custom field, file) as display text.
pub fn member_text(record: &Value, key: &str) -> String {
    record.get(key).and_then(value_text).unwrap_or_default()
}
