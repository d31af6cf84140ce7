//! Decoding of the XML who's-out calendar.
//!
//! BambooHR answers `/time_off/whos_out` with:
//!
//! ```xml
//! <calendar>
//!   <item type="timeOff">
//!     <request id="1001"/>
//!     <employee id="123">Ada Lovelace</employee>
//!     <start>2024-07-01</start>
//!     <end>2024-07-05</end>
//!   </item>
//!   <item type="holiday">
//!     <holiday id="7">Independence Day</holiday>
//!     <start>2024-07-04</start>
//!     <end>2024-07-04</end>
//!   </item>
//! </calendar>
//! ```
//!
//! `item` decodes straight into a `Vec`, so zero, one and many items all take
//! the same path.

use serde::Deserialize;

use crate::mcp::{error::BambooError, models::WhosOutEntry};

#[derive(Debug, Deserialize)]
struct Calendar {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(rename = "@type", default)]
    kind: Option<String>,
    #[serde(default)]
    employee: Option<Node>,
    #[serde(default)]
    holiday: Option<Node>,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
}

/// An element with an optional `id` attribute and text content.
#[derive(Debug, Deserialize)]
struct Node {
    #[serde(rename = "@id", default)]
    id: Option<String>,
    #[serde(rename = "$text", default)]
    text: Option<String>,
}

impl Item {
    fn into_entry(self) -> WhosOutEntry {
        let start = self.start.map(|s| s.trim().to_string()).unwrap_or_default();
        let is_holiday = self.kind.as_deref().is_none_or(|kind| kind == "holiday");

        if is_holiday {
            return WhosOutEntry::Holiday {
                holiday_name: node_text(self.holiday.as_ref()),
                start,
            };
        }

        let (employee_id, employee_name) = self.employee.map_or_else(Default::default, |node| {
            (
                node.id.unwrap_or_default(),
                node.text.map(|t| t.trim().to_string()).unwrap_or_default(),
            )
        });
        WhosOutEntry::TimeOff {
            employee_id,
            employee_name,
            start,
            end: self.end.map(|e| e.trim().to_string()).unwrap_or_default(),
        }
    }
}

fn node_text(node: Option<&Node>) -> String {
    node.and_then(|n| n.text.as_deref())
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

/// Parses a who's-out document. A blank body means nobody is out.
pub fn parse(xml: &str) -> Result<Vec<WhosOutEntry>, BambooError> {
    if xml.trim().is_empty() {
        return Ok(Vec::new());
    }
    let calendar: Calendar = quick_xml::de::from_str(xml)?;
    Ok(calendar.items.into_iter().map(Item::into_entry).collect())
}
