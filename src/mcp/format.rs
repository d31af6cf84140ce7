//! Plain-text renderings of BambooHR records.
//!
//! Every function is pure and produces a fixed multi-line block; optional
//! members that are absent are left out entirely rather than printed blank.

use serde_json::Value;

use crate::mcp::models::{Department, Employee, TimeOffRequest, WhosOutEntry, member_text};

pub const RECORD_SEPARATOR: &str = "\n\n---\n\n";

pub fn employee(employee: &Employee) -> String {
    let mut lines = vec![
        format!("ID: {}", employee.id),
        format!("Name: {} {}", employee.first_name, employee.last_name),
    ];

    let optional = [
        ("Email", &employee.email),
        ("Department", &employee.department),
        ("Job Title", &employee.job_title),
        ("Status", &employee.status),
        ("Hire Date", &employee.hire_date),
    ];
    lines.extend(
        optional
            .into_iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}: {v}"))),
    );

    lines.join("\n")
}

pub fn time_off_request(request: &TimeOffRequest) -> String {
    let mut lines = vec![
        format!("Request ID: {}", request.id),
        format!("Employee ID: {}", request.employee_id),
        format!("Dates: {} to {}", request.start, request.end),
        format!("Type: {}", request.kind),
        format!("Status: {}", request.status),
        format!("Amount: {} days", request.amount),
    ];
    if let Some(notes) = &request.notes {
        lines.push(format!("Notes: {notes}"));
    }
    lines.join("\n")
}

pub fn whos_out_entry(entry: &WhosOutEntry) -> String {
    match entry {
        WhosOutEntry::Holiday { holiday_name, start } => {
            format!("Type: Company Holiday\nHoliday: {holiday_name}\nDate: {start}")
        }
        WhosOutEntry::TimeOff {
            employee_id,
            employee_name,
            start,
            end,
        } => format!(
            "Type: Time Off\nEmployee: {employee_name} (ID: {employee_id})\nDates: {start} to {end}"
        ),
    }
}

/// The employee count line only appears once the join has run.
pub fn department(department: &Department) -> String {
    let mut text = format!("Department: {} (ID: {})", department.name, department.id);
    if let Some(employees) = &department.employees {
        text.push_str(&format!("\nEmployees: {}", employees.len()));
    }
    text
}

pub fn custom_field(field: &Value) -> String {
    format!(
        "Field: {} (ID: {}, Type: {})",
        member_text(field, "name"),
        member_text(field, "id"),
        member_text(field, "type")
    )
}

pub fn employee_file(file: &Value) -> String {
    format!(
        "File: {} (ID: {}, Category: {})",
        member_text(file, "name"),
        member_text(file, "id"),
        member_text(file, "category")
    )
}

/// `Found N <noun>(s):` followed by the rendered records.
pub fn listing<T>(noun: &str, records: &[T], render: impl Fn(&T) -> String, separator: &str) -> String {
    let body = records.iter().map(render).collect::<Vec<_>>().join(separator);
    format!("Found {} {noun}(s):\n\n{body}", records.len())
}

/// Splits a comma-separated field list. Blank input means no restriction.
pub fn parse_fields(fields: Option<&str>) -> Option<Vec<String>> {
    let names: Vec<String> = fields?
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    (!names.is_empty()).then_some(names)
}
