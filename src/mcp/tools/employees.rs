//! Tools for reading and updating employee records.
//!
//! - `getEmployees`: the company directory, optionally capped client-side
//! - `getEmployee`: one employee, optionally with extra named fields
//! - `updateEmployee`: push an arbitrary field map to one employee

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::mcp::{
    error::BambooError,
    format::{self, RECORD_SEPARATOR},
    http::BambooClient,
    schema::Required,
    tools::respond,
};

/// Fields the standard employee block already shows.
const STANDARD_FIELDS: [&str; 8] = [
    "id",
    "firstName",
    "lastName",
    "email",
    "department",
    "jobTitle",
    "status",
    "hireDate",
];

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetEmployeesRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Comma-separated list of fields to include")]
    pub fields: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Maximum number of employees to return")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetEmployeeRequest {
    #[schemars(description = "BambooHR employee ID, e.g. 123")]
    pub employee_id: Required,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Comma-separated list of fields to include")]
    pub fields: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[schemars(description = "BambooHR employee ID, e.g. 123")]
    pub employee_id: Required,
    #[schemars(description = "Employee data to update, keyed by BambooHR field name")]
    pub data: Map<String, Value>,
}

pub async fn get_employees(client: &BambooClient, args: GetEmployeesRequest) -> CallToolResult {
    respond("fetching employees", list_employees(client, args).await)
}

async fn list_employees(client: &BambooClient, args: GetEmployeesRequest) -> Result<String, BambooError> {
    let fields = format::parse_fields(args.fields.as_deref());
    let mut employees = client.list_employees(fields.as_deref()).await?;
    // zero means no cap
    if let Some(limit) = args.limit.filter(|l| *l > 0) {
        employees.truncate(limit);
    }

    if employees.is_empty() {
        return Ok("No employees found matching the criteria.".to_string());
    }
    Ok(format::listing("employee", &employees, format::employee, RECORD_SEPARATOR))
}

pub async fn get_employee(client: &BambooClient, args: GetEmployeeRequest) -> CallToolResult {
    respond("fetching employee", fetch_employee(client, args).await)
}

async fn fetch_employee(client: &BambooClient, args: GetEmployeeRequest) -> Result<String, BambooError> {
    let fields = format::parse_fields(args.fields.as_deref());
    let employee = client.get_employee(args.employee_id.as_str(), fields.as_deref()).await?;

    let mut text = format::employee(&employee);
    for name in fields.iter().flatten() {
        if STANDARD_FIELDS.contains(&name.as_str()) {
            continue;
        }
        if let Some(value) = employee.field(name) {
            text.push_str(&format!("\n{name}: {value}"));
        }
    }
    Ok(text)
}

pub async fn update_employee(client: &BambooClient, args: UpdateEmployeeRequest) -> CallToolResult {
    let employee_id = args.employee_id.as_str();
    let outcome = client
        .update_employee(employee_id, &args.data)
        .await
        .map(|employee| {
            format!(
                "Employee {employee_id} updated successfully:\n\n{}",
                format::employee(&employee)
            )
        });
    respond("updating employee", outcome)
}
