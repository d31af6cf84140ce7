//! Tool for listing departments.
//!
//! With `includeEmployees` the directory is fetched as well and each
//! department reports how many employees carry exactly its name.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::mcp::{error::BambooError, format, http::BambooClient, tools::respond};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetDepartmentsRequest {
    #[serde(default)]
    #[schemars(description = "Also count the employees in each department (defaults to false)")]
    pub include_employees: bool,
}

pub async fn get_departments(client: &BambooClient, args: GetDepartmentsRequest) -> CallToolResult {
    respond("fetching departments", list_departments(client, args).await)
}

async fn list_departments(client: &BambooClient, args: GetDepartmentsRequest) -> Result<String, BambooError> {
    let departments = client.list_departments(args.include_employees).await?;
    if departments.is_empty() {
        return Ok("No departments found.".to_string());
    }
    Ok(format::listing("department", &departments, format::department, "\n\n"))
}
