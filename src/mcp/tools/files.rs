//! Tool for listing the files stored on an employee record.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::mcp::{error::BambooError, format, http::BambooClient, schema::Required, tools::respond};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetEmployeeFilesRequest {
    #[schemars(description = "BambooHR employee ID, e.g. 123")]
    pub employee_id: Required,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Only files in this category ID")]
    pub category_id: Option<String>,
}

pub async fn get_employee_files(client: &BambooClient, args: GetEmployeeFilesRequest) -> CallToolResult {
    respond("fetching employee files", list_files(client, args).await)
}

async fn list_files(client: &BambooClient, args: GetEmployeeFilesRequest) -> Result<String, BambooError> {
    let category = args.category_id.as_deref().filter(|c| !c.trim().is_empty());
    let files = client.list_employee_files(args.employee_id.as_str(), category).await?;
    if files.is_empty() {
        return Ok("No files found for this employee.".to_string());
    }
    Ok(format::listing("file", &files, format::employee_file, "\n"))
}
