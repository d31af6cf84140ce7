//! Tool for listing BambooHR field metadata.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::mcp::{
    error::BambooError, format, http::BambooClient, schema::CustomFieldType, tools::respond,
};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetCustomFieldsRequest {
    #[serde(default, rename = "type")]
    #[schemars(description = "Which fields to list: employee, company or all (default)")]
    pub kind: CustomFieldType,
}

pub async fn get_custom_fields(client: &BambooClient, args: GetCustomFieldsRequest) -> CallToolResult {
    respond("fetching custom fields", list_fields(client, args).await)
}

async fn list_fields(client: &BambooClient, args: GetCustomFieldsRequest) -> Result<String, BambooError> {
    let fields = client.list_custom_fields(args.kind).await?;
    if fields.is_empty() {
        return Ok("No custom fields found.".to_string());
    }
    Ok(format::listing("custom field", &fields, format::custom_field, "\n"))
}
