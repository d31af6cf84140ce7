//! Tool for the who's-out calendar: employees on leave and company holidays.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::mcp::{
    error::BambooError,
    format::{self, RECORD_SEPARATOR},
    http::BambooClient,
    schema::IsoDate,
    tools::respond,
};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetWhosOutRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Start date in YYYY-MM-DD format (BambooHR defaults to today)")]
    pub start_date: Option<IsoDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "End date in YYYY-MM-DD format (BambooHR defaults to 14 days after the start)")]
    pub end_date: Option<IsoDate>,
}

pub async fn get_whos_out(client: &BambooClient, args: GetWhosOutRequest) -> CallToolResult {
    respond("fetching who's out data", list_entries(client, args).await)
}

async fn list_entries(client: &BambooClient, args: GetWhosOutRequest) -> Result<String, BambooError> {
    let start = args.start_date.map(|d| d.to_string());
    let end = args.end_date.map(|d| d.to_string());
    let entries = client.list_whos_out(start.as_deref(), end.as_deref()).await?;

    if entries.is_empty() {
        return Ok("No employees are out and no holidays are scheduled for the specified period.".to_string());
    }
    Ok(format::listing(
        "time off/holiday item",
        &entries,
        format::whos_out_entry,
        RECORD_SEPARATOR,
    ))
}
