//! Tools for time-off requests.
//!
//! Listing requires a date range; status `all` is the same as no status.
//! Creating sends exactly the fields given, leaving notes out when absent.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::mcp::{
    error::BambooError,
    format::{self, RECORD_SEPARATOR},
    http::{BambooClient, TimeOffPayload},
    schema::{IsoDate, PositiveAmount, Required, TimeOffStatus},
    tools::respond,
};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetTimeOffRequestsRequest {
    #[schemars(description = "Start of the range in YYYY-MM-DD format")]
    pub start_date: IsoDate,
    #[schemars(description = "End of the range in YYYY-MM-DD format")]
    pub end_date: IsoDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Only requests for this employee ID")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Request status filter; 'all' applies no filter")]
    pub status: Option<TimeOffStatus>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Time off type ID filter")]
    pub kind: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeOffRequestRequest {
    #[schemars(description = "BambooHR employee ID, e.g. 123")]
    pub employee_id: Required,
    #[schemars(description = "First day off in YYYY-MM-DD format")]
    pub start_date: IsoDate,
    #[schemars(description = "Last day off in YYYY-MM-DD format")]
    pub end_date: IsoDate,
    #[schemars(description = "Time off type ID, e.g. 5")]
    pub time_off_type_id: Required,
    #[schemars(description = "Amount of time off in days, must be positive")]
    pub amount: PositiveAmount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Optional note attached to the request")]
    pub notes: Option<String>,
}

/// Treats blank optional filters as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn get_time_off_requests(client: &BambooClient, args: GetTimeOffRequestsRequest) -> CallToolResult {
    respond("fetching time off requests", list_requests(client, args).await)
}

async fn list_requests(client: &BambooClient, args: GetTimeOffRequestsRequest) -> Result<String, BambooError> {
    let start = args.start_date.to_string();
    let end = args.end_date.to_string();
    let requests = client
        .list_time_off_requests(
            &start,
            &end,
            present(args.employee_id.as_deref()),
            args.status.and_then(TimeOffStatus::as_filter),
            present(args.kind.as_deref()),
        )
        .await?;

    if requests.is_empty() {
        return Ok("No time off requests found for the specified criteria.".to_string());
    }
    Ok(format::listing(
        "time off request",
        &requests,
        format::time_off_request,
        RECORD_SEPARATOR,
    ))
}

pub async fn create_time_off_request(client: &BambooClient, args: CreateTimeOffRequestRequest) -> CallToolResult {
    let start = args.start_date.to_string();
    let end = args.end_date.to_string();
    let payload = TimeOffPayload {
        employee_id: args.employee_id.as_str(),
        start: &start,
        end: &end,
        time_off_type_id: args.time_off_type_id.as_str(),
        amount: &args.amount,
        notes: present(args.notes.as_deref()),
    };

    let outcome = client.create_time_off_request(&payload).await.map(|request| {
        format!(
            "Time off request created successfully:\n\n{}",
            format::time_off_request(&request)
        )
    });
    respond("creating time off request", outcome)
}
