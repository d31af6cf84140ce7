//! Tool for running a BambooHR company report.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::mcp::{
    error::BambooError,
    http::BambooClient,
    models::ReportBody,
    schema::{ReportFormat, Required},
    tools::respond,
};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetCompanyReportRequest {
    #[schemars(description = "Company report ID")]
    pub report_id: Required,
    #[serde(default)]
    #[schemars(description = "Output format: json (default), csv or xml")]
    pub format: ReportFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Comma-separated list of fields to include")]
    pub fields: Option<String>,
}

pub async fn get_company_report(client: &BambooClient, args: GetCompanyReportRequest) -> CallToolResult {
    respond("fetching report", run_report(client, args).await)
}

async fn run_report(client: &BambooClient, args: GetCompanyReportRequest) -> Result<String, BambooError> {
    let report = client
        .get_company_report(args.report_id.as_str(), args.format, args.fields.as_deref())
        .await?;

    let body = match report {
        ReportBody::Json(value) => serde_json::to_string_pretty(&value)?,
        ReportBody::Text(text) => text,
    };
    Ok(format!("Report {} ({} format):\n\n{body}", args.report_id, args.format))
}
