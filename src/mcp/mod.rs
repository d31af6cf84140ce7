//! BambooHR Model Context Protocol implementation.
//!
//! This crate exposes BambooHR's REST API as MCP tools. The implementation is
//! organized into:
//!
//! - `config`: Environment-based process configuration
//! - `error`: Error types raised by the upstream client
//! - `http`: HTTP client and API communication
//! - `models`: Records returned by BambooHR
//! - `schema`: Validated tool input primitives
//! - `format`: Text renderings of records
//! - `tools`: Individual MCP tools for specific BambooHR operations
//!
//! The main entry point is `BambooHrMcp`, which owns the upstream client and
//! registers every tool with the MCP runtime.

pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod models;
pub mod schema;
pub mod tools;

#[cfg(test)]
mod testing;

use rmcp::{
    ErrorData, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use tracing::error;

use crate::mcp::{
    config::Config,
    error::BambooError,
    http::BambooClient,
    tools::{
        custom_fields::{self, GetCustomFieldsRequest},
        departments::{self, GetDepartmentsRequest},
        employees::{self, GetEmployeeRequest, GetEmployeesRequest, UpdateEmployeeRequest},
        files::{self, GetEmployeeFilesRequest},
        reports::{self, GetCompanyReportRequest},
        time_off::{self, CreateTimeOffRequestRequest, GetTimeOffRequestsRequest},
        whos_out::{self, GetWhosOutRequest},
    },
};

/// Runs one tool call on its own task so that a panic inside it turns into an
/// error-flagged envelope instead of taking the connection down.
async fn guarded<F>(capability: &'static str, error_prefix: &'static str, call: F) -> Result<CallToolResult, ErrorData>
where
    F: Future<Output = CallToolResult> + Send + 'static,
{
    match tokio::spawn(call).await {
        Ok(result) => Ok(result),
        Err(e) => {
            error!(capability, error = %e, "tool invocation failed");
            Ok(CallToolResult::error(vec![Content::text(format!(
                "{error_prefix}: {e}"
            ))]))
        }
    }
}

#[derive(Clone)]
pub struct BambooHrMcp {
    client: BambooClient,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl BambooHrMcp {
    /// Builds the server around one upstream client.
    ///
    /// # Errors
    /// Fails when the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self, BambooError> {
        let client = BambooClient::new(config.base_url.clone(), config.api_key.clone())?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: BambooClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    // Thin delegating methods so the `tool_router` proc-macro (which scans
    // this impl block) can register the tools. The work lives in
    // `mcp::tools::*`.

    #[tool(
        name = "getEmployees",
        description = "List employees from the BambooHR company directory. Use limit to cap the number of employees returned."
    )]
    async fn get_employees(
        &self,
        Parameters(args): Parameters<GetEmployeesRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let client = self.client.clone();
        guarded("getEmployees", "Error retrieving employees", async move {
            employees::get_employees(&client, args).await
        })
        .await
    }

    #[tool(
        name = "getEmployee",
        description = "Get one employee by BambooHR employee ID, optionally with a comma-separated list of additional fields."
    )]
    async fn get_employee(
        &self,
        Parameters(args): Parameters<GetEmployeeRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let client = self.client.clone();
        guarded("getEmployee", "Error retrieving employee", async move {
            employees::get_employee(&client, args).await
        })
        .await
    }

    #[tool(
        name = "updateEmployee",
        description = "Update fields on an employee record. data maps BambooHR field names to their new values."
    )]
    async fn update_employee(
        &self,
        Parameters(args): Parameters<UpdateEmployeeRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let client = self.client.clone();
        guarded("updateEmployee", "Error updating employee", async move {
            employees::update_employee(&client, args).await
        })
        .await
    }

    #[tool(
        name = "getTimeOffRequests",
        description = "List time off requests between two dates (YYYY-MM-DD), optionally filtered by employee, status and time off type."
    )]
    async fn get_time_off_requests(
        &self,
        Parameters(args): Parameters<GetTimeOffRequestsRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let client = self.client.clone();
        guarded("getTimeOffRequests", "Error retrieving time off requests", async move {
            time_off::get_time_off_requests(&client, args).await
        })
        .await
    }

    #[tool(
        name = "createTimeOffRequest",
        description = "Create a time off request for an employee. Dates are YYYY-MM-DD and amount is a positive number of days."
    )]
    async fn create_time_off_request(
        &self,
        Parameters(args): Parameters<CreateTimeOffRequestRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let client = self.client.clone();
        guarded("createTimeOffRequest", "Error creating time off request", async move {
            time_off::create_time_off_request(&client, args).await
        })
        .await
    }

    #[tool(
        name = "getDepartments",
        description = "List departments. With includeEmployees, also report how many employees belong to each department."
    )]
    async fn get_departments(
        &self,
        Parameters(args): Parameters<GetDepartmentsRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let client = self.client.clone();
        guarded("getDepartments", "Error retrieving departments", async move {
            departments::get_departments(&client, args).await
        })
        .await
    }

    #[tool(
        name = "getCompanyReport",
        description = "Run a company report by ID in json, csv or xml format."
    )]
    async fn get_company_report(
        &self,
        Parameters(args): Parameters<GetCompanyReportRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let client = self.client.clone();
        guarded("getCompanyReport", "Error retrieving report", async move {
            reports::get_company_report(&client, args).await
        })
        .await
    }

    #[tool(
        name = "getCustomFields",
        description = "List BambooHR field definitions: employee fields, company fields or all of them."
    )]
    async fn get_custom_fields(
        &self,
        Parameters(args): Parameters<GetCustomFieldsRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let client = self.client.clone();
        guarded("getCustomFields", "Error retrieving custom fields", async move {
            custom_fields::get_custom_fields(&client, args).await
        })
        .await
    }

    #[tool(
        name = "getEmployeeFiles",
        description = "List the files stored on an employee record, optionally limited to one file category."
    )]
    async fn get_employee_files(
        &self,
        Parameters(args): Parameters<GetEmployeeFilesRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let client = self.client.clone();
        guarded("getEmployeeFiles", "Error retrieving employee files", async move {
            files::get_employee_files(&client, args).await
        })
        .await
    }

    #[tool(
        name = "getWhosOut",
        description = "List employees who are out and company holidays within a date range (YYYY-MM-DD). Defaults to the next 14 days."
    )]
    async fn get_whos_out(
        &self,
        Parameters(args): Parameters<GetWhosOutRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let client = self.client.clone();
        guarded("getWhosOut", "Error retrieving who's out data", async move {
            whos_out::get_whos_out(&client, args).await
        })
        .await
    }
}

#[tool_handler]
impl ServerHandler for BambooHrMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "BambooHR MCP Server with tools for employees, time off, departments, reports, fields, files and who's out"
                    .to_string(),
            ),
        }
    }
}
