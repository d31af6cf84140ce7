//! HTTP client for the BambooHR REST API.
//!
//! This module provides:
//! - `BambooClient`: one authenticated client per process, cloned into every tool call
//! - OpenTelemetry-style request spans through `reqwest-tracing`
//! - One method per upstream endpoint, returning parsed records
//!
//! Errors are never recovered here; each method hands the cause back as a
//! `BambooError` and the tool layer decides how to present it.

use http::{
    Extensions,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use reqwest::{Request, Response, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder, Result as MiddlewareResult};
use reqwest_tracing::{
    ReqwestOtelSpanBackend, TracingMiddleware, default_on_request_end, reqwest_otel_span,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::{Span, debug};

use crate::mcp::{
    error::BambooError,
    http::calendar,
    models::{Department, Employee, ReportBody, TimeOffRequest, WhosOutEntry},
    schema::{CustomFieldType, PositiveAmount, ReportFormat},
};

/// BambooHR ignores the basic-auth password; the API key is the username.
const API_PASSWORD: &str = "x";

// Used through TracingMiddleware<CustomTracing>, which the compiler can't see.
#[allow(dead_code)]
struct CustomTracing;

impl ReqwestOtelSpanBackend for CustomTracing {
    fn on_request_start(req: &Request, _extension: &mut Extensions) -> Span {
        // headers stay out of the span, they carry the API key
        reqwest_otel_span!(
            name = "bamboohr-api-request",
            req,
            request_body = req.body().and_then(|b| b.as_bytes()).map(String::from_utf8_lossy).as_deref(),
        )
    }

    fn on_request_end(
        span: &Span,
        outcome: &MiddlewareResult<Response>,
        _extension: &mut Extensions,
    ) {
        default_on_request_end(span, outcome);
    }
}

#[derive(Deserialize)]
struct Directory {
    #[serde(default)]
    employees: Option<Vec<Employee>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FileListing {
    Flat(Vec<Value>),
    Categorized { categories: Vec<FileCategory> },
}

#[derive(Deserialize)]
struct FileCategory {
    #[serde(default)]
    name: Value,
    #[serde(default, alias = "file")]
    files: Vec<Value>,
}

impl FileListing {
    /// Flattens category groups, tagging each file with its category name.
    fn into_files(self) -> Vec<Value> {
        match self {
            Self::Flat(files) => files,
            Self::Categorized { categories } => categories
                .into_iter()
                .flat_map(|category| {
                    let name = category.name;
                    category.files.into_iter().map(move |mut file| {
                        if let Value::Object(map) = &mut file {
                            map.entry("category").or_insert_with(|| name.clone());
                        }
                        file
                    })
                })
                .collect(),
        }
    }
}

/// Authenticated access to one BambooHR company.
#[derive(Clone)]
pub struct BambooClient {
    http: ClientWithMiddleware,
    base_url: Url,
    api_key: String,
}

impl BambooClient {
    /// Builds the shared client.
    ///
    /// # Errors
    /// Fails when the underlying `reqwest` client cannot be constructed
    /// (for example when no TLS roots are available).
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Result<Self, BambooError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let inner = reqwest::Client::builder().default_headers(headers).build()?;
        let http = ClientBuilder::new(inner)
            .with(TracingMiddleware::<CustomTracing>::new())
            .build();

        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BambooError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                BambooError::InvalidParams(format!("{} cannot be used as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BambooError> {
        let response = request
            .basic_auth(&self.api_key, Some(API_PASSWORD))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BambooError::Upstream { status, body })
    }

    /// A blank success body decodes as JSON `null`, so `Option` targets read
    /// it as `None`.
    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BambooError> {
        let body = self.send(request).await?.text().await?;
        if body.trim().is_empty() {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// `GET /employees/directory`.
    ///
    /// The directory has no field selection, so `fields` is only logged.
    pub async fn list_employees(&self, fields: Option<&[String]>) -> Result<Vec<Employee>, BambooError> {
        if let Some(fields) = fields {
            debug!(?fields, "directory listing ignores field selection");
        }
        let url = self.endpoint(&["employees", "directory"])?;
        let directory: Option<Directory> = self.fetch_json(self.http.get(url)).await?;
        Ok(directory.and_then(|d| d.employees).unwrap_or_default())
    }

    /// `GET /employees/{id}?fields=a,b`.
    pub async fn get_employee(&self, employee_id: &str, fields: Option<&[String]>) -> Result<Employee, BambooError> {
        let url = self.endpoint(&["employees", employee_id])?;
        let mut request = self.http.get(url);
        if let Some(fields) = fields.filter(|f| !f.is_empty()) {
            request = request.query(&[("fields", fields.join(","))]);
        }
        self.fetch_json(request).await
    }

    /// `POST /employees/{id}` with the field map as the JSON body.
    ///
    /// BambooHR answers a successful update with an empty body; the record is
    /// then rebuilt from the submitted fields.
    pub async fn update_employee(
        &self,
        employee_id: &str,
        data: &Map<String, Value>,
    ) -> Result<Employee, BambooError> {
        let url = self.endpoint(&["employees", employee_id])?;
        let body = self.send(self.http.post(url).json(data)).await?.text().await?;

        if !body.trim().is_empty() {
            return Ok(serde_json::from_str(&body)?);
        }
        let mut echoed = data.clone();
        echoed.insert("id".to_string(), Value::String(employee_id.to_string()));
        Ok(serde_json::from_value(Value::Object(echoed))?)
    }

    /// `GET /time_off/requests`. A status of `None` sends no status filter.
    pub async fn list_time_off_requests(
        &self,
        start: &str,
        end: &str,
        employee_id: Option<&str>,
        status: Option<&str>,
        kind: Option<&str>,
    ) -> Result<Vec<TimeOffRequest>, BambooError> {
        let url = self.endpoint(&["time_off", "requests"])?;
        let mut query = vec![("start", start), ("end", end)];
        query.extend(employee_id.map(|id| ("employeeId", id)));
        query.extend(status.map(|s| ("status", s)));
        query.extend(kind.map(|t| ("type", t)));

        let requests: Option<Vec<TimeOffRequest>> = self.fetch_json(self.http.get(url).query(&query)).await?;
        Ok(requests.unwrap_or_default())
    }

    /// `POST /employees/{id}/time_off/request`.
    pub async fn create_time_off_request(&self, payload: &TimeOffPayload<'_>) -> Result<TimeOffRequest, BambooError> {
        let url = self.endpoint(&["employees", payload.employee_id, "time_off", "request"])?;
        self.fetch_json(self.http.post(url).json(payload)).await
    }

    /// `GET /meta/departments`, optionally joined with the directory.
    ///
    /// The join matches department names exactly; no case or whitespace
    /// normalization is applied.
    pub async fn list_departments(&self, include_employees: bool) -> Result<Vec<Department>, BambooError> {
        let url = self.endpoint(&["meta", "departments"])?;
        let departments: Option<Vec<Department>> = self.fetch_json(self.http.get(url)).await?;
        let mut departments = departments.unwrap_or_default();

        if include_employees {
            let employees = self.list_employees(None).await?;
            for department in &mut departments {
                department.employees = Some(
                    employees
                        .iter()
                        .filter(|e| e.department.as_deref() == Some(department.name.as_str()))
                        .cloned()
                        .collect(),
                );
            }
        }
        Ok(departments)
    }

    /// `GET /reports/{id}?format=..&fields=..`.
    pub async fn get_company_report(
        &self,
        report_id: &str,
        format: ReportFormat,
        fields: Option<&str>,
    ) -> Result<ReportBody, BambooError> {
        let url = self.endpoint(&["reports", report_id])?;
        let mut query = vec![("format", format.as_str())];
        query.extend(fields.filter(|f| !f.trim().is_empty()).map(|f| ("fields", f)));

        let accept = match format {
            ReportFormat::Json => "application/json",
            ReportFormat::Csv => "text/csv",
            ReportFormat::Xml => "application/xml",
        };
        let request = self.http.get(url).query(&query).header(ACCEPT, accept);
        let body = self.send(request).await?.text().await?;

        match format {
            ReportFormat::Json => Ok(ReportBody::Json(serde_json::from_str(&body)?)),
            ReportFormat::Csv | ReportFormat::Xml => Ok(ReportBody::Text(body)),
        }
    }

    /// `GET /meta/fields` or `/meta/fields/{type}`.
    pub async fn list_custom_fields(&self, kind: CustomFieldType) -> Result<Vec<Value>, BambooError> {
        let url = match kind.path_segment() {
            Some(segment) => self.endpoint(&["meta", "fields", segment])?,
            None => self.endpoint(&["meta", "fields"])?,
        };
        let fields: Option<Vec<Value>> = self.fetch_json(self.http.get(url)).await?;
        Ok(fields.unwrap_or_default())
    }

    /// `GET /employees/{id}/files/view?category=..`.
    pub async fn list_employee_files(
        &self,
        employee_id: &str,
        category_id: Option<&str>,
    ) -> Result<Vec<Value>, BambooError> {
        let url = self.endpoint(&["employees", employee_id, "files", "view"])?;
        let mut request = self.http.get(url);
        if let Some(category) = category_id {
            request = request.query(&[("category", category)]);
        }
        let listing: Option<FileListing> = self.fetch_json(request).await?;
        Ok(listing.map(FileListing::into_files).unwrap_or_default())
    }

    /// `GET /time_off/whos_out`, the only XML endpoint.
    pub async fn list_whos_out(&self, start: Option<&str>, end: Option<&str>) -> Result<Vec<WhosOutEntry>, BambooError> {
        let url = self.endpoint(&["time_off", "whos_out"])?;
        let mut query = Vec::new();
        query.extend(start.map(|s| ("start", s)));
        query.extend(end.map(|e| ("end", e)));

        let request = self.http.get(url).query(&query).header(ACCEPT, "application/xml");
        let body = self.send(request).await?.text().await?;
        calendar::parse(&body)
    }
}

/// JSON body of a new time-off request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOffPayload<'a> {
    pub employee_id: &'a str,
    pub start: &'a str,
    pub end: &'a str,
    pub time_off_type_id: &'a str,
    pub amount: &'a PositiveAmount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use super::*;
    use crate::mcp::testing::MockUpstream;

    #[tokio::test]
    async fn requests_carry_basic_auth_and_json_accept() {
        let upstream = MockUpstream::start().await;
        upstream.json(Method::GET, "/employees/directory", json!({ "employees": [] }));

        let employees = upstream.client().list_employees(None).await.expect("directory");
        assert!(employees.is_empty());

        let recorded = upstream.single_request();
        // base64("test-key:x")
        assert_eq!(recorded.header("authorization").as_deref(), Some("Basic dGVzdC1rZXk6eA=="));
        assert_eq!(recorded.header("accept").as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn directory_without_employees_member_is_empty() {
        let upstream = MockUpstream::start().await;
        upstream.json(Method::GET, "/employees/directory", json!({ "fields": [] }));

        let employees = upstream.client().list_employees(None).await.expect("directory");
        assert!(employees.is_empty());
    }

    #[tokio::test]
    async fn directory_ignores_field_selection() {
        let upstream = MockUpstream::start().await;
        upstream.json(Method::GET, "/employees/directory", json!({ "employees": [] }));

        let fields = vec!["firstName".to_string()];
        upstream.client().list_employees(Some(&fields)).await.expect("directory");
        assert_eq!(upstream.single_request().query, None);
    }

    #[tokio::test]
    async fn get_employee_joins_fields() {
        let upstream = MockUpstream::start().await;
        upstream.json(
            Method::GET,
            "/employees/123",
            json!({ "id": "123", "firstName": "Ada", "lastName": "Lovelace" }),
        );

        let fields = vec!["firstName".to_string(), "lastName".to_string()];
        let employee = upstream.client().get_employee("123", Some(&fields)).await.expect("employee");
        assert_eq!(employee.first_name, "Ada");
        assert_eq!(
            upstream.single_request().query.as_deref(),
            Some("fields=firstName%2ClastName")
        );
    }

    #[tokio::test]
    async fn path_segments_are_encoded() {
        let upstream = MockUpstream::start().await;
        let err = upstream.client().get_employee("../meta", None).await.unwrap_err();
        assert!(matches!(err, BambooError::Upstream { status, .. } if status == StatusCode::NOT_FOUND));
        assert_eq!(upstream.single_request().path, "/employees/..%2Fmeta");
    }

    #[tokio::test]
    async fn update_with_empty_body_echoes_submitted_fields() {
        let upstream = MockUpstream::start().await;
        upstream.text(Method::POST, "/employees/123", StatusCode::OK, "");

        let mut data = Map::new();
        data.insert("jobTitle".to_string(), json!("Principal Analyst"));
        data.insert("workPhone".to_string(), json!("555-0100"));
        let employee = upstream.client().update_employee("123", &data).await.expect("update");

        assert_eq!(employee.id, "123");
        assert_eq!(employee.job_title.as_deref(), Some("Principal Analyst"));
        assert_eq!(upstream.single_request().body_json(), Value::Object(data));
    }

    #[tokio::test]
    async fn time_off_status_all_is_omitted() {
        let upstream = MockUpstream::start().await;
        upstream.json(Method::GET, "/time_off/requests", json!([]));

        upstream
            .client()
            .list_time_off_requests("2024-06-01", "2024-06-30", Some("123"), None, Some("5"))
            .await
            .expect("requests");

        let query = upstream.single_request().query_pairs();
        assert_eq!(
            query,
            vec![
                ("start".to_string(), "2024-06-01".to_string()),
                ("end".to_string(), "2024-06-30".to_string()),
                ("employeeId".to_string(), "123".to_string()),
                ("type".to_string(), "5".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn departments_join_on_exact_name() {
        let upstream = MockUpstream::start().await;
        upstream.json(
            Method::GET,
            "/meta/departments",
            json!([
                { "id": "1", "name": "Engineering" },
                { "id": "2", "name": "Sales" },
                { "id": "3", "name": "Legal" }
            ]),
        );
        upstream.json(
            Method::GET,
            "/employees/directory",
            json!({ "employees": [
                { "id": "10", "firstName": "Ada", "lastName": "L", "department": "Engineering" },
                { "id": "11", "firstName": "Bob", "lastName": "M", "department": "Sales" },
                { "id": "12", "firstName": "Cy", "lastName": "N", "department": "engineering" },
                { "id": "13", "firstName": "Di", "lastName": "O", "department": "Engineering" }
            ]}),
        );

        let departments = upstream.client().list_departments(true).await.expect("departments");
        let ids = |d: &Department| -> Vec<String> {
            d.employees.as_ref().expect("joined").iter().map(|e| e.id.clone()).collect()
        };
        assert_eq!(ids(&departments[0]), ["10", "13"]);
        assert_eq!(ids(&departments[1]), ["11"]);
        assert!(ids(&departments[2]).is_empty());
        assert_eq!(upstream.requests().len(), 2);
    }

    #[tokio::test]
    async fn departments_without_join_make_one_request() {
        let upstream = MockUpstream::start().await;
        upstream.json(Method::GET, "/meta/departments", json!([{ "id": 1, "name": "Engineering" }]));

        let departments = upstream.client().list_departments(false).await.expect("departments");
        assert_eq!(departments[0].id, "1");
        assert_eq!(departments[0].employees, None);
        assert_eq!(upstream.requests().len(), 1);
    }

    #[tokio::test]
    async fn csv_report_is_returned_verbatim() {
        let upstream = MockUpstream::start().await;
        upstream.text(Method::GET, "/reports/7", StatusCode::OK, "id,name\n1,Ada\n");

        let report = upstream
            .client()
            .get_company_report("7", ReportFormat::Csv, Some("id,name"))
            .await
            .expect("report");
        assert_eq!(report, ReportBody::Text("id,name\n1,Ada\n".to_string()));

        let recorded = upstream.single_request();
        assert_eq!(
            recorded.query_pairs(),
            vec![
                ("format".to_string(), "csv".to_string()),
                ("fields".to_string(), "id,name".to_string()),
            ]
        );
        assert_eq!(recorded.header("accept").as_deref(), Some("text/csv"));
    }

    #[tokio::test]
    async fn custom_field_type_selects_endpoint() {
        let upstream = MockUpstream::start().await;
        upstream.json(Method::GET, "/meta/fields", json!([]));
        upstream.json(Method::GET, "/meta/fields/employee", json!([{ "id": 1 }]));

        let client = upstream.client();
        assert!(client.list_custom_fields(CustomFieldType::All).await.expect("all").is_empty());
        assert_eq!(client.list_custom_fields(CustomFieldType::Employee).await.expect("employee").len(), 1);
    }

    #[tokio::test]
    async fn categorized_files_are_flattened() {
        let upstream = MockUpstream::start().await;
        upstream.json(
            Method::GET,
            "/employees/123/files/view",
            json!({
                "employee": { "id": "123" },
                "categories": [
                    { "id": 1, "name": "Contracts", "files": [ { "id": 9, "name": "offer.pdf" } ] },
                    { "id": 2, "name": "Empty", "files": [] }
                ]
            }),
        );

        let files = upstream
            .client()
            .list_employee_files("123", Some("1"))
            .await
            .expect("files");
        assert_eq!(files, vec![json!({ "id": 9, "name": "offer.pdf", "category": "Contracts" })]);
        assert_eq!(upstream.single_request().query.as_deref(), Some("category=1"));
    }

    #[tokio::test]
    async fn whos_out_requests_xml() {
        let upstream = MockUpstream::start().await;
        upstream.xml(
            Method::GET,
            "/time_off/whos_out",
            r#"<calendar><item type="holiday"><holiday id="1">Labor Day</holiday><start>2024-09-02</start><end>2024-09-02</end></item></calendar>"#,
        );

        let entries = upstream
            .client()
            .list_whos_out(Some("2024-09-01"), None)
            .await
            .expect("whos out");
        assert_eq!(entries.len(), 1);

        let recorded = upstream.single_request();
        assert_eq!(recorded.header("accept").as_deref(), Some("application/xml"));
        assert_eq!(recorded.query.as_deref(), Some("start=2024-09-01"));
    }

    #[tokio::test]
    async fn server_errors_carry_status_and_body() {
        let upstream = MockUpstream::start().await;
        upstream.text(Method::GET, "/meta/departments", StatusCode::INTERNAL_SERVER_ERROR, "boom");

        let err = upstream.client().list_departments(false).await.unwrap_err();
        assert_eq!(err.to_string(), "BambooHR returned 500 Internal Server Error: boom");
    }
}
