//! Stateless HTTP request builder and response parser for outlier reports.
//!
//! # Design
//! `OutlierReportClient` holds only a `base_url` and the headers every
//! request carries. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round-trip (directly,
//! or through `Api` with a `Transport`), keeping this type deterministic and
//! free of I/O.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use url::form_urlencoded;

use crate::cid::{self, OUTLIER_REPORT_PREFIX};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{OutlierReport, SearchFilter};

pub(crate) const CTX_FETCH: &str = "fetching outlier report";
pub(crate) const CTX_FETCH_ALL: &str = "fetching outlier reports";
pub(crate) const CTX_CREATE: &str = "creating outlier report";
pub(crate) const CTX_UPDATE: &str = "updating outlier report";
pub(crate) const CTX_DELETE: &str = "deleting outlier report";
pub(crate) const CTX_SEARCH: &str = "searching outlier reports";
const CTX_PARSE_ONE: &str = "parsing outlier report";
const CTX_PARSE_MANY: &str = "parsing outlier reports";

pub const HEADER_AUTH_TOKEN: &str = "x-circonus-auth-token";
pub const HEADER_APP_NAME: &str = "x-circonus-app-name";

/// Synchronous, stateless client for the outlier report endpoints.
#[derive(Debug, Clone)]
pub struct OutlierReportClient {
    base_url: String,
    auth_headers: Vec<(String, String)>,
}

impl OutlierReportClient {
    /// Client without credentials, e.g. for a local mock server.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_headers: Vec::new(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        let mut client = Self::new(&config.url);
        client.auth_headers = vec![
            (HEADER_AUTH_TOKEN.to_string(), config.token.clone()),
            (HEADER_APP_NAME.to_string(), config.app_name.clone()),
        ];
        client
    }

    pub fn build_fetch_outlier_report(&self, cid: &str) -> Result<HttpRequest, ApiError> {
        let cid = cid::normalize(cid)?;
        Ok(self.request(HttpMethod::Get, &cid, None))
    }

    pub fn build_fetch_outlier_reports(&self) -> HttpRequest {
        self.request(HttpMethod::Get, OUTLIER_REPORT_PREFIX, None)
    }

    pub fn build_create_outlier_report(&self, report: &OutlierReport) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(report).map_err(ApiError::Serialization)?;
        Ok(self.request(HttpMethod::Post, OUTLIER_REPORT_PREFIX, Some(body)))
    }

    /// The report's own CID is used as-is; it must already be fully qualified.
    pub fn build_update_outlier_report(&self, report: &OutlierReport) -> Result<HttpRequest, ApiError> {
        cid::validate(&report.cid)?;
        let body = serde_json::to_string(report).map_err(ApiError::Serialization)?;
        Ok(self.request(HttpMethod::Put, &report.cid, Some(body)))
    }

    pub fn build_delete_outlier_report(&self, report: &OutlierReport) -> Result<HttpRequest, ApiError> {
        self.build_delete_outlier_report_by_cid(&report.cid)
    }

    pub fn build_delete_outlier_report_by_cid(&self, cid: &str) -> Result<HttpRequest, ApiError> {
        let cid = cid::normalize(cid)?;
        Ok(self.request(HttpMethod::Delete, &cid, None))
    }

    /// Build a search request. With neither a query nor any filter value
    /// this is the fetch-all request.
    pub fn build_search_outlier_reports(&self, query: Option<&str>, filter: Option<&SearchFilter>) -> HttpRequest {
        let encoded = encode_search(query, filter);
        if encoded.is_empty() {
            return self.build_fetch_outlier_reports();
        }
        self.request(HttpMethod::Get, &format!("{OUTLIER_REPORT_PREFIX}?{encoded}"), None)
    }

    pub fn parse_fetch_outlier_report(&self, response: HttpResponse) -> Result<OutlierReport, ApiError> {
        parse_json(response, CTX_FETCH, CTX_PARSE_ONE)
    }

    pub fn parse_fetch_outlier_reports(&self, response: HttpResponse) -> Result<Vec<OutlierReport>, ApiError> {
        parse_json(response, CTX_FETCH_ALL, CTX_PARSE_MANY)
    }

    pub fn parse_create_outlier_report(&self, response: HttpResponse) -> Result<OutlierReport, ApiError> {
        parse_json(response, CTX_CREATE, CTX_PARSE_ONE)
    }

    pub fn parse_update_outlier_report(&self, response: HttpResponse) -> Result<OutlierReport, ApiError> {
        parse_json(response, CTX_UPDATE, CTX_PARSE_ONE)
    }

    /// The response body is ignored; any 2xx means the report is gone.
    pub fn parse_delete_outlier_report(&self, response: HttpResponse) -> Result<bool, ApiError> {
        check_status(&response, CTX_DELETE)?;
        Ok(true)
    }

    pub fn parse_search_outlier_reports(&self, response: HttpResponse) -> Result<Vec<OutlierReport>, ApiError> {
        parse_json(response, CTX_SEARCH, CTX_PARSE_MANY)
    }

    fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let mut headers = vec![("accept".to_string(), "application/json".to_string())];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        headers.extend(self.auth_headers.iter().cloned());
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers,
            body,
        }
    }
}

/// Form-encode the free-text query and filters. Keys come out sorted; a
/// filter named `search` is merged with the free-text query.
pub(crate) fn encode_search(query: Option<&str>, filter: Option<&SearchFilter>) -> String {
    let mut params: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        params.entry("search").or_default().push(q);
    }
    for (key, values) in filter.into_iter().flatten() {
        for value in values {
            params.entry(key.as_str()).or_default().push(value.as_str());
        }
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, values) in &params {
        for value in values {
            serializer.append_pair(key, value);
        }
    }
    serializer.finish()
}

fn parse_json<T: DeserializeOwned>(
    response: HttpResponse,
    context: &'static str,
    parse_context: &'static str,
) -> Result<T, ApiError> {
    check_status(&response, context)?;
    serde_json::from_str(&response.body).map_err(|source| ApiError::Deserialization {
        context: parse_context,
        source,
    })
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, context: &'static str) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound { context });
    }
    Err(ApiError::HttpError {
        context,
        status: response.status,
        body: response.body.clone(),
    })
}
