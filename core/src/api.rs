//! Typed outlier report operations over a caller-supplied `Transport`.
//!
//! Each method is build → execute → parse on top of `OutlierReportClient`.
//! Transport failures are wrapped with the same operation context the
//! parser uses for status errors.

use tracing::{debug, warn};

use crate::client::{
    encode_search, OutlierReportClient, CTX_CREATE, CTX_DELETE, CTX_FETCH, CTX_FETCH_ALL, CTX_SEARCH, CTX_UPDATE,
};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{OutlierReport, SearchFilter};

pub struct Api<T> {
    client: OutlierReportClient,
    transport: T,
}

impl<T: Transport> Api<T> {
    pub fn new(client: OutlierReportClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn from_config(config: &ApiConfig, transport: T) -> Self {
        Self::new(OutlierReportClient::from_config(config), transport)
    }

    pub fn client(&self) -> &OutlierReportClient {
        &self.client
    }

    /// Fetch one report by CID or bare numeric id.
    pub fn fetch_outlier_report(&self, cid: &str) -> Result<OutlierReport, ApiError> {
        let req = self.client.build_fetch_outlier_report(cid)?;
        let resp = self.send(req, CTX_FETCH)?;
        debug!(body = %resp.body, "fetch outlier report, received JSON");
        self.client.parse_fetch_outlier_report(resp)
    }

    /// Fetch every report visible to the API token.
    pub fn fetch_outlier_reports(&self) -> Result<Vec<OutlierReport>, ApiError> {
        let req = self.client.build_fetch_outlier_reports();
        let resp = self.send(req, CTX_FETCH_ALL)?;
        self.client.parse_fetch_outlier_reports(resp)
    }

    pub fn create_outlier_report(&self, report: &OutlierReport) -> Result<OutlierReport, ApiError> {
        let req = self.client.build_create_outlier_report(report)?;
        debug!(body = req.body.as_deref().unwrap_or_default(), "create outlier report, sending JSON");
        let resp = self.send(req, CTX_CREATE)?;
        self.client.parse_create_outlier_report(resp)
    }

    /// Replace the server's copy of `report`, identified by `report.cid`.
    pub fn update_outlier_report(&self, report: &OutlierReport) -> Result<OutlierReport, ApiError> {
        let req = self.client.build_update_outlier_report(report)?;
        debug!(body = req.body.as_deref().unwrap_or_default(), "update outlier report, sending JSON");
        let resp = self.send(req, CTX_UPDATE)?;
        self.client.parse_update_outlier_report(resp)
    }

    pub fn delete_outlier_report(&self, report: &OutlierReport) -> Result<bool, ApiError> {
        self.delete_outlier_report_by_cid(&report.cid)
    }

    pub fn delete_outlier_report_by_cid(&self, cid: &str) -> Result<bool, ApiError> {
        let req = self.client.build_delete_outlier_report_by_cid(cid)?;
        let resp = self.send(req, CTX_DELETE)?;
        self.client.parse_delete_outlier_report(resp)
    }

    /// Search by free text and/or filters. With neither, every report is
    /// returned.
    pub fn search_outlier_reports(
        &self,
        query: Option<&str>,
        filter: Option<&SearchFilter>,
    ) -> Result<Vec<OutlierReport>, ApiError> {
        if encode_search(query, filter).is_empty() {
            return self.fetch_outlier_reports();
        }
        let req = self.client.build_search_outlier_reports(query, filter);
        let resp = self.send(req, CTX_SEARCH)?;
        self.client.parse_search_outlier_reports(resp)
    }

    fn send(&self, req: HttpRequest, context: &'static str) -> Result<HttpResponse, ApiError> {
        debug!(method = req.method.as_str(), path = %req.path, "{context}");
        let resp = self
            .transport
            .execute(req)
            .map_err(|source| ApiError::Transport { context, source })?;
        if !resp.is_success() {
            warn!(status = resp.status, "{context}: unexpected status");
        }
        Ok(resp)
    }
}
