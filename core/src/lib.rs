//! Synchronous API client core for the outlier report resource.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The host either executes the
//! round-trip itself or hands a `Transport` to `Api`, which runs
//! build → execute → parse for each operation.
//!
//! # Design
//! - `OutlierReportClient` is stateless: base URL plus static headers.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - CIDs are normalized (`1234` → `/outlier_report/1234`) and validated
//!   before any request is built.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod cid;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use api::Api;
pub use client::OutlierReportClient;
pub use config::ApiConfig;
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use types::{OutlierReport, SearchFilter};
