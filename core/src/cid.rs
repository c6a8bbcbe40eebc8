//! Canonical identifier (CID) rules for outlier reports.
//!
//! A CID is the resource path of a report on the API surface, e.g.
//! `/outlier_report/1234`. Callers may pass either the full CID or the bare
//! numeric id; `normalize` turns the latter into the former.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ApiError;

/// Collection path for outlier reports.
pub const OUTLIER_REPORT_PREFIX: &str = "/outlier_report";

/// Pattern a fully-qualified outlier report CID must match.
pub const OUTLIER_REPORT_CID_PATTERN: &str = r"^/outlier_report/[0-9]+$";

static OUTLIER_REPORT_CID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(OUTLIER_REPORT_CID_PATTERN).expect("CID pattern is valid"));

/// Prefix a bare id with the collection path and validate the result.
///
/// Values already starting with the prefix are left untouched, so a
/// malformed prefixed value is rejected rather than repaired.
pub fn normalize(cid: &str) -> Result<String, ApiError> {
    if cid.is_empty() {
        return Err(ApiError::MissingCid);
    }
    let full = if cid.starts_with(OUTLIER_REPORT_PREFIX) {
        cid.to_string()
    } else {
        format!("{OUTLIER_REPORT_PREFIX}/{cid}")
    };
    validate(&full)?;
    Ok(full)
}

pub fn validate(cid: &str) -> Result<(), ApiError> {
    if OUTLIER_REPORT_CID.is_match(cid) {
        Ok(())
    } else {
        Err(ApiError::InvalidCid(cid.to_string()))
    }
}
