//! Domain DTOs for the outlier report API.
//!
//! # Design
//! Every field is optional on the wire. Rather than wrapping each one in
//! `Option`, fields hold their zero value when absent and are skipped on
//! serialization when empty, so `OutlierReport::default()` serializes to `{}`.
//! These types are defined independently from the mock-server crate;
//! integration tests catch schema drift between the two.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A saved outlier-detection analysis over a metric cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutlierReport {
    #[serde(rename = "_cid", default, skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub cid: String,

    #[serde(default, skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub config: String,

    #[serde(rename = "_created", default, skip_serializing_if = "is_zero", deserialize_with = "nullable")]
    pub created: u64,

    #[serde(rename = "_created_by", default, skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub created_by: String,

    #[serde(rename = "_last_modified", default, skip_serializing_if = "is_zero", deserialize_with = "nullable")]
    pub last_modified: u64,

    #[serde(rename = "_last_modified_by", default, skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub last_modified_by: String,

    /// CID of the metric cluster the report analyses. Not validated locally.
    #[serde(rename = "metric_cluster", default, skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub metric_cluster_cid: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub title: String,
}

impl OutlierReport {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Search filters: filter name to the values it should match, e.g.
/// `f_tags_has => ["env:prod"]`. Ordered so encoded queries are stable.
pub type SearchFilter = BTreeMap<String, Vec<String>>;

fn is_zero(v: &u64) -> bool {
    *v == 0
}

/// Treat an explicit JSON `null` like a missing key.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
