use std::{
    collections::BTreeMap,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};

pub const AUTH_TOKEN_HEADER: &str = "x-circonus-auth-token";

/// Owner recorded in `_created_by` / `_last_modified_by`.
pub const MOCK_USER: &str = "/user/1000";

const SEARCH_KEYS: [&str; 4] = ["search", "f_title", "f_metric_cluster", "f_tags_has"];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    #[serde(rename = "_cid", default)]
    pub cid: String,
    #[serde(default)]
    pub config: String,
    #[serde(rename = "_created", default)]
    pub created: u64,
    #[serde(rename = "_created_by", default)]
    pub created_by: String,
    #[serde(rename = "_last_modified", default)]
    pub last_modified: u64,
    #[serde(rename = "_last_modified_by", default)]
    pub last_modified_by: String,
    #[serde(default)]
    pub metric_cluster: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub title: String,
}

/// Client-writable fields. Server-managed `_` fields in a request body are
/// ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReportInput {
    pub config: String,
    pub metric_cluster: String,
    pub tags: Vec<String>,
    pub title: String,
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: u64,
    reports: BTreeMap<u64, OutlierReport>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/outlier_report", get(list_reports).post(create_report))
        .route(
            "/outlier_report/{id}",
            get(get_report).put(update_report).delete(delete_report),
        )
        .with_state(db)
        .layer(middleware::from_fn(require_token))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_token(request: Request, next: Next) -> Result<Response, StatusCode> {
    let has_token = request
        .headers()
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| !v.is_empty());
    if !has_token {
        warn!(uri = %request.uri(), "rejecting request without API token");
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(next.run(request).await)
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Group query pairs by key, rejecting keys the endpoint does not support.
fn criteria(params: Vec<(String, String)>) -> Result<BTreeMap<String, Vec<String>>, (StatusCode, String)> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in params {
        if !SEARCH_KEYS.contains(&key.as_str()) {
            return Err((StatusCode::BAD_REQUEST, format!("unsupported filter: {key}")));
        }
        grouped.entry(key).or_default().push(value);
    }
    Ok(grouped)
}

/// Values for one key OR together; keys AND together.
fn matches(report: &OutlierReport, criteria: &BTreeMap<String, Vec<String>>) -> bool {
    criteria.iter().all(|(key, values)| {
        values.iter().any(|value| match key.as_str() {
            "search" => report.title.to_lowercase().contains(&value.to_lowercase()),
            "f_title" => report.title == *value,
            "f_metric_cluster" => report.metric_cluster == *value,
            "f_tags_has" => report.tags.contains(value),
            _ => false,
        })
    })
}

async fn list_reports(
    State(db): State<Db>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<OutlierReport>>, (StatusCode, String)> {
    let criteria = criteria(params)?;
    let store = db.read().await;
    Ok(Json(
        store
            .reports
            .values()
            .filter(|r| matches(r, &criteria))
            .cloned()
            .collect(),
    ))
}

async fn create_report(State(db): State<Db>, Json(input): Json<ReportInput>) -> Json<OutlierReport> {
    let mut store = db.write().await;
    store.next_id += 1;
    let id = store.next_id;
    let ts = now();
    let report = OutlierReport {
        cid: format!("/outlier_report/{id}"),
        config: input.config,
        created: ts,
        created_by: MOCK_USER.to_string(),
        last_modified: ts,
        last_modified_by: MOCK_USER.to_string(),
        metric_cluster: input.metric_cluster,
        tags: input.tags,
        title: input.title,
    };
    store.reports.insert(id, report.clone());
    info!(cid = %report.cid, "created outlier report");
    Json(report)
}

async fn get_report(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<OutlierReport>, StatusCode> {
    let store = db.read().await;
    store.reports.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_report(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<ReportInput>,
) -> Result<Json<OutlierReport>, StatusCode> {
    let mut store = db.write().await;
    let report = store.reports.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    report.config = input.config;
    report.metric_cluster = input.metric_cluster;
    report.tags = input.tags;
    report.title = input.title;
    report.last_modified = now();
    report.last_modified_by = MOCK_USER.to_string();
    info!(cid = %report.cid, "updated outlier report");
    Ok(Json(report.clone()))
}

async fn delete_report(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    let removed = store.reports.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    info!(cid = %removed.cid, "deleted outlier report");
    Ok(StatusCode::NO_CONTENT)
}
