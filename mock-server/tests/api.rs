use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, OutlierReport, AUTH_TOKEN_HEADER, MOCK_USER};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTH_TOKEN_HEADER, "test-token")
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTH_TOKEN_HEADER, "test-token")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

async fn create(app: &Router, body: &str) -> OutlierReport {
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/outlier_report", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

// --- auth ---

#[tokio::test]
async fn missing_token_returns_403() {
    let app = app();
    let resp = app
        .oneshot(Request::builder().uri("/outlier_report").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// --- list ---

#[tokio::test]
async fn list_reports_empty() {
    let app = app();
    let resp = app.oneshot(request("GET", "/outlier_report")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let reports: Vec<OutlierReport> = body_json(resp).await;
    assert!(reports.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_report_assigns_cid_and_audit_fields() {
    let app = app();
    let report = create(
        &app,
        r#"{"title":"CPU outliers","metric_cluster":"/metric_cluster/3","tags":["env:prod"]}"#,
    )
    .await;

    assert_eq!(report.cid, "/outlier_report/1");
    assert_eq!(report.title, "CPU outliers");
    assert_eq!(report.metric_cluster, "/metric_cluster/3");
    assert_eq!(report.tags, vec!["env:prod".to_string()]);
    assert_eq!(report.created_by, MOCK_USER);
    assert!(report.created > 0);
    assert_eq!(report.created, report.last_modified);

    let second = create(&app, r#"{"title":"second"}"#).await;
    assert_eq!(second.cid, "/outlier_report/2");
}

#[tokio::test]
async fn create_report_malformed_json_returns_4xx() {
    let app = app();
    let resp = app
        .oneshot(json_request("POST", "/outlier_report", r#"{"title":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get ---

#[tokio::test]
async fn get_report_not_found() {
    let app = app();
    let resp = app.oneshot(request("GET", "/outlier_report/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_report_bad_id_returns_400() {
    let app = app();
    let resp = app.oneshot(request("GET", "/outlier_report/abc")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_report_after_create() {
    let app = app();
    let created = create(&app, r#"{"title":"t","config":"{\"k\":1}"}"#).await;
    let resp = app.oneshot(request("GET", "/outlier_report/1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: OutlierReport = body_json(resp).await;
    assert_eq!(fetched, created);
    assert_eq!(fetched.config, r#"{"k":1}"#);
}

// --- update ---

#[tokio::test]
async fn update_report_not_found() {
    let app = app();
    let resp = app
        .oneshot(json_request("PUT", "/outlier_report/42", r#"{"title":"Nope"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_report_keeps_identity() {
    let app = app();
    let created = create(&app, r#"{"title":"before"}"#).await;
    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/outlier_report/1",
            r#"{"_cid":"/outlier_report/99","title":"after","tags":["a"]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let updated: OutlierReport = body_json(resp).await;
    assert_eq!(updated.cid, created.cid);
    assert_eq!(updated.created, created.created);
    assert_eq!(updated.title, "after");
    assert_eq!(updated.tags, vec!["a".to_string()]);
}

// --- delete ---

#[tokio::test]
async fn delete_report_not_found() {
    let app = app();
    let resp = app.oneshot(request("DELETE", "/outlier_report/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_report_returns_204_with_empty_body() {
    let app = app();
    create(&app, r#"{"title":"doomed"}"#).await;
    let resp = app
        .clone()
        .oneshot(request("DELETE", "/outlier_report/1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = app.oneshot(request("GET", "/outlier_report/1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- search ---

#[tokio::test]
async fn search_filters_reports() {
    let app = app();
    create(&app, r#"{"title":"Disk latency","tags":["env:prod"]}"#).await;
    create(&app, r#"{"title":"disk iops","tags":["env:dev"]}"#).await;
    create(&app, r#"{"title":"cpu","tags":["env:prod"]}"#).await;

    let resp = app
        .clone()
        .oneshot(request("GET", "/outlier_report?search=disk"))
        .await
        .unwrap();
    let reports: Vec<OutlierReport> = body_json(resp).await;
    assert_eq!(reports.len(), 2);

    let resp = app
        .clone()
        .oneshot(request("GET", "/outlier_report?f_tags_has=env%3Aprod&search=disk"))
        .await
        .unwrap();
    let reports: Vec<OutlierReport> = body_json(resp).await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].title, "Disk latency");
}

#[tokio::test]
async fn search_unknown_filter_returns_400() {
    let app = app();
    let resp = app
        .oneshot(request("GET", "/outlier_report?f_owner=me"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
