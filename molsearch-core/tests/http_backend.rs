//! HTTP client and session tests against an in-process axum backend

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use molsearch_core::{
    ClientConfig, HttpSearchClient, OptionValue, PageHandle, ResultSlot, SearchBackend,
    SearchFailure, SearchRequest, SearchSession, SessionViews, TransportKind, UiState,
    JSON_CONTENT_TYPE,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<Value>>>,
    content_types: Arc<Mutex<Vec<String>>>,
}

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_for(base: &str) -> HttpSearchClient {
    let config = ClientConfig::default().with_base_url(base).unwrap();
    HttpSearchClient::new(&config).unwrap()
}

async fn models() -> Json<Value> {
    Json(json!(["LogP", "TPSA"]))
}

async fn search(State(rec): State<Recorded>, headers: HeaderMap, body: String) -> Json<Value> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    rec.content_types.lock().unwrap().push(content_type);

    let body: Value = serde_json::from_str(&body).unwrap();
    let smiles = body["q"].as_str().unwrap_or_default().to_string();
    rec.bodies.lock().unwrap().push(body);

    Json(json!({
        "grid_html": "<div class=\"grid\">MW 46.07</div>",
        "SMILES": smiles,
        "o_dist": 0.125,
        "svg": "<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>"
    }))
}

fn backend(rec: Recorded) -> Router {
    Router::new()
        .route("/models", get(models))
        .route("/search", post(search))
        .with_state(rec)
}

#[tokio::test]
async fn test_fetch_models() {
    let base = spawn(backend(Recorded::default())).await;
    let names = client_for(&base).fetch_models().await.unwrap();
    assert_eq!(names, vec!["LogP", "TPSA"]);
}

#[tokio::test]
async fn test_search_sends_json_body_with_charset_header() {
    let rec = Recorded::default();
    let base = spawn(backend(rec.clone())).await;

    let mut options = molsearch_core::OptionMap::new();
    options.insert("LogP".to_string(), OptionValue::Flag(true));
    let request = SearchRequest::build("", "CCO", options);

    let result = client_for(&base).search(&request).await.unwrap();
    assert_eq!(result.smiles, "CCO");
    assert_eq!(result.origin_distance.to_string(), "0.125");

    assert_eq!(rec.content_types.lock().unwrap()[0], JSON_CONTENT_TYPE);
    assert_eq!(
        rec.bodies.lock().unwrap()[0],
        json!({ "drawn": "", "q": "CCO", "options": { "LogP": true } })
    );
}

#[tokio::test]
async fn test_non_ok_status_is_http_failure() {
    let router = Router::new().route(
        "/search",
        post(|| async { (StatusCode::BAD_REQUEST, "could not parse SMILES") }),
    );
    let base = spawn(router).await;

    let err = client_for(&base)
        .search(&SearchRequest::build("", "not-a-molecule", Default::default()))
        .await
        .unwrap_err();

    match err {
        SearchFailure::Http(http) => {
            assert_eq!(http.status, 400);
            assert_eq!(http.reason, "Bad Request");
            assert_eq!(http.body, "could not parse SMILES");
        }
        other => panic!("expected HTTP failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_failure() {
    let router = Router::new().route("/models", get(|| async { "not json" }));
    let base = spawn(router).await;

    let err = client_for(&base).fetch_models().await.unwrap_err();
    match err {
        SearchFailure::Transport(t) => assert_eq!(t.kind, TransportKind::Decode),
        other => panic!("expected transport failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_connect_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(&format!("http://{}", addr))
        .fetch_models()
        .await
        .unwrap_err();
    match err {
        SearchFailure::Transport(t) => assert_eq!(t.kind, TransportKind::Connect),
        other => panic!("expected transport failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_session_round_trip_over_http() {
    let rec = Recorded::default();
    let base = spawn(backend(rec.clone())).await;
    let client = client_for(&base);

    let page = PageHandle::new();
    let mut session = SearchSession::new(SessionViews::from_page(
        &page,
        Box::new(|| "c1ccccc1O".to_string()),
    ));

    session.bootstrap(&client).await;
    assert_eq!(page.borrow().labels(), vec!["LogP", "TPSA"]);
    page.borrow_mut().toggle_field(1);

    session.submit(&client).await;

    assert_eq!(session.state(), UiState::Succeeded);
    let page = page.borrow();
    assert_eq!(page.query, "c1ccccc1O");
    assert_eq!(page.slot(ResultSlot::Smiles), "c1ccccc1O");
    assert!(page.slot(ResultSlot::Graphic).starts_with("<svg"));
    assert_eq!(
        rec.bodies.lock().unwrap()[0],
        json!({ "drawn": "c1ccccc1O", "q": "c1ccccc1O", "options": { "TPSA": true } })
    );
}

#[tokio::test]
async fn test_models_failure_over_http_surfaces_error() {
    let router = Router::new().route(
        "/models",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = spawn(router).await;
    let client = client_for(&base);

    let page = PageHandle::new();
    let mut session = SearchSession::new(SessionViews::from_page(
        &page,
        Box::new(molsearch_core::NothingDrawn),
    ));
    session.bootstrap(&client).await;

    assert_eq!(session.state(), UiState::Failed);
    assert_eq!(
        page.borrow().error.as_deref(),
        Some("GET /models failed: 500 Internal Server Error")
    );
    assert!(session.options().is_empty());
}
