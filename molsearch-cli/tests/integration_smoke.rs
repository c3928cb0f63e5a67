//! Smoke tests to verify command wiring against an in-process backend

use assert_cmd::Command;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::runtime::Runtime;

/// Serve `router` on a background runtime; keep the runtime alive for the test
fn spawn(router: Router) -> (Runtime, String) {
    let runtime = Runtime::new().unwrap();
    let listener = runtime
        .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
        .unwrap();
    let addr = listener.local_addr().unwrap();
    runtime.spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (runtime, format!("http://{}", addr))
}

fn backend() -> Router {
    Router::new()
        .route("/models", get(|| async { Json(json!(["LogP", "TPSA"])) }))
        .route(
            "/search",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "grid_html": "<table><tr><td>MW</td><td>46.07</td></tr></table>",
                    "SMILES": body["q"],
                    "o_dist": 0.5,
                    "svg": "<svg/>"
                }))
            }),
        )
}

/// `molsearch` isolated from the user's config, .env and environment
fn molsearch(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("molsearch").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("MOLSEARCH_URL")
        .env_remove("MOLSEARCH_TIMEOUT_SECS")
        .env("MOLSEARCH_QUIET", "1");
    cmd
}

// === Help Tests ===

#[test]
fn test_search_help() {
    let home = TempDir::new().unwrap();
    molsearch(&home)
        .arg("search")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("NAME[=VALUE]"));
}

#[test]
fn test_tui_help() {
    let home = TempDir::new().unwrap();
    molsearch(&home)
        .arg("tui")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sketch"));
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    molsearch(&home)
        .arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("molsearch"));
}

// === Backend Tests ===

#[test]
fn test_models_lists_options() {
    let (_rt, url) = spawn(backend());
    let home = TempDir::new().unwrap();
    molsearch(&home)
        .args(["--url", &url, "models"])
        .assert()
        .success()
        .stdout("LogP\nTPSA\n");
}

#[test]
fn test_models_json() {
    let (_rt, url) = spawn(backend());
    let home = TempDir::new().unwrap();
    molsearch(&home)
        .args(["--url", &url, "models", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"TPSA\""));
}

#[test]
fn test_models_rejects_smiles_format() {
    let home = TempDir::new().unwrap();
    molsearch(&home)
        .args(["--url", "http://127.0.0.1:9", "models", "--format", "smiles"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'smiles'"));
}

#[test]
fn test_search_text_card() {
    let (_rt, url) = spawn(backend());
    let home = TempDir::new().unwrap();
    molsearch(&home)
        .args(["--url", &url, "search", "c1ccccc1O", "-o", "LogP"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SMILES:    c1ccccc1O"))
        .stdout(predicate::str::contains("MW  46.07"));
}

#[test]
fn test_search_sketch_overrides_query() {
    let (_rt, url) = spawn(backend());
    let home = TempDir::new().unwrap();
    let sketch = home.path().join("sketch.smi");
    std::fs::write(&sketch, "CCO\n").unwrap();

    molsearch(&home)
        .args(["--url", &url, "search", "ignored", "--format", "smiles", "--sketch"])
        .arg(&sketch)
        .assert()
        .success()
        .stdout("CCO\n");
}

#[test]
fn test_search_writes_svg() {
    let (_rt, url) = spawn(backend());
    let home = TempDir::new().unwrap();
    let svg = home.path().join("best.svg");

    molsearch(&home)
        .args(["--url", &url, "search", "CCN", "--format", "json", "--svg-out"])
        .arg(&svg)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"SMILES\": \"CCN\""));
    assert_eq!(std::fs::read_to_string(&svg).unwrap(), "<svg/>");
}

#[test]
fn test_search_http_failure_exits_non_zero() {
    let router = Router::new()
        .route("/models", get(|| async { Json(json!([])) }))
        .route(
            "/search",
            post(|| async { (StatusCode::BAD_REQUEST, "invalid SMILES") }),
        );
    let (_rt, url) = spawn(router);
    let home = TempDir::new().unwrap();

    molsearch(&home)
        .args(["--url", &url, "search", "XYZ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "POST /search failed: 400 Bad Request: invalid SMILES",
        ));
}

#[test]
fn test_search_requires_something_to_search() {
    let home = TempDir::new().unwrap();
    molsearch(&home)
        .args(["--url", "http://127.0.0.1:9", "search"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to search for"));
}

#[test]
fn test_invalid_url_rejected() {
    let home = TempDir::new().unwrap();
    molsearch(&home)
        .args(["--url", "ftp://example.org", "models"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --url"));
}
