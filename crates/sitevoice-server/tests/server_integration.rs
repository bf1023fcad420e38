use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use sitevoice_engine::{Editor, EditorSettings};
use sitevoice_github::MemoryHost;
use sitevoice_provider::ScriptedPlanner;
use sitevoice_server::{app, ServerState, LEGACY_ORCHESTRATOR_PATH, ORCHESTRATOR_PATH};

const APP_JS: &str = "const siteState = {\n  headline: 'Build faster',\n  theme: 'ember',\n};\n";

fn site() -> Arc<MemoryHost> {
    Arc::new(MemoryHost::with_files("main", [("app.js", APP_JS)]))
}

fn test_app(host: Arc<MemoryHost>, planner: ScriptedPlanner) -> Router {
    let editor = Editor::new(Arc::new(planner), host, EditorSettings::default());
    app(Arc::new(ServerState::new(editor)), &[])
}

async fn send(app: Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let app = test_app(site(), ScriptedPlanner::new());
    let (status, body) = send(app, Method::GET, "/health", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_apply_through_legacy_path() {
    let host = site();
    let planner = ScriptedPlanner::new().with_reply(
        r#"{"actions":[{"type":"update_copy","field":"headline","value":"Launch Week"}]}"#,
    );
    let app = test_app(host.clone(), planner);

    let (status, body) = send(
        app,
        Method::POST,
        LEGACY_ORCHESTRATOR_PATH,
        r#"{"mode":"apply","command":"change the headline to Launch Week"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "apply");
    assert_eq!(body["files"], json!(["app.js"]));
    assert_eq!(body["commitSha"], json!(host.head("main").unwrap()));
    assert_eq!(
        body["outcomes"],
        json!([{"index": 0, "type": "update_copy", "status": "applied"}])
    );
    assert!(host
        .file("main", "app.js")
        .unwrap()
        .contains("headline: 'Launch Week'"));
}

#[tokio::test]
async fn test_plan_mode_echoes_supplied_plan() {
    let app = test_app(site(), ScriptedPlanner::new());
    let (status, body) = send(
        app,
        Method::POST,
        ORCHESTRATOR_PATH,
        r#"{"command":"add a faq","plan":{"summary":"faq","actions":[]}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"mode": "plan", "command": "add a faq", "plan": {"summary": "faq", "actions": []}})
    );
}

#[tokio::test]
async fn test_non_post_is_rejected() {
    let app = test_app(site(), ScriptedPlanner::new());
    let (status, body) = send(app, Method::GET, ORCHESTRATOR_PATH, "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"error": "Method not allowed."}));
}

#[tokio::test]
async fn test_errors_are_json() {
    let host = site();
    let app = test_app(host.clone(), ScriptedPlanner::new());

    let (status, body) = send(app.clone(), Method::POST, ORCHESTRATOR_PATH, "{}").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Missing command."}));

    let (status, body) = send(
        app.clone(),
        Method::POST,
        ORCHESTRATOR_PATH,
        r#"{"mode":"rollback","command":"undo"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Rollback disabled for live apply mode."}));

    let (status, body) = send(app, Method::POST, ORCHESTRATOR_PATH, "{oops").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON body"));
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_array_body_does_not_publish() {
    let host = site();
    let before = host.head("main");
    let app = test_app(host.clone(), ScriptedPlanner::new());

    let (status, body) = send(
        app,
        Method::POST,
        ORCHESTRATOR_PATH,
        r#"["apply", "change the headline", {"actions": []}]"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Missing command."}));
    assert_eq!(host.head("main"), before);
    assert!(host.calls().is_empty());
}
