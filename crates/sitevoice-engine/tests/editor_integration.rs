use serde_json::json;
use std::sync::Arc;

use sitevoice_config::PublishMode;
use sitevoice_engine::{execute_plan, Editor, EditorError, EditorSettings};
use sitevoice_github::{HostOp, MemoryHost};
use sitevoice_provider::{PlannerError, ScriptedPlanner};
use sitevoice_types::{ActionStatus, EditRequest, Mode, Plan, SkipReason};

const INDEX: &str = r#"<!doctype html>
<html lang="en">
<head>
  <title>YoutuneAI</title>
  <meta name="description" content="Revenue engine" />
</head>
<body>
  <header class="site-header">
    <nav class="nav">
      <a href="index.html">Home</a>
    </nav>
  </header>
  <main class="page">
    <section class="section hero" id="hero"></section>
  </main>
  <footer class="footer">
    <div class="footer-links">
      <a href="index.html">Home</a>
    </div>
  </footer>
</body>
</html>
"#;

const APP_JS: &str =
    "const siteState = {\n  headline: 'Build faster',\n  subhead: 'Ship today',\n  theme: 'ember',\n};\n";

const STYLES: &str = "body {\n  background-image: url('old.jpg');\n}\n";

fn site() -> Arc<MemoryHost> {
    Arc::new(MemoryHost::with_files(
        "main",
        [
            ("index.html", INDEX),
            ("app.js", APP_JS),
            ("styles.css", STYLES),
        ],
    ))
}

fn editor(planner: ScriptedPlanner, host: Arc<MemoryHost>) -> Editor {
    Editor::new(Arc::new(planner), host, EditorSettings::default())
}

fn request(mode: Option<&str>, command: &str) -> EditRequest {
    EditRequest {
        mode: mode.map(str::to_string),
        command: Some(command.to_string()),
        plan: None,
    }
}

#[tokio::test]
async fn test_launch_week_headline_commit() {
    let host = site();
    let before = host.head("main").unwrap();
    let planner = ScriptedPlanner::new().with_reply(
        r#"{"actions":[{"type":"update_copy","field":"headline","value":"Launch Week"}]}"#,
    );
    let editor = editor(planner, host.clone());

    let response = editor
        .handle(request(Some("apply"), "change the headline to Launch Week"))
        .await
        .unwrap();

    assert_eq!(response.mode, Mode::Apply);
    let commit = response.commit.unwrap();
    assert_eq!(commit.files, vec!["app.js"]);
    assert_eq!(host.head("main").as_deref(), Some(commit.commit_sha.as_str()));
    assert_eq!(host.commit(&commit.commit_sha).unwrap().parents, vec![before]);
    assert_eq!(
        host.commit_message(&commit.commit_sha).as_deref(),
        Some("Live update: change the headline to Launch Week")
    );

    let app = host.file("main", "app.js").unwrap();
    assert!(app.contains("headline: 'Launch Week'"));
    assert!(app.contains("subhead: 'Ship today'"));
    assert_eq!(host.file("main", "index.html").as_deref(), Some(INDEX));
    assert_eq!(host.calls_of(HostOp::CreateBlob).len(), 1);
}

#[tokio::test]
async fn test_styles_only_plan_fetches_only_styles() {
    let host = site();
    let editor = editor(ScriptedPlanner::new(), host.clone());
    let mut edit = request(Some("apply"), "swap the wallpaper");
    edit.plan = Some(json!({
        "actions": [{"type": "update_wallpaper", "src": "new.jpg"}]
    }));

    let response = editor.handle(edit).await.unwrap();

    assert_eq!(host.fetched_paths(), vec!["styles.css"]);
    assert_eq!(response.commit.unwrap().files, vec!["styles.css"]);
    assert!(host
        .file("main", "styles.css")
        .unwrap()
        .contains(r#"background-image: url("new.jpg")"#));
}

#[tokio::test]
async fn test_two_documents_land_in_one_commit() {
    let host = site();
    let before = host.head("main").unwrap();
    let editor = editor(ScriptedPlanner::new(), host.clone());
    let mut edit = request(Some("apply"), "ocean theme and a faq");
    edit.plan = Some(json!({
        "actions": [
            {"type": "update_theme", "theme": "ocean"},
            {"type": "insert_section", "id": "faq", "title": "FAQ", "body": "Answers."}
        ]
    }));

    let response = editor.handle(edit).await.unwrap();
    let commit = response.commit.unwrap();

    assert_eq!(commit.files, vec!["index.html", "app.js"]);
    assert_eq!(host.calls_of(HostOp::CreateCommit).len(), 1);
    assert_eq!(host.commit(&commit.commit_sha).unwrap().parents, vec![before]);
    assert!(host.file("main", "app.js").unwrap().contains("theme: 'ocean'"));
    assert!(host.file("main", "index.html").unwrap().contains(r#"id="faq""#));
    assert_eq!(host.file("main", "styles.css").as_deref(), Some(STYLES));
}

#[tokio::test]
async fn test_add_page_links_and_creates_page() {
    let host = site();
    let editor = editor(ScriptedPlanner::new(), host.clone());
    let mut edit = request(Some("apply"), "add a partners page");
    edit.plan = Some(json!({
        "actions": [{"type": "add_page", "slug": "partners", "title": "Partners"}]
    }));

    let response = editor.handle(edit).await.unwrap();

    assert_eq!(
        response.commit.unwrap().files,
        vec!["index.html", "partners.html"]
    );
    let index = host.file("main", "index.html").unwrap();
    assert_eq!(
        index.matches(r#"<a href="partners.html">Partners</a>"#).count(),
        2
    );
    let page = host.file("main", "partners.html").unwrap();
    assert!(page.contains("<title>Partners</title>"));
}

#[tokio::test]
async fn test_outcomes_report_skips() {
    let host = site();
    let editor = editor(ScriptedPlanner::new(), host.clone());
    let mut edit = request(Some("apply"), "edit things");
    edit.plan = Some(json!({
        "actions": [
            {"type": "update_copy", "field": "theme", "value": "x"},
            {"type": "rewrite_everything"},
            {"type": "update_copy", "field": "subhead", "value": "Now"}
        ]
    }));

    let response = editor.handle(edit).await.unwrap();
    let outcomes = response.outcomes.unwrap();

    assert_eq!(outcomes.len(), 3);
    assert_eq!(
        outcomes[0].status,
        ActionStatus::Skipped(SkipReason::FieldNotEditable("theme".to_string()))
    );
    assert_eq!(outcomes[1].status, ActionStatus::Skipped(SkipReason::Unsupported));
    assert_eq!(outcomes[2].status, ActionStatus::Applied);
    assert!(host.file("main", "app.js").unwrap().contains("subhead: 'Now'"));
}

#[tokio::test]
async fn test_plan_mode_returns_planner_output() {
    let host = site();
    let planner = ScriptedPlanner::new().with_reply(
        "```json\n{\"summary\":\"faq\",\"actions\":[{\"type\":\"insert_section\",\"id\":\"faq\"}]}\n```",
    );
    let editor = editor(planner, host.clone());

    let response = editor.handle(request(None, "add a faq")).await.unwrap();

    assert_eq!(response.mode, Mode::Plan);
    assert_eq!(response.plan["summary"], "faq");
    assert!(response.commit.is_none());
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_planner_reply_fails_without_host_calls() {
    let host = site();
    let planner = ScriptedPlanner::new().with_reply("Sure, I can help with that!");
    let editor = editor(planner, host.clone());

    let err = editor
        .handle(request(Some("plan"), "make it pop"))
        .await
        .unwrap_err();

    assert_eq!(err, EditorError::Planner(PlannerError::ParseError));
    assert_eq!(err.to_string(), "Failed to parse JSON response.");
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_supplied_plan_skips_planner() {
    let host = site();
    let planner = Arc::new(ScriptedPlanner::new());
    let editor = Editor::new(planner.clone(), host, EditorSettings::default());
    let mut edit = request(Some("plan"), "keep it");
    edit.plan = Some(json!({"actions": []}));

    let response = editor.handle(edit).await.unwrap();

    assert_eq!(response.plan, json!({"actions": []}));
    assert!(planner.commands().is_empty());
}

#[tokio::test]
async fn test_request_errors() {
    let host = site();
    let editor = editor(ScriptedPlanner::new(), host.clone());

    let err = editor.handle(request(Some("apply"), "")).await.unwrap_err();
    assert_eq!(err.to_string(), "Missing command.");

    let err = editor
        .handle(request(Some("rollback"), "undo"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Rollback disabled for live apply mode.");

    let err = editor
        .handle(request(Some("deploy"), "ship"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Unsupported mode: deploy.");

    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_pull_request_mode() {
    let host = site();
    let before = host.head("main");
    let settings = EditorSettings {
        base_branch: "main".to_string(),
        publish: PublishMode::PullRequest,
    };
    let editor = Editor::new(Arc::new(ScriptedPlanner::new()), host.clone(), settings);
    let mut edit = request(Some("apply"), "ocean theme");
    edit.plan = Some(json!({"actions": [{"type": "update_theme", "theme": "ocean"}]}));

    let response = editor.handle(edit).await.unwrap();
    let commit = response.commit.unwrap();

    assert_eq!(host.head("main"), before);
    let branch = commit.branch_name.unwrap();
    assert!(branch.starts_with("voice/"));
    assert_eq!(host.head(&branch), Some(commit.commit_sha.clone()));
    assert_eq!(commit.pr_url.as_deref(), Some("https://github.example/pulls/1"));
    assert_eq!(
        host.commit_message(&commit.commit_sha).as_deref(),
        Some("Voice update: ocean theme")
    );
    let pulls = host.pull_requests();
    assert_eq!(pulls[0].head, branch);
    assert_eq!(pulls[0].body, "Command: ocean theme\n\nActions:\n- update_theme");
}

#[tokio::test]
async fn test_publish_failure_is_fatal() {
    let host = site();
    let before = host.head("main");
    host.fail_on(
        HostOp::UpdateRef,
        sitevoice_github::HostError::ApiError("Update is not a fast forward".to_string()),
    );
    let editor = editor(ScriptedPlanner::new(), host.clone());
    let mut edit = request(Some("apply"), "ocean theme");
    edit.plan = Some(json!({"actions": [{"type": "update_theme", "theme": "ocean"}]}));

    let err = editor.handle(edit).await.unwrap_err();

    assert_eq!(err.to_string(), "GitHub error: Update is not a fast forward");
    assert_eq!(host.head("main"), before);
}

#[tokio::test]
async fn test_each_document_fetched_once() {
    let host = site();
    let editor = editor(ScriptedPlanner::new(), host.clone());
    let mut edit = request(Some("apply"), "refresh the landing page");
    edit.plan = Some(json!({
        "actions": [
            {"type": "update_copy", "field": "headline", "value": "Launch Week"},
            {"type": "insert_section", "id": "faq", "title": "FAQ", "body": "Answers."},
            {"type": "update_theme", "theme": "volt"},
            {"type": "update_meta", "title": "Launch"},
            {"type": "update_copy", "field": "subhead", "value": "Now"},
            {"type": "insert_stream", "id": "live", "url": "https://example.com/live"}
        ]
    }));

    let response = editor.handle(edit).await.unwrap();

    assert_eq!(host.fetched_paths(), vec!["index.html", "app.js"]);
    assert_eq!(response.commit.unwrap().files, vec!["index.html", "app.js"]);
    let outcomes = response.outcomes.unwrap();
    assert!(outcomes.iter().all(|outcome| outcome.status.is_applied()));
    let app = host.file("main", "app.js").unwrap();
    assert!(app.contains("headline: 'Launch Week'"));
    assert!(app.contains("subhead: 'Now'"));
    assert!(app.contains("theme: 'volt'"));
}

#[tokio::test]
async fn test_replaying_insertions_changes_nothing() {
    let actions = json!([
        {"type": "insert_monetization"},
        {"type": "insert_section", "id": "faq", "title": "FAQ", "body": "Answers."},
        {"type": "insert_video", "id": "intro", "src": "intro.mp4"},
        {"type": "insert_stream", "id": "live", "url": "https://example.com/live"},
        {"type": "add_page", "slug": "partners", "title": "Partners"}
    ]);
    let once = Plan::from_value(&json!({ "actions": actions }));
    let mut doubled = once.actions.clone();
    doubled.extend(once.actions.iter().cloned());

    let single = execute_plan(site().as_ref(), "main", &once.actions)
        .await
        .unwrap();
    let replayed = execute_plan(site().as_ref(), "main", &doubled)
        .await
        .unwrap();

    assert_eq!(replayed.updates, single.updates);
    assert_eq!(
        replayed.updates.paths(),
        vec!["index.html", "styles.css", "partners.html"]
    );
    assert!(replayed.outcomes[..5]
        .iter()
        .all(|outcome| outcome.status.is_applied()));
    // The replayed page is synthesized again with identical content.
    assert!(replayed.outcomes[5..9]
        .iter()
        .all(|outcome| !outcome.status.is_applied()));
}
