//! End-to-end export of a loaded savepoint into a directory.

use std::sync::Arc;

use savepoint_core::{RecordingNotifier, Workspace};
use savepoint_export::{ConvertClient, DirectorySink, ExportOutcome, Exporter};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_loaded_savepoint_exports_to_directory() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/convert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "invisible": [],
            "componentTree": { "type": "Group", "components": [] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::new());
    let mut ws = Workspace::default().with_notifier(notifier.clone());
    ws.load_project_from_json(
        json!({
            "name": "Shop Screen",
            "version": 4,
            "invisible": ["banner"],
            "width": 1024,
            "height": 768,
            "componentTree": {
                "type": "Group",
                "id": "component_tree",
                "name": "-",
                "components": [
                    { "type": "Group", "id": "banner", "name": "Banner", "components": [] }
                ]
            }
        }),
        false,
    )
    .await
    .expect("load");

    let out = tempfile::tempdir().expect("tempdir");
    let exporter = Exporter::new(
        ConvertClient::new(&format!("{}/api", server.uri())).expect("client"),
        Arc::new(DirectorySink::new(out.path())),
    );

    let outcome = exporter.download_current_project_file(&ws, "KEY").await;
    assert_eq!(
        outcome,
        ExportOutcome::Delivered {
            file_name: "Shop_Screen.json".to_string()
        }
    );

    let written = std::fs::read_to_string(out.path().join("Shop_Screen.json")).expect("artifact");
    let artifact: Value = serde_json::from_str(&written).expect("json");
    assert_eq!(artifact["version"], json!(4));
    assert_eq!(artifact["width"], json!(1024));
    assert_eq!(artifact["invisible"], json!([]));
    assert_eq!(artifact["exportedTree"]["type"], json!("Group"));
    assert_eq!(artifact["componentTree"]["components"][0]["id"], json!("banner"));
    assert!(notifier.notifications().is_empty());
    assert!(!ws.loading().is_active());
}

#[tokio::test]
async fn test_hostile_project_name_stays_inside_out_dir() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "invisible": [],
            "componentTree": {}
        })))
        .mount(&server)
        .await;

    let mut ws = Workspace::default();
    ws.settings.project_name = "../escaped".to_string();

    let root = tempfile::tempdir().expect("tempdir");
    let out = root.path().join("out");
    let exporter = Exporter::new(
        ConvertClient::new(&server.uri()).expect("client"),
        Arc::new(DirectorySink::new(&out)),
    );

    let outcome = exporter.download_current_project_file(&ws, "KEY").await;
    assert_eq!(
        outcome,
        ExportOutcome::Delivered {
            file_name: ".._escaped.json".to_string()
        }
    );
    assert!(out.join(".._escaped.json").exists());
    assert!(!root.path().join("escaped.json").exists());
}
