//! Functional tests for saving and reading scenario schemas.
//!
//! These tests drive the SchemaService end to end against in-memory fakes:
//! - Local saves round-trip through local storage.
//! - Server saves post schema, then packages, under derived keys; any
//!   failure, including a non-2xx status, aborts the rest of the save.
//! - Reads never fail and fall back to the bundled default page.

use lowcode_persist::{
    default_page_schema, Namespace, PersistError, SaveTarget, TransformStage, DEFAULT_SCENARIO,
};
use lowcode_request::HttpFailure;
use lowcode_test_utils::{exported_project, setup_harness};
use pretty_assertions::assert_eq;
use serde_json::json;

/// A schema written to local storage reads back deep-equal.
#[tokio::test]
async fn local_save_round_trips_project_schema() {
    let h = setup_harness(false);
    let exported = exported_project(json!({"componentName": "Page", "id": "p1", "children": []}));
    h.editor.set_current(exported.clone());

    h.service.save_schema("general", SaveTarget::Local).await.unwrap();

    let stored = h
        .service
        .get_project_schema_from_local_storage("general")
        .unwrap();
    assert_eq!(stored, Some(exported));
    assert_eq!(
        h.service.get_page_schema("general", SaveTarget::Local).await,
        json!({"componentName": "Page", "id": "p1", "children": []})
    );
    assert_eq!(h.notifier.messages(), vec!["成功保存到本地".to_string()]);
    assert_eq!(h.editor.export_stages(), vec![TransformStage::Save]);
}

/// Local packages are stored under the packages namespace.
#[tokio::test]
async fn local_save_stores_filtered_packages() {
    let h = setup_harness(false);
    h.editor.set_packages(vec![json!({"package": "moment"})]);

    h.service.save_schema("general", SaveTarget::Local).await.unwrap();

    assert_eq!(
        h.service
            .get_packages("general", SaveTarget::Local)
            .await
            .unwrap(),
        Some(json!([{"package": "moment"}]))
    );
}

/// Server saves post the schema first, then the packages, then notify.
#[tokio::test]
async fn server_save_posts_schema_then_packages() {
    let h = setup_harness(false);
    h.transport.push_response(200, "{}");
    h.transport.push_response(200, "{}");

    h.service.save_schema("general", SaveTarget::Server).await.unwrap();

    let requests = h.transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests
        .iter()
        .all(|r| r.url == "https://api.test/api/v1/schemas"));

    let bodies = h.transport.json_bodies();
    assert_eq!(bodies[0]["page"], json!("general-projectSchema"));
    assert_eq!(bodies[0]["schema"], h.editor.current());
    assert_eq!(bodies[1]["page"], json!("general-packages"));
    assert!(bodies[1]["schema"].is_array());

    assert_eq!(h.notifier.messages(), vec!["成功保存到服务器".to_string()]);
    assert!(h.storage.is_empty());
}

/// A failing schema post aborts the save before packages are sent.
#[tokio::test]
async fn server_save_failure_aborts_package_post() {
    let h = setup_harness(false);
    h.transport.push_error("connection reset");

    let result = h.service.save_schema("general", SaveTarget::Server).await;

    assert!(result.is_err());
    assert_eq!(h.transport.requests().len(), 1);
    assert!(h.notifier.messages().is_empty());
}

/// A failure status on the schema post aborts the save like a network error.
#[tokio::test]
async fn server_save_failure_status_aborts_package_post() {
    let h = setup_harness(false);
    h.transport.push_response(500, r#"{"msg":"disk full"}"#);
    h.transport.push_response(200, "{}");

    let err = h
        .service
        .save_schema("general", SaveTarget::Server)
        .await
        .unwrap_err();

    match err {
        PersistError::Request(e) => assert_eq!(
            e.failure(),
            Some(&HttpFailure::with_data(500, json!({"msg": "disk full"})))
        ),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(h.transport.requests().len(), 1);
    assert!(h.notifier.messages().is_empty());
}

/// A failure status on the package post fails the save without notifying.
#[tokio::test]
async fn server_save_package_rejection_skips_notification() {
    let h = setup_harness(false);
    h.transport.push_response(200, "{}");
    h.transport.push_response(403, "");

    let result = h.service.save_schema("general", SaveTarget::Server).await;

    assert!(result.is_err());
    assert_eq!(h.transport.requests().len(), 2);
    assert!(h.notifier.messages().is_empty());
}

/// Server reads fetch the published document and extract its root page.
#[tokio::test]
async fn server_read_extracts_root_page() {
    let h = setup_harness(false);
    h.transport
        .push_response(200, r#"{"componentsTree":[{"componentName":"Page","id":"remote"}]}"#);

    let page = h.service.get_page_schema("general", SaveTarget::Server).await;

    assert_eq!(page, json!({"componentName": "Page", "id": "remote"}));
    assert_eq!(
        h.transport.requests()[0].url,
        "https://oss.test/portal/general-projectSchema.json"
    );
}

/// Missing, unreadable, or failed reads yield the bundled default page.
#[tokio::test]
async fn reads_fall_back_to_default_page() {
    let h = setup_harness(false);
    assert_eq!(
        h.service.get_page_schema("nothing-here", SaveTarget::Local).await,
        default_page_schema()
    );

    h.transport.push_response(404, r#"{"msg":"nf"}"#);
    assert_eq!(
        h.service.get_page_schema_from_server("general").await,
        default_page_schema()
    );

    h.transport.push_response(200, r#"{"componentsTree":[]}"#);
    assert_eq!(
        h.service.get_page_schema_from_server("general").await,
        default_page_schema()
    );

    assert_eq!(
        h.service.get_page_schema_from_local_storage(DEFAULT_SCENARIO),
        default_page_schema()
    );
}

/// Server package reads swallow failures.
#[tokio::test]
async fn server_packages_read() {
    let h = setup_harness(false);
    h.transport.push_response(200, r#"[{"package":"antd"}]"#);
    h.transport.push_response(500, "");

    assert_eq!(
        h.service.get_packages_from_server("general").await,
        Some(json!([{"package": "antd"}]))
    );
    assert_eq!(h.service.get_packages_from_server("general").await, None);
    assert_eq!(
        h.transport.requests()[0].url,
        "https://oss.test/portal/general-packages.json"
    );
}

/// Keys are derived the same way for every namespace.
#[test]
fn keys_follow_scenario_namespace_layout() {
    let h = setup_harness(false);
    assert_eq!(h.service.derive_key("a", Namespace::ProjectSchema), "a-projectSchema");
    assert_eq!(h.service.derive_key("a", Namespace::Packages), "a-packages");
    assert_eq!(h.service.derive_key("a", Namespace::PreviewLocale), "a-previewLocale");
}

/// Setting the preview locale stores it and reloads the page.
#[test]
fn preview_locale_triggers_reload() {
    let h = setup_harness(false);
    assert_eq!(h.service.get_preview_locale("general"), "zh-CN");

    h.service.set_preview_locale("general", "en-US").unwrap();

    assert_eq!(h.service.get_preview_locale("general"), "en-US");
    assert_eq!(h.reloader.reloads(), 1);
}
