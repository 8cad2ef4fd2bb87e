//! Functional tests for resetting a scenario to the bundled defaults.
//!
//! - Declining the confirmation leaves every collaborator untouched.
//! - Confirming imports the defaults, re-renders, and persists locally only.

use lowcode_persist::{default_i18n_schema, default_page_schema, ResetOutcome, SaveTarget};
use lowcode_test_utils::setup_harness;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn declined_reset_has_no_side_effects() {
    let h = setup_harness(false);
    let before = h.editor.current();

    let outcome = h.service.reset_schema("general").await.unwrap();

    assert_eq!(outcome, ResetOutcome::Cancelled);
    assert_eq!(h.dialog.prompts().len(), 1);
    assert!(h.editor.imports().is_empty());
    assert_eq!(h.editor.current(), before);
    assert_eq!(h.simulator.rerenders(), 0);
    assert!(h.storage.is_empty());
    assert!(h.notifier.messages().is_empty());
}

#[tokio::test]
async fn confirmed_reset_imports_defaults_and_persists_locally() {
    let h = setup_harness(true);

    let outcome = h.service.reset_schema("general").await.unwrap();

    assert_eq!(outcome, ResetOutcome::Reset);
    assert_eq!(h.dialog.prompts(), vec!["确定要重置吗？您所有的修改都将消失！".to_string()]);

    let imports = h.editor.imports();
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].page(), Some(&default_page_schema()));
    assert_eq!(imports[0].i18n, default_i18n_schema());
    assert_eq!(imports[0].version, "1.0.0");
    assert_eq!(h.simulator.rerenders(), 1);

    assert_eq!(
        h.service.get_page_schema("general", SaveTarget::Local).await,
        default_page_schema()
    );
    assert!(h
        .service
        .get_packages_from_local_storage("general")
        .unwrap()
        .is_some_and(|p| p.is_array()));
    assert_eq!(h.notifier.messages(), vec!["成功重置页面".to_string()]);
}

#[tokio::test]
async fn reset_never_touches_the_server() {
    let h = setup_harness(true);

    h.service.reset_schema("general").await.unwrap();

    assert!(h.transport.requests().is_empty());
}
