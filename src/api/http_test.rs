use super::*;
use uuid::Uuid;

// =============================================================
// Paths
// =============================================================

#[test]
fn presentation_paths() {
    let id = Uuid::nil();
    assert_eq!(presentation_path(id), format!("/presentations/{id}"));
    assert_eq!(slides_path(id), format!("/presentations/{id}/slides"));
    assert_eq!(reorder_path(id), format!("/presentations/{id}/slides/reorder"));
}

#[test]
fn slide_paths() {
    assert_eq!(slide_path(42), "/slides/42");
    assert_eq!(elements_path(42), "/slides/42/elements");
}

#[test]
fn element_path_uses_uuid() {
    let id = Uuid::new_v4();
    assert_eq!(element_path(id), format!("/elements/{id}"));
}

// =============================================================
// Bodies
// =============================================================

#[test]
fn reorder_body_shape() {
    let ids = [3, 1, 2];
    let body = serde_json::to_value(ReorderBody { slide_ids: &ids }).unwrap();
    assert_eq!(body, serde_json::json!({ "slide_ids": [3, 1, 2] }));
}

#[test]
fn rename_body_shape() {
    let body = serde_json::to_value(RenameBody { title: "Q3 review" }).unwrap();
    assert_eq!(body, serde_json::json!({ "title": "Q3 review" }));
}

// =============================================================
// parse_error_message
// =============================================================

#[test]
fn error_message_extracted() {
    assert_eq!(
        parse_error_message(r#"{"message":"Cannot delete the last slide"}"#).as_deref(),
        Some("Cannot delete the last slide")
    );
}

#[test]
fn error_message_missing_field() {
    assert!(parse_error_message(r#"{"error":"nope"}"#).is_none());
}

#[test]
fn error_message_blank_is_none() {
    assert!(parse_error_message(r#"{"message":"   "}"#).is_none());
}

#[test]
fn error_message_non_json() {
    assert!(parse_error_message("<html>502 Bad Gateway</html>").is_none());
    assert!(parse_error_message("").is_none());
}

// =============================================================
// Client construction
// =============================================================

#[test]
fn new_client_uses_configured_base_url() {
    let config = EditorConfig::default();
    let api = HttpApi::new(&config, Arc::new(crate::auth::SessionToken::default())).unwrap();
    assert_eq!(api.base_url, config.api_url);
}
