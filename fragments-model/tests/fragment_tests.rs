use fragments_convert::ConvertError;
use fragments_model::{Fragment, FragmentDraft, FragmentError};
use fragments_store::{FragmentListing, FragmentStore, MemoryStore};
use fragments_types::{FragmentId, TargetFormat};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn make_store() -> Arc<dyn FragmentStore> {
    Arc::new(MemoryStore::new())
}

fn plain_draft(owner_id: &str) -> FragmentDraft {
    FragmentDraft {
        owner_id: owner_id.to_string(),
        content_type: "text/plain".to_string(),
        ..FragmentDraft::default()
    }
}

fn expect_validation(result: Result<Fragment, FragmentError>, needle: &str) {
    match result {
        Err(FragmentError::Validation(msg)) => {
            assert!(msg.contains(needle), "message {msg:?} missing {needle:?}")
        }
        Err(other) => panic!("expected Validation, got: {other}"),
        Ok(_) => panic!("expected Validation, got Ok"),
    }
}

// ── Construction & validation ─────────────────────────────────────

#[test]
fn create_generates_id_and_zero_size() {
    let fragment = Fragment::create(make_store(), "owner-1", "text/plain").unwrap();
    assert!(FragmentId::parse(fragment.id()).is_ok());
    assert_eq!(fragment.owner_id(), "owner-1");
    assert_eq!(fragment.size(), 0);
    assert_eq!(fragment.created(), fragment.updated());
}

#[test]
fn create_preserves_type_parameters() {
    let fragment =
        Fragment::create(make_store(), "owner-1", "text/html; charset=utf-8").unwrap();
    assert_eq!(fragment.content_type(), "text/html; charset=utf-8");
    assert_eq!(fragment.mime_type(), "text/html");
    assert!(fragment.is_text());
}

#[test]
fn create_with_empty_owner_fails() {
    expect_validation(Fragment::create(make_store(), "", "text/plain"), "ownerId");
}

#[test]
fn create_with_unsupported_type_fails() {
    expect_validation(
        Fragment::create(make_store(), "owner-1", "application/pdf"),
        "application/pdf",
    );
}

#[test]
fn create_with_near_miss_type_fails() {
    expect_validation(
        Fragment::create(make_store(), "owner-1", "text/plain-custom"),
        "text/plain-custom",
    );
}

#[test]
fn build_with_missing_type_fails() {
    let draft = FragmentDraft {
        owner_id: "owner-1".to_string(),
        ..FragmentDraft::default()
    };
    expect_validation(Fragment::build(make_store(), draft), "type is required");
}

#[test]
fn build_with_negative_size_fails() {
    let draft = FragmentDraft {
        size: Some(json!(-1)),
        ..plain_draft("owner-1")
    };
    expect_validation(Fragment::build(make_store(), draft), "negative");
}

#[test]
fn build_with_non_numeric_size_fails() {
    let draft = FragmentDraft {
        size: Some(json!("10")),
        ..plain_draft("owner-1")
    };
    expect_validation(Fragment::build(make_store(), draft), "must be a number");
}

#[test]
fn build_with_valid_size_and_id() {
    let draft = FragmentDraft {
        id: Some("frag-9".to_string()),
        size: Some(json!(42)),
        ..plain_draft("owner-1")
    };
    let fragment = Fragment::build(make_store(), draft).unwrap();
    assert_eq!(fragment.id(), "frag-9");
    assert_eq!(fragment.size(), 42);
}

#[test]
fn draft_deserializes_from_wire_json() {
    let draft: FragmentDraft = serde_json::from_value(json!({
        "ownerId": "owner-1",
        "type": "application/json",
        "size": 5,
    }))
    .unwrap();
    let fragment = Fragment::build(make_store(), draft).unwrap();
    assert_eq!(fragment.mime_type(), "application/json");
    assert_eq!(fragment.size(), 5);
}

// ── Persistence ───────────────────────────────────────────────────

#[tokio::test]
async fn save_persists_the_metadata_record() {
    let store = make_store();
    let mut fragment = Fragment::create(Arc::clone(&store), "owner-1", "text/plain").unwrap();
    fragment.save().await.unwrap();

    let stored = store
        .read_fragment("owner-1", fragment.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(&stored, fragment.record());
}

#[tokio::test]
async fn save_refreshes_updated() {
    let mut fragment = Fragment::create(make_store(), "owner-1", "text/plain").unwrap();
    let before = fragment.updated();
    fragment.save().await.unwrap();
    assert!(fragment.updated() >= before);
    assert!(fragment.created() <= fragment.updated());
}

#[tokio::test]
async fn set_data_updates_size_and_persists_both_halves() {
    let store = make_store();
    let mut fragment = Fragment::create(Arc::clone(&store), "owner-1", "text/plain").unwrap();
    fragment.set_data(b"hello world").await.unwrap();

    assert_eq!(fragment.size(), 11);
    let stored = store
        .read_fragment("owner-1", fragment.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.size, 11);
    let payload = store
        .read_fragment_data("owner-1", fragment.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payload, b"hello world");
}

#[tokio::test]
async fn set_data_replaces_previous_payload() {
    let mut fragment = Fragment::create(make_store(), "owner-1", "text/plain").unwrap();
    fragment.set_data(b"first").await.unwrap();
    fragment.set_data(b"second, longer").await.unwrap();

    assert_eq!(fragment.size(), 14);
    assert_eq!(fragment.data().await.unwrap(), b"second, longer");
}

#[tokio::test]
async fn data_without_payload_fails_with_not_found() {
    let mut fragment = Fragment::create(make_store(), "owner-1", "text/plain").unwrap();
    fragment.save().await.unwrap();

    match fragment.data().await {
        Err(FragmentError::NotFound { owner_id, id }) => {
            assert_eq!(owner_id, "owner-1");
            assert_eq!(id, fragment.id());
        }
        other => panic!("expected NotFound, got: {other:?}"),
    }
}

// ── Directory operations ──────────────────────────────────────────

#[tokio::test]
async fn by_id_rebuilds_the_fragment() {
    let store = make_store();
    let mut fragment = Fragment::create(Arc::clone(&store), "owner-1", "text/markdown").unwrap();
    fragment.set_data(b"# Hi").await.unwrap();

    let found = Fragment::by_id(&store, "owner-1", fragment.id()).await.unwrap();
    assert_eq!(found.record(), fragment.record());
    assert_eq!(found.mime_type(), "text/markdown");
    assert_eq!(found.data().await.unwrap(), b"# Hi");
}

#[tokio::test]
async fn by_id_missing_fails_with_not_found() {
    let store = make_store();
    match Fragment::by_id(&store, "owner-1", "nope").await {
        Err(FragmentError::NotFound { owner_id, id }) => {
            assert_eq!(owner_id, "owner-1");
            assert_eq!(id, "nope");
        }
        other => panic!("expected NotFound, got: {other:?}"),
    }
}

#[tokio::test]
async fn by_id_is_scoped_to_the_owner() {
    let store = make_store();
    let mut fragment = Fragment::create(Arc::clone(&store), "owner-1", "text/plain").unwrap();
    fragment.save().await.unwrap();

    assert!(Fragment::by_id(&store, "owner-2", fragment.id()).await.is_err());
}

#[tokio::test]
async fn by_user_lists_ids_and_records() {
    let store = make_store();
    let mut a = Fragment::create(Arc::clone(&store), "owner-1", "text/plain").unwrap();
    a.save().await.unwrap();
    let mut b = Fragment::create(Arc::clone(&store), "owner-1", "text/csv").unwrap();
    b.save().await.unwrap();
    let mut other = Fragment::create(Arc::clone(&store), "owner-2", "text/plain").unwrap();
    other.save().await.unwrap();

    let ids = Fragment::by_user(&store, "owner-1", false).await.unwrap();
    match ids {
        FragmentListing::Ids(ids) => {
            assert_eq!(ids.len(), 2);
            assert!(ids.contains(&a.id().to_string()));
            assert!(ids.contains(&b.id().to_string()));
        }
        other => panic!("expected ids, got: {other:?}"),
    }

    let records = Fragment::by_user(&store, "owner-1", true).await.unwrap();
    match records {
        FragmentListing::Records(records) => {
            assert_eq!(records.len(), 2);
            assert!(records.iter().all(|r| r.owner_id == "owner-1"));
        }
        other => panic!("expected records, got: {other:?}"),
    }
}

#[tokio::test]
async fn by_user_with_no_fragments_is_empty() {
    let store = make_store();
    let listing = Fragment::by_user(&store, "nobody", false).await.unwrap();
    assert!(listing.is_empty());
}

#[tokio::test]
async fn delete_removes_metadata_and_payload() {
    let store = make_store();
    let mut fragment = Fragment::create(Arc::clone(&store), "owner-1", "text/plain").unwrap();
    fragment.set_data(b"bytes").await.unwrap();
    let id = fragment.id().to_string();

    Fragment::delete(&store, "owner-1", &id).await.unwrap();

    assert!(matches!(
        Fragment::by_id(&store, "owner-1", &id).await,
        Err(FragmentError::NotFound { .. })
    ));
    assert!(matches!(
        fragment.data().await,
        Err(FragmentError::NotFound { .. })
    ));
}

#[tokio::test]
async fn delete_missing_fails_with_not_found() {
    let store = make_store();
    match Fragment::delete(&store, "owner-1", "nope").await {
        Err(FragmentError::NotFound { owner_id, id }) => {
            assert_eq!(owner_id, "owner-1");
            assert_eq!(id, "nope");
        }
        other => panic!("expected NotFound, got: {other:?}"),
    }
}

// ── Content negotiation ───────────────────────────────────────────

#[test]
fn formats_follow_the_type_table() {
    let fragment = Fragment::create(make_store(), "owner-1", "text/markdown").unwrap();
    assert_eq!(
        fragment.formats(),
        ["text/markdown", "text/html", "text/plain"]
    );
}

#[tokio::test]
async fn convert_data_renders_markdown_to_html() {
    let mut fragment = Fragment::create(make_store(), "owner-1", "text/markdown").unwrap();
    fragment.set_data(b"# Hi").await.unwrap();

    let html = fragment.convert_data(TargetFormat::Html).await.unwrap();
    assert!(String::from_utf8(html).unwrap().contains("<h1>Hi</h1>"));
}

#[tokio::test]
async fn convert_data_identity_returns_stored_bytes() {
    let mut fragment = Fragment::create(make_store(), "owner-1", "text/plain").unwrap();
    fragment.set_data(b"as-is").await.unwrap();

    let out = fragment.convert_data(TargetFormat::Txt).await.unwrap();
    assert_eq!(out, b"as-is");
}

#[tokio::test]
async fn convert_data_rejects_out_of_table_pairs() {
    let mut fragment = Fragment::create(make_store(), "owner-1", "text/plain").unwrap();
    fragment.set_data(b"text").await.unwrap();

    match fragment.convert_data(TargetFormat::Png).await {
        Err(FragmentError::Convert(ConvertError::Unsupported { from, to })) => {
            assert_eq!(from, "text/plain");
            assert_eq!(to, "image/png");
        }
        other => panic!("expected Unsupported, got: {other:?}"),
    }
}

#[tokio::test]
async fn convert_data_surfaces_parse_errors() {
    let mut fragment = Fragment::create(make_store(), "owner-1", "text/csv").unwrap();
    fragment.set_data(b"a,b\n1,2,3").await.unwrap();

    match fragment.convert_data(TargetFormat::Json).await {
        Err(FragmentError::Convert(ConvertError::Parse(msg))) => assert!(!msg.is_empty()),
        other => panic!("expected Parse, got: {other:?}"),
    }
}

#[tokio::test]
async fn convert_data_without_payload_fails_with_not_found() {
    let mut fragment = Fragment::create(make_store(), "owner-1", "text/markdown").unwrap();
    fragment.save().await.unwrap();

    assert!(matches!(
        fragment.convert_data(TargetFormat::Html).await,
        Err(FragmentError::NotFound { .. })
    ));
}

// ── Error display ─────────────────────────────────────────────────

#[test]
fn not_found_error_names_the_pair() {
    let err = FragmentError::NotFound {
        owner_id: "owner-1".to_string(),
        id: "frag-9".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.contains("owner-1"));
    assert!(msg.contains("frag-9"));
}
