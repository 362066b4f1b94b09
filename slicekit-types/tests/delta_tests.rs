use pretty_assertions::assert_eq;
use slicekit_types::{Delta, DeltaKind};

#[test]
fn initial_delta_is_empty_initialize() {
    let delta: Delta<u32> = Delta::initial();
    assert_eq!(delta.kind, DeltaKind::Initialize);
    assert!(delta.is_empty());
    assert_eq!(delta, Delta::default());
}

#[test]
fn delta_len_counts_entries() {
    let delta = Delta::new(DeltaKind::Post, vec!["a", "b"]);
    assert_eq!(delta.len(), 2);
    assert!(!delta.is_empty());
}

#[test]
fn delta_kind_serializes_upper_case() {
    let json = serde_json::to_string(&DeltaKind::Initialize).unwrap();
    assert_eq!(json, "\"INITIALIZE\"");
    let json = serde_json::to_string(&DeltaKind::Reset).unwrap();
    assert_eq!(json, "\"RESET\"");
}

#[test]
fn delta_serializes_kind_and_entries() {
    let delta = Delta::new(DeltaKind::Delete, vec![1, 2]);
    let value = serde_json::to_value(&delta).unwrap();
    assert_eq!(value, serde_json::json!({"kind": "DELETE", "entries": [1, 2]}));
}
