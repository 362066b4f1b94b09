use pretty_assertions::assert_eq;
use serde_json::json;
use slicekit_model::Record;
use slicekit_types::{Config, EntityKey, Error, Keyed};

fn todo(title: &str, complete: bool) -> Record {
    Record::new().with("title", title).with("complete", complete)
}

// ── Construction ─────────────────────────────────────────────────

#[test]
fn from_value_accepts_objects() {
    let record = Record::from_value(json!({"title": "Milk"})).unwrap();
    assert_eq!(record.get_str("/title"), Some("Milk"));
}

#[test]
fn from_value_rejects_non_objects() {
    let err = Record::from_value(json!([1, 2])).unwrap_err();
    assert!(matches!(err, Error::NotAnObject(ref t) if t == "array"));
}

#[test]
fn from_json_reports_parse_errors() {
    assert!(matches!(
        Record::from_json("{").unwrap_err(),
        Error::Serialization(_)
    ));
}

#[test]
fn deserialize_validates_shape() {
    let ok: Result<Record, _> = serde_json::from_str(r#"{"a": 1}"#);
    assert!(ok.is_ok());
    let bad: Result<Record, _> = serde_json::from_str("42");
    assert!(bad.is_err());
}

#[test]
fn serializes_as_plain_object() {
    let record = todo("Milk", false);
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value, json!({"title": "Milk", "complete": false}));
}

// ── Field access ─────────────────────────────────────────────────

#[test]
fn pointer_helpers_read_typed_fields() {
    let record = Record::from_value(json!({
        "title": "Bread",
        "complete": true,
        "qty": 2,
        "meta": {"owner": "sam"}
    }))
    .unwrap();

    assert_eq!(record.get_str("/title"), Some("Bread"));
    assert_eq!(record.get_bool("/complete"), Some(true));
    assert_eq!(record.get_number("/qty"), Some(2.0));
    assert_eq!(record.get_str("/meta/owner"), Some("sam"));
    assert_eq!(record.get_str("/complete"), None);
    assert_eq!(record.get_bool("/missing"), None);
    assert_eq!(record.get_str("title"), None);
}

#[test]
fn set_replaces_and_remove_deletes() {
    let mut record = todo("Eggs", false);
    record.set("complete", true);
    assert_eq!(record.get_bool("/complete"), Some(true));

    assert_eq!(record.remove("title"), Some(json!("Eggs")));
    assert_eq!(record.get("title"), None);
}

#[test]
fn id_reads_configured_field() {
    let record = todo("Eggs", false).with("sku", 991);
    let config = Config {
        id_key: "sku".into(),
        ..Config::default()
    };
    assert_eq!(record.id(&config), Some(&json!(991)));
    assert_eq!(record.id(&Config::default()), None);
}

// ── Keyed ────────────────────────────────────────────────────────

#[test]
fn key_absent_until_assigned() {
    let mut record = todo("Eggs", false);
    assert_eq!(record.key("gid"), None);

    let key = EntityKey::parse("k-1").unwrap();
    record.set_key("gid", key.clone());
    assert_eq!(record.key("gid"), Some(key));
    assert_eq!(record.get_str("/gid"), Some("k-1"));
}

#[test]
fn key_uses_the_named_field() {
    let mut record = todo("Eggs", false);
    record.set_key("uuid", EntityKey::parse("k-9").unwrap());
    assert_eq!(record.key("gid"), None);
    assert_eq!(record.key("uuid").unwrap().as_str(), "k-9");
}

#[test]
fn non_string_key_field_reads_as_absent() {
    let record = todo("Eggs", false).with("gid", 12);
    assert_eq!(record.key("gid"), None);
}
