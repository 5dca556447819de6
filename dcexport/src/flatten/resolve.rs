//! Value resolution: pick a field out of a record and narrow it by key.

use crate::models::{Record, Value};

/// Look up `base` in `record`, then narrow by `traversal_key`.
///
/// - absent base: [`Value::Missing`]
/// - mapping: the value at the key (or missing)
/// - sequence of mappings: each element's value at the key, order kept,
///   absent keys kept as missing
/// - anything else: unchanged
pub fn resolve(record: &Record, base: &str, traversal_key: Option<&str>) -> Value {
    let value = match record.get(base) {
        Some(v) => v,
        None => return Value::Missing,
    };

    match traversal_key {
        None => value.clone(),
        Some(key) => narrow(value, key),
    }
}

/// Walk a dotted path (`descriptiveMetadata.ark`) one key at a time,
/// narrowing at every level like [`resolve`] does.
pub fn resolve_path(record: &Record, path: &str) -> Value {
    let mut keys = path.split('.');
    let first = keys.next().unwrap_or_default();

    let mut value = match record.get(first) {
        Some(v) => v.clone(),
        None => return Value::Missing,
    };
    for key in keys {
        value = narrow(&value, key);
    }
    value
}

fn narrow(value: &Value, key: &str) -> Value {
    match value {
        Value::Mapping(map) => map.get(key).cloned().unwrap_or_default(),
        Value::Sequence(_) => match value.as_mapping_sequence() {
            Some(maps) => Value::Sequence(
                maps.iter()
                    .map(|m| m.get(key).cloned().unwrap_or_default())
                    .collect(),
            ),
            None => value.clone(),
        },
        Value::Missing | Value::Scalar(_) => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Record {
        Record::from_json(json!({
            "title": {"primary": ["A", "B"], "alternate": ["C"]},
            "subject": [{"label": "S1", "uri": "u1"}, {"uri": "u2"}],
            "tags": ["x", "y"],
            "id": "w1",
            "descriptiveMetadata": {"ark": "ark:/81985/n2"}
        }))
    }

    #[test]
    fn test_missing_base() {
        assert_eq!(resolve(&record(), "nope", None), Value::Missing);
        assert_eq!(resolve(&record(), "nope", Some("label")), Value::Missing);
    }

    #[test]
    fn test_no_key_returns_value_unchanged() {
        assert_eq!(resolve(&record(), "id", None), Value::from("w1"));
        assert!(resolve(&record(), "title", None).is_mapping());
    }

    #[test]
    fn test_mapping_narrowing() {
        let value = resolve(&record(), "title", Some("primary"));
        assert_eq!(value, Value::from(json!(["A", "B"])));
        assert_eq!(resolve(&record(), "title", Some("sub")), Value::Missing);
    }

    #[test]
    fn test_sequence_of_mappings_keeps_gaps() {
        let value = resolve(&record(), "subject", Some("label"));
        assert_eq!(value, Value::Sequence(vec![Value::from("S1"), Value::Missing]));
    }

    #[test]
    fn test_key_ignored_on_plain_data() {
        assert_eq!(resolve(&record(), "tags", Some("label")), Value::from(json!(["x", "y"])));
        assert_eq!(resolve(&record(), "id", Some("label")), Value::from("w1"));
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(resolve_path(&record(), "descriptiveMetadata.ark"), Value::from("ark:/81985/n2"));
        assert_eq!(resolve_path(&record(), "id"), Value::from("w1"));
        assert_eq!(resolve_path(&record(), "descriptiveMetadata.none.deeper"), Value::Missing);
    }
}
