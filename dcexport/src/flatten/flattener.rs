//! Collapse nested values into delimited cells.

use crate::models::Value;

/// Separator between list items inside one cell. Consumers split on it.
pub const DELIMITER: &str = " | ";

/// Depth-first, left-to-right list of leaf strings.
///
/// Sequences are descended; every other value contributes exactly one string
/// (missing values contribute `""`, mappings their JSON text).
pub fn flatten(value: &Value) -> Vec<String> {
    let mut out = Vec::new();
    flatten_into(value, &mut out);
    out
}

fn flatten_into(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Sequence(items) => {
            for item in items {
                flatten_into(item, out);
            }
        }
        Value::Missing | Value::Scalar(_) | Value::Mapping(_) => out.push(value.to_string()),
    }
}

/// Flatten and join with [`DELIMITER`].
pub fn flatten_cell(value: &Value) -> String {
    flatten(value).join(DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_sequences() {
        let value = Value::from(json!([["A", "B"], ["C", ["D"]], "E"]));
        assert_eq!(flatten(&value), vec!["A", "B", "C", "D", "E"]);
        assert_eq!(flatten_cell(&value), "A | B | C | D | E");
    }

    #[test]
    fn test_missing_is_empty_string() {
        assert_eq!(flatten(&Value::Missing), vec![""]);
        assert_eq!(flatten_cell(&Value::Missing), "");
        assert_eq!(flatten_cell(&Value::from(json!(null))), "");
    }

    #[test]
    fn test_scalars() {
        assert_eq!(flatten_cell(&Value::from(json!(42))), "42");
        assert_eq!(flatten_cell(&Value::from(json!(false))), "false");
        assert_eq!(flatten_cell(&Value::from("one")), "one");
    }

    #[test]
    fn test_empty_sequence_is_empty_cell() {
        assert!(flatten(&Value::Sequence(vec![])).is_empty());
        assert_eq!(flatten_cell(&Value::Sequence(vec![])), "");
    }

    #[test]
    fn test_split_recovers_leaves() {
        let value = Value::from(json!(["a", ["b c", "d"], "e"]));
        let cell = flatten_cell(&value);
        let leaves: Vec<&str> = cell.split(DELIMITER).collect();
        assert_eq!(leaves, flatten(&value));
    }
}
