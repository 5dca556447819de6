//! Modifier pipeline: post-processing selected by [`ModifierKind`].

use crate::config::SchemaProfile;
use crate::models::{Mapping, Record, Value};
use crate::terms::TermTables;

use super::field_path::{FieldPath, ModifierKind};
use super::resolve::{resolve, resolve_path};

/// Applies modifiers with a given schema profile and term tables.
#[derive(Debug, Clone, Default)]
pub struct ModifierPipeline {
    profile: SchemaProfile,
    terms: TermTables,
}

impl ModifierPipeline {
    pub fn new(profile: SchemaProfile, terms: TermTables) -> Self {
        Self { profile, terms }
    }

    pub fn profile(&self) -> &SchemaProfile {
        &self.profile
    }

    pub fn terms(&self) -> &TermTables {
        &self.terms
    }

    /// Resolve `path` against `record` and apply its effective modifier.
    pub fn evaluate(&self, path: &FieldPath, record: &Record) -> Value {
        let raw = resolve(record, path.base(), path.traversal_key());
        self.apply(path.modifier_kind(), path, record, raw)
    }

    /// Apply one modifier to an already resolved value.
    pub fn apply(&self, kind: ModifierKind, path: &FieldPath, record: &Record, raw: Value) -> Value {
        match kind {
            ModifierKind::Raw => self.apply_raw(path, record),
            ModifierKind::Batch => self.apply_batch(raw),
            ModifierKind::Json => raw,
            ModifierKind::Values => self.apply_values(raw),
            ModifierKind::Permalink => self.apply_permalink(record),
            ModifierKind::Thumbnail => self.apply_thumbnail(record),
            ModifierKind::Default => self.apply_default(raw),
        }
    }

    fn apply_raw(&self, path: &FieldPath, record: &Record) -> Value {
        let text = record
            .get(path.base())
            .map(ToString::to_string)
            .unwrap_or_default();
        Value::string(text)
    }

    fn apply_batch(&self, value: Value) -> Value {
        match value {
            Value::Sequence(items) => Value::Sequence(
                items.iter().filter_map(|item| self.relator_entry(item)).collect(),
            ),
            Value::Mapping(map) => Value::Sequence(vec![self.coded_term(&map)]),
            Value::Missing | Value::Scalar(_) => Value::Missing,
        }
    }

    /// `{role, uri}` -> `"<CODE>:<uri>"`; entries without a uri are dropped.
    fn relator_entry(&self, item: &Value) -> Option<Value> {
        let uri = item.get("uri").filter(|u| !u.is_empty())?;
        let role = item.get("role").map(ToString::to_string).unwrap_or_default();
        let code = match self.terms.relators.get(&role) {
            Some(code) => code.to_string(),
            None => role.to_uppercase(),
        };
        Some(Value::string(format!("{}:{}", code, uri)))
    }

    /// Coded term for the object's `label`, falling back to its first `title`.
    fn coded_term(&self, map: &Mapping) -> Value {
        let lookup = |key: &str| {
            map.get(key)
                .and_then(first_text)
                .and_then(|text| self.terms.coded_terms.get(text))
        };

        lookup("label")
            .or_else(|| lookup("title"))
            .map(Value::string)
            .unwrap_or_default()
    }

    fn apply_values(&self, value: Value) -> Value {
        match value {
            Value::Mapping(map) => Value::Sequence(map.into_values().collect()),
            Value::Sequence(items) if items.iter().all(Value::is_mapping) => Value::Sequence(
                items
                    .iter()
                    .filter_map(Value::as_mapping)
                    .map(|m| Value::string(tuple_text(m)))
                    .collect(),
            ),
            other => other,
        }
    }

    fn apply_permalink(&self, record: &Record) -> Value {
        let identifier = resolve_path(record, &self.profile.identifier_field);
        if identifier.is_empty() {
            return Value::Missing;
        }
        Value::string(format!("{}{}", self.profile.permalink_base, identifier))
    }

    fn apply_thumbnail(&self, record: &Record) -> Value {
        let base_url = resolve_path(record, &self.profile.thumbnail_field);
        if base_url.is_empty() {
            return Value::Missing;
        }
        let size = self.profile.thumbnail_size;
        Value::string(format!("{}/full/!{},{}/0/default.jpg", base_url, size, size))
    }

    /// Keep label-like entries of mappings (or of each mapping in a
    /// sequence); pass everything else through.
    ///
    /// A traversal key has already narrowed `value` during resolution, so only
    /// structure left below the key is filtered here.
    fn apply_default(&self, value: Value) -> Value {
        let keys: Vec<&str> = self.profile.label_keys.iter().map(String::as_str).collect();
        match value {
            Value::Mapping(map) => Value::Sequence(filter_entries(&map, &keys)),
            Value::Sequence(items) if items.iter().all(Value::is_mapping) => Value::Sequence(
                items
                    .iter()
                    .filter_map(Value::as_mapping)
                    .flat_map(|m| filter_entries(m, &keys))
                    .collect(),
            ),
            other => other,
        }
    }
}

/// Non-empty values whose key is allow-listed, in mapping order.
fn filter_entries(map: &Mapping, keys: &[&str]) -> Vec<Value> {
    map.iter()
        .filter(|(k, v)| keys.contains(&k.as_str()) && !v.is_empty())
        .map(|(_, v)| v.clone())
        .collect()
}

/// A string, or the first string of a sequence.
fn first_text(value: &Value) -> Option<&str> {
    match value {
        Value::Sequence(items) => items.first().and_then(Value::as_str),
        other => other.as_str(),
    }
}

/// `(v1, v2, ...)` rendering of one mapping's values.
fn tuple_text(map: &Mapping) -> String {
    let parts: Vec<String> = map.values().map(ToString::to_string).collect();
    format!("({})", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terms::TermTable;
    use serde_json::json;

    fn pipeline() -> ModifierPipeline {
        let relators: TermTable = [("Photographer", "pht")].into_iter().collect();
        let coded: TermTable = [("Music Library", "MUSIC_LIBRARY")].into_iter().collect();
        ModifierPipeline::new(SchemaProfile::donut(), TermTables::new(relators, coded))
    }

    fn eval(record: serde_json::Value, spec: &str) -> Value {
        pipeline().evaluate(&FieldPath::parse(spec), &Record::from_json(record))
    }

    #[test]
    fn test_default_joins_title_parts() {
        let value = eval(json!({"title": {"primary": ["A", "B"], "alternate": ["C"]}}), "title");
        assert_eq!(value, Value::from(json!([["A", "B"], ["C"]])));
    }

    #[test]
    fn test_default_prefers_labels_in_sequences() {
        let value = eval(
            json!({"subject": [{"label": "S1", "uri": "u1"}, {"label": "S2", "uri": "u2"}]}),
            "subject",
        );
        assert_eq!(value, Value::from(json!(["S1", "S2"])));
    }

    #[test]
    fn test_default_skips_empty_entries() {
        let value = eval(json!({"title": {"primary": ["A"], "alternate": []}}), "title");
        assert_eq!(value, Value::from(json!([["A"]])));
    }

    #[test]
    fn test_default_passes_scalars() {
        assert_eq!(eval(json!({"id": "w1"}), "id"), Value::from("w1"));
        assert_eq!(eval(json!({}), "id"), Value::Missing);
    }

    #[test]
    fn test_raw_stringifies_structure() {
        let value = eval(json!({"subject": [{"label": "S1"}]}), "subject-raw");
        assert_eq!(value, Value::from(r#"[{"label":"S1"}]"#));
        assert_eq!(eval(json!({}), "subject-raw"), Value::from(""));
    }

    #[test]
    fn test_batch_relators() {
        let record = json!({"contributor": [
            {"role": "Photographer", "uri": "http://id.loc.gov/n1"},
            {"role": "topical", "uri": "http://id.loc.gov/n2"},
            {"role": "Photographer"}
        ]});
        let value = eval(record, "contributor-batch");
        assert_eq!(
            value,
            Value::from(json!(["pht:http://id.loc.gov/n1", "TOPICAL:http://id.loc.gov/n2"]))
        );
    }

    #[test]
    fn test_batch_coded_term() {
        let by_label = eval(json!({"admin_set": {"label": "Music Library"}}), "admin_set-batch");
        assert_eq!(by_label, Value::from(json!(["MUSIC_LIBRARY"])));

        let by_title = eval(
            json!({"admin_set": {"label": "Unknown", "title": ["Music Library"]}}),
            "admin_set-batch",
        );
        assert_eq!(by_title, Value::from(json!(["MUSIC_LIBRARY"])));

        let unknown = eval(json!({"admin_set": {"label": "Unknown"}}), "admin_set-batch");
        assert_eq!(unknown, Value::Sequence(vec![Value::Missing]));
    }

    #[test]
    fn test_json_passes_through() {
        let record = json!({"notes": [{"note": "n", "type": "t"}]});
        assert_eq!(eval(record.clone(), "notes-json"), Value::from(record["notes"].clone()));
    }

    #[test]
    fn test_values() {
        let mapping = eval(json!({"title": {"primary": "A", "alternate": "B"}}), "title-values");
        assert_eq!(mapping, Value::from(json!(["A", "B"])));

        let sequence = eval(
            json!({"subject": [{"label": "S1", "uri": "u1"}, {"label": "S2", "uri": "u2"}]}),
            "subject-values",
        );
        assert_eq!(sequence, Value::from(json!(["(S1, u1)", "(S2, u2)"])));

        assert_eq!(eval(json!({"id": "w1"}), "id-values"), Value::from("w1"));
    }

    #[test]
    fn test_permalink_uses_profile_identifier() {
        let donut = eval(json!({"permalink": "ark:/81985/n2"}), "permalink");
        assert_eq!(donut, Value::from("https://n2t.net/ark:/81985/n2"));

        let mut profile = SchemaProfile::meadow();
        profile.identifier_field = "descriptiveMetadata.ark".to_string();
        let pipeline = ModifierPipeline::new(profile, TermTables::builtin());
        let record = Record::from_json(json!({"descriptiveMetadata": {"ark": "99999/fk4x"}}));
        assert_eq!(
            pipeline.evaluate(&FieldPath::parse("permalink"), &record),
            Value::from("https://n2t.net/99999/fk4x")
        );
    }

    #[test]
    fn test_permalink_meadow_preset_reads_ark() {
        let pipeline = ModifierPipeline::new(SchemaProfile::meadow(), TermTables::builtin());
        let record = Record::from_json(json!({"ark": "99999/fk4x"}));
        assert_eq!(
            pipeline.evaluate(&FieldPath::parse("permalink"), &record),
            Value::from("https://n2t.net/99999/fk4x")
        );
    }

    #[test]
    fn test_default_filters_below_traversal_key() {
        let value = eval(
            json!({"admin_set": {"title": {"primary": ["Music"], "id": "x"}}}),
            "admin_set.title",
        );
        assert_eq!(value, Value::from(json!([["Music"]])));
    }

    #[test]
    fn test_permalink_missing_identifier() {
        assert_eq!(eval(json!({}), "permalink"), Value::Missing);
    }

    #[test]
    fn test_thumbnail() {
        let value = eval(json!({"thumbnail_url": "http://thumb"}), "thumbnail_url");
        assert_eq!(value, Value::from("http://thumb/full/!300,300/0/default.jpg"));

        let pipeline = ModifierPipeline::new(
            SchemaProfile::donut().with_thumbnail_size(150),
            TermTables::builtin(),
        );
        let record = Record::from_json(json!({"thumbnail_url": "http://thumb"}));
        assert_eq!(
            pipeline.evaluate(&FieldPath::parse("thumbnail_url"), &record),
            Value::from("http://thumb/full/!150,150/0/default.jpg")
        );
    }
}
