//! Field specification parsing.
//!
//! A field spec is plain text such as `title`, `subject.label`,
//! `contributor-batch` or `thumbnail_url`. Parsing never fails: an unknown or
//! malformed spec simply resolves to an empty cell later on.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Base name that triggers permalink construction.
pub const PERMALINK_FIELD: &str = "permalink";

/// Base name that triggers thumbnail URL construction.
pub const THUMBNAIL_FIELD: &str = "thumbnail_url";

/// Transform applied to a resolved value before flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    /// `-raw`: stringify the top-level value as-is.
    Raw,
    /// `-batch`: relator / coded-term encoding for batch updates.
    Batch,
    /// `-json`: pass-through.
    Json,
    /// `-values`: values of mappings.
    Values,
    /// `permalink`: resolver URL from the identifier field.
    Permalink,
    /// `thumbnail_url`: IIIF thumbnail URL.
    Thumbnail,
    /// Label-preferring traversal.
    Default,
}

impl ModifierKind {
    /// Recognized suffixes, without the leading `-`.
    const SUFFIXES: [(&'static str, ModifierKind); 4] = [
        ("raw", ModifierKind::Raw),
        ("batch", ModifierKind::Batch),
        ("json", ModifierKind::Json),
        ("values", ModifierKind::Values),
    ];

    /// Modifier for an explicit `-suffix`, if recognized.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::SUFFIXES
            .iter()
            .find(|(s, _)| *s == suffix)
            .map(|(_, kind)| *kind)
    }
}

/// A parsed field specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    spec: String,
    base: String,
    traversal_key: Option<String>,
    modifier: Option<ModifierKind>,
}

impl FieldPath {
    /// Parse a field spec.
    ///
    /// A recognized suffix wins over a dot: `a.b-raw` has base `a.b`.
    pub fn parse(spec: &str) -> Self {
        if let Some((base, suffix)) = spec.rsplit_once('-') {
            if let Some(kind) = ModifierKind::from_suffix(suffix) {
                return Self {
                    spec: spec.to_string(),
                    base: base.to_string(),
                    traversal_key: None,
                    modifier: Some(kind),
                };
            }
        }

        let (base, traversal_key) = match spec.split_once('.') {
            Some((base, key)) => (base.to_string(), Some(key.to_string())),
            None => (spec.to_string(), None),
        };

        Self {
            spec: spec.to_string(),
            base,
            traversal_key,
            modifier: None,
        }
    }

    /// The original text.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn traversal_key(&self) -> Option<&str> {
        self.traversal_key.as_deref()
    }

    /// Explicit suffix modifier, if any.
    pub fn modifier(&self) -> Option<ModifierKind> {
        self.modifier
    }

    /// Effective modifier: suffix, then exact base name, then `Default`.
    pub fn modifier_kind(&self) -> ModifierKind {
        match (self.modifier, self.base.as_str()) {
            (Some(kind), _) => kind,
            (None, PERMALINK_FIELD) => ModifierKind::Permalink,
            (None, THUMBNAIL_FIELD) => ModifierKind::Thumbnail,
            (None, _) => ModifierKind::Default,
        }
    }
}

impl FromStr for FieldPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_field() {
        let path = FieldPath::parse("title");
        assert_eq!(path.base(), "title");
        assert_eq!(path.traversal_key(), None);
        assert_eq!(path.modifier_kind(), ModifierKind::Default);
    }

    #[test]
    fn test_dotted_field_splits_on_first_dot() {
        let path = FieldPath::parse("descriptiveMetadata.subject.displayFacet");
        assert_eq!(path.base(), "descriptiveMetadata");
        assert_eq!(path.traversal_key(), Some("subject.displayFacet"));
    }

    #[test]
    fn test_suffix_modifiers() {
        assert_eq!(FieldPath::parse("contributor-batch").modifier(), Some(ModifierKind::Batch));
        assert_eq!(FieldPath::parse("contributor-batch").base(), "contributor");
        assert_eq!(FieldPath::parse("subject-raw").modifier_kind(), ModifierKind::Raw);
        assert_eq!(FieldPath::parse("title-json").modifier_kind(), ModifierKind::Json);
        assert_eq!(FieldPath::parse("title-values").modifier_kind(), ModifierKind::Values);
    }

    #[test]
    fn test_suffix_takes_priority_over_dot() {
        let path = FieldPath::parse("subject.label-raw");
        assert_eq!(path.base(), "subject.label");
        assert_eq!(path.traversal_key(), None);
        assert_eq!(path.modifier_kind(), ModifierKind::Raw);
    }

    #[test]
    fn test_suffix_takes_priority_over_name() {
        assert_eq!(FieldPath::parse("permalink-raw").modifier_kind(), ModifierKind::Raw);
    }

    #[test]
    fn test_unrecognized_suffix_is_part_of_base() {
        let path = FieldPath::parse("alternate-title");
        assert_eq!(path.base(), "alternate-title");
        assert_eq!(path.modifier_kind(), ModifierKind::Default);
    }

    #[test]
    fn test_named_modifiers() {
        assert_eq!(FieldPath::parse("permalink").modifier_kind(), ModifierKind::Permalink);
        assert_eq!(FieldPath::parse("thumbnail_url").modifier_kind(), ModifierKind::Thumbnail);
    }

    #[test]
    fn test_malformed_specs_parse() {
        let empty = FieldPath::parse("");
        assert_eq!(empty.base(), "");
        assert_eq!(empty.modifier_kind(), ModifierKind::Default);

        let trailing = FieldPath::parse("title.");
        assert_eq!(trailing.base(), "title");
        assert_eq!(trailing.traversal_key(), Some(""));

        let bare = FieldPath::parse("-raw");
        assert_eq!(bare.base(), "");
        assert_eq!(bare.modifier_kind(), ModifierKind::Raw);
    }

    #[test]
    fn test_from_str() {
        let path: FieldPath = "collection.title".parse().unwrap();
        assert_eq!(path.to_string(), "collection.title");
    }
}
