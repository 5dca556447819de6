//! Configuration: schema profiles, search environments and field presets.
//!
//! Different generations of the index store the same concepts under different
//! paths (the ARK lives in `permalink`, `ark` or `descriptiveMetadata.ark`).
//! A [`SchemaProfile`] captures those differences so one flattening core serves
//! every variant.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

/// Environment variable overriding the search proxy URL.
pub const SEARCH_URL_ENV: &str = "DCEXPORT_SEARCH_URL";

/// Index holding works and filesets.
pub const DEFAULT_INDEX: &str = "common";

/// Fields exported when `--meadow` is given: the column set expected by the
/// batch update importer.
pub const MEADOW_FIELDS: &[&str] = &[
    "id", "accession_number", "collection.id", "published", "visibility",
    "admin_set-batch", "preservation_level", "project_name", "project_desc",
    "project_proposer", "project_manager", "project_task_number", "project_cycle",
    "status", "abstract", "alternate_title", "ark", "box_name", "box_number",
    "caption", "catalog_key", "citation", "description", "folder_name",
    "folder_number", "identifier", "keywords", "legacy_identifier", "notes",
    "terms_of_use", "physical_description_material", "physical_description_size",
    "provenance", "publisher", "related_material", "rights_holder",
    "scope_and_contents", "series", "source", "table_of_contents", "title",
    "license.uri", "rights_statement.uri", "contributor-batch", "creator.uri",
    "genre.uri", "language.uri", "location.uri", "style_period.uri",
    "subject-batch", "technique.uri", "date_created", "related_url",
];

// =============================================================================
// Schema Profile
// =============================================================================

/// Per-schema settings for the modifier pipeline and query builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaProfile {
    /// Dotted path of the ARK identifier used to build permalinks.
    pub identifier_field: String,
    /// Dotted path of the IIIF image base URL used to build thumbnails.
    pub thumbnail_field: String,
    /// Keys kept from nested objects when no traversal key is given.
    pub label_keys: Vec<String>,
    /// Resolver prefix for permalinks.
    pub permalink_base: String,
    /// Bounding box edge, in pixels, of generated thumbnails.
    pub thumbnail_size: u32,
    /// `model.name` of works.
    pub work_model: String,
    /// `model.name` of filesets.
    pub fileset_model: String,
}

impl SchemaProfile {
    /// The original Donut index: ARK stored in `permalink`.
    pub fn donut() -> Self {
        Self {
            identifier_field: "permalink".to_string(),
            thumbnail_field: "thumbnail_url".to_string(),
            label_keys: default_label_keys(),
            permalink_base: "https://n2t.net/".to_string(),
            thumbnail_size: 300,
            work_model: "Image".to_string(),
            fileset_model: "FileSet".to_string(),
        }
    }

    /// The Meadow index: top-level `ark`, thumbnails from the representative fileset.
    pub fn meadow() -> Self {
        Self {
            identifier_field: "ark".to_string(),
            thumbnail_field: "representativeFileSet.url".to_string(),
            work_model: "work".to_string(),
            ..Self::donut()
        }
    }

    /// Load a profile from JSON. Missing keys take the Donut defaults.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Resolve `donut`, `meadow`, or a path to a JSON profile.
    pub fn load(name_or_path: &str) -> ConfigResult<Self> {
        match name_or_path {
            "donut" => Ok(Self::donut()),
            "meadow" => Ok(Self::meadow()),
            path => Self::from_file(path),
        }
    }

    pub fn with_thumbnail_size(mut self, size: u32) -> Self {
        self.thumbnail_size = size;
        self
    }
}

impl Default for SchemaProfile {
    fn default() -> Self {
        Self::donut()
    }
}

fn default_label_keys() -> Vec<String> {
    ["label", "title", "primary", "alternate"]
        .iter()
        .map(|k| k.to_string())
        .collect()
}

// =============================================================================
// Search Environment
// =============================================================================

/// Deployed search proxies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Staging,
}

impl Environment {
    pub fn proxy_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://dcapi.stack.rdc.library.northwestern.edu/search/",
            Environment::Staging => "https://dcapi.stack.rdc-staging.library.northwestern.edu/search/",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// Connection settings for the search client.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Proxy URL, always ending with `/`.
    pub base_url: String,
    pub index: String,
    /// Scroll context keep-alive, in Elasticsearch duration syntax.
    pub scroll_ttl: String,
    pub timeout: Duration,
}

impl SearchConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            index: DEFAULT_INDEX.to_string(),
            scroll_ttl: "5m".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Settings for an environment, honoring `DCEXPORT_SEARCH_URL`.
    pub fn for_environment(environment: Environment) -> Self {
        match env::var(SEARCH_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::new(environment.proxy_url()),
        }
    }
}

/// Split a comma-separated field list, trimming whitespace and dropping blanks.
pub fn parse_field_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

/// Output column names: the field specs themselves, or display names that
/// must line up one-to-one with them.
pub fn output_headers(fields: &[String], display_names: Option<&[String]>) -> ConfigResult<Vec<String>> {
    match display_names {
        None => Ok(fields.to_vec()),
        Some(names) if names.len() == fields.len() => Ok(names.to_vec()),
        Some(names) => Err(ConfigError::FieldMapMismatch {
            fields: fields.len(),
            names: names.len(),
        }),
    }
}
