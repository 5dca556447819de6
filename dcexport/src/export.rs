//! High-level export API: search hits in, table out.
//!
//! Combines the steps a command needs: field selection, header validation,
//! the optional discovery pass, projection and writing.
//!
//! # Example
//!
//! ```rust,ignore
//! use dcexport::export::{run_export, ExportOptions, FieldSelection};
//! use dcexport::writer::{create_writer, OutputFormat};
//!
//! let options = ExportOptions::new(FieldSelection::parse("id,title,permalink"));
//! let writer = create_writer(OutputFormat::Csv, Some(Path::new("out.csv")))?;
//! let summary = run_export(&client, &query, &options, pipeline, writer).await?;
//! println!("Exported {} records", summary.records);
//! ```

use futures::stream::{BoxStream, TryStreamExt};
use std::collections::HashSet;

use crate::config::{output_headers, parse_field_list, MEADOW_FIELDS};
use crate::error::{ConfigError, ConfigResult, ExportResult, SearchResult};
use crate::flatten::{discover_fields, ModifierPipeline, RowProjector};
use crate::logs::{log_debug, log_error, log_info, log_info_indent, log_success, log_warning};
use crate::models::SearchHit;
use crate::search::{
    collect_ids, fileset_title_query, works_with_filesets, works_with_multiple_filesets,
    RecordSource, SearchQuery,
};
use crate::writer::TableWriter;

/// Default columns of `dcexport csv`.
pub const CSV_DEFAULT_FIELDS: &str = "id,title,permalink,subject.label";

/// Default columns of `dcexport xml`.
pub const XML_DEFAULT_FIELDS: &str = "id,title,subject.label,permalink,collection.title";

/// Default columns of `dcexport files-match`.
pub const FILES_MATCH_DEFAULT_FIELDS: &str = "id,title,permalink,collection.title,member_ids";

/// Default fileset title wildcard of `dcexport files-match`.
pub const DEFAULT_FILESET_MATCH: &str = "*.tif";

/// Progress is logged every this many records.
const PROGRESS_EVERY: usize = 1000;

/// Which columns to export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelection {
    /// Field specs as given.
    Explicit(Vec<String>),
    /// Every top-level key seen in the results, sorted. Needs a discovery pass.
    All,
    /// The fixed Meadow batch-update column list.
    Meadow,
}

impl FieldSelection {
    /// Explicit selection from a comma-separated list.
    pub fn parse(list: &str) -> Self {
        FieldSelection::Explicit(parse_field_list(list))
    }

    /// Field specs known before any record is read.
    fn known_fields(&self) -> Option<Vec<String>> {
        match self {
            FieldSelection::Explicit(fields) => Some(fields.clone()),
            FieldSelection::Meadow => Some(MEADOW_FIELDS.iter().map(|f| f.to_string()).collect()),
            FieldSelection::All => None,
        }
    }
}

/// Options for an export run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Columns to export
    pub fields: FieldSelection,

    /// Output column names, one per field (default: the field specs)
    pub display_names: Option<Vec<String>>,
}

impl ExportOptions {
    pub fn new(fields: FieldSelection) -> Self {
        Self { fields, display_names: None }
    }

    pub fn with_display_names(mut self, names: Vec<String>) -> Self {
        self.display_names = Some(names);
        self
    }

    /// Check the field list and display names without reading any record.
    ///
    /// Callers should run this before opening the output, so a bad option
    /// never truncates an existing file. With [`FieldSelection::All`] the
    /// columns are unknown until discovery and only that check is deferred.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(fields) = self.fields.known_fields() {
            if fields.is_empty() {
                return Err(ConfigError::NoFields);
            }
            output_headers(&fields, self.display_names.as_deref())?;
        }
        Ok(())
    }
}

/// Result of an export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Field specs that were projected
    pub fields: Vec<String>,

    /// Header line as written
    pub headers: Vec<String>,

    /// Number of records written
    pub records: usize,
}

/// Export every hit of `query` to `writer`.
///
/// Header/field mismatches fail before the source is scanned. With
/// [`FieldSelection::All`] the results are materialized once to discover the
/// columns.
pub async fn run_export<'w, S>(
    source: &S,
    query: &SearchQuery,
    options: &ExportOptions,
    pipeline: ModifierPipeline,
    writer: Box<dyn TableWriter + 'w>,
) -> ExportResult<ExportSummary>
where
    S: RecordSource + ?Sized,
{
    log_info("🔎 Scanning search results...");
    export_hits(source.scan(query), options, pipeline, writer).await
}

/// `files-match`: works having at least two filesets, one of which has a
/// title matching `pattern`.
pub async fn run_files_match<'w, S>(
    source: &S,
    pattern: &str,
    options: &ExportOptions,
    pipeline: ModifierPipeline,
    writer: Box<dyn TableWriter + 'w>,
) -> ExportResult<ExportSummary>
where
    S: RecordSource + ?Sized,
{
    options.validate()?;

    let profile = pipeline.profile().clone();

    log_info(format!("🔎 Collecting filesets matching '{}'...", pattern));
    let fileset_query = fileset_title_query(&profile.fileset_model, pattern);
    let fileset_ids: HashSet<String> = collect_ids(source, &fileset_query).await?;
    log_success(format!("Found {} matching filesets", fileset_ids.len()));

    if fileset_ids.is_empty() {
        log_warning("No fileset matched; the export will be empty");
    }

    log_info("🔎 Scanning works with multiple filesets...");
    let works_query = works_with_multiple_filesets(&profile.work_model);
    let works = works_with_filesets(source.scan(&works_query), &fileset_ids);
    export_hits(works, options, pipeline, writer).await
}

/// Sorted top-level fields of every hit of `query`.
pub async fn list_fields<S>(source: &S, query: &SearchQuery) -> SearchResult<Vec<String>>
where
    S: RecordSource + ?Sized,
{
    let hits: Vec<SearchHit> = source.scan(query).try_collect().await?;
    log_debug(format!("Discovered fields over {} records", hits.len()));
    Ok(discover_fields(&hits).into_iter().collect())
}

/// Project and write a stream of hits.
pub async fn export_hits<'a, 'w>(
    hits: BoxStream<'a, SearchResult<SearchHit>>,
    options: &ExportOptions,
    pipeline: ModifierPipeline,
    mut writer: Box<dyn TableWriter + 'w>,
) -> ExportResult<ExportSummary> {
    let display_names = options.display_names.as_deref();

    let summary = match options.fields.known_fields() {
        Some(fields) if fields.is_empty() => return Err(ConfigError::NoFields.into()),
        Some(fields) => {
            let headers = output_headers(&fields, display_names)?;
            let projector = RowProjector::new(&fields, pipeline);
            writer.write_headers(&headers)?;
            let records = write_stream(hits, &projector, writer.as_mut()).await?;
            ExportSummary { fields, headers, records }
        }
        None => {
            log_info("Discovering fields (full pass over the results)...");
            let collected: Vec<SearchHit> = hits.try_collect().await?;
            let fields: Vec<String> = discover_fields(&collected).into_iter().collect();
            if fields.is_empty() {
                return Err(ConfigError::NoFields.into());
            }
            log_info_indent(format!("{} fields", fields.len()), 1);

            let headers = output_headers(&fields, display_names)?;
            let projector = RowProjector::new(&fields, pipeline);
            writer.write_headers(&headers)?;
            for row in projector.project(&collected) {
                writer.write_row(&row)?;
            }
            ExportSummary { fields, headers, records: collected.len() }
        }
    };

    writer.finish()?;
    log_success(format!(
        "Exported {} records × {} columns",
        summary.records,
        summary.headers.len()
    ));
    Ok(summary)
}

async fn write_stream(
    mut hits: BoxStream<'_, SearchResult<SearchHit>>,
    projector: &RowProjector,
    writer: &mut (dyn TableWriter + '_),
) -> ExportResult<usize> {
    let mut count = 0;
    loop {
        let hit = match hits.try_next().await {
            Ok(Some(hit)) => hit,
            Ok(None) => break,
            Err(e) => {
                log_error(format!("Search failed after {} records", count));
                return Err(e.into());
            }
        };
        writer.write_row(&projector.project_record(&hit.source))?;
        count += 1;
        if count % PROGRESS_EVERY == 0 {
            log_info_indent(format!("{} records written", count), 1);
        }
    }
    Ok(count)
}
