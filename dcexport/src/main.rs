//! dcexport CLI - Export digital-collection metadata to CSV or XML
//!
//! # Commands
//!
//! ```bash
//! dcexport csv -c <collection-id> out.csv          # Works of a collection
//! dcexport csv -q 'subject.label:cats' -a -        # Every field, to stdout
//! dcexport csv -c <collection-id> --meadow out.csv # Meadow batch-update columns
//! dcexport xml -q '*' -f id,title -m ID,Title out.xml
//! dcexport files-match -m '*.tif' out.csv          # Works with matching filesets
//! dcexport fields -c <collection-id>               # Discovered field names
//! ```
//!
//! `--input hits.json` replaces the search proxy with a saved dump of hits.

use clap::{Args, Parser, Subcommand};
use dcexport::export::{
    list_fields, run_export, run_files_match, ExportOptions, FieldSelection, CSV_DEFAULT_FIELDS,
    DEFAULT_FILESET_MATCH, FILES_MATCH_DEFAULT_FIELDS, XML_DEFAULT_FIELDS,
};
use dcexport::logs::{log_debug, log_info, log_success};
use dcexport::{
    collection_query, create_writer, output_path, parse_field_list, query_string, Environment,
    ExportResult, ExportSummary, MemorySource, ModifierPipeline, OutputFormat, RecordSource,
    SchemaProfile, SearchClient, SearchQuery, TermTables,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dcexport")]
#[command(about = "Export digital-collection metadata to CSV or XML", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Search environment (production, staging)
    #[arg(short, long, global = true, default_value = "production")]
    env: Environment,

    /// Schema profile: donut, meadow, or a JSON file
    #[arg(long, global = true, default_value = "donut")]
    profile: String,

    /// Relator code table (JSON object: role -> code)
    #[arg(long, global = true)]
    relators: Option<PathBuf>,

    /// Coded term table (JSON object: label -> code)
    #[arg(long, global = true)]
    coded_terms: Option<PathBuf>,

    /// Thumbnail size in pixels
    #[arg(long, global = true)]
    thumbnail_size: Option<u32>,

    /// Read hits from a JSON dump instead of the search proxy
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct QueryArgs {
    /// Collection id (UUID)
    #[arg(short, long)]
    collection: Option<String>,

    /// Query string
    #[arg(short, long)]
    query: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export works to CSV
    Csv {
        #[command(flatten)]
        target: QueryArgs,

        /// Comma-separated field specs
        #[arg(short, long, default_value = CSV_DEFAULT_FIELDS, conflicts_with_all = ["all", "meadow"])]
        fields: String,

        /// Export every field found in the results (extra pass)
        #[arg(short, long, conflicts_with = "meadow")]
        all: bool,

        /// Use the Meadow batch-update column list
        #[arg(long)]
        meadow: bool,

        /// Comma-separated column names, one per field
        #[arg(short = 'm', long, conflicts_with = "all")]
        display_names: Option<String>,

        /// Output file, `-` for stdout
        output: String,
    },

    /// Export works to XML
    Xml {
        #[command(flatten)]
        target: QueryArgs,

        /// Comma-separated field specs
        #[arg(short, long, default_value = XML_DEFAULT_FIELDS)]
        fields: String,

        /// Comma-separated element names, one per field
        #[arg(short = 'm', long)]
        display_names: Option<String>,

        /// Output file, `-` for stdout
        output: String,
    },

    /// Export works having a fileset whose title matches a wildcard
    FilesMatch {
        /// Fileset title wildcard
        #[arg(short = 'm', long = "match", default_value = DEFAULT_FILESET_MATCH)]
        pattern: String,

        /// Comma-separated field specs
        #[arg(short, long, default_value = FILES_MATCH_DEFAULT_FIELDS)]
        fields: String,

        /// Output file, `-` for stdout
        output: String,
    },

    /// List the fields present in the results
    Fields {
        #[command(flatten)]
        target: QueryArgs,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> ExportResult<()> {
    let pipeline = build_pipeline(&cli)?;
    let source = open_source(&cli)?;
    let model = pipeline.profile().work_model.clone();

    match cli.command {
        Commands::Csv { target, fields, all, meadow, display_names, output } => {
            let selection = if meadow {
                FieldSelection::Meadow
            } else if all {
                FieldSelection::All
            } else {
                FieldSelection::parse(&fields)
            };
            let options = with_display_names(ExportOptions::new(selection), display_names);
            options.validate()?;
            let query = build_query(&model, &target)?;
            let writer = create_writer(OutputFormat::Csv, output_path(&output))?;
            let summary = run_export(source.as_ref(), &query, &options, pipeline, writer).await?;
            report(&summary, &output);
        }

        Commands::Xml { target, fields, display_names, output } => {
            let options = with_display_names(ExportOptions::new(FieldSelection::parse(&fields)), display_names);
            options.validate()?;
            let query = build_query(&model, &target)?;
            let writer = create_writer(OutputFormat::Xml, output_path(&output))?;
            let summary = run_export(source.as_ref(), &query, &options, pipeline, writer).await?;
            report(&summary, &output);
        }

        Commands::FilesMatch { pattern, fields, output } => {
            let options = ExportOptions::new(FieldSelection::parse(&fields));
            options.validate()?;
            let writer = create_writer(OutputFormat::Csv, output_path(&output))?;
            let summary = run_files_match(source.as_ref(), &pattern, &options, pipeline, writer).await?;
            report(&summary, &output);
        }

        Commands::Fields { target } => {
            let query = build_query(&model, &target)?;
            for field in list_fields(source.as_ref(), &query).await? {
                println!("{}", field);
            }
        }
    }

    Ok(())
}

fn build_pipeline(cli: &Cli) -> ExportResult<ModifierPipeline> {
    let mut profile = SchemaProfile::load(&cli.profile)?;
    if let Some(size) = cli.thumbnail_size {
        profile = profile.with_thumbnail_size(size);
    }

    let mut terms = TermTables::builtin();
    if let Some(path) = &cli.relators {
        terms = terms.with_relators_file(path)?;
    }
    if let Some(path) = &cli.coded_terms {
        terms = terms.with_coded_terms_file(path)?;
    }

    log_debug(format!("Profile: {:?}", profile));
    Ok(ModifierPipeline::new(profile, terms))
}

fn open_source(cli: &Cli) -> ExportResult<Box<dyn RecordSource>> {
    Ok(match &cli.input {
        Some(path) => {
            let source = MemorySource::from_file(path)?;
            log_info(format!("📄 Loaded {} hits from {}", source.len(), path.display()));
            Box::new(source)
        }
        None => {
            let client = SearchClient::for_environment(cli.env)?;
            log_debug(format!("Search proxy: {}", client.config().base_url));
            Box::new(client)
        }
    })
}

fn build_query(model: &str, target: &QueryArgs) -> ExportResult<SearchQuery> {
    Ok(match (&target.collection, &target.query) {
        (Some(id), _) => collection_query(model, id)?,
        (None, Some(q)) => query_string(model, q),
        (None, None) => query_string(model, "*"),
    })
}

fn with_display_names(options: ExportOptions, names: Option<String>) -> ExportOptions {
    match names {
        Some(names) => options.with_display_names(parse_field_list(&names)),
        None => options,
    }
}

fn report(summary: &ExportSummary, output: &str) {
    let target = if output == "-" { "stdout" } else { output };
    log_success(format!("✨ Wrote {} records to {}", summary.records, target));
}
