mod logging;
mod settings;

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::{info, warn};

use datasynth_core::{DestinationCredentials, RecordSet};
use datasynth_generate::output::{self, ExportFormat};
use datasynth_generate::{
    EntityKind, EntityRequest, FieldSpec, GenerateOptions, GenerationEngine, GenerationError,
    GenerationResult, ProviderRegistry,
};
use datasynth_store::{DatasetStore, PostgresDestination, StoreError, bulk_copy};

use settings::{DEFAULT_SETTINGS_FILE, Settings};

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("core error: {0}")]
    Core(#[from] datasynth_core::Error),
    #[error("query failed: {0}")]
    Query(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    ConfigRead(#[from] toml::de::Error),
    #[error("could not write configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "datasynth", version, about = "Synthetic dataset generator")]
struct Cli {
    /// Configuration file; created with defaults when missing.
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
    /// Dataset store file (overrides the configuration).
    #[arg(long, global = true)]
    database: Option<PathBuf>,
    /// Append JSON log lines to this file (overrides the configuration).
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate rows for a built-in entity and store them as a table.
    Generate(GenerateArgs),
    /// Generate rows from a JSON list of field specs.
    Custom(CustomArgs),
    /// Run SQL against the dataset store.
    Query(QueryArgs),
    /// List stored tables.
    Tables,
    /// Write a stored table to CSV or JSON.
    Export(ExportArgs),
    /// Copy a stored table into PostgreSQL.
    Transfer(TransferArgs),
    /// List value providers usable in custom schemas.
    Providers(ProvidersArgs),
    /// Print the JSON Schema of a custom field spec.
    FieldSpecSchema,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Table name (defaults to the entity's table, or `custom`).
    #[arg(long)]
    table: Option<String>,
    /// Keep the rows in memory only; combine with --export.
    #[arg(long, default_value_t = false)]
    no_persist: bool,
    /// Also write the generated rows to a file.
    #[arg(long, value_enum)]
    export: Option<Format>,
    /// Export path (defaults to `<export_dir>/<table>.<ext>`).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Print the generation report as JSON.
    #[arg(long, default_value_t = false)]
    report: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// customer, product, company or transaction.
    entity: EntityKind,
    #[arg(long, short = 'n', default_value_t = 100)]
    count: u64,
    /// Comma-separated fields to include (default: all).
    #[arg(long, value_delimiter = ',')]
    fields: Vec<String>,
    /// Sample keys for a role from a stored table, as `role=table`.
    #[arg(long = "reference", value_name = "ROLE=TABLE", value_parser = parse_reference)]
    references: Vec<(String, String)>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct CustomArgs {
    /// JSON file holding an array of field specs.
    #[arg(long)]
    schema: PathBuf,
    #[arg(long, short = 'n', default_value_t = 100)]
    count: u64,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct QueryArgs {
    sql: String,
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,
}

#[derive(Args, Debug)]
struct ExportArgs {
    table: String,
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TransferArgs {
    table: String,
    /// Full connection string; overrides the individual flags.
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long = "db")]
    database: Option<String>,
    #[arg(long)]
    user: Option<String>,
    #[arg(long, env = "DATASYNTH_PG_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    /// Rows per INSERT statement.
    #[arg(long, default_value_t = 1_000)]
    batch_rows: usize,
}

#[derive(Args, Debug)]
struct ProvidersArgs {
    /// Only show one category (identity, contact, geo, ...).
    #[arg(long)]
    category: Option<String>,
    /// Describe a single provider.
    #[arg(long)]
    describe: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Csv,
    Json,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => ExportFormat::Csv,
            Format::Json => ExportFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let mut settings = settings::load_or_create(&cli.config)?;
    if let Some(database) = cli.database {
        settings.database_path = database;
    }
    let log_file = cli.log_file.or_else(|| settings.log_file.clone());
    logging::init_logging(&settings.log_level, log_file.as_deref())?;

    match cli.command {
        Command::Generate(args) => run_generate(&settings, args),
        Command::Custom(args) => run_custom(&settings, args),
        Command::Query(args) => run_query(&settings, args),
        Command::Tables => run_tables(&settings),
        Command::Export(args) => run_export(&settings, args),
        Command::Transfer(args) => run_transfer(&settings, args).await,
        Command::Providers(args) => run_providers(args),
        Command::FieldSpecSchema => {
            let schema = datasynth_generate::field_spec_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

fn engine_for(settings: &Settings, seed: Option<u64>) -> GenerationEngine {
    GenerationEngine::new(GenerateOptions {
        seed: seed.or(settings.seed),
        base_time: None,
        probabilities: settings.probabilities,
    })
}

fn run_generate(settings: &Settings, args: GenerateArgs) -> Result<(), CliError> {
    settings.check_count(args.count)?;
    let kind = args.entity;
    let fields = if args.fields.is_empty() {
        kind.generator()
            .field_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    } else {
        args.fields
    };
    let mut request = EntityRequest::new(args.count, fields);
    for (role, table) in args.references {
        request = request.with_reference(role, table);
    }

    let engine = engine_for(settings, args.output.seed);
    let store = DatasetStore::open(&settings.database_path)?;
    let result = engine.generate(kind, &request, Some(&store))?;
    finish_generation(settings, store, kind.default_table(), result, &args.output)
}

fn run_custom(settings: &Settings, args: CustomArgs) -> Result<(), CliError> {
    settings.check_count(args.count)?;
    let content = fs::read_to_string(&args.schema)?;
    let specs: Vec<FieldSpec> = serde_json::from_str(&content)?;

    let engine = engine_for(settings, args.output.seed);
    let result = engine.generate_custom(args.count, &specs)?;
    for (field, failures) in &result.report.failed_fields {
        eprintln!("warning: field '{field}' produced null in {failures} row(s)");
    }
    let store = DatasetStore::open(&settings.database_path)?;
    finish_generation(settings, store, "custom", result, &args.output)
}

/// Persists and exports a finished run. An export is still attempted when
/// persisting fails, so the generated rows are not lost.
fn finish_generation(
    settings: &Settings,
    mut store: DatasetStore,
    default_table: &str,
    result: GenerationResult,
    output: &OutputArgs,
) -> Result<(), CliError> {
    let table = output.table.as_deref().unwrap_or(default_table);
    let GenerationResult { records, report } = result;

    let persisted = if output.no_persist {
        Ok(0)
    } else {
        store.persist(table, &records)
    };
    match &persisted {
        Ok(rows) if !output.no_persist => println!("stored {rows} rows in table '{table}'"),
        Ok(_) => println!("generated {} rows", records.len()),
        Err(err) => warn!(table = %table, error = %err, "persist failed"),
    }

    if let Some(format) = output.export {
        let path = export_path(settings, table, format, output.out.as_deref());
        let bytes = output::export_to_path(&records, &path, format.into())?;
        println!("exported {} rows ({bytes} bytes) to {}", records.len(), path.display());
    }

    if output.report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.fallback_count() > 0 || !report.ignored_fields.is_empty() {
        info!(
            run_id = %report.run_id,
            ignored = ?report.ignored_fields,
            fallbacks = ?report.fallback_usage,
            "generation notes"
        );
    }

    persisted.map(|_| ()).map_err(CliError::from)
}

fn run_query(settings: &Settings, args: QueryArgs) -> Result<(), CliError> {
    let store = DatasetStore::open(&settings.database_path)?;
    let outcome = store.query(&args.sql);
    if let Some(message) = outcome.error {
        return Err(CliError::Query(message));
    }
    print_records(&outcome.records, args.format)
}

fn run_tables(settings: &Settings) -> Result<(), CliError> {
    let store = DatasetStore::open(&settings.database_path)?;
    let tables = store.list_tables()?;
    if tables.is_empty() {
        println!("no tables stored in {}", settings.database_path.display());
    }
    for table in tables {
        println!("{table}");
    }
    Ok(())
}

fn run_export(settings: &Settings, args: ExportArgs) -> Result<(), CliError> {
    let store = DatasetStore::open(&settings.database_path)?;
    let records = store.read_table(&args.table)?;
    let path = export_path(settings, &args.table, args.format, args.out.as_deref());
    let bytes = output::export_to_path(&records, &path, args.format.into())?;
    println!("exported {} rows ({bytes} bytes) to {}", records.len(), path.display());
    Ok(())
}

async fn run_transfer(settings: &Settings, args: TransferArgs) -> Result<(), CliError> {
    let credentials = match args.url.as_deref() {
        Some(url) => {
            let mut credentials = DestinationCredentials::from_url(url)?;
            if let Some(password) = args.password {
                credentials.password = password;
            }
            credentials
        }
        None => {
            let defaults = &settings.postgres;
            DestinationCredentials::new(
                args.host.unwrap_or_else(|| defaults.host.clone()),
                args.port.unwrap_or(defaults.port),
                args.database.unwrap_or_else(|| defaults.database.clone()),
                args.user.unwrap_or_else(|| defaults.user.clone()),
                args.password.unwrap_or_default(),
            )
        }
    };

    let start = Instant::now();
    let store = DatasetStore::open(&settings.database_path)?;
    let destination = PostgresDestination::new(credentials).with_batch_rows(args.batch_rows);
    info!(
        table = %args.table,
        destination = %destination.credentials(),
        "transfer started"
    );
    let copied = bulk_copy(&store, &args.table, &destination).await?;
    info!(
        table = %args.table,
        rows = copied,
        duration_ms = start.elapsed().as_millis() as u64,
        "transfer finished"
    );
    println!(
        "copied {copied} rows from '{}' to {}",
        args.table,
        destination.credentials()
    );
    Ok(())
}

fn run_providers(args: ProvidersArgs) -> Result<(), CliError> {
    let registry = ProviderRegistry::new();
    if let Some(id) = args.describe {
        let entry = registry.get(&id)?;
        println!("{}", entry.signature());
        println!("{}", entry.describe());
        return Ok(());
    }

    let mut by_category: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for info in registry.catalog() {
        let category = info.category.as_str();
        if args
            .category
            .as_deref()
            .is_some_and(|wanted| wanted != category)
        {
            continue;
        }
        by_category
            .entry(category)
            .or_default()
            .push(format!("  {:<40} {}", info.signature, info.description));
    }
    if by_category.is_empty() {
        return Err(CliError::InvalidInput(
            "no providers match the requested category".to_string(),
        ));
    }
    for (category, lines) in by_category {
        println!("{category}:");
        for line in lines {
            println!("{line}");
        }
    }
    Ok(())
}

fn print_records(records: &RecordSet, format: Format) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match format {
        Format::Csv => output::write_csv(records, &mut handle)?,
        Format::Json => output::write_json(records, &mut handle)?,
    };
    handle.flush()?;
    Ok(())
}

fn export_path(settings: &Settings, table: &str, format: Format, out: Option<&Path>) -> PathBuf {
    match out {
        Some(path) => path.to_path_buf(),
        None => settings.export_dir.join(format!(
            "{table}.{}",
            ExportFormat::from(format).extension()
        )),
    }
}

fn parse_reference(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((role, table)) if !role.trim().is_empty() && !table.trim().is_empty() => {
            Ok((role.trim().to_string(), table.trim().to_string()))
        }
        _ => Err(format!("expected ROLE=TABLE, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reference_pairs() {
        assert_eq!(
            parse_reference("customers=crm_customers"),
            Ok(("customers".to_string(), "crm_customers".to_string()))
        );
        assert!(parse_reference("customers").is_err());
        assert!(parse_reference("=table").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_arguments_parse() {
        let cli = Cli::try_parse_from([
            "datasynth",
            "generate",
            "transaction",
            "-n",
            "25",
            "--fields",
            "customer_id,amount,total",
            "--reference",
            "customers=customers",
            "--export",
            "json",
        ])
        .expect("parse");
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.entity, EntityKind::Transaction);
        assert_eq!(args.count, 25);
        assert_eq!(args.fields, ["customer_id", "amount", "total"]);
        assert_eq!(args.references.len(), 1);
        assert!(matches!(args.output.export, Some(Format::Json)));
    }

    #[test]
    fn export_path_defaults_to_export_dir() {
        let settings = Settings::default();
        assert_eq!(
            export_path(&settings, "customers", Format::Csv, None),
            PathBuf::from("exports").join("customers.csv")
        );
        let custom = Path::new("out/data.json");
        assert_eq!(
            export_path(&settings, "customers", Format::Json, Some(custom)),
            custom.to_path_buf()
        );
    }
}
