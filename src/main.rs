use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use gcp_inventory::cache::Cache;
use gcp_inventory::config::Config;
use gcp_inventory::gcp::client::GcpClient;
use gcp_inventory::remote::{self, Alert, Scanner, ScannerOptions};
use gcp_inventory::resource::SerializableResource;
use gcp_inventory::schema::{self, SchemaRepository};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Capacity of the per-scan repository cache
const CACHE_CAPACITY: usize = 100;

/// Enumerate Google Cloud inventory as Terraform-compatible resources
#[derive(Parser, Debug)]
#[command(name = "gcp-inventory", version, about, long_about = None)]
struct Args {
    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    /// Log to stderr instead of the log file
    #[arg(long, global = true)]
    log_stderr: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Enumerate live resources
    Scan(ScanArgs),
    /// List supported resource types
    Types,
}

#[derive(clap::Args, Debug)]
struct ScanArgs {
    /// GCP project to scan
    #[arg(short, long)]
    project: Option<String>,

    /// Scope to search (projects/<id>, folders/<id>, organizations/<id>); repeatable
    #[arg(short, long = "scope")]
    scopes: Vec<String>,

    #[arg(long)]
    region: Option<String>,

    #[arg(long)]
    zone: Option<String>,

    /// Read full details of deep-mode types
    #[arg(long)]
    deep: bool,

    /// Resource type to skip; repeatable
    #[arg(long = "ignore")]
    ignored_types: Vec<String>,

    /// Enumerators running at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// Results requested per API page
    #[arg(long)]
    page_size: Option<u32>,

    #[arg(short, long, value_enum, default_value = "json")]
    output: OutputFormat,

    /// Persist project, scopes, region and zone to the config file
    #[arg(long)]
    save: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn setup_logging(level: LogLevel, to_stderr: bool) -> Result<Option<WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let (non_blocking, guard) = if to_stderr {
        tracing_appender::non_blocking(std::io::stderr())
    } else {
        let log_path = get_log_path();
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        tracing_appender::non_blocking(file)
    };

    // RUST_LOG directives override --log-level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing_level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gcp-inventory started with log level: {:?}", level);
    if !to_stderr {
        tracing::info!("Log file: {:?}", get_log_path());
    }

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = Config::config_dir() {
        return config_dir.join("gcp-inventory.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".gcp-inventory").join("gcp-inventory.log");
    }
    PathBuf::from("gcp-inventory.log")
}

#[derive(Serialize)]
struct ScanOutput<'a> {
    scan_id: Uuid,
    generated_at: DateTime<Utc>,
    scopes: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    zone: Option<&'a str>,
    resources: Vec<SerializableResource>,
    alerts: &'a [Alert],
}

#[derive(Serialize)]
struct TypeInfo<'a> {
    #[serde(rename = "type")]
    resource_type: &'a str,
    deep_mode: bool,
}

fn print<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered);
    Ok(())
}

fn schemas() -> SchemaRepository {
    let mut repo = SchemaRepository::new();
    schema::google::init_resources_metadata(&mut repo);
    repo
}

async fn scan(args: ScanArgs) -> Result<()> {
    let mut config = Config::load();
    if let Some(project) = args.project {
        config.project_id = Some(project);
    }
    if !args.scopes.is_empty() {
        config.scopes = args.scopes;
    }
    if args.region.is_some() {
        config.region = args.region;
    }
    if args.zone.is_some() {
        config.zone = args.zone;
    }
    if args.concurrency.is_some() {
        config.max_concurrency = args.concurrency;
    }
    if args.page_size.is_some() {
        config.page_size = args.page_size;
    }

    let scopes = config.scan_scopes();
    if scopes.is_empty() {
        bail!(
            "No project configured: pass --project or --scope, or set a default project with gcloud"
        );
    }
    if args.save {
        config.save().context("Failed to save configuration")?;
    }

    let client = GcpClient::new().await?.with_page_size(config.page_size());
    let library = remote::google::init(
        remote::google::Clients::from_client(Arc::new(client)),
        &config,
        Arc::new(Cache::new(CACHE_CAPACITY)),
    );

    let schemas = Arc::new(schemas());
    if args.deep {
        let missing: Vec<_> = schemas
            .deep_mode_types()
            .into_iter()
            .filter(|ty| library.details_fetcher(ty).is_none())
            .collect();
        if !missing.is_empty() {
            tracing::warn!(
                "No details fetcher for {} deep-mode types, keeping listed attributes",
                missing.len()
            );
        }
    }

    let options = ScannerOptions {
        max_concurrency: config.max_concurrency(),
        deep: args.deep,
        ignored_types: args.ignored_types.into_iter().collect(),
    };
    let mut result = Scanner::new(library, schemas.clone(), options).resources().await?;

    for res in &mut result.resources {
        schemas.normalize(res);
    }
    for alert in &result.alerts {
        eprintln!("warning: {}", alert.message);
    }

    let output = ScanOutput {
        scan_id: result.scan_id,
        generated_at: Utc::now(),
        scopes: &scopes,
        region: config.region.as_deref(),
        zone: config.zone.as_deref(),
        resources: result.resources.iter().map(|r| schemas.serializable(r)).collect(),
        alerts: &result.alerts,
    };
    print(&output, args.output)
}

fn types() -> Result<()> {
    let schemas = schemas();
    let types: Vec<_> = schemas
        .types()
        .map(|ty| TypeInfo {
            resource_type: ty,
            deep_mode: schemas.is_deep_mode(ty),
        })
        .collect();
    print(&types, OutputFormat::Json)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level, args.log_stderr)?;

    match args.command {
        Command::Scan(scan_args) => scan(scan_args).await,
        Command::Types => types(),
    }
}
