use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use health_rollup::{
    parse_document, watch, AggregateResult, AggregatorConfig, FileSource, PersistenceBackend,
    Status, StatusAggregator, UnrecognizedStatusPolicy,
};

#[derive(Parser, Debug)]
#[command(name = "health-rollup")]
#[command(about = "Aggregate component health reports into one status, skipping excluded components")]
struct Args {
    /// Path to the component report JSON file
    #[arg(short, long, default_value = "health.json")]
    file: PathBuf,

    /// Config file (TOML, JSON or YAML). HEALTH_ROLLUP_* variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Active persistence backend; components of the other backends are excluded
    #[arg(short, long)]
    backend: Option<PersistenceBackend>,

    /// Exclude a component by name (repeatable)
    #[arg(short = 'x', long = "exclude")]
    exclude: Vec<String>,

    /// Status to report when no component survives exclusion
    #[arg(long)]
    empty_status: Option<Status>,

    /// Treat unrecognized status codes as UNKNOWN instead of failing
    #[arg(long)]
    map_unknown: bool,

    /// Write the aggregate to a JSON file instead of stdout
    #[arg(short, long, conflicts_with = "watch")]
    export: Option<PathBuf>,

    /// Re-aggregate whenever the report file changes, until Ctrl+C
    #[arg(short, long)]
    watch: bool,

    /// Poll interval in seconds (only used with --watch)
    #[arg(short, long, default_value = "1")]
    refresh: u64,

    /// Exit with status 1 if the aggregate is OUT_OF_SERVICE or DOWN
    #[arg(long, conflicts_with = "watch")]
    fail_on_degraded: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(&args)?;
    let aggregator = StatusAggregator::new(&config);

    if args.watch {
        run_watch(&args.file, &aggregator, Duration::from_secs(args.refresh))?;
        return Ok(ExitCode::SUCCESS);
    }

    let result = aggregate_file(&args.file, &aggregator)?;
    match args.export {
        Some(ref export_path) => export_to_file(&result, export_path)?,
        None => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    if args.fail_on_degraded && result.status().is_degraded() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Load file and environment configuration, then apply CLI overrides.
fn resolve_config(args: &Args) -> Result<AggregatorConfig> {
    let mut config = AggregatorConfig::load(args.config.as_deref())
        .context("Failed to resolve aggregator configuration")?;

    if let Some(backend) = args.backend {
        config = config.with_backend(backend);
    }
    for name in &args.exclude {
        config = config.exclude(name.clone());
    }
    if let Some(status) = args.empty_status {
        config = config.with_empty_status(status);
    }
    if args.map_unknown {
        config = config.with_unrecognized_status(UnrecognizedStatusPolicy::MapToUnknown);
    }
    Ok(config)
}

/// Read a report file once and aggregate it.
fn aggregate_file(path: &Path, aggregator: &StatusAggregator) -> Result<AggregateResult> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let snapshot = parse_document(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let result = aggregator.aggregate_snapshot(snapshot)?;
    info!(
        "Aggregated {} component(s) from {}: {}",
        result.components().count(),
        path.display(),
        result.status()
    );
    Ok(result)
}

/// Print a fresh aggregate every time the file changes.
fn run_watch(path: &Path, aggregator: &StatusAggregator, refresh: Duration) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let mut source = FileSource::new(path);

    rt.block_on(watch(
        &mut source,
        aggregator,
        refresh,
        async {
            let _ = tokio::signal::ctrl_c().await;
        },
        |result| match result.and_then(|r| Ok(serde_json::to_string(&r)?)) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("error: {}", e),
        },
    ));
    Ok(())
}

/// Write the aggregate to a JSON file.
fn export_to_file(result: &AggregateResult, export_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    fs::write(export_path, json)
        .with_context(|| format!("Failed to write {}", export_path.display()))?;

    println!("Exported aggregate health to: {}", export_path.display());
    Ok(())
}
