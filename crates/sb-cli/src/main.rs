//! CLI entry point for the SiteBridge migration tool.
//!
//! This binary scans a web-application source tree for hand-written forms,
//! metadata, chat widgets, JSON-LD schemas, FAQs, sitemaps, and analytics
//! snippets, and rewrites matched code to delegate those concerns to the
//! SiteBridge managed service.
//!
//! # Usage
//!
//! ```bash
//! sb-migrate [OPTIONS] <COMMAND>
//!
//! # Scan and show a summary
//! sb-migrate scan --path ./apps/web
//!
//! # Preview every change without touching anything
//! sb-migrate migrate --dry-run
//!
//! # Migrate for real (requires --yes plus registry credentials)
//! sb-migrate migrate --yes --project proj_1 --api-key $SB_API_KEY
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use sb_core::{Config, DetectionCategory, MigrationSummary, ScanResult};
use sb_migrator::{MigrateOptions, MigrationEngine};
use sb_registry::RegistryClient;
use sb_scanner::{ScanOptions, Scanner, StatsSnapshot};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// CLI tool for migrating recurring web-app concerns to SiteBridge.
///
/// Scans a source tree for legacy patterns (forms, metadata, widgets,
/// schemas, FAQs, sitemaps, analytics, images) and rewrites matched code in
/// place to use the managed service.
#[derive(Parser)]
#[command(name = "sb-migrate", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Path to the source tree to scan.
    ///
    /// Defaults to the current directory if not specified.
    #[arg(short, long, global = true, env = "SB_MIGRATE_PATH")]
    path: Option<Utf8PathBuf>,

    /// Base URL of the SiteBridge registry API.
    #[arg(long, global = true, env = "SB_REGISTRY_URL")]
    registry_url: Option<String>,

    /// Project identifier for remote registration.
    #[arg(long, global = true, env = "SB_PROJECT_ID")]
    project: Option<String>,

    /// API credential for remote registration.
    ///
    /// When absent, migrations run without registering entities remotely.
    #[arg(long, global = true, env = "SB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Scan the source tree and report detected legacy patterns.
    Scan {
        /// Show the detailed per-file detection list.
        #[arg(short, long)]
        detailed: bool,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Output file (defaults to stdout).
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },

    /// Migrate detected patterns to the managed service.
    Migrate {
        /// Report changes without touching the filesystem or the network.
        #[arg(long)]
        dry_run: bool,

        /// Restrict migration to these categories.
        #[arg(long, value_enum, value_delimiter = ',')]
        category: Vec<CategoryArg>,

        /// Permit migration of moderate-complexity forms.
        #[arg(long)]
        assisted: bool,

        /// Skip the .backup sibling before the form rewrite.
        #[arg(long)]
        no_backup: bool,

        /// Confirm a live (non-dry-run) migration.
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Report output format.
#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    /// Human-readable summary.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Migratable categories accepted by `--category`.
///
/// Images are detected but handled by the external upload pipeline, so
/// they are not listed here.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CategoryArg {
    /// HTML forms.
    Forms,
    /// Chat widgets.
    Widgets,
    /// Page metadata.
    Metadata,
    /// JSON-LD schemas.
    Schemas,
    /// FAQ sections.
    Faqs,
    /// Sitemaps.
    Sitemaps,
    /// Analytics snippets.
    Analytics,
}

impl From<CategoryArg> for DetectionCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Forms => Self::Forms,
            CategoryArg::Widgets => Self::Widgets,
            CategoryArg::Metadata => Self::Metadata,
            CategoryArg::Schemas => Self::Schemas,
            CategoryArg::Faqs => Self::Faqs,
            CategoryArg::Sitemaps => Self::Sitemaps,
            CategoryArg::Analytics => Self::Analytics,
        }
    }
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise uses
/// `debug` level if `--verbose` is set, or `info` level by default. Noisy
/// crates are filtered to `warn` level.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},hyper=warn,reqwest=warn,ignore=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi))
        .with(filter)
        .init();
}

/// Builds a [`Config`] from CLI arguments.
///
/// Validates that the scan path exists and is a directory.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let path = cli.path.clone().unwrap_or_else(|| Utf8PathBuf::from("."));

    if !path.exists() {
        return Err(color_eyre::eyre::eyre!("Path does not exist: {}", path));
    }
    if !path.is_dir() {
        return Err(color_eyre::eyre::eyre!("Path is not a directory: {}", path));
    }

    let mut config = Config::default();
    config.scan.root_path = path;
    if let Some(url) = &cli.registry_url {
        config.registry.base_url.clone_from(url);
    }
    if let Some(project) = &cli.project {
        config.registry.project_id.clone_from(project);
    }
    config.registry.api_key.clone_from(&cli.api_key);

    Ok(config)
}

/// Creates a [`Scanner`] from the configuration.
fn create_scanner(config: &Config) -> color_eyre::Result<Scanner> {
    let skip: Vec<&str> = config.scan.skip_dirs.iter().map(String::as_str).collect();
    let options = ScanOptions::new(&config.scan.root_path)
        .with_skip_dirs(&skip)
        .with_follow_links(config.scan.follow_links);

    Scanner::new(options).map_err(|e| color_eyre::eyre::eyre!("Failed to create scanner: {}", e))
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Runs a one-shot scan with summary output.
fn run_scan(
    config: &Config,
    detailed: bool,
    format: ReportFormat,
    output: Option<Utf8PathBuf>,
) -> color_eyre::Result<()> {
    info!(path = %config.scan.root_path, "Starting scan");

    let scanner = create_scanner(config)?;
    let report = scanner.scan()?;

    match format {
        ReportFormat::Json => {
            let content = generate_json_report(&report.stats, &report.result)?;
            if let Some(output_path) = output {
                std::fs::write(output_path.as_std_path(), &content)?;
                info!(path = %output_path, "Report written");
            } else {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                writeln!(handle, "{content}")?;
            }
        }
        ReportFormat::Text => {
            print_scan_summary(&report.stats, &report.result);
            if detailed {
                print_detailed_detections(&report.result);
            }
        }
    }

    // Print any errors encountered
    if !report.errors.is_empty() {
        let stderr = std::io::stderr();
        let mut handle = stderr.lock();
        writeln!(handle)?;
        writeln!(handle, "Errors ({}):", report.errors.len())?;
        for (path, error) in &report.errors {
            writeln!(handle, "  {path} - {error}")?;
        }
    }

    Ok(())
}

/// Scans and then migrates in one run.
///
/// Scan and migrate operate on the same read of the tree: detections are
/// snapshots that are only valid against the file contents this run saw.
async fn run_migrate(
    config: &Config,
    dry_run: bool,
    categories: &[CategoryArg],
    assisted: bool,
    no_backup: bool,
    yes: bool,
) -> color_eyre::Result<()> {
    if !dry_run && !yes {
        return Err(color_eyre::eyre::eyre!(
            "A live migration rewrites files in place. Re-run with --yes to confirm, \
             or use --dry-run to preview changes."
        ));
    }

    info!(path = %config.scan.root_path, dry_run, "Starting migration");

    let scanner = create_scanner(config)?;
    let report = scanner.scan()?;

    if report.result.is_empty() {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "Nothing to migrate.")?;
        return Ok(());
    }

    let options = MigrateOptions {
        dry_run,
        backup: !no_backup,
        allow_assisted: assisted,
    };

    let mut engine = MigrationEngine::new(&config.scan.root_path, options);
    if !dry_run && config.registry.is_enabled() {
        let client = RegistryClient::new(
            &config.registry.base_url,
            &config.registry.project_id,
            config.registry.api_key.as_deref().unwrap_or_default(),
        )?;
        engine = engine.with_registry(Arc::new(client));
    } else if !dry_run {
        info!("No registry credentials; migrating locally only");
    }

    let summary = if categories.is_empty() {
        engine.run(&report.result).await
    } else {
        let selected: Vec<DetectionCategory> =
            categories.iter().map(|&c| DetectionCategory::from(c)).collect();
        engine.run_categories(&report.result, &selected).await
    };

    print_migration_summary(&summary);
    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Prints the scan summary table.
fn print_scan_summary(stats: &StatsSnapshot, result: &ScanResult) {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let _ = writeln!(handle);
    let _ = writeln!(handle, "Scan Summary");
    let _ = writeln!(handle, "============");
    let _ = writeln!(handle);
    let _ = writeln!(handle, "Files scanned:      {}", stats.files_total);
    let _ = writeln!(handle, "Parsed cleanly:     {}", stats.files_parsed);
    let _ = writeln!(handle, "Parse fallbacks:    {}", stats.parse_failures);
    let _ = writeln!(handle);
    let _ = writeln!(handle, "Detections ({} total):", result.total());
    for category in DetectionCategory::ALL {
        let _ = writeln!(
            handle,
            "  {:<12} {}",
            category.label(),
            result.count(category)
        );
    }
}

/// Prints the per-file detection list.
fn print_detailed_detections(result: &ScanResult) {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    for form in &result.forms {
        let _ = writeln!(
            handle,
            "  form       {}:{} {} ({} fields, {}, {})",
            form.file_path,
            form.span.start_line,
            form.component_name,
            form.field_count(),
            form.complexity.label(),
            form.suggested_action().label(),
        );
    }
    for m in &result.metadata {
        let _ = writeln!(
            handle,
            "  metadata   {} ({}{})",
            m.file_path,
            m.kind.label(),
            m.title.as_deref().map_or_else(String::new, |t| format!(", title: {t}")),
        );
    }
    for w in &result.widgets {
        let _ = writeln!(
            handle,
            "  widget     {} ({}{})",
            w.file_path,
            w.provider.label(),
            w.widget_id.as_deref().map_or_else(String::new, |id| format!(", id: {id}")),
        );
    }
    for s in &result.schemas {
        let _ = writeln!(
            handle,
            "  schema     {}:{} {}",
            s.file_path, s.span.start_line, s.schema_type
        );
    }
    for f in &result.faqs {
        let _ = writeln!(
            handle,
            "  faq        {} ({}, {} items)",
            f.file_path,
            f.kind.label(),
            f.item_count
        );
    }
    for s in &result.sitemaps {
        let _ = writeln!(
            handle,
            "  sitemap    {} ({})",
            s.file_path,
            s.generator.label()
        );
    }
    for a in &result.analytics {
        let _ = writeln!(
            handle,
            "  analytics  {} ({}{})",
            a.file_path,
            a.provider.label(),
            a.tracking_id.as_deref().map_or_else(String::new, |id| format!(", {id}")),
        );
    }
    for i in &result.images {
        let _ = writeln!(
            handle,
            "  image      {}:{} {} ({}{})",
            i.file_path,
            i.span.start_line,
            i.src,
            i.element.label(),
            if i.missing_alt() { ", missing alt" } else { "" },
        );
    }
}

/// Prints per-file migration changes and the success/failure rollup.
fn print_migration_summary(summary: &MigrationSummary) {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    for result in &summary.results {
        let _ = writeln!(handle);
        let marker = if result.success { "ok" } else { "FAILED" };
        let _ = writeln!(handle, "[{marker}] {}", result.file_path);
        for change in &result.changes {
            let _ = writeln!(handle, "    {change}");
        }
        if let Some(error) = &result.error {
            let _ = writeln!(handle, "    error: {error}");
        }
    }

    let _ = writeln!(handle);
    let _ = writeln!(
        handle,
        "Migration complete: {} succeeded, {} failed",
        summary.succeeded(),
        summary.failed()
    );
    for failure in summary.failures() {
        let _ = writeln!(
            handle,
            "  {} - {}",
            failure.file_path,
            failure.error.as_deref().unwrap_or("unknown error")
        );
    }
}

/// Generates a JSON report of the scan.
fn generate_json_report(
    stats: &StatsSnapshot,
    result: &ScanResult,
) -> color_eyre::Result<String> {
    #[derive(serde::Serialize)]
    struct Report<'a> {
        stats: &'a StatsSnapshot,
        detections: &'a ScanResult,
    }

    let report = Report {
        stats,
        detections: result,
    };
    serde_json::to_string_pretty(&report)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to serialize JSON: {}", e))
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Route to the appropriate command
    match &cli.command {
        Commands::Scan {
            detailed,
            format,
            output,
        } => {
            let config = build_config(&cli)?;
            run_scan(&config, *detailed, *format, output.clone())
        }
        Commands::Migrate {
            dry_run,
            category,
            assisted,
            no_backup,
            yes,
        } => {
            let config = build_config(&cli)?;
            run_migrate(&config, *dry_run, category, *assisted, *no_backup, *yes).await
        }
    }
}
