//! spot-analysis CLI entry point.

use clap::{Args, Parser, Subcommand};
use sa_common::{
    category_from_cell, format_error_human, Error, OutputFormat, StructuredError, SCHEMA_VERSION,
};
use sa_core::config::{load_config, ResolvedConfig};
use sa_core::exit_codes::ExitCode;
use sa_core::load::{load_fulfillments_from_path, load_interruptions_from_path, TimestampParser};
use sa_core::log_event;
use sa_core::logging::{event_names, init_logging, LogConfig, LogFormat, LogLevel, Stage};
use sa_core::output::render_report;
use sa_core::schema::{available_schemas, generate_all_schemas, generate_schema};
use sa_core::{AnalysisSession, Filter, ReportOptions};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Spot instance uptime and interruption analysis.
#[derive(Parser, Debug)]
#[command(name = "spot-analysis", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to config.json (overrides SPOT_ANALYSIS_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log line format on stderr (human or jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Correlate both logs and print the uptime report
    Analyze(AnalyzeArgs),

    /// Print JSON Schema for report types
    Schema(SchemaArgs),

    /// Inspect or validate configuration
    Config(ConfigArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Spot request fulfillment CSV
    #[arg(long)]
    fulfillment: PathBuf,

    /// Spot interruption CSV
    #[arg(long)]
    interruption: PathBuf,

    /// Keep only these instance types (repeatable; empty string selects missing)
    #[arg(long = "type", value_name = "TYPE")]
    instance_types: Vec<String>,

    /// Keep only these availability zones (repeatable; empty string selects missing)
    #[arg(long = "zone", value_name = "ZONE")]
    zones: Vec<String>,

    /// Write the by-type summary CSV here (a directory gets the configured file name)
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Type name to print
    name: Option<String>,

    /// List available schema types
    #[arg(long)]
    list: bool,

    /// Print every schema keyed by type name
    #[arg(long)]
    all: bool,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the resolved configuration
    Show,
    /// Validate a config file (defaults to the resolved one)
    Validate { path: Option<PathBuf> },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                ExitCode::ArgsError.as_i32()
            } else {
                ExitCode::Clean.as_i32()
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let exit_code = match &cli.command {
        Commands::Analyze(args) => run_analyze(&cli.global, args),
        Commands::Schema(args) => run_schema(&cli.global, args),
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => run_config_show(&cli.global),
            ConfigCommands::Validate { path } => run_config_validate(&cli.global, path.as_deref()),
        },
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Clean
        }
    };

    std::process::exit(exit_code.as_i32());
}

/// Report an error on stderr and map it to an exit code.
fn output_error(global: &GlobalOpts, err: &Error) -> ExitCode {
    if global.format.is_machine_readable() {
        eprintln!("{}", StructuredError::from(err).to_json());
    } else {
        let use_color = !global.no_color && std::io::stderr().is_terminal();
        eprintln!("{}", format_error_human(err, use_color));
    }
    ExitCode::from(err)
}

fn print_json(value: &serde_json::Value) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_analyze(global: &GlobalOpts, args: &AnalyzeArgs) -> ExitCode {
    match analyze(global, args) {
        Ok(code) => code,
        Err(err) => output_error(global, &err),
    }
}

fn build_filter(args: &AnalyzeArgs) -> Filter {
    let mut filter = Filter::all();
    if !args.instance_types.is_empty() {
        filter = filter.with_types(args.instance_types.iter().map(|t| category_from_cell(t)));
    }
    if !args.zones.is_empty() {
        filter = filter.with_zones(args.zones.iter().map(|z| category_from_cell(z)));
    }
    filter
}

fn export_target(path: &Path, resolved: &ResolvedConfig) -> PathBuf {
    if path.is_dir() {
        path.join(&resolved.config.export.file_name)
    } else {
        path.to_path_buf()
    }
}

fn analyze(global: &GlobalOpts, args: &AnalyzeArgs) -> Result<ExitCode, Error> {
    let resolved = load_config(global.config.as_deref())?;
    let config = &resolved.config;

    let mut session = AnalysisSession::new();
    let ctx = session.context().clone();
    if resolved.is_default() {
        log_event!(ctx, DEBUG, event_names::CONFIG_DEFAULT_USED, Stage::Init, "Using built-in configuration");
    } else {
        log_event!(
            ctx,
            DEBUG,
            event_names::CONFIG_LOADED,
            Stage::Init,
            "Configuration loaded",
            config_hash = resolved.snapshot.short_id()
        );
    }

    let parser = TimestampParser::new(&config.timestamps);
    let fulfillments =
        load_fulfillments_from_path(&args.fulfillment, &config.fulfillment_columns, &parser)?;
    let interruptions =
        load_interruptions_from_path(&args.interruption, &config.interruption_columns, &parser)?;
    log_event!(
        ctx,
        INFO,
        event_names::LOAD_FINISHED,
        Stage::Load,
        "Inputs loaded",
        fulfillment_rows = fulfillments.len(),
        interruption_rows = interruptions.len()
    );
    session.set_fulfillments(fulfillments);
    session.set_interruptions(interruptions);

    let options = ReportOptions::from_settings(&config.report).with_filter(build_filter(args));
    let Some(report) = session.run(&options) else {
        return Err(Error::Config("analysis did not run: an input table is missing".into()));
    };

    // Stdout only sees a report once the export, if any, is on disk.
    let rendered = render_report(&report, global.format)?;
    if let Some(path) = &args.export {
        let target = export_target(path, &resolved);
        let bytes = session.export_summary(&report)?;
        std::fs::write(&target, bytes.as_slice())?;
        log_event!(
            ctx,
            INFO,
            event_names::EXPORT_WRITTEN,
            Stage::Export,
            "Summary CSV written",
            bytes = bytes.len()
        );
    }

    print!("{}", rendered);
    if global.format == OutputFormat::Json {
        println!();
    }

    Ok(if report.is_empty_join() {
        ExitCode::EmptyJoin
    } else {
        ExitCode::Clean
    })
}

fn run_schema(global: &GlobalOpts, args: &SchemaArgs) -> ExitCode {
    let to_text = |value: &serde_json::Value| {
        if args.compact {
            serde_json::to_string(value)
        } else {
            serde_json::to_string_pretty(value)
        }
    };

    if args.list || (args.name.is_none() && !args.all) {
        if global.format == OutputFormat::Json {
            let listing: Vec<serde_json::Value> = available_schemas()
                .into_iter()
                .map(|(name, description)| serde_json::json!({"name": name, "description": description}))
                .collect();
            return match print_json(&serde_json::Value::Array(listing)) {
                Ok(()) => ExitCode::Clean,
                Err(err) => output_error(global, &err),
            };
        }
        for (name, description) in available_schemas() {
            println!("{:<24} {}", name, description);
        }
        return ExitCode::Clean;
    }

    let value = if args.all {
        match serde_json::to_value(generate_all_schemas()) {
            Ok(v) => v,
            Err(err) => return output_error(global, &Error::Json(err)),
        }
    } else {
        let name = args.name.as_deref().unwrap_or_default();
        match generate_schema(name) {
            Some(v) => v,
            None => {
                eprintln!("unknown schema type '{}'; see 'spot-analysis schema --list'", name);
                return ExitCode::ArgsError;
            }
        }
    };

    match to_text(&value) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::Clean
        }
        Err(err) => output_error(global, &Error::Json(err)),
    }
}

fn run_config_show(global: &GlobalOpts) -> ExitCode {
    let resolved = match load_config(global.config.as_deref()) {
        Ok(r) => r,
        Err(err) => return output_error(global, &err.into()),
    };

    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "source": resolved.paths.source.to_string(),
        "path": resolved.paths.config.as_ref().map(|p| p.display().to_string()),
        "using_defaults": resolved.is_default(),
        "snapshot": &resolved.snapshot,
        "config": &resolved.config,
    });
    match print_json(&response) {
        Ok(()) => ExitCode::Clean,
        Err(err) => output_error(global, &err),
    }
}

fn run_config_validate(global: &GlobalOpts, path: Option<&Path>) -> ExitCode {
    let resolved = match load_config(path.or(global.config.as_deref())) {
        Ok(r) => r,
        Err(err) => return output_error(global, &err.into()),
    };

    if global.format == OutputFormat::Json {
        let response = serde_json::json!({
            "valid": true,
            "path": resolved.paths.config.as_ref().map(|p| p.display().to_string()),
            "using_defaults": resolved.is_default(),
            "content_hash": &resolved.snapshot.content_hash,
        });
        return match print_json(&response) {
            Ok(()) => ExitCode::Clean,
            Err(err) => output_error(global, &err),
        };
    }

    match &resolved.paths.config {
        Some(p) => println!("✓ {} is valid ({})", p.display(), resolved.snapshot.short_id()),
        None => println!("✓ no config file found; built-in defaults are valid"),
    }
    ExitCode::Clean
}

fn print_version(global: &GlobalOpts) {
    if global.format == OutputFormat::Json {
        let info = serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "spot_analysis_version": env!("CARGO_PKG_VERSION"),
            "rust_version": env!("CARGO_PKG_RUST_VERSION"),
        });
        if let Ok(text) = serde_json::to_string_pretty(&info) {
            println!("{}", text);
        }
    } else {
        println!("spot-analysis {}", env!("CARGO_PKG_VERSION"));
        println!("schema version: {}", SCHEMA_VERSION);
    }
}
