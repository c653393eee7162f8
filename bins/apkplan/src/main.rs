//! apkplan CLI
//!
//! Validates Flutter Android build configuration and emits build plans.

use anyhow::Result;
use apkplan_android::{gradle, schema, source, BuildConfigError, RawEntries, SigningRegistry};
use apkplan_cli::output::{self, format_count, format_duration, format_finding, Status};
use apkplan_core::config::{Config, DefaultsConfig};
use apkplan_core::error::{exit_codes, Error, ResultExt};
use apkplan_telemetry::{level_for_verbosity, TelemetryConfig, Timer};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "apkplan")]
#[command(about = "Validate Flutter Android build configuration and emit build plans")]
#[command(version)]
struct Cli {
    /// Tool config file path (defaults to .apkplan.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override a build key (repeatable), e.g. --set minSdk=23
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_override, global = true)]
    overrides: Vec<(String, String)>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate build input, reporting every problem
    Check {
        /// Build input (.properties or .toml)
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Emit the ordered build directives
    Plan {
        /// Build input (.properties or .toml)
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render build.gradle.kts from the build plan
    Render {
        /// Build input (.properties or .toml)
        file: PathBuf,
        /// Write to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List recognized build keys
    Schema {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_override(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, found '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => std::process::exit(report(e, false)),
    };

    apkplan_telemetry::init_with_config(TelemetryConfig {
        log_level: level_for_verbosity(&config.schema.general.log_level, cli.verbose, cli.quiet),
        json: config.schema.general.json_logs,
        show_target: cli.verbose > 1,
    })?;
    tracing::debug!(config = ?config.path, "Tool configuration loaded");

    let registry = SigningRegistry::from_config(&config.schema.signing);
    let defaults = &config.schema.defaults;

    let exit_code = match cli.command {
        Commands::Check { file, json } => {
            run_check(&file, &cli.overrides, defaults, &registry, json, cli.quiet)
        }
        Commands::Plan { file, json } => {
            run_plan(&file, &cli.overrides, defaults, &registry, json, cli.quiet)
        }
        Commands::Render { file, output } => {
            run_render(&file, &cli.overrides, defaults, &registry, output.as_deref(), cli.quiet)
        }
        Commands::Schema { json } => run_schema(json),
    };

    std::process::exit(exit_code);
}

/// Print an error and return the exit code it maps to
///
/// With `json` the error is written to stdout as an
/// [`ErrorReport`](apkplan_core::error::ErrorReport).
fn report(err: impl Into<Error>, json: bool) -> i32 {
    let err = err.into();
    tracing::debug!(code = %err.code, "Command failed");
    match serde_json::to_string_pretty(&err.to_report()) {
        Ok(text) if json => println!("{text}"),
        _ => output::print_error(&err),
    }
    err.exit_code()
}

/// Read the input file and apply `--set` overrides
fn read_input(file: &Path, overrides: &[(String, String)]) -> Result<RawEntries, BuildConfigError> {
    let mut entries = source::read_file(file)?;
    for (key, value) in overrides {
        apkplan_android::apply_override(&mut entries, key, value);
    }
    Ok(entries)
}

fn run_check(
    file: &Path,
    overrides: &[(String, String)],
    defaults: &DefaultsConfig,
    registry: &SigningRegistry,
    json: bool,
    quiet: bool,
) -> i32 {
    apkplan_telemetry::timed_span!("check");
    if !quiet && !json {
        Status::info(&format!("Checking {}", file.display()));
    }

    let config = match read_input(file, overrides).and_then(|e| apkplan_android::load(&e, defaults)) {
        Ok(config) => config,
        Err(e) => return report(e, json),
    };
    let result = apkplan_android::check(&config, registry);

    if json {
        let summary = serde_json::json!({
            "valid": result.is_valid(),
            "config": config,
            "errors": result.errors(),
            "warnings": result.warnings(),
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{text}"),
            Err(e) => return report(e, false),
        }
    } else {
        for error in result.errors() {
            Status::error(&format_finding(error));
        }
        for warning in result.warnings() {
            Status::warning(&warning.to_string());
        }
        if result.is_valid() && !quiet {
            Status::success(&format!(
                "{} is valid ({})",
                config.application_id(),
                format_count(result.warnings().len(), "warning", "warnings")
            ));
        }
    }

    if result.is_valid() {
        exit_codes::SUCCESS
    } else {
        if !json {
            Status::error(&format!(
                "{} found",
                format_count(result.errors().len(), "problem", "problems")
            ));
        }
        exit_codes::VALIDATION_ERROR
    }
}

fn run_plan(
    file: &Path,
    overrides: &[(String, String)],
    defaults: &DefaultsConfig,
    registry: &SigningRegistry,
    json: bool,
    quiet: bool,
) -> i32 {
    let timer = Timer::start("plan");
    let plan = match read_input(file, overrides)
        .and_then(|e| apkplan_android::plan(&e, defaults, registry))
    {
        Ok(plan) => plan,
        Err(e) => return report(e, json),
    };
    let elapsed = timer.stop();

    if json {
        return match serde_json::to_string_pretty(&plan) {
            Ok(text) => {
                println!("{text}");
                exit_codes::SUCCESS
            }
            Err(e) => report(e, false),
        };
    }

    if !quiet {
        Status::header(&format!("Build plan for {}", file.display()));
    }
    let total = plan.len();
    for (index, directive) in plan.directives().iter().enumerate() {
        Status::step(index + 1, total, &directive.to_string());
    }
    if !quiet {
        println!();
        Status::success(&format!(
            "{} in {}",
            format_count(total, "directive", "directives"),
            format_duration(elapsed).dimmed()
        ));
    }

    exit_codes::SUCCESS
}

fn run_render(
    file: &Path,
    overrides: &[(String, String)],
    defaults: &DefaultsConfig,
    registry: &SigningRegistry,
    output: Option<&Path>,
    quiet: bool,
) -> i32 {
    let plan = match read_input(file, overrides)
        .and_then(|e| apkplan_android::plan(&e, defaults, registry))
    {
        Ok(plan) => plan,
        Err(e) => return report(e, false),
    };
    let script = gradle::render_gradle_kts(&plan);

    match output {
        Some(path) => {
            let written = std::fs::write(path, &script)
                .map_err(Error::from)
                .context(format!("Writing {}", path.display()));
            if let Err(e) = written {
                return report(e, false);
            }
            if !quiet {
                Status::success(&format!("Wrote {}", path.display()));
            }
        }
        None => print!("{script}"),
    }

    exit_codes::SUCCESS
}

fn run_schema(json: bool) -> i32 {
    if json {
        return match serde_json::to_string_pretty(schema::fields()) {
            Ok(text) => {
                println!("{text}");
                exit_codes::SUCCESS
            }
            Err(e) => report(e, false),
        };
    }

    let width = schema::fields()
        .iter()
        .map(|spec| spec.key.len())
        .max()
        .unwrap_or(0);

    for spec in schema::fields() {
        let required = if spec.required { " (required)" } else { "" };
        println!(
            "{:<width$}  {:<9}  {}{}",
            spec.key.bold(),
            spec.ty.to_string(),
            spec.description,
            required.yellow()
        );
        if !spec.aliases.is_empty() {
            println!(
                "{:<width$}  {:<9}  {}",
                "",
                "",
                format!("alias: {}", spec.aliases.join(", ")).dimmed()
            );
        }
    }

    exit_codes::SUCCESS
}
