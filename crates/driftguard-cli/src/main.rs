//! Driftguard CLI
//!
//! Command-line interface for contract drift checks.
//!
//! ## Usage
//!
//! ```bash
//! # Full pipeline: extract, diff, validate
//! driftguard check --before models_old.py --after models.py --contract contract.yaml
//!
//! # Markdown report for CI logs
//! driftguard check --before models_old.py --after models.py \
//!     --contract contract.yaml --format markdown
//!
//! # Just the field diff
//! driftguard diff --before models_old.py --after models.py
//!
//! # Inspect one snapshot or the contract
//! driftguard fields models.py
//! driftguard contract show contract.yaml
//! driftguard contract validate contract.yaml
//! ```
//!
//! ## Exit Codes
//!
//! - 0: No violations
//! - 1: Violations found (fails CI builds)
//! - 2: Error (unreadable input, parse failure)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use driftguard_core::{extract_fields, Change, SchemaIndex, Violation};

/// Driftguard: keep data-model code and API contracts in sync
#[derive(Parser)]
#[command(name = "driftguard")]
#[command(version)]
#[command(about = "Detect drift between data-model code and API contracts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check two snapshots of a module against a contract
    Check {
        /// Path to the module before the change
        #[arg(short, long)]
        before: PathBuf,

        /// Path to the module after the change
        #[arg(short, long)]
        after: PathBuf,

        /// Path to the API contract (YAML or JSON)
        #[arg(short, long)]
        contract: PathBuf,

        /// Report format
        #[arg(short, long, default_value = "text")]
        format: ReportFormat,
    },

    /// Show the field changes between two snapshots
    Diff {
        /// Path to the module before the change
        #[arg(short, long)]
        before: PathBuf,

        /// Path to the module after the change
        #[arg(short, long)]
        after: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: DiffFormat,
    },

    /// List the extracted fields of every class in a module
    Fields {
        /// Path to the module
        path: PathBuf,
    },

    /// Contract management commands
    Contract {
        #[command(subcommand)]
        action: ContractAction,
    },
}

#[derive(Subcommand)]
enum ContractAction {
    /// Validate a contract file
    Validate {
        /// Path to the contract file
        path: PathBuf,
    },

    /// Show contract schemas and their properties
    Show {
        /// Path to the contract file
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Markdown,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum DiffFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    match run() {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            before,
            after,
            contract,
            format,
        } => check_command(before, after, contract, format),

        Commands::Diff {
            before,
            after,
            format,
        } => diff_command(before, after, format),

        Commands::Fields { path } => fields_command(path),

        Commands::Contract { action } => match action {
            ContractAction::Validate { path } => validate_contract(path),
            ContractAction::Show { path } => show_contract(path),
        },
    }
}

/// Load a contract by extension: `.json` via the JSON path, everything
/// else as YAML (steward-style dispatch).
fn load_contract(path: &Path) -> Result<SchemaIndex> {
    let index = if path.extension().map(|e| e == "json").unwrap_or(false) {
        SchemaIndex::from_json_file(path)
    } else {
        SchemaIndex::from_yaml_file(path)
    };
    index.with_context(|| format!("Failed to load contract from {:?}", path))
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read module from {:?}", path))
}

fn check_command(
    before_path: PathBuf,
    after_path: PathBuf,
    contract_path: PathBuf,
    format: ReportFormat,
) -> Result<ExitCode> {
    let index = load_contract(&contract_path)?;
    let before = read_source(&before_path)?;
    let after = read_source(&after_path)?;

    let violations =
        driftguard_core::check(&before, &after, &index).context("Drift check failed")?;

    match format {
        ReportFormat::Text => print_text_report(&violations),
        ReportFormat::Markdown => print_markdown_report(&violations),
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&violations)?;
            println!("{}", json);
        }
    }

    Ok(if violations.is_empty() {
        ExitCode::from(0)
    } else {
        ExitCode::from(1)
    })
}

fn print_text_report(violations: &[Violation]) {
    if violations.is_empty() {
        println!("CLEAN");
        println!();
        println!("No contract violations detected.");
        return;
    }

    println!("VIOLATIONS");
    println!();
    for v in violations {
        println!("  {} {}.{}: {}", v.kind, v.schema, v.field, v.details);
    }
    println!();
    println!("Total: {} violation(s)", violations.len());
}

fn print_markdown_report(violations: &[Violation]) {
    if violations.is_empty() {
        println!("## Driftguard: API contract is VALID");
        println!();
        println!("No architectural violations detected.");
        println!("All code changes are reflected in the API contract.");
        return;
    }

    println!("## Driftguard: architectural violations detected");
    println!();
    println!("**Total violations:** {}", violations.len());
    println!();
    println!("**Details:**");
    println!();
    for (i, v) in violations.iter().enumerate() {
        println!("- **Violation {}:** Field `{}` [{}]", i + 1, v.field, v.kind);
        println!("  - **Schema:** {}", v.schema);
        println!("  - **Issue:** {}", v.details);
        println!();
    }
    println!("**Recommended actions:**");
    println!();
    println!("- Review the changes for API contract consistency");
    println!("- Update the contract to match the code changes");
    println!("- Re-run driftguard after fixing the violations");
}

fn diff_command(before_path: PathBuf, after_path: PathBuf, format: DiffFormat) -> Result<ExitCode> {
    let before_src = read_source(&before_path)?;
    let after_src = read_source(&after_path)?;

    let before = extract_fields(&before_src)
        .with_context(|| format!("Failed to parse {:?}", before_path))?;
    let after = extract_fields(&after_src)
        .with_context(|| format!("Failed to parse {:?}", after_path))?;

    let changes = driftguard_core::diff(&before, &after);

    match format {
        DiffFormat::Text => print_changes(&changes),
        DiffFormat::Json => {
            let json = serde_json::to_string_pretty(&changes)?;
            println!("{}", json);
        }
    }

    Ok(ExitCode::from(0))
}

fn print_changes(changes: &[Change]) {
    if changes.is_empty() {
        println!("No field changes detected.");
        return;
    }

    for change in changes {
        println!("  {} {}.{}", change.kind, change.type_name, change.field);
    }
    println!();
    println!("Total: {} change(s)", changes.len());
}

fn fields_command(path: PathBuf) -> Result<ExitCode> {
    let source = read_source(&path)?;
    let fields = extract_fields(&source).with_context(|| format!("Failed to parse {:?}", path))?;

    if fields.is_empty() {
        println!("No classes found in {:?}", path);
        return Ok(ExitCode::from(0));
    }

    for (class, names) in &fields {
        if names.is_empty() {
            println!("{}: (no fields)", class);
        } else {
            let list: Vec<&str> = names.iter().map(String::as_str).collect();
            println!("{}: {}", class, list.join(", "));
        }
    }

    Ok(ExitCode::from(0))
}

fn validate_contract(path: PathBuf) -> Result<ExitCode> {
    match load_contract(&path) {
        Ok(index) => {
            println!("Contract is valid: {} schema(s)", index.len());
            if index.is_empty() {
                println!();
                println!("Warning: contract declares no schemas; every change will be skipped.");
            }
            Ok(ExitCode::from(0))
        }
        Err(e) => {
            eprintln!("Contract validation failed: {:#}", e);
            Ok(ExitCode::from(1))
        }
    }
}

fn show_contract(path: PathBuf) -> Result<ExitCode> {
    let index = load_contract(&path)?;

    if index.is_empty() {
        println!("No schemas found in {:?}", path);
        return Ok(ExitCode::from(0));
    }

    for (schema, properties) in index.iter() {
        println!("{}: {} properties", schema, properties.len());
        for property in properties {
            println!("  - {}", property);
        }
    }

    Ok(ExitCode::from(0))
}
