//! Persona CLI - inspect personas and draw decorations
//!
//! Commands: list, show, pick, check
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 when the requested persona does not exist

use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};
use std::path::PathBuf;
use std::process::ExitCode;

use persona_core::{BuildResult, PersonaRegistry, ReloadOutcome};

#[derive(Parser)]
#[command(name = "persona-cli")]
#[command(about = "Persona CLI - themed decorations for build outcomes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding one sub-directory per persona
    #[arg(short, long, default_value = "personas")]
    personas_dir: PathBuf,

    /// Prefix under which persona images are served
    #[arg(long, default_value = "/plugin/persona/personas")]
    path_prefix: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List available personas
    List,

    /// Show everything loaded for a persona
    Show {
        /// Persona ID
        #[arg(short, long)]
        persona: String,
    },

    /// Draw an icon, image and quote
    Pick {
        /// Persona ID
        #[arg(short, long)]
        persona: String,

        /// Build result (success, unstable, failure, not_built, aborted)
        #[arg(short, long)]
        result: Option<String>,
    },

    /// Reload every persona and report what changed
    Check,
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn main() -> ExitCode {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let registry = match PersonaRegistry::load_from_dir(&cli.personas_dir, &cli.path_prefix) {
        Ok(r) => r,
        Err(e) => {
            print_json(&serde_json::json!({
                "error": format!("Failed to load personas: {}", e),
            }));
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::List => {
            let personas: Vec<_> = registry
                .list()
                .iter()
                .map(|p| serde_json::json!({
                    "id": p.id(),
                    "displayName": p.display_name(),
                    "icon": p.icon(),
                }))
                .collect();

            print_json(&serde_json::Value::Array(personas));
            ExitCode::SUCCESS
        }

        Commands::Show { persona } => {
            let Some(p) = registry.get(&persona) else {
                print_json(&serde_json::json!({ "error": format!("Persona not found: {}", persona) }));
                return ExitCode::from(2);
            };

            let snapshot = p.snapshot();
            print_json(&serde_json::json!({
                "id": p.id(),
                "document": p.document().display().to_string(),
                "snapshot": &*snapshot,
            }));
            ExitCode::SUCCESS
        }

        Commands::Pick { persona, result } => {
            let result = match result.as_deref().map(str::parse::<BuildResult>).transpose() {
                Ok(r) => r,
                Err(e) => {
                    print_json(&serde_json::json!({ "error": e }));
                    return ExitCode::FAILURE;
                }
            };

            let Some(p) = registry.get(&persona) else {
                print_json(&serde_json::json!({ "error": format!("Persona not found: {}", persona) }));
                return ExitCode::from(2);
            };

            let (decoration, quote) = p.decorate(result);
            print_json(&serde_json::json!({
                "persona": p.id(),
                "category": result.map(BuildResult::category),
                "icon": decoration.icon,
                "image": decoration.image,
                "quote": quote,
            }));
            ExitCode::SUCCESS
        }

        Commands::Check => {
            let outcomes = registry.reload_all();
            let failed = outcomes
                .iter()
                .any(|o| matches!(o, ReloadOutcome::Failed { .. }));

            print_json(&serde_json::json!({ "personas": outcomes }));
            if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}
