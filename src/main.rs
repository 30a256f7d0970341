//! Persona Engine CLI
//!
//! Loads engine state from the configured state file, runs one command
//! against it and writes the state back.

use std::path::Path;

use clap::Parser;
use tracing::{debug, error};

use persona_engine::cli::{Cli, Commands, ConfigSubcommand, HardwareArgs};
use persona_engine::config::{self, EngineConfig};
use persona_engine::engine::PersonaEngine;
use persona_engine::error::{Error, Result};
use persona_engine::features::{detect_or_accept_features, HardwareFeatures, ProbeData};
use persona_engine::logging::{self, LogGuards};
use persona_engine::persona::{Persona, Preference};
use persona_engine::version;

fn main() {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e.format_for_log());
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    // Commands that need neither config nor state
    match &cli.command {
        Commands::Version => {
            print!("{}", version::build_info());
            return Ok(());
        }
        Commands::Personas => {
            print_personas();
            return Ok(());
        }
        Commands::Config { subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            return handle_config_command(subcommand, cli.config.as_deref());
        }
        _ => {}
    }

    let mut config = EngineConfig::load(cli.config.as_deref())?;
    if let Some(ref state) = cli.state {
        config.storage.state_file = state.clone();
    }

    // The guards must be kept alive for the lifetime of the program
    let _log_guards: LogGuards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    let build = version::build_info();
    debug!(version = %build.full_version(), "Starting persona-engine");

    let state_path = config.state_path();
    match cli.command {
        Commands::Recommend {
            hardware,
            prefer,
            json,
        } => {
            let features = resolve_features(&hardware, prefer.as_deref())?;
            let mut engine = PersonaEngine::load_or_initialize(&config.engine, &state_path)?;
            let decision = engine.recommend(&features)?;
            engine.save(&state_path)?;

            if json {
                println!("{}", to_json(&decision)?);
            } else {
                println!("{}", decision);
            }
        }
        Commands::Feedback {
            satisfaction,
            performance,
            persona,
            train,
        } => {
            let mut engine = PersonaEngine::load_or_initialize(&config.engine, &state_path)?;
            let last = engine.statistics().last.ok_or_else(|| {
                Error::invalid_input(
                    "no recommendation recorded yet; run 'persona-engine recommend' first",
                )
            })?;
            let persona = persona.unwrap_or(last.persona);

            engine.record_feedback(&last.features, persona, satisfaction, performance)?;
            if let Some(epochs) = train {
                engine.train(epochs)?;
            }
            engine.save(&state_path)?;

            let stats = engine.statistics();
            println!(
                "Feedback recorded for {} ({} samples stored)",
                persona, stats.training_samples
            );
            if let Some(epochs) = train {
                println!("Trained {} epochs", epochs);
            }
        }
        Commands::Train { epochs } => {
            let mut engine = PersonaEngine::load_or_initialize(&config.engine, &state_path)?;
            engine.train(epochs)?;
            engine.save(&state_path)?;

            let stats = engine.statistics();
            println!(
                "Trained {} epochs on {} samples ({} epochs total)",
                epochs, stats.training_samples, stats.trained_epochs
            );
        }
        Commands::Stats { json } => {
            let engine = PersonaEngine::load_or_initialize(&config.engine, &state_path)?;
            let stats = engine.statistics();
            if json {
                println!("{}", to_json(&stats)?);
            } else {
                println!("{}", stats);
            }
        }
        Commands::Reset => {
            let engine = PersonaEngine::initialize(&config.engine);
            engine.save(&state_path)?;
            println!("Engine state reset: {}", state_path.display());
        }
        Commands::Version | Commands::Personas | Commands::Config { .. } => {
            // Already handled above
        }
    }

    Ok(())
}

/// Build the hardware description for `recommend`
fn resolve_features(hardware: &HardwareArgs, prefer: Option<&str>) -> Result<HardwareFeatures> {
    let base = match hardware.probe {
        Some(ref path) => Some(ProbeData::load(Path::new(path))?),
        None if hardware.host => Some(ProbeData::detect()),
        None if hardware.has_overrides() => Some(ProbeData::default()),
        None => None,
    };
    let probe = base.map(|p| hardware.apply_to(p));
    let mut features = detect_or_accept_features(probe.as_ref());

    if let Some(text) = prefer {
        features.preference = text
            .parse::<Preference>()
            .map_err(|e| Error::invalid_input(e))?;
    }
    Ok(features)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Error::Internal(format!("Failed to encode output: {}", e)))
}

fn print_personas() {
    println!("{:<4}{:<14}{:<14}DESCRIPTION", "ID", "SLUG", "NAME");
    for persona in Persona::all() {
        println!(
            "{:<4}{:<14}{:<14}{}",
            persona.id(),
            persona.slug(),
            persona.display_name(),
            persona.description()
        );
    }
}

fn handle_config_command(subcommand: &ConfigSubcommand, config_path: Option<&str>) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show => {
            let cfg = EngineConfig::load(config_path)?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let written = config::init_config(path.as_deref(), *force)?;
            println!("Configuration file created: {}", written.display());
        }
        ConfigSubcommand::Validate => {
            EngineConfig::load(config_path)?;
            println!("Configuration is valid.");
        }
    }

    Ok(())
}
