//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for the persona engine.

use clap::{Args, Parser, Subcommand};

use crate::features::ProbeData;
use crate::persona::Persona;

/// Persona Engine - pick the operating persona a device should boot as
///
/// Scores hardware features against the persona set, applies hardware
/// constraints, and learns from reported outcomes. State is kept in a JSON
/// file between runs.
#[derive(Parser, Debug)]
#[command(name = "persona-engine")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "PERSONA_ENGINE_CONFIG")]
    pub config: Option<String>,

    /// Engine state file (overrides [storage] state_file)
    #[arg(long, global = true)]
    pub state: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recommend a persona for this host or for described hardware
    Recommend {
        #[command(flatten)]
        hardware: HardwareArgs,

        /// Boot as this persona regardless of hardware (slug or id, or "auto")
        #[arg(long)]
        prefer: Option<String>,

        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report how the last recommendation worked out
    Feedback {
        /// Satisfaction with the persona, 0.0 to 1.0
        #[arg(short, long)]
        satisfaction: f32,

        /// Performance figure observed while running the persona
        #[arg(short, long, default_value = "0")]
        performance: u32,

        /// Persona that actually ran (defaults to the last recommendation)
        #[arg(long)]
        persona: Option<Persona>,

        /// Retrain for this many epochs after recording
        #[arg(long)]
        train: Option<u32>,
    },

    /// Retrain the scorer on recorded feedback
    Train {
        /// Number of passes over the stored samples
        #[arg(short, long, default_value = "10")]
        epochs: u32,
    },

    /// Show engine statistics
    Stats {
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the persona set
    Personas,

    /// Discard learned state and start from fresh parameters
    Reset,

    /// Display version and build information
    Version,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Hardware description for `recommend`
///
/// Without `--probe` or any field flag, the running host is probed. Field
/// flags override whatever the probe file or host probe reported.
#[derive(Args, Debug, Clone, Default)]
pub struct HardwareArgs {
    /// JSON file with probe data
    #[arg(long)]
    pub probe: Option<String>,

    /// Start from the host probe even when field flags are given
    #[arg(long)]
    pub host: bool,

    /// CPU clock speed in MHz
    #[arg(long)]
    pub clock_mhz: Option<u32>,

    /// Memory size in KB
    #[arg(long)]
    pub memory_kb: Option<u64>,

    /// Architecture: x86, arm, riscv, other
    #[arg(long)]
    pub arch: Option<String>,

    /// Native word width in bits: 4, 8, 16, 32, 64
    #[arg(long)]
    pub word_width: Option<u8>,

    /// Cache size in KB
    #[arg(long)]
    pub cache_kb: Option<u32>,

    /// Number of cores
    #[arg(long)]
    pub cores: Option<u32>,

    /// Boot method: rom, bios, uefi, network
    #[arg(long)]
    pub boot: Option<String>,

    #[arg(long)]
    pub fpu: bool,

    #[arg(long)]
    pub mmu: bool,

    #[arg(long)]
    pub cache: bool,

    #[arg(long)]
    pub graphics: bool,

    #[arg(long)]
    pub networking: bool,

    #[arg(long)]
    pub power_management: bool,

    #[arg(long)]
    pub quantum_coprocessor: bool,

    #[arg(long)]
    pub cryo_controller: bool,
}

impl HardwareArgs {
    /// Any field flag given
    pub fn has_overrides(&self) -> bool {
        self.clock_mhz.is_some()
            || self.memory_kb.is_some()
            || self.arch.is_some()
            || self.word_width.is_some()
            || self.cache_kb.is_some()
            || self.cores.is_some()
            || self.boot.is_some()
            || self.fpu
            || self.mmu
            || self.cache
            || self.graphics
            || self.networking
            || self.power_management
            || self.quantum_coprocessor
            || self.cryo_controller
    }

    /// Layer the field flags over a base probe
    pub fn apply_to(&self, mut probe: ProbeData) -> ProbeData {
        fn set<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                *slot = value.clone();
            }
        }
        fn flag(slot: &mut Option<bool>, value: bool) {
            if value {
                *slot = Some(true);
            }
        }

        set(&mut probe.clock_mhz, &self.clock_mhz);
        set(&mut probe.memory_kb, &self.memory_kb);
        set(&mut probe.architecture, &self.arch);
        set(&mut probe.word_width, &self.word_width);
        set(&mut probe.cache_kb, &self.cache_kb);
        set(&mut probe.cores, &self.cores);
        set(&mut probe.boot_method, &self.boot);
        flag(&mut probe.has_fpu, self.fpu);
        flag(&mut probe.has_mmu, self.mmu);
        flag(&mut probe.has_cache, self.cache);
        flag(&mut probe.has_graphics, self.graphics);
        flag(&mut probe.has_networking, self.networking);
        flag(&mut probe.has_power_management, self.power_management);
        flag(&mut probe.quantum_coprocessor, self.quantum_coprocessor);
        flag(&mut probe.cryo_controller, self.cryo_controller);
        probe
    }
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the effective configuration
    Show,

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the configuration
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_recommend_defaults() {
        let cli = Cli::parse_from(["persona-engine", "recommend"]);
        match cli.command {
            Commands::Recommend {
                hardware,
                prefer,
                json,
            } => {
                assert!(hardware.probe.is_none());
                assert!(!hardware.has_overrides());
                assert!(prefer.is_none());
                assert!(!json);
            }
            _ => panic!("Expected Recommend command"),
        }
    }

    #[test]
    fn test_recommend_with_hardware() {
        let cli = Cli::parse_from([
            "persona-engine",
            "recommend",
            "--memory-kb",
            "640",
            "--arch",
            "x86",
            "--word-width",
            "16",
            "--fpu",
        ]);
        match cli.command {
            Commands::Recommend { hardware, .. } => {
                assert!(hardware.has_overrides());
                let probe = hardware.apply_to(ProbeData::default());
                assert_eq!(probe.memory_kb, Some(640));
                assert_eq!(probe.architecture.as_deref(), Some("x86"));
                assert_eq!(probe.has_fpu, Some(true));
                assert_eq!(probe.has_mmu, None);
            }
            _ => panic!("Expected Recommend command"),
        }
    }

    #[test]
    fn test_feedback_command() {
        let cli = Cli::parse_from([
            "persona-engine",
            "feedback",
            "--satisfaction",
            "0.8",
            "--persona",
            "server",
            "--train",
            "5",
        ]);
        match cli.command {
            Commands::Feedback {
                satisfaction,
                performance,
                persona,
                train,
            } => {
                assert_eq!(satisfaction, 0.8);
                assert_eq!(performance, 0);
                assert_eq!(persona, Some(Persona::Server));
                assert_eq!(train, Some(5));
            }
            _ => panic!("Expected Feedback command"),
        }
    }

    #[test]
    fn test_feedback_rejects_unknown_persona() {
        let result = Cli::try_parse_from([
            "persona-engine",
            "feedback",
            "--satisfaction",
            "0.8",
            "--persona",
            "mainframe",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_train_defaults() {
        let cli = Cli::parse_from(["persona-engine", "train"]);
        match cli.command {
            Commands::Train { epochs } => assert_eq!(epochs, 10),
            _ => panic!("Expected Train command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "persona-engine",
            "stats",
            "-vv",
            "--state",
            "/tmp/state.json",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.state.as_deref(), Some("/tmp/state.json"));
        assert!(matches!(cli.command, Commands::Stats { json: false }));
    }

    #[test]
    fn test_config_init() {
        let cli = Cli::parse_from(["persona-engine", "config", "init", "--force"]);
        match cli.command {
            Commands::Config {
                subcommand: ConfigSubcommand::Init { path, force },
            } => {
                assert!(path.is_none());
                assert!(force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }
}
