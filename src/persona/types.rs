//! Core persona types.
//!
//! A persona is the operating profile a device boots into. Personas are
//! ordered by capability tier; the tier order is what the constraint policy
//! compares against.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of personas in the closed enumeration.
pub const PERSONA_COUNT: usize = 9;

// ─────────────────────────────────────────────────────────────────
// Persona
// ─────────────────────────────────────────────────────────────────

/// Hardware personas, from the smallest device to the specialized tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Persona {
    /// 1KB calculator-class device.
    Calculator,
    /// Microcontroller with a few dozen KB of RAM.
    Embedded,
    /// 16-bit x86 PC.
    Retro,
    /// 32-bit x86 PC with protected mode.
    Classic,
    /// 64-bit ARM system.
    Arm64,
    /// RISC-V system.
    RiscV,
    /// 64-bit x86 desktop.
    Workstation,
    /// Many-core server-class machine.
    Server,
    /// Requires both a quantum coprocessor and a cryogenic controller.
    Quantum,
}

impl Persona {
    /// All personas in tier order.
    pub fn all() -> &'static [Persona; PERSONA_COUNT] {
        &[
            Persona::Calculator,
            Persona::Embedded,
            Persona::Retro,
            Persona::Classic,
            Persona::Arm64,
            Persona::RiscV,
            Persona::Workstation,
            Persona::Server,
            Persona::Quantum,
        ]
    }

    /// Persona id; equal to the capability tier and the scorer output index.
    pub fn id(&self) -> u8 {
        *self as u8
    }

    /// Capability tier used for constraint comparisons.
    pub fn tier(&self) -> u8 {
        self.id()
    }

    /// Index into score arrays.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Look up a persona by id.
    pub fn from_id(id: u8) -> Option<Persona> {
        Persona::all().get(id as usize).copied()
    }

    /// Slug used in config files and CLI args.
    pub fn slug(&self) -> &'static str {
        match self {
            Persona::Calculator => "calculator",
            Persona::Embedded => "embedded",
            Persona::Retro => "retro",
            Persona::Classic => "classic",
            Persona::Arm64 => "arm64",
            Persona::RiscV => "riscv",
            Persona::Workstation => "workstation",
            Persona::Server => "server",
            Persona::Quantum => "quantum",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Persona::Calculator => "Calculator",
            Persona::Embedded => "Embedded",
            Persona::Retro => "Retro PC",
            Persona::Classic => "Classic PC",
            Persona::Arm64 => "ARM64",
            Persona::RiscV => "RISC-V",
            Persona::Workstation => "Workstation",
            Persona::Server => "Server",
            Persona::Quantum => "Quantum",
        }
    }

    /// Short description of the hardware this persona targets.
    pub fn description(&self) -> &'static str {
        match self {
            Persona::Calculator => "1KB calculator-class device, 8-bit, no MMU",
            Persona::Embedded => "Microcontroller, up to 64KB RAM",
            Persona::Retro => "16-bit x86 PC, real mode, up to 1MB RAM",
            Persona::Classic => "32-bit x86 PC with MMU and protected mode",
            Persona::Arm64 => "64-bit ARM board or laptop",
            Persona::RiscV => "RISC-V board",
            Persona::Workstation => "Multi-core x86 desktop with a gigabyte or more of memory",
            Persona::Server => "Many-core server-class machine",
            Persona::Quantum => "Quantum coprocessor with cryogenic control",
        }
    }

    /// Personas that only run on x86 hardware.
    pub fn is_x86_specific(&self) -> bool {
        matches!(self, Persona::Retro | Persona::Classic | Persona::Workstation)
    }

    /// Everything except the specialized tier.
    pub fn is_general_purpose(&self) -> bool {
        !matches!(self, Persona::Quantum)
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Persona {
    type Err = String;

    /// Accepts a slug (case-insensitive) or a numeric persona id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        if let Ok(id) = needle.parse::<u8>() {
            return Persona::from_id(id).ok_or_else(|| {
                format!("Unknown persona id {}. Valid ids: 0-{}", id, PERSONA_COUNT - 1)
            });
        }
        match needle.as_str() {
            "calculator" => Ok(Persona::Calculator),
            "embedded" => Ok(Persona::Embedded),
            "retro" => Ok(Persona::Retro),
            "classic" => Ok(Persona::Classic),
            "arm64" | "arm" => Ok(Persona::Arm64),
            "riscv" | "risc-v" => Ok(Persona::RiscV),
            "workstation" => Ok(Persona::Workstation),
            "server" => Ok(Persona::Server),
            "quantum" => Ok(Persona::Quantum),
            _ => Err(format!(
                "Unknown persona '{}'. Valid: {}",
                s,
                Persona::all()
                    .iter()
                    .map(|p| p.slug())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Preference
// ─────────────────────────────────────────────────────────────────

/// Explicit user preference carried with the hardware features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preference {
    /// Let the engine decide.
    #[default]
    Auto,
    /// Boot as this persona regardless of hardware.
    Persona(Persona),
}

impl Preference {
    /// The preferred persona, if one was given.
    pub fn persona(&self) -> Option<Persona> {
        match self {
            Preference::Auto => None,
            Preference::Persona(p) => Some(*p),
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preference::Auto => write!(f, "auto"),
            Preference::Persona(p) => write!(f, "{}", p.slug()),
        }
    }
}

impl FromStr for Preference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") || s.trim().is_empty() {
            return Ok(Preference::Auto);
        }
        s.parse::<Persona>().map(Preference::Persona)
    }
}
