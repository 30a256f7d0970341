//! Fixed-length normalized feature vector consumed by the scorer.
//!
//! Each raw field is divided by a fixed ceiling and clamped into [0, 1].
//! Memory and core count are compared on a log2 scale, since a calculator and
//! a server differ by seven orders of magnitude in memory.

use super::hardware::HardwareFeatures;

/// Number of features in the vector
pub const FEATURE_COUNT: usize = 15;

/// Normalized feature vector
pub type FeatureVector = [f32; FEATURE_COUNT];

/// Positions of each feature in the vector
pub mod index {
    pub const CLOCK: usize = 0;
    pub const MEMORY: usize = 1;
    pub const ARCHITECTURE: usize = 2;
    pub const WORD_WIDTH: usize = 3;
    pub const FPU: usize = 4;
    pub const MMU: usize = 5;
    pub const CACHE_PRESENT: usize = 6;
    pub const GRAPHICS: usize = 7;
    pub const NETWORKING: usize = 8;
    pub const POWER_MANAGEMENT: usize = 9;
    pub const QUANTUM_COPROCESSOR: usize = 10;
    pub const CRYO_CONTROLLER: usize = 11;
    pub const CACHE_SIZE: usize = 12;
    pub const CORES: usize = 13;
    pub const BOOT_METHOD: usize = 14;
}

pub const CLOCK_CEILING_MHZ: f64 = 5000.0;
/// 64 GB
pub const MEMORY_CEILING_KB: f64 = 64.0 * 1024.0 * 1024.0;
pub const ARCHITECTURE_CEILING: f64 = 3.0;
pub const WORD_WIDTH_CEILING: f64 = 64.0;
pub const CACHE_CEILING_KB: f64 = 65536.0;
pub const CORE_CEILING: f64 = 64.0;
pub const BOOT_METHOD_CEILING: f64 = 4.0;

fn scaled(raw: f64, ceiling: f64) -> f32 {
    (raw / ceiling).clamp(0.0, 1.0) as f32
}

/// `log2(1 + raw)` against `log2(1 + ceiling)`
fn log_scaled(raw: f64, ceiling: f64) -> f32 {
    scaled((1.0 + raw).log2(), (1.0 + ceiling).log2())
}

/// One core maps to zero, `CORE_CEILING` cores to one
fn core_scaled(cores: u32) -> f32 {
    scaled(f64::from(cores.max(1)).log2(), CORE_CEILING.log2())
}

fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

impl HardwareFeatures {
    /// Encode these features for the scorer
    pub fn to_vector(&self) -> FeatureVector {
        let mut v = [0.0; FEATURE_COUNT];
        v[index::CLOCK] = scaled(self.clock_mhz as f64, CLOCK_CEILING_MHZ);
        v[index::MEMORY] = log_scaled(self.memory_kb as f64, MEMORY_CEILING_KB);
        v[index::ARCHITECTURE] = scaled(self.architecture.ordinal() as f64, ARCHITECTURE_CEILING);
        v[index::WORD_WIDTH] = scaled(self.word_width as f64, WORD_WIDTH_CEILING);
        v[index::FPU] = flag(self.has_fpu);
        v[index::MMU] = flag(self.has_mmu);
        v[index::CACHE_PRESENT] = flag(self.has_cache);
        v[index::GRAPHICS] = flag(self.has_graphics);
        v[index::NETWORKING] = flag(self.has_networking);
        v[index::POWER_MANAGEMENT] = flag(self.has_power_management);
        v[index::QUANTUM_COPROCESSOR] = flag(self.quantum_coprocessor);
        v[index::CRYO_CONTROLLER] = flag(self.cryo_controller);
        v[index::CACHE_SIZE] = scaled(self.cache_kb as f64, CACHE_CEILING_KB);
        v[index::CORES] = core_scaled(self.cores);
        v[index::BOOT_METHOD] = scaled(self.boot_method.ordinal() as f64, BOOT_METHOD_CEILING);
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{Architecture, BootMethod};

    #[test]
    fn test_default_vector_in_unit_range() {
        let v = HardwareFeatures::default().to_vector();
        assert!(v.iter().all(|x| (0.0..=1.0).contains(x)));
        assert_eq!(v[index::WORD_WIDTH], 0.125);
        assert_eq!(v[index::ARCHITECTURE], 1.0);
    }

    #[test]
    fn test_ceilings_clamp() {
        let features = HardwareFeatures {
            clock_mhz: 50_000,
            memory_kb: u64::MAX,
            cores: 4096,
            cache_kb: u32::MAX,
            ..Default::default()
        };
        let v = features.to_vector();
        assert_eq!(v[index::CLOCK], 1.0);
        assert_eq!(v[index::MEMORY], 1.0);
        assert_eq!(v[index::CORES], 1.0);
        assert_eq!(v[index::CACHE_SIZE], 1.0);
    }

    #[test]
    fn test_memory_and_cores_are_log_scaled() {
        let gigabyte = HardwareFeatures {
            memory_kb: 1 << 20,
            cores: 8,
            ..Default::default()
        };
        let v = gigabyte.to_vector();
        assert!((v[index::MEMORY] - 20.0 / 26.0).abs() < 1e-4);
        assert!((v[index::CORES] - 0.5).abs() < 1e-6);

        let single = HardwareFeatures {
            cores: 1,
            ..Default::default()
        };
        assert_eq!(single.to_vector()[index::CORES], 0.0);

        let none = HardwareFeatures {
            memory_kb: 0,
            cores: 0,
            ..Default::default()
        };
        assert_eq!(none.to_vector()[index::MEMORY], 0.0);
        assert_eq!(none.to_vector()[index::CORES], 0.0);
    }

    #[test]
    fn test_architecture_and_boot_ordinals() {
        let features = HardwareFeatures {
            architecture: Architecture::X86,
            boot_method: BootMethod::Rom,
            ..Default::default()
        };
        let v = features.to_vector();
        assert_eq!(v[index::ARCHITECTURE], 0.0);
        assert_eq!(v[index::BOOT_METHOD], 0.0);

        let features = HardwareFeatures {
            architecture: Architecture::RiscV,
            boot_method: BootMethod::Uefi,
            ..Default::default()
        };
        let v = features.to_vector();
        assert!((v[index::ARCHITECTURE] - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(v[index::BOOT_METHOD], 0.5);
    }

    #[test]
    fn test_flags_map_to_one() {
        let features = HardwareFeatures {
            has_fpu: true,
            quantum_coprocessor: true,
            ..Default::default()
        };
        let v = features.to_vector();
        assert_eq!(v[index::FPU], 1.0);
        assert_eq!(v[index::QUANTUM_COPROCESSOR], 1.0);
        assert_eq!(v[index::CRYO_CONTROLLER], 0.0);
    }
}
