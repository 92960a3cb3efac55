use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse hardware capability bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    /// Weak or unknown-but-constrained hardware.
    Low,
    /// Default until classification resolves, and the fallback on detection failure.
    #[default]
    Medium,
    /// Discrete-class GPU with ample memory and cores.
    High,
}

impl PerformanceTier {
    /// All tiers, weakest first.
    pub const ALL: [PerformanceTier; 3] = [Self::Low, Self::Medium, Self::High];

    /// Lowercase tier name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw signals reported by a capability source.
///
/// `None` means the runtime did not expose the signal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CapabilityReport {
    /// Device memory in GB.
    pub memory_gb: Option<f64>,
    /// Logical core count.
    pub logical_cores: Option<u32>,
    /// Coarse GPU score `0..=3`.
    pub gpu_score: Option<u8>,
}

/// Memory assumed when the source cannot report it.
pub const DEFAULT_MEMORY_GB: f64 = 2.0;
/// Core count assumed when the source cannot report it.
pub const DEFAULT_LOGICAL_CORES: u32 = 2;

/// Classify a capability report.
///
/// `low` when the GPU score is at most 1, memory is at most 4 GB, or there are at most two cores;
/// `high` only with a GPU score of 3, at least 8 GB and at least four cores; otherwise `medium`.
/// An unknown GPU never qualifies for `high` and never forces `low` on its own.
pub fn classify(report: &CapabilityReport) -> PerformanceTier {
    let memory = report
        .memory_gb
        .filter(|m| m.is_finite() && *m >= 0.0)
        .unwrap_or(DEFAULT_MEMORY_GB);
    let cores = report.logical_cores.unwrap_or(DEFAULT_LOGICAL_CORES);
    let gpu = report.gpu_score.map(|g| g.min(3));

    if gpu.is_some_and(|g| g <= 1) || memory <= 4.0 || cores <= 2 {
        return PerformanceTier::Low;
    }
    if gpu.is_some_and(|g| g >= 3) && memory >= 8.0 && cores >= 4 {
        return PerformanceTier::High;
    }
    PerformanceTier::Medium
}

#[cfg(test)]
#[path = "../../tests/unit/capability/classifier.rs"]
mod tests;
