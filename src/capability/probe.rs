use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc;

use anyhow::Context as _;

use crate::capability::classifier::{CapabilityReport, PerformanceTier, classify};
use crate::foundation::error::{BlobscapeError, BlobscapeResult};

/// Runtime introspection that reports raw hardware signals.
pub trait CapabilitySource: Send + 'static {
    /// Report whatever signals are available. Errors degrade classification to `medium`.
    fn report(&self) -> anyhow::Result<CapabilityReport>;
}

/// Reports a fixed set of signals.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCapabilitySource(pub CapabilityReport);

impl CapabilitySource for StaticCapabilitySource {
    fn report(&self) -> anyhow::Result<CapabilityReport> {
        Ok(self.0)
    }
}

/// Reads the host's logical core count and, on Linux, total memory from `/proc/meminfo`.
///
/// The GPU score is never known to this source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCapabilitySource;

impl CapabilitySource for SystemCapabilitySource {
    fn report(&self) -> anyhow::Result<CapabilityReport> {
        let logical_cores = std::thread::available_parallelism()
            .ok()
            .and_then(|n| u32::try_from(n.get()).ok());
        let memory_gb = match std::fs::read_to_string("/proc/meminfo") {
            Ok(text) => Some(parse_meminfo_total_gb(&text).context("parse /proc/meminfo")?),
            Err(_) => None,
        };
        Ok(CapabilityReport {
            memory_gb,
            logical_cores,
            gpu_score: None,
        })
    }
}

fn parse_meminfo_total_gb(text: &str) -> anyhow::Result<f64> {
    let line = text
        .lines()
        .find(|l| l.starts_with("MemTotal:"))
        .context("MemTotal line missing")?;
    let kb: f64 = line
        .trim_start_matches("MemTotal:")
        .trim()
        .trim_end_matches("kB")
        .trim()
        .parse()
        .context("MemTotal is not a number")?;
    Ok(kb / (1024.0 * 1024.0))
}

/// Classify `source`, turning a reported error or a panic into [`BlobscapeError::Capability`].
pub(crate) fn try_detect_tier(source: &dyn CapabilitySource) -> BlobscapeResult<PerformanceTier> {
    match catch_unwind(AssertUnwindSafe(|| source.report())) {
        Ok(Ok(report)) => {
            let tier = classify(&report);
            tracing::debug!(?report, %tier, "classified host capabilities");
            Ok(tier)
        }
        Ok(Err(err)) => Err(BlobscapeError::capability(format!("{err:#}"))),
        Err(_) => Err(BlobscapeError::capability("capability source panicked")),
    }
}

/// Classify `source`, containing any error or panic as `medium`.
pub fn detect_tier(source: &dyn CapabilitySource) -> PerformanceTier {
    try_detect_tier(source).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "using medium tier");
        PerformanceTier::Medium
    })
}

/// A capability classification running off the render path.
///
/// The scheduler polls it once per frame; it never blocks.
#[derive(Debug)]
pub struct CapabilityProbe {
    rx: Option<mpsc::Receiver<PerformanceTier>>,
    ready: Option<PerformanceTier>,
}

impl CapabilityProbe {
    /// Run `source` on a helper thread.
    pub fn spawn<S: CapabilitySource>(source: S) -> Self {
        let (tx, rx) = mpsc::channel();
        let spawned = std::thread::Builder::new()
            .name("blobscape-capability".to_owned())
            .spawn(move || {
                // The receiver may already be gone after teardown.
                let _ = tx.send(detect_tier(&source));
            });
        match spawned {
            Ok(_) => Self {
                rx: Some(rx),
                ready: None,
            },
            Err(err) => {
                tracing::warn!(error = %err, "could not spawn capability probe; using medium tier");
                Self::resolved(PerformanceTier::Medium)
            }
        }
    }

    /// A probe that resolves to `tier` on the first poll.
    pub fn resolved(tier: PerformanceTier) -> Self {
        Self {
            rx: None,
            ready: Some(tier),
        }
    }

    /// Return the tier exactly once, on the first poll after classification finished.
    pub fn poll(&mut self) -> Option<PerformanceTier> {
        if let Some(tier) = self.ready.take() {
            return Some(tier);
        }
        let rx = self.rx.as_ref()?;
        match rx.try_recv() {
            Ok(tier) => {
                self.rx = None;
                Some(tier)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                tracing::warn!("capability probe exited without a result; using medium tier");
                self.rx = None;
                Some(PerformanceTier::Medium)
            }
        }
    }

    /// Return `true` while a result is still outstanding.
    pub fn is_pending(&self) -> bool {
        self.rx.is_some() || self.ready.is_some()
    }

    /// Stop listening for a result.
    pub fn cancel(&mut self) {
        self.rx = None;
        self.ready = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capability/probe.rs"]
mod tests;
