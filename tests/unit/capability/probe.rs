use super::*;
use std::time::{Duration, Instant};

struct FailingSource;

impl CapabilitySource for FailingSource {
    fn report(&self) -> anyhow::Result<CapabilityReport> {
        anyhow::bail!("memory size unavailable")
    }
}

struct PanickingSource;

impl CapabilitySource for PanickingSource {
    fn report(&self) -> anyhow::Result<CapabilityReport> {
        panic!("probe exploded")
    }
}

fn strong() -> StaticCapabilitySource {
    StaticCapabilitySource(CapabilityReport {
        memory_gb: Some(16.0),
        logical_cores: Some(8),
        gpu_score: Some(3),
    })
}

fn wait_for(probe: &mut CapabilityProbe) -> PerformanceTier {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(t) = probe.poll() {
            return t;
        }
        assert!(Instant::now() < deadline, "probe never resolved");
        std::thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn failures_degrade_to_medium() {
    assert_eq!(detect_tier(&FailingSource), PerformanceTier::Medium);
    assert_eq!(detect_tier(&PanickingSource), PerformanceTier::Medium);
}

#[test]
fn failures_are_capability_errors() {
    let err = try_detect_tier(&FailingSource).unwrap_err();
    assert!(matches!(&err, BlobscapeError::Capability(msg) if msg.contains("memory size")));
    assert!(matches!(
        try_detect_tier(&PanickingSource),
        Err(BlobscapeError::Capability(_))
    ));
    assert_eq!(try_detect_tier(&strong()).unwrap(), PerformanceTier::High);
}

#[test]
fn spawned_probe_resolves_once() {
    let mut probe = CapabilityProbe::spawn(strong());
    assert_eq!(wait_for(&mut probe), PerformanceTier::High);
    assert_eq!(probe.poll(), None);
    assert!(!probe.is_pending());
}

#[test]
fn resolved_probe_and_cancel() {
    let mut probe = CapabilityProbe::resolved(PerformanceTier::Low);
    assert!(probe.is_pending());
    probe.cancel();
    assert_eq!(probe.poll(), None);
}

#[test]
fn meminfo_parsing() {
    let text = "MemTotal:       16384000 kB\nMemFree:         1000 kB\n";
    let gb = parse_meminfo_total_gb(text).unwrap();
    assert!((gb - 15.625).abs() < 1e-9);
    assert!(parse_meminfo_total_gb("MemFree: 1 kB").is_err());
}
