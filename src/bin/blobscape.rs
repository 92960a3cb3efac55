use std::path::PathBuf;

use anyhow::Context as _;
use blobscape::{CapabilitySource as _, DisplaySurface as _};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "blobscape", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate a scroll sequence headlessly and write the last frame as a PNG.
    Render(RenderArgs),
    /// Classify hardware capabilities into a performance tier.
    Tiers(TiersArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Engine config JSON. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Performance tier; `detect` classifies this machine.
    #[arg(long, value_enum, default_value_t = TierChoice::High)]
    tier: TierChoice,

    /// Display width in pixels.
    #[arg(long, default_value_t = 960)]
    width: u32,

    /// Display height in pixels.
    #[arg(long, default_value_t = 540)]
    height: u32,

    /// Number of host frame callbacks to simulate.
    #[arg(long, default_value_t = 180)]
    frames: u32,

    /// Host callback rate in Hz.
    #[arg(long, default_value_t = 60.0)]
    host_hz: f64,

    /// Scroll waypoints in [0, 1], visited at even intervals over the run.
    #[arg(long, value_delimiter = ',', default_values_t = [0.0, 0.5, 1.0, 0.5])]
    scroll: Vec<f64>,
}

#[derive(Parser, Debug)]
struct TiersArgs {
    /// Device memory in GB; detected when omitted.
    #[arg(long)]
    memory_gb: Option<f64>,

    /// Logical core count; detected when omitted.
    #[arg(long)]
    cores: Option<u32>,

    /// Coarse GPU score (0-3).
    #[arg(long)]
    gpu: Option<u8>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TierChoice {
    Low,
    Medium,
    High,
    Detect,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Tiers(args) => cmd_tiers(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = match &args.config {
        Some(path) => blobscape::EngineConfig::from_json_path(path)?,
        None => blobscape::EngineConfig::default(),
    };
    if !(args.host_hz.is_finite() && args.host_hz > 0.0) {
        anyhow::bail!("--host-hz must be > 0");
    }
    if args.scroll.is_empty() {
        anyhow::bail!("--scroll needs at least one waypoint");
    }

    let size = blobscape::Canvas::new(args.width, args.height)?;
    let probe = match args.tier {
        TierChoice::Low => blobscape::CapabilityProbe::resolved(blobscape::PerformanceTier::Low),
        TierChoice::Medium => {
            blobscape::CapabilityProbe::resolved(blobscape::PerformanceTier::Medium)
        }
        TierChoice::High => blobscape::CapabilityProbe::resolved(blobscape::PerformanceTier::High),
        TierChoice::Detect => blobscape::CapabilityProbe::spawn(blobscape::SystemCapabilitySource),
    };

    let mut engine = blobscape::Engine::new(
        cfg,
        blobscape::PixmapDisplay::new(size),
        blobscape::ManualFrameHost::new(),
        probe,
    )?;
    engine.start();

    let step_ms = 1000.0 / args.host_hz;
    for i in 0..args.frames {
        let progress = if args.frames > 1 {
            f64::from(i) / f64::from(args.frames - 1)
        } else {
            1.0
        };
        engine.on_scroll(scroll_at(&args.scroll, progress));
        engine.run_pending(f64::from(i) * step_ms);
    }

    let display = engine.display();
    let rgba = unpremultiply(display.data());
    image::save_buffer_with_format(
        &args.out,
        &rgba,
        display.size().width,
        display.size().height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    let stats = engine.stats();
    engine.teardown();
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn cmd_tiers(args: TiersArgs) -> anyhow::Result<()> {
    let detected = if args.memory_gb.is_none() || args.cores.is_none() {
        blobscape::SystemCapabilitySource
            .report()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "capability detection failed");
                blobscape::CapabilityReport::default()
            })
    } else {
        blobscape::CapabilityReport::default()
    };
    let report = blobscape::CapabilityReport {
        memory_gb: args.memory_gb.or(detected.memory_gb),
        logical_cores: args.cores.or(detected.logical_cores),
        gpu_score: args.gpu,
    };
    let tier = blobscape::classify(&report);
    let profile = blobscape::TierTable::default().profile(tier);
    let out = serde_json::json!({
        "report": report,
        "tier": tier,
        "profile": profile,
        "blobs": profile.blob_count(blobscape::EngineConfig::default().max_blobs),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Piecewise-linear scroll value at `progress` in `[0, 1]` through `waypoints`.
fn scroll_at(waypoints: &[f64], progress: f64) -> f64 {
    match waypoints {
        [] => 0.0,
        [only] => *only,
        _ => {
            let segments = (waypoints.len() - 1) as f64;
            let pos = progress.clamp(0.0, 1.0) * segments;
            let i = (pos.floor() as usize).min(waypoints.len() - 2);
            let t = pos - i as f64;
            waypoints[i] + (waypoints[i + 1] - waypoints[i]) * t
        }
    }
}

fn unpremultiply(premul: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(premul.len());
    for px in premul.chunks_exact(4) {
        let a = px[3];
        if a == 0 {
            out.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        let un = |c: u8| ((u16::from(c) * 255 + u16::from(a) / 2) / u16::from(a)).min(255) as u8;
        out.extend_from_slice(&[un(px[0]), un(px[1]), un(px[2]), a]);
    }
    out
}
