use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use rand::{SeedableRng, rngs::StdRng};
use signet_trailer::{CueRole, Fps, Timing, TrailerConfig, TrailerRenderer, build_trailer};

#[derive(Parser, Debug)]
#[command(name = "signet-trailer", version, about = "Render the Signet trailer timeline")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single instant as a PNG.
    Frame(FrameArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Print the cue table as JSON.
    Cues(CuesArgs),
}

#[derive(Args, Debug)]
struct Common {
    /// JSON render settings (canvas, fps, seconds, seed, background).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Letter scatter seed; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
}

impl Common {
    fn load(&self) -> anyhow::Result<TrailerConfig> {
        let mut cfg = match &self.config {
            Some(path) => TrailerConfig::from_json_file(path)
                .with_context(|| format!("load config '{}'", path.display()))?,
            None => TrailerConfig::default(),
        };
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        Ok(cfg)
    }
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Seconds after mount.
    #[arg(long)]
    at: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    common: Common,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Length of the video in seconds.
    #[arg(long)]
    seconds: Option<f64>,

    /// Whole frames per second.
    #[arg(long)]
    fps: Option<u32>,

    #[command(flatten)]
    common: Common,
}

#[derive(Parser, Debug)]
struct CuesArgs {
    /// Dump the whole scene (elements and keyframes) instead of the summary table.
    #[arg(long, default_value_t = false)]
    full: bool,

    #[command(flatten)]
    common: Common,
}

#[derive(serde::Serialize)]
struct CueRow<'a> {
    role: CueRole,
    target: &'a str,
    delay: f64,
    duration: f64,
    end: Option<f64>,
    channels: Vec<ChannelRow>,
}

#[derive(serde::Serialize)]
struct ChannelRow {
    property: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    timing: Option<Timing>,
    forever: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("signet_trailer=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Cues(args) => cmd_cues(args),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let renderer = TrailerRenderer::new(args.common.load()?)?;
    let seed = renderer.resolve_seed();
    let frame = renderer
        .render_frame_at(seed, args.at)
        .with_context(|| format!("render frame at {}s", args.at))?;
    signet_trailer::save_png(&frame, &args.out)?;
    tracing::info!(seed, at = args.at, "wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = args.common.load()?;
    if let Some(seconds) = args.seconds {
        cfg.seconds = seconds;
    }
    if let Some(fps) = args.fps {
        cfg.fps = Fps::new(fps, 1)?;
    }
    let renderer = TrailerRenderer::new(cfg)?;
    let seed = renderer.resolve_seed();
    let stats = renderer
        .render_to_mp4(seed, &args.out)
        .with_context(|| format!("render '{}'", args.out.display()))?;
    tracing::info!(frames = stats.frames, seed, "wrote {}", args.out.display());
    Ok(())
}

fn cmd_cues(args: CuesArgs) -> anyhow::Result<()> {
    let cfg = args.common.load()?;
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let scene = build_trailer(cfg.canvas, &mut rng)?;

    let json = if args.full {
        serde_json::to_string_pretty(&scene)?
    } else {
        let rows = scene
            .cues
            .iter()
            .map(|cue| {
                let target = scene.element(cue.target)?;
                let channels = cue
                    .channels
                    .iter()
                    .map(|c| ChannelRow {
                        property: c.channel.name(),
                        timing: c.timing,
                        forever: c.timing.as_ref().unwrap_or(&cue.timing).is_infinite(),
                    })
                    .collect();
                Ok(CueRow {
                    role: cue.role,
                    target: &target.name,
                    delay: cue.timing.delay,
                    duration: cue.timing.duration,
                    end: cue.timing.end(),
                    channels,
                })
            })
            .collect::<signet_trailer::TrailerResult<Vec<_>>>()?;
        serde_json::to_string_pretty(&rows)?
    };
    println!("{json}");
    Ok(())
}
