use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracking_replay::*;

/// Walk a recorded tracking session frame by frame and print a JSON summary.
#[derive(Debug, Parser)]
#[command(name = "replay-summary")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Project folder containing the `dumps/` directory
    #[arg(long)]
    project_location: Option<PathBuf>,

    /// JSON config file, overridden by the other flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(long)]
    limit: Option<usize>,

    /// Advance at the configured frame interval instead of as fast as possible
    #[arg(long, default_value = "false")]
    paced: bool,

    #[arg(long, default_value = "info")]
    log_level: String,
}

fn load_config(args: &Args) -> anyhow::Result<ReplayConfig> {
    let config = match &args.config {
        Some(path) => ReplayConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ReplayConfig::default(),
    };
    Ok(match &args.project_location {
        Some(project_location) => config.with_project_location(project_location),
        None => config,
    })
}

fn run_paced(
    cursor: &mut FrameCursor,
    pacer: &mut FramePacer,
    collector: &mut SessionSummaryCollector,
) -> anyhow::Result<()> {
    let poll = Duration::from_millis(10);
    let mut last_tick = Instant::now();
    loop {
        std::thread::sleep(poll);
        let now = Instant::now();
        let delta = now - last_tick;
        last_tick = now;
        if !pacer.tick(delta) {
            continue;
        }
        let Some(view) = cursor.next_frame()? else {
            return Ok(());
        };
        log::debug!(
            "Frame {} of dump {}: {} players, ball {:?}",
            view.logical_position,
            view.dump_index,
            view.frame.players.len(),
            view.ball.position
        );
        if collector.handle_frame(&view)? == FrameControl::Stop {
            return Ok(());
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .init();

    let config = load_config(&args)?;
    let layout = config.layout();
    log::info!("Replaying dumps from {}", layout.dumps_dir().display());

    let mut cursor = FrameCursor::from_config(&config);
    let mut collector = match args.limit {
        Some(limit) => SessionSummaryCollector::with_limit(limit),
        None => SessionSummaryCollector::new(),
    };

    if args.paced {
        let mut pacer = FramePacer::from_config(&config);
        run_paced(&mut cursor, &mut pacer, &mut collector)?;
    } else {
        cursor.process(&mut collector)?;
    }

    println!("{}", collector.summary().as_json()?);
    Ok(())
}
