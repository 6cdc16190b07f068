use anyhow::Context;
use clap::Parser;
use ld2451core::sim::ShutdownSignal;
use ld2451core::TargetState;
use log::{error, info};
use std::path::PathBuf;
use std::thread;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use transport::{HexLogSink, SerialSink};
use workflow::config::{EmulatorConfig, Overrides};
use workflow::probe::probe;
use workflow::runner::Runner;

mod transport;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "LD2451 traffic radar wire emulator")]
struct Args {
    /// Load an emulator config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Serial device (or pty) the frames are written to
    #[arg(long)]
    port: Option<String>,
    #[arg(long)]
    baud: Option<u32>,
    /// Seed every random draw for a reproducible stream
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many vehicles have passed
    #[arg(long)]
    max_tracks: Option<u64>,
    /// Log frames as hex instead of opening the serial port
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Encode a single frame from the target below and exit
    #[arg(long, default_value_t = false)]
    once: bool,
    #[arg(long, default_value_t = 42.0)]
    distance: f32,
    #[arg(long, default_value_t = 55.0)]
    speed: f32,
    #[arg(long, default_value_t = 3.0, allow_hyphen_values = true)]
    angle: f32,
    #[arg(long, default_value_t = false)]
    receding: bool,
}

/// Triggers `shutdown` on Ctrl+C from a helper thread.
fn install_ctrl_c(shutdown: ShutdownSignal) -> anyhow::Result<()> {
    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for signal handling")?;
    thread::spawn(move || {
        runtime.block_on(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl+C received, stopping after the current step");
                    shutdown.trigger();
                }
                Err(err) => error!("awaiting Ctrl+C failed: {}", err),
            }
        });
    });
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.once {
        let target = TargetState::new(args.distance, args.speed, args.angle, !args.receding);
        let report = probe(target, args.seed);
        println!("{}", report.hex);
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serializing probe report")?
        );
        return Ok(());
    }

    let base = if let Some(path) = args.config {
        EmulatorConfig::load(path)?
    } else {
        EmulatorConfig::default()
    };
    let config = base.with_overrides(Overrides {
        port: args.port,
        baud: args.baud,
        seed: args.seed,
        max_tracks: args.max_tracks,
    });

    let shutdown = ShutdownSignal::new();
    install_ctrl_c(shutdown.clone())?;
    let runner = Runner::new(config.clone());

    let summary = if args.dry_run {
        let mut sink = HexLogSink::new();
        let summary = runner.execute(&mut sink, &shutdown)?;
        info!("Dry run logged {} frames", sink.frames());
        summary
    } else {
        let mut sink = SerialSink::open(&config.port, config.baud)?;
        runner
            .execute(&mut sink, &shutdown)
            .with_context(|| format!("emulating on {}", sink.path()))?
    };

    println!(
        "Emulator stopped ({:?}) -> tracks {}, frames {}, bytes {}, write errors {}",
        summary.stop,
        summary.tracks_completed,
        summary.metrics.frames_sent,
        summary.metrics.bytes_sent,
        summary.metrics.write_errors
    );

    Ok(())
}
