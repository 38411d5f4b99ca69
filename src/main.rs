//! Ridgeline - an endlessly scrolling procedural mountain range
//!
//! Runs the terrain worker in its own window. Heights come either from
//! static command-line targets or, with `--audio`, from the spectrum of
//! the default audio input device.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ridgeline::audio::AudioDriver;
use ridgeline::cli::Args;
use ridgeline::params::{AudioParams, ControllerGains, RenderParams};
use ridgeline::TerrainHandle;

/// How often the main thread checks whether the viewer closed the window
const WAIT_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("ridgeline=info".parse()?))
        .init();

    let args = Args::parse();
    info!("Ridgeline {}", env!("CARGO_PKG_VERSION"));

    let mut terrain = TerrainHandle::start(
        args.terrain_params(),
        ControllerGains::default(),
        RenderParams::default(),
        args.color_params(),
    )?;
    info!(seed = terrain.seed(), "rerun with --seed to get the same range");

    // Ctrl-C finishes the current frame and closes the window like Escape does
    let interrupt = terrain.controls();
    ctrlc::set_handler(move || interrupt.request_stop())?;

    let targets = args.static_targets();
    terrain.set_mountain_height(targets.low, targets.mid, targets.high);

    // Kept alive until the window closes
    let _audio = if args.audio {
        match AudioDriver::start(AudioParams::default(), terrain.controls()) {
            Ok(driver) => Some(driver),
            Err(e) => {
                warn!("{}; keeping static heights", e);
                None
            }
        }
    } else {
        None
    };

    while terrain.is_running() {
        thread::sleep(WAIT_INTERVAL);
    }
    terrain.stop();

    info!("Ridgeline shutdown complete");
    Ok(())
}
