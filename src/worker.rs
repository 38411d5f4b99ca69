//! Dedicated terrain worker and the caller-facing entry points.
//!
//! One thread owns the terrain engine, the camera and the render
//! collaborator. The caller talks to it only through [`Controls`]: plain
//! value writes read at the top of every frame, plus a stop flag that is
//! polled once per frame and honoured after the current frame completes.

use std::thread::{self, JoinHandle};

use glam::Mat4;
use tracing::{error, info, warn};

use crate::camera::{CameraSystem, ColorChannels};
use crate::controller::BandTargets;
use crate::controls::{ControlState, Controls};
use crate::error::Result;
use crate::input::InputState;
use crate::params::{ColorParams, ControllerGains, RenderParams, TerrainParams};
use crate::terrain::{TerrainEngine, Vertex};
use crate::timing::FramePacer;

/// Everything the render collaborator needs to draw one frame
#[derive(Debug)]
pub struct FrameView<'a> {
    /// Resident vertices, already composited
    pub vertices: &'a [Vertex],
    /// Camera view-projection matrix
    pub view_proj: Mat4,
    /// Surface colour for this frame
    pub colors: ColorChannels,
}

/// Render collaborator driven by the worker loop.
///
/// Created on the worker thread, so it may own thread-bound resources such
/// as a window and its event loop.
pub trait Presenter {
    /// Pump window events into `input`; returns `false` once the viewer closed the view
    fn poll(&mut self, input: &mut InputState) -> bool;

    /// Width / height of the drawable area
    fn aspect_ratio(&self) -> f32;

    /// Upload and present one frame
    fn present(&mut self, frame: &FrameView<'_>) -> Result<()>;
}

/// Handle to a running terrain worker
pub struct TerrainHandle {
    controls: Controls,
    worker: Option<JoinHandle<()>>,
    seed: u32,
}

impl TerrainHandle {
    /// Start the worker with the windowed renderer.
    pub fn start(
        terrain: TerrainParams,
        gains: ControllerGains,
        render: RenderParams,
        colors: ColorParams,
    ) -> Result<Self> {
        Self::start_with(
            terrain,
            gains,
            render,
            colors,
            |render: &RenderParams, terrain: &TerrainParams| {
                crate::rendering::WindowPresenter::new(render, terrain)
            },
        )
    }

    /// Start the worker with a custom presenter factory.
    ///
    /// The factory receives the render parameters and the validated terrain
    /// parameters (the resident grid size fixes the index buffers).
    ///
    /// Configuration is validated and the initial terrain generated on the
    /// calling thread, so invalid parameters are reported here and no thread
    /// is spawned. The factory runs on the worker thread; if it fails the
    /// error is logged and the worker exits without rendering.
    pub fn start_with<P, F>(
        terrain: TerrainParams,
        gains: ControllerGains,
        render: RenderParams,
        colors: ColorParams,
        factory: F,
    ) -> Result<Self>
    where
        P: Presenter,
        F: FnOnce(&RenderParams, &TerrainParams) -> Result<P> + Send + 'static,
    {
        let engine = TerrainEngine::new(&terrain, gains)?;
        let seed = engine.seed();

        let controls = Controls::new(ControlState {
            brightness: colors.brightness,
            targets: BandTargets::default(),
        });
        let worker_controls = controls.clone();

        let worker = thread::Builder::new()
            .name("terrain-worker".to_string())
            .spawn(move || {
                let presenter = match factory(&render, engine.params()) {
                    Ok(presenter) => presenter,
                    Err(e) => {
                        error!("render collaborator failed to start: {}", e);
                        return;
                    }
                };
                run_loop(engine, presenter, render, colors, worker_controls);
            })?;

        info!(seed, "terrain worker started");

        Ok(Self {
            controls,
            worker: Some(worker),
            seed,
        })
    }

    /// Seed the terrain was generated with
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Cloneable control handle for other threads
    pub fn controls(&self) -> Controls {
        self.controls.clone()
    }

    pub fn set_brightness(&self, brightness: f32) {
        self.controls.set_brightness(brightness);
    }

    pub fn set_mountain_height(&self, low: f64, mid: f64, high: f64) {
        self.controls.set_mountain_height(low, mid, high);
    }

    /// Whether the worker thread is still alive (the viewer may close the window on their own)
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    /// Request a graceful stop and block until the worker has exited.
    ///
    /// Returns immediately when the worker already ended; calling it again is a no-op.
    pub fn stop(&mut self) {
        self.controls.request_stop();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("terrain worker panicked");
            } else {
                info!("terrain worker stopped");
            }
        }
    }
}

impl Drop for TerrainHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The per-frame loop: pace, read controls, update terrain, present
fn run_loop<P: Presenter>(
    mut engine: TerrainEngine,
    mut presenter: P,
    render: RenderParams,
    colors: ColorParams,
    controls: Controls,
) {
    let mut pacer = FramePacer::new(engine.params().frame_rate_hz);
    let mut input = InputState::new();
    let mut camera = CameraSystem::new(render);
    let mut colors = ColorChannels::new(colors);

    while !controls.stop_requested() {
        let dt = pacer.wait_for_next_frame();

        if !presenter.poll(&mut input) {
            info!("viewer closed the terrain window");
            break;
        }

        let state = controls.snapshot();
        engine.set_targets(state.targets);
        engine.frame();

        camera.update(dt, &input, engine.scroll().position);
        colors.brightness = state.brightness;
        colors.apply_keys(&input);

        let frame = FrameView {
            vertices: engine.vertices(),
            view_proj: camera.view_proj(presenter.aspect_ratio()),
            colors,
        };
        if let Err(e) = presenter.present(&frame) {
            warn!("frame {} not presented: {}", engine.frames(), e);
        }
    }

    info!(
        frames = engine.frames(),
        chunks_advanced = engine.scroll().advance_count,
        "terrain worker exiting"
    );
}
