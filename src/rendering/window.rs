//! Window presenter: a winit window and its event loop, owned by the worker thread.
//!
//! The event loop is never handed control. Each frame pumps pending events
//! without blocking, so frame pacing stays with the worker loop.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use super::RenderSystem;
use crate::error::{Result, TerrainError};
use crate::input::InputState;
use crate::params::{RenderParams, TerrainParams};
use crate::worker::{FrameView, Presenter};

/// Event pumps allowed for the platform to deliver the first `resumed`
const MAX_STARTUP_PUMPS: usize = 200;
const STARTUP_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

/// Event-side window state
struct WindowState {
    params: RenderParams,
    window: Option<Arc<Window>>,
    input: InputState,
    close_requested: bool,
    resized: Option<PhysicalSize<u32>>,
    create_error: Option<String>,
}

impl WindowState {
    fn new(params: RenderParams) -> Self {
        Self {
            params,
            window: None,
            input: InputState::new(),
            close_requested: false,
            resized: None,
            create_error: None,
        }
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.params.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.params.window_width,
                self.params.window_height,
            ));

        match event_loop.create_window(window_attributes) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => self.create_error = Some(e.to_string()),
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.close_requested = true,
            WindowEvent::Resized(size) => self.resized = Some(size),
            WindowEvent::Focused(false) => self.input.clear(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape && state == ElementState::Pressed {
                    self.close_requested = true;
                }
                self.input.handle_key(code, state);
            }
            _ => {}
        }
    }
}

/// Presents terrain frames into a native window
///
/// Fields drop in order: surface, then window, then event loop.
pub struct WindowPresenter {
    renderer: RenderSystem,
    state: WindowState,
    event_loop: EventLoop<()>,
    wireframe_boost: f32,
}

impl WindowPresenter {
    /// Open the window and initialize the GPU on the calling thread
    pub fn new(params: &RenderParams, terrain: &TerrainParams) -> Result<Self> {
        let mut event_loop = build_event_loop()?;
        let mut state = WindowState::new(params.clone());

        let mut pumps = 0;
        let window = loop {
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(STARTUP_PUMP_TIMEOUT), &mut state)
            {
                return Err(TerrainError::Window(format!(
                    "event loop exited during startup (code {code})"
                )));
            }
            if let Some(e) = state.create_error.take() {
                return Err(TerrainError::Window(e));
            }
            if let Some(window) = &state.window {
                break Arc::clone(window);
            }
            pumps += 1;
            if pumps >= MAX_STARTUP_PUMPS {
                return Err(TerrainError::Window(
                    "platform never resumed the application".to_string(),
                ));
            }
        };

        let renderer =
            pollster::block_on(RenderSystem::new(window, terrain, params.clear_color))?;

        info!(
            width = params.window_width,
            height = params.window_height,
            "terrain window opened"
        );

        Ok(Self {
            renderer,
            state,
            event_loop,
            wireframe_boost: params.wireframe_boost,
        })
    }

    fn surface_size(&self) -> Option<PhysicalSize<u32>> {
        self.state.window.as_ref().map(|window| window.inner_size())
    }
}

impl Presenter for WindowPresenter {
    fn poll(&mut self, input: &mut InputState) -> bool {
        if let PumpStatus::Exit(_) = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state)
        {
            return false;
        }

        if let Some(size) = self.state.resized.take() {
            debug!(width = size.width, height = size.height, "window resized");
            self.renderer.resize(size.width, size.height);
        }

        input.clone_from(&self.state.input);
        !self.state.close_requested
    }

    fn aspect_ratio(&self) -> f32 {
        self.renderer.aspect_ratio()
    }

    fn present(&mut self, frame: &FrameView<'_>) -> Result<()> {
        self.renderer.update_vertices(frame.vertices);
        self.renderer
            .update_uniforms(frame.view_proj, &frame.colors, self.wireframe_boost);

        match self.renderer.render() {
            Ok(()) => Ok(()),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Surface went stale; reconfigure and pick up on the next frame
                if let Some(size) = self.surface_size() {
                    self.renderer.resize(size.width, size.height);
                }
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// AppKit only runs an event loop on the main thread, and winit panics rather than erroring
#[cfg(target_os = "macos")]
fn build_event_loop() -> Result<EventLoop<()>> {
    Err(TerrainError::Window(
        "macOS cannot open the terrain window off the main thread".to_string(),
    ))
}

/// Event loop that may live on a non-main thread
#[cfg(not(target_os = "macos"))]
fn build_event_loop() -> Result<EventLoop<()>> {
    #[allow(unused_mut)]
    let mut builder = EventLoop::builder();

    #[cfg(target_os = "windows")]
    {
        use winit::platform::windows::EventLoopBuilderExtWindows;
        builder.with_any_thread(true);
    }

    #[cfg(any(
        target_os = "linux",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd"
    ))]
    {
        winit::platform::x11::EventLoopBuilderExtX11::with_any_thread(&mut builder, true);
        winit::platform::wayland::EventLoopBuilderExtWayland::with_any_thread(&mut builder, true);
    }

    Ok(builder.build()?)
}

#[cfg(all(test, target_os = "macos"))]
mod tests {
    use super::*;

    #[test]
    fn test_worker_thread_event_loop_is_an_error() {
        let refused = std::thread::spawn(|| {
            matches!(build_event_loop(), Err(TerrainError::Window(_)))
        })
        .join();
        assert!(matches!(refused, Ok(true)));
    }
}
