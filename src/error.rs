//! Error types for configuration, the render collaborator and audio capture.

use thiserror::Error;

/// Rejected configuration values, reported before any worker is started.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A tile needs at least two cells per edge so chunks have a positive stride
    #[error("tile side must be at least 2 cells, got {0}")]
    TileSide(usize),

    /// At least one chunk must be resident
    #[error("chunk count must be at least 1")]
    ChunkCount,

    /// Noise wavelength must be a positive, finite number of cells
    #[error("wavelength must be positive and finite, got {0}")]
    Wavelength(f64),

    /// Octave noise needs at least one layer
    #[error("octave count must be at least 1")]
    Octaves,

    /// Scroll rate is a forward distance per frame
    #[error("scroll rate must be finite and non-negative, got {0}")]
    ScrollRate(f64),

    /// Frame pacing needs a positive target rate
    #[error("frame rate must be positive and finite, got {0}")]
    FrameRate(f32),

    /// The resident vertex set must be addressable by 32-bit indices
    #[error("{tile_side}x{tile_side} tiles x {chunk_count} chunks exceeds the 32-bit index range")]
    TooManyVertices {
        /// Cells per tile edge
        tile_side: usize,
        /// Resident chunks
        chunk_count: usize,
    },

    /// Controller gains must be finite
    #[error("controller gain {name} must be finite, got {value}")]
    Gain {
        /// Gain name (kp, ki, kd or initial_value)
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// Integral retention must shrink the accumulated error every step
    #[error("controller retention must lie in [0, 1), got {0}")]
    Retention(f64),

    /// Audio capture needs a positive nominal sample rate
    #[error("audio sample rate must be positive")]
    SampleRate,

    /// An analysis chunk holds at least one sample
    #[error("audio chunk size must be at least 1")]
    AudioChunk,

    /// Band edges split the spectrum into three non-empty bands
    #[error("audio band edges must be positive and strictly increasing, got {0:?}")]
    BandEdges([usize; 3]),

    /// The highest band edge must fall inside one analysis chunk
    #[error("audio band edge {edge} exceeds chunk size {chunk_size}")]
    BandEdgePastChunk {
        /// Highest band edge (FFT bin)
        edge: usize,
        /// Samples per analysis chunk
        chunk_size: usize,
    },

    /// Band smoothing must forget old levels
    #[error("audio band retention must lie in [0, 1), got {0:?}")]
    BandRetention([f32; 3]),
}

/// Errors surfaced by the terrain engine and its collaborators.
#[derive(Debug, Error)]
pub enum TerrainError {
    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The windowing event loop could not be created
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The window could not be opened
    #[error("failed to open window: {0}")]
    Window(String),

    /// The drawing surface could not be created for the window
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    /// No GPU adapter can present to the surface
    #[error("no suitable GPU adapter found")]
    Adapter,

    /// The GPU device could not be opened
    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// A frame could not be acquired from the surface
    #[error("failed to acquire frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),

    /// Audio capture could not be set up
    #[error("audio capture failed: {0}")]
    Audio(String),

    /// The worker thread could not be spawned
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TerrainError>;
