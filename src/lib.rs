//! Ridgeline library - endlessly scrolling procedural mountains
//!
//! A single worker thread owns a chunked terrain engine: a ring of noise
//! tiles recycled as the viewer scrolls forward, three smoothed band
//! amplitudes driven by caller-set targets, and a windowed renderer.

pub mod audio;
pub mod camera;
pub mod cli;
pub mod controller;
pub mod controls;
pub mod error;
pub mod input;
pub mod params;
pub mod rendering;
pub mod terrain;
pub mod timing;
pub mod worker;

pub use controller::{AmplitudeController, Band, BandControllers, BandTargets};
pub use controls::{ControlState, Controls};
pub use error::{ConfigError, Result, TerrainError};
pub use terrain::TerrainEngine;
pub use worker::{FrameView, Presenter, TerrainHandle};
