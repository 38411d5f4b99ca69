//! Parameter definitions with units and documented semantics.
//!
//! All tuning constants live here:
//! - Units per field (cells, frames, degrees, Hz)
//! - Defaults tuned for the stock mountain look
//! - `validate()` where a bad value would break the engine

mod audio;
mod render;
mod terrain;

pub use audio::AudioParams;
pub use render::{ColorParams, RenderParams};
pub use terrain::{ControllerGains, TerrainParams};
