//! Terrain generation and amplitude controller parameters.

use crate::error::ConfigError;

/// Chunked terrain generation parameters
#[derive(Debug, Clone)]
pub struct TerrainParams {
    /// Cells per chunk edge (a 24-cell tile advances 23 cells per chunk)
    pub tile_side: usize,

    /// Number of simultaneously resident chunks
    pub chunk_count: usize,

    /// Noise wavelength of the low band in cells (mid uses half, high a quarter)
    pub wavelength: f64,

    /// Perlin layers summed per band sample
    pub octaves: u32,

    /// Noise seed (None = draw a random one at start)
    pub seed: Option<u32>,

    /// Forward scroll distance per frame (cells)
    pub scroll_rate: f64,

    /// Target frame rate for the worker loop (Hz)
    pub frame_rate_hz: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            tile_side: 24,
            chunk_count: 8,
            wavelength: 8.0,
            octaves: 1,
            seed: None,
            scroll_rate: 0.3,
            frame_rate_hz: 60.0,
        }
    }
}

impl TerrainParams {
    /// Cells (and vertices) across all resident tiles
    pub fn resident_cells(&self) -> usize {
        self.tile_side * self.tile_side * self.chunk_count
    }

    /// Seed to use, drawing a random 16-bit one when none was configured
    pub fn resolve_seed(&self) -> u32 {
        self.seed.unwrap_or_else(|| fastrand::u32(..65536))
    }

    /// Reject values the chunk ring cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_side < 2 {
            return Err(ConfigError::TileSide(self.tile_side));
        }
        if self.chunk_count == 0 {
            return Err(ConfigError::ChunkCount);
        }
        if !(self.wavelength.is_finite() && self.wavelength > 0.0) {
            return Err(ConfigError::Wavelength(self.wavelength));
        }
        if self.octaves == 0 {
            return Err(ConfigError::Octaves);
        }
        if !(self.scroll_rate.is_finite() && self.scroll_rate >= 0.0) {
            return Err(ConfigError::ScrollRate(self.scroll_rate));
        }
        if !(self.frame_rate_hz.is_finite() && self.frame_rate_hz > 0.0) {
            return Err(ConfigError::FrameRate(self.frame_rate_hz));
        }
        let too_many = self
            .tile_side
            .checked_mul(self.tile_side)
            .and_then(|cells| cells.checked_mul(self.chunk_count))
            .map_or(true, |cells| cells > u32::MAX as usize);
        if too_many {
            return Err(ConfigError::TooManyVertices {
                tile_side: self.tile_side,
                chunk_count: self.chunk_count,
            });
        }
        Ok(())
    }
}

/// Fixed gains of the per-band amplitude controller
#[derive(Debug, Clone, Copy)]
pub struct ControllerGains {
    /// Proportional gain
    pub kp: f64,

    /// Integral gain
    pub ki: f64,

    /// Derivative gain
    pub kd: f64,

    /// Fraction of the accumulated error kept after each step (bounds windup)
    pub retention: f64,

    /// Output before the first step
    pub initial_value: f64,
}

impl Default for ControllerGains {
    fn default() -> Self {
        Self {
            kp: 0.16,
            ki: 0.12,
            kd: 0.08,
            retention: 0.8,
            initial_value: 0.0,
        }
    }
}

impl ControllerGains {
    /// Reject non-finite gains and a retention that would let the integral grow
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("kp", self.kp),
            ("ki", self.ki),
            ("kd", self.kd),
            ("initial_value", self.initial_value),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Gain { name, value });
            }
        }
        if !(0.0..1.0).contains(&self.retention) {
            return Err(ConfigError::Retention(self.retention));
        }
        Ok(())
    }
}
