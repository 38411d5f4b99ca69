//! Spectrum analysis turning one chunk of microphone samples into band levels.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::controller::BandTargets;
use crate::params::AudioParams;

/// Log-magnitude FFT of fixed-size chunks, reduced to three bands
pub struct BandAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
    levels: Vec<f32>,
    band_edges: [usize; 3],
}

impl BandAnalyzer {
    pub fn new(params: &AudioParams) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(params.chunk_size);
        Self {
            fft,
            buffer: vec![Complex::new(0.0, 0.0); params.chunk_size],
            levels: vec![0.0; params.chunk_size],
            band_edges: params.band_edges,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.buffer.len()
    }

    /// Band levels of one chunk; short input is zero-padded, extra samples ignored
    pub fn analyze(&mut self, samples: &[f32]) -> [f32; 3] {
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            *slot = Complex::new(samples.get(i).copied().unwrap_or(0.0), 0.0);
        }

        self.fft.process(&mut self.buffer);

        // Silent bins would be -inf; floor them at the smallest positive magnitude
        for (level, bin) in self.levels.iter_mut().zip(&self.buffer) {
            *level = bin.norm().max(f32::MIN_POSITIVE).log10();
        }

        reduce_bins(&self.levels, &self.band_edges)
    }
}

/// Reduce per-bin levels to one value per band: `(mean + runningMax) / 2`.
///
/// Band `i` covers bins `[edges[i-1], edges[i])` (the first starts at 0).
/// The running maximum is carried across bands, so a loud low band also
/// lifts the bands above it.
pub fn reduce_bins(levels: &[f32], edges: &[usize; 3]) -> [f32; 3] {
    let mut bands = [0.0; 3];
    let mut running_max = f32::NEG_INFINITY;
    let mut start = 0;

    for (band, &edge) in bands.iter_mut().zip(edges) {
        let end = edge.min(levels.len());
        if end <= start {
            continue;
        }
        let bins = &levels[start..end];
        running_max = bins.iter().copied().fold(running_max, f32::max);
        let mean = bins.iter().sum::<f32>() / bins.len() as f32;
        *band = (mean + running_max) / 2.0;
        start = end;
    }

    bands
}

/// Caller-facing values derived from one analysed chunk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandOutput {
    pub brightness: f32,
    pub targets: BandTargets,
}

/// Exponential smoothing of band levels and their mapping to brightness and heights
#[derive(Debug, Clone)]
pub struct BandSmoother {
    retention: [f32; 3],
    levels: [f32; 3],
    low_floor: f32,
    brightness_offset: f32,
    brightness_scale: f32,
}

impl BandSmoother {
    pub fn new(params: &AudioParams) -> Self {
        Self {
            retention: params.band_retention,
            levels: [0.0; 3],
            low_floor: params.low_floor,
            brightness_offset: params.brightness_offset,
            brightness_scale: params.brightness_scale,
        }
    }

    /// Smoothed levels (low, mid, high)
    pub fn levels(&self) -> [f32; 3] {
        self.levels
    }

    /// Fold in one chunk's band levels
    pub fn update(&mut self, bands: [f32; 3]) -> BandOutput {
        for ((level, band), retention) in self.levels.iter_mut().zip(bands).zip(self.retention) {
            // Negative history never drags a band below silence
            let previous = level.max(0.0);
            *level = previous * retention + band * (1.0 - retention);
        }

        let [low, mid, high] = self.levels;
        BandOutput {
            brightness: ((mid - self.brightness_offset) / self.brightness_scale).max(0.0),
            targets: BandTargets {
                low: f64::from((low - self.low_floor).max(0.0)),
                mid: f64::from(mid.max(0.0)),
                high: f64::from(high.max(0.0)),
            },
        }
    }
}
