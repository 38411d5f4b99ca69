//! Three-band coherent noise, sampled per cell and stored per resident chunk.
//!
//! Sampling depends only on (seed, world row, column), so a chunk generated
//! late in a run holds exactly the values a fresh fill at the same world
//! coordinate would.

use noise::{NoiseFn, Perlin};

use super::mesh::cell_index;
use crate::controller::Band;

/// Octave Perlin sampler producing the low/mid/high band values of one cell
#[derive(Clone)]
pub struct BandSampler {
    perlin: Perlin,
    seed: u32,
    wavelength: f64,
    octaves: u32,
}

impl BandSampler {
    /// Create a sampler; the low band repeats roughly every `wavelength` cells
    pub fn new(seed: u32, wavelength: f64, octaves: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            seed,
            wavelength,
            octaves: octaves.max(1),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Octave noise remapped to [0, 1]
    ///
    /// Each octave doubles frequency and halves amplitude; the sum is
    /// normalized by the total amplitude before remapping.
    pub fn noise01(&self, x: f64, y: f64) -> f64 {
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut sum = 0.0;
        let mut norm = 0.0;

        for _ in 0..self.octaves {
            sum += self.perlin.get([x * frequency, y * frequency]) * amplitude;
            norm += amplitude;
            frequency *= 2.0;
            amplitude *= 0.5;
        }

        (sum / norm * 0.5 + 0.5).clamp(0.0, 1.0)
    }

    /// Band values (low, mid, high) at an absolute world cell.
    ///
    /// `world_row` runs along the scroll axis, `column` across it. The low
    /// band is clamped at zero so valleys stay flat; mid and high may dip
    /// below zero to carve detail.
    pub fn sample(&self, world_row: u64, column: usize) -> [f32; 3] {
        let row = world_row as f64;
        let column = column as f64;
        let low_wl = self.wavelength;
        let mid_wl = self.wavelength / 2.0;
        let high_wl = self.wavelength / 4.0;

        let low = (self.noise01(row / low_wl, column / low_wl) * 10.0 - 4.0).max(0.0) * 1.5;
        let mid = self.noise01(row / mid_wl, column / mid_wl) * 5.0 - 3.0;
        let high = self.noise01(row / high_wl, column / high_wl) * 4.0 - 1.0;

        [low as f32, mid as f32, high as f32]
    }
}

/// Three parallel band arrays, one scalar per resident cell
#[derive(Debug, Clone)]
pub struct NoiseField {
    side: usize,
    low: Vec<f32>,
    mid: Vec<f32>,
    high: Vec<f32>,
}

impl NoiseField {
    /// Allocate zeroed bands for `chunk_count` tiles of `side × side` cells
    pub fn new(side: usize, chunk_count: usize) -> Self {
        let len = side * side * chunk_count;
        Self {
            side,
            low: vec![0.0; len],
            mid: vec![0.0; len],
            high: vec![0.0; len],
        }
    }

    pub fn band(&self, band: Band) -> &[f32] {
        match band {
            Band::Low => &self.low,
            Band::Mid => &self.mid,
            Band::High => &self.high,
        }
    }

    /// (low, mid, high) at a flat cell index
    #[inline]
    pub fn at(&self, index: usize) -> [f32; 3] {
        [self.low[index], self.mid[index], self.high[index]]
    }

    /// Regenerate one slot with the chunk whose first row sits at `chunk_index * (side - 1)`
    pub fn fill_chunk(&mut self, sampler: &BandSampler, slot: usize, chunk_index: u64) {
        let side = self.side;
        let first_row = chunk_index * (side as u64 - 1);

        for row in 0..side {
            for column in 0..side {
                let index = cell_index(side, row, column, slot);
                let [low, mid, high] = sampler.sample(first_row + row as u64, column);
                self.low[index] = low;
                self.mid[index] = mid;
                self.high[index] = high;
            }
        }
    }

    /// Copy of one slot's cells as (low, mid, high) triples in row-major order
    pub fn chunk_values(&self, slot: usize) -> Vec<[f32; 3]> {
        let cells = self.side * self.side;
        (slot * cells..(slot + 1) * cells)
            .map(|index| self.at(index))
            .collect()
    }
}
