//! Per-frame terrain update: scroll, controller step and height compositing.

use tracing::info;

use super::chunks::{ChunkRing, ScrollState};
use super::mesh::{cell_index, shape_curve, Vertex};
use super::noise::{BandSampler, NoiseField};
use crate::controller::{Band, BandControllers, BandTargets};
use crate::error::ConfigError;
use crate::params::{ControllerGains, TerrainParams};

/// The terrain engine: chunk ring, band controllers and shaping curve.
///
/// Constructed once and owned exclusively by the worker that renders it.
pub struct TerrainEngine {
    params: TerrainParams,
    ring: ChunkRing,
    controllers: BandControllers,
    shape: Vec<f32>,
    frames: u64,
}

impl TerrainEngine {
    /// Validate configuration, resolve the seed and generate the initial window
    pub fn new(params: &TerrainParams, gains: ControllerGains) -> Result<Self, ConfigError> {
        params.validate()?;
        gains.validate()?;

        let seed = params.resolve_seed();
        info!(
            seed,
            tile_side = params.tile_side,
            chunks = params.chunk_count,
            wavelength = params.wavelength,
            "generating terrain"
        );

        let sampler = BandSampler::new(seed, params.wavelength, params.octaves);
        let ring = ChunkRing::new(params.tile_side, params.chunk_count, sampler);

        let mut engine = Self {
            params: TerrainParams {
                seed: Some(seed),
                ..params.clone()
            },
            ring,
            controllers: BandControllers::new(gains),
            shape: shape_curve(params.tile_side),
            frames: 0,
        };
        engine.composite();
        Ok(engine)
    }

    /// Forward new targets to the three controllers
    pub fn set_targets(&mut self, targets: BandTargets) {
        self.controllers.set_targets(targets);
    }

    /// Run one frame: scroll by the configured rate, step controllers, rewrite every height.
    ///
    /// Returns the number of chunks recycled this frame.
    pub fn frame(&mut self) -> usize {
        let recycled = self.ring.advance(self.params.scroll_rate);
        self.controllers.step();
        self.composite();
        self.frames += 1;
        recycled
    }

    /// Rewrite the y component of every resident vertex.
    ///
    /// Runs over all chunks, not just recycled ones, since the controller
    /// outputs change every frame.
    pub fn composite(&mut self) {
        let side = self.ring.side();
        let chunk_count = self.ring.chunk_count();

        let (noise, vertices) = self.ring.noise_and_vertices_mut();
        let layers = band_layers(&self.controllers, noise);
        for slot in 0..chunk_count {
            for row in 0..side {
                for column in 0..side {
                    let index = cell_index(side, row, column, slot);
                    vertices[index].position[1] =
                        self.shape[column] * layered_height(&layers, index);
                }
            }
        }
    }

    /// Height the compositor writes for a cell, recomputed from current state
    pub fn expected_height(&self, row: usize, column: usize, slot: usize) -> f32 {
        let layers = band_layers(&self.controllers, self.ring.noise());
        let index = cell_index(self.ring.side(), row, column, slot);
        self.shape[column] * layered_height(&layers, index)
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Seed actually used (resolved at construction)
    pub fn seed(&self) -> u32 {
        self.ring.sampler().seed()
    }

    pub fn vertices(&self) -> &[Vertex] {
        self.ring.vertices()
    }

    pub fn noise(&self) -> &NoiseField {
        self.ring.noise()
    }

    pub fn ring(&self) -> &ChunkRing {
        &self.ring
    }

    pub fn scroll(&self) -> ScrollState {
        self.ring.scroll()
    }

    /// Frames run since construction
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Each band's current amplitude paired with its stored noise
fn band_layers<'a>(
    controllers: &BandControllers,
    noise: &'a NoiseField,
) -> [(f32, &'a [f32]); 3] {
    Band::ALL.map(|band| (controllers.band(band).value() as f32, noise.band(band)))
}

/// Amplitude-weighted sum of the band noise at one cell
#[inline]
fn layered_height(layers: &[(f32, &[f32]); 3], index: usize) -> f32 {
    layers
        .iter()
        .map(|(amplitude, noise)| amplitude * noise[index])
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::AmplitudeController;

    fn engine(seed: u32) -> TerrainEngine {
        let params = TerrainParams {
            seed: Some(seed),
            ..Default::default()
        };
        TerrainEngine::new(&params, ControllerGains::default()).unwrap()
    }

    fn assert_heights_consistent(engine: &TerrainEngine) {
        let side = engine.params().tile_side;
        for slot in 0..engine.params().chunk_count {
            for row in 0..side {
                for column in 0..side {
                    let index = cell_index(side, row, column, slot);
                    let stored = engine.vertices()[index].position[1];
                    assert_eq!(stored, engine.expected_height(row, column, slot));
                }
            }
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let params = TerrainParams {
            chunk_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            TerrainEngine::new(&params, ControllerGains::default()),
            Err(ConfigError::ChunkCount)
        ));
    }

    #[test]
    fn test_vertex_count_matches_params() {
        let engine = engine(1);
        assert_eq!(engine.vertices().len(), engine.params().resident_cells());
        for band in Band::ALL {
            assert_eq!(engine.noise().band(band).len(), engine.params().resident_cells());
        }
    }

    #[test]
    fn test_flat_before_targets_are_set() {
        let mut engine = engine(3);
        engine.frame();
        assert!(engine.vertices().iter().all(|v| v.position[1] == 0.0));
    }

    #[test]
    fn test_heights_follow_controllers() {
        let mut engine = engine(11);
        engine.set_targets(BandTargets {
            low: 1.0,
            mid: 0.5,
            high: 0.25,
        });
        for _ in 0..40 {
            engine.frame();
            assert_heights_consistent(&engine);
        }
        assert!(engine.vertices().iter().any(|v| v.position[1] != 0.0));
    }

    #[test]
    fn test_single_band_scales_its_own_noise() {
        let mut engine = engine(8);
        engine.set_targets(BandTargets {
            low: 0.0,
            mid: 2.0,
            high: 0.0,
        });

        let mut reference = AmplitudeController::new(ControllerGains::default());
        reference.set_target(2.0);
        for _ in 0..5 {
            engine.frame();
            reference.step();
        }

        // Low and high amplitudes stay exactly zero
        let amplitude = reference.value() as f32;
        let side = engine.params().tile_side;
        let shape = shape_curve(side);
        let mid_noise = engine.noise().band(Band::Mid);
        for row in 0..side {
            for column in 0..side {
                let index = cell_index(side, row, column, 2);
                assert_eq!(
                    engine.vertices()[index].position[1],
                    shape[column] * (amplitude * mid_noise[index])
                );
            }
        }
    }

    #[test]
    fn test_random_seed_is_recorded() {
        let engine = TerrainEngine::new(&TerrainParams::default(), ControllerGains::default())
            .unwrap();
        assert_eq!(engine.params().seed, Some(engine.seed()));
    }

    #[test]
    fn test_thousand_frame_scenario() {
        let mut engine = engine(2024);
        engine.set_targets(BandTargets {
            low: 0.8,
            mid: 0.4,
            high: 0.2,
        });
        for _ in 0..1000 {
            engine.frame();
        }

        let scroll = engine.scroll();
        assert_eq!(scroll.advance_count, 13);
        assert_eq!(engine.frames(), 1000);

        // Contiguity: chunks 13..21 resident, each in slot chunk % 8
        let mut chunks = engine.ring().slot_chunks().to_vec();
        chunks.sort_unstable();
        assert_eq!(chunks, (13..21).collect::<Vec<u64>>());
        for (slot, &chunk) in engine.ring().slot_chunks().iter().enumerate() {
            assert_eq!(chunk % 8, slot as u64);
        }

        // Determinism: every resident chunk matches a fresh fill at the same world offset
        let sampler = BandSampler::new(2024, 8.0, 1);
        for (slot, &chunk) in engine.ring().slot_chunks().iter().enumerate() {
            let mut fresh = NoiseField::new(24, 1);
            fresh.fill_chunk(&sampler, 0, chunk);
            assert_eq!(engine.noise().chunk_values(slot), fresh.chunk_values(0));
        }

        assert_heights_consistent(&engine);
    }
}
