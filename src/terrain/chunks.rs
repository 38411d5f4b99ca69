//! Chunk ring buffer giving the illusion of endless forward terrain.
//!
//! `chunk_count` tiles sit end to end along the scroll axis. Adjacent tiles
//! share their boundary row, so each chunk covers `side - 1` cells of
//! distance. When the viewer passes the next chunk boundary the slot that is
//! now farthest behind is regenerated as the new farthest-ahead chunk; slot
//! `s` always holds a chunk whose index is congruent to `s` modulo
//! `chunk_count`.

use tracing::debug;

use super::mesh::{write_chunk_positions, Vertex};
use super::noise::{BandSampler, NoiseField};

/// Distance travelled and chunk boundaries crossed so far
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    /// Cumulative forward distance (cells)
    pub position: f64,

    /// Number of chunk recycles performed
    pub advance_count: u64,
}

/// Fixed-slot store of resident chunks: noise bands plus static vertex offsets
pub struct ChunkRing {
    side: usize,
    chunk_count: usize,
    sampler: BandSampler,
    noise: NoiseField,
    vertices: Vec<Vertex>,
    slot_chunks: Vec<u64>,
    scroll: ScrollState,
}

impl ChunkRing {
    /// Allocate and fill the initial window: chunk `k` in slot `k`, starting at distance 0
    pub fn new(side: usize, chunk_count: usize, sampler: BandSampler) -> Self {
        let mut ring = Self {
            side,
            chunk_count,
            sampler,
            noise: NoiseField::new(side, chunk_count),
            vertices: vec![Vertex::default(); side * side * chunk_count],
            slot_chunks: vec![0; chunk_count],
            scroll: ScrollState::default(),
        };

        for slot in 0..chunk_count {
            ring.load_chunk(slot, slot as u64);
        }

        ring
    }

    /// Noise and x/z offsets for one slot are rewritten together
    fn load_chunk(&mut self, slot: usize, chunk_index: u64) {
        self.noise.fill_chunk(&self.sampler, slot, chunk_index);
        write_chunk_positions(&mut self.vertices, self.side, slot, chunk_index);
        self.slot_chunks[slot] = chunk_index;
    }

    /// Scroll distance covered by one chunk
    pub fn stride(&self) -> usize {
        self.side - 1
    }

    /// Distance past which the next recycle happens
    pub fn next_threshold(&self) -> f64 {
        (self.scroll.advance_count + 1) as f64 * self.stride() as f64
    }

    /// Slot that will be recycled at the next boundary crossing (the one farthest behind)
    pub fn recycle_slot(&self) -> usize {
        (self.scroll.advance_count % self.chunk_count as u64) as usize
    }

    /// Move forward by `delta` and recycle one chunk per boundary crossed.
    ///
    /// Large deltas recycle several chunks in a single call so no chunk is
    /// ever skipped. Returns the number of chunks recycled.
    pub fn advance(&mut self, delta: f64) -> usize {
        self.scroll.position += delta;

        let mut recycled = 0;
        while self.scroll.position > self.next_threshold() {
            let slot = self.recycle_slot();
            let chunk_index = self.scroll.advance_count + self.chunk_count as u64;
            self.load_chunk(slot, chunk_index);
            self.scroll.advance_count += 1;
            recycled += 1;

            debug!(
                slot,
                chunk_index,
                position = self.scroll.position,
                "recycled chunk"
            );
        }

        recycled
    }

    pub fn scroll(&self) -> ScrollState {
        self.scroll
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    pub fn sampler(&self) -> &BandSampler {
        &self.sampler
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Stored noise alongside writable vertices, for the compositor
    pub(crate) fn noise_and_vertices_mut(&mut self) -> (&NoiseField, &mut [Vertex]) {
        (&self.noise, &mut self.vertices)
    }

    /// Chunk index held by each slot
    pub fn slot_chunks(&self) -> &[u64] {
        &self.slot_chunks
    }

    /// World offset (first row along the scroll axis) held by each slot
    pub fn slot_offsets(&self) -> Vec<u64> {
        let stride = self.stride() as u64;
        self.slot_chunks.iter().map(|chunk| chunk * stride).collect()
    }

    /// Slot holding `chunk_index`, if resident
    pub fn slot_of(&self, chunk_index: u64) -> Option<usize> {
        self.slot_chunks.iter().position(|&c| c == chunk_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Band;
    use crate::terrain::mesh::cell_index;
    use proptest::prelude::*;

    fn ring(side: usize, chunk_count: usize) -> ChunkRing {
        ChunkRing::new(side, chunk_count, BandSampler::new(42, 8.0, 1))
    }

    /// Offsets form exactly `chunk_count` adjacent blocks starting at the oldest chunk
    fn assert_contiguous(ring: &ChunkRing) {
        let stride = ring.stride() as u64;
        let mut offsets = ring.slot_offsets();
        offsets.sort_unstable();

        let first = ring.scroll().advance_count * stride;
        let expected: Vec<u64> = (0..ring.chunk_count() as u64)
            .map(|k| first + k * stride)
            .collect();
        assert_eq!(offsets, expected);

        for (slot, &chunk) in ring.slot_chunks().iter().enumerate() {
            assert_eq!(chunk % ring.chunk_count() as u64, slot as u64);
        }
    }

    #[test]
    fn test_initial_window() {
        let ring = ring(24, 8);
        assert_eq!(ring.slot_chunks(), &[0, 1, 2, 3, 4, 5, 6, 7]);
        for band in Band::ALL {
            assert_eq!(ring.noise().band(band).len(), 24 * 24 * 8);
        }
        assert_eq!(ring.vertices().len(), 24 * 24 * 8);
        assert_contiguous(&ring);
    }

    #[test]
    fn test_no_recycle_before_threshold() {
        let mut ring = ring(24, 8);
        assert_eq!(ring.advance(23.0), 0);
        assert_eq!(ring.scroll().advance_count, 0);
        assert_eq!(ring.advance(0.001), 1);
        assert_eq!(ring.scroll().advance_count, 1);
    }

    #[test]
    fn test_recycles_oldest_slot_ahead_of_window() {
        let mut ring = ring(24, 8);
        ring.advance(24.0);

        assert_eq!(ring.slot_chunks()[0], 8);
        assert_eq!(ring.recycle_slot(), 1);

        // z offsets moved with the noise
        let z = ring.vertices()[cell_index(24, 0, 0, 0)].position[2];
        assert_eq!(z, 8.0 * 23.0 - 12.0);
        assert_contiguous(&ring);
    }

    #[test]
    fn test_large_delta_does_not_skip_chunks() {
        let mut ring = ring(10, 4);
        let recycled = ring.advance(9.0 * 6.0 + 0.5);
        assert_eq!(recycled, 6);
        assert_eq!(ring.scroll().advance_count, 6);
        assert_contiguous(&ring);
    }

    #[test]
    fn test_recycled_chunk_matches_fresh_fill() {
        // A ring of 4 advanced 5 times holds chunks 5..9; a fresh ring of 12 holds 0..12.
        let mut small = ring(12, 4);
        small.advance(11.0 * 5.0 + 0.1);
        let large = ring(12, 12);

        for chunk in 5..9 {
            let a = small.slot_of(chunk).unwrap();
            let b = large.slot_of(chunk).unwrap();
            assert_eq!(small.noise().chunk_values(a), large.noise().chunk_values(b));
        }
    }

    proptest! {
        #[test]
        fn prop_window_stays_contiguous(deltas in prop::collection::vec(0.0f64..40.0, 0..60)) {
            let mut ring = ring(8, 5);
            for delta in deltas {
                ring.advance(delta);
                assert_contiguous(&ring);
            }
        }

        #[test]
        fn prop_step_granularity_does_not_matter(steps in 1usize..400, step in 0.01f64..3.0) {
            let mut fine = ring(8, 5);
            for _ in 0..steps {
                fine.advance(step);
            }

            let mut coarse = ring(8, 5);
            coarse.advance(fine.scroll().position);

            prop_assert_eq!(fine.scroll().advance_count, coarse.scroll().advance_count);
            prop_assert_eq!(fine.slot_chunks(), coarse.slot_chunks());
            prop_assert_eq!(fine.noise().chunk_values(0), coarse.noise().chunk_values(0));
            prop_assert_eq!(fine.vertices(), coarse.vertices());
        }
    }
}
