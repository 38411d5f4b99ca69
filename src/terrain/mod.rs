//! Scrolling chunked terrain: noise bands, ring buffer and height compositing.

mod chunks;
mod mesh;
mod noise;
mod system;

pub use chunks::{ChunkRing, ScrollState};
pub use mesh::{
    cell_index, shape_curve, triangle_indices, wireframe_indices, write_chunk_positions, Vertex,
};
pub use noise::{BandSampler, NoiseField};
pub use system::TerrainEngine;
