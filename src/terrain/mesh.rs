//! Flat vertex buffer layout, cross-section shaping curve and index arrays.
//!
//! Every resident cell lives at `column + row * side + slot * side * side`,
//! the same computed index used by the noise field. Rows run along the
//! scroll axis (z), columns across it (x).

use std::f64::consts::PI;

use bytemuck::{Pod, Zeroable};

/// One terrain vertex as uploaded to the GPU: a tightly packed (x, y, z) triple
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

/// Flat index of a cell inside the resident set
#[inline]
pub fn cell_index(side: usize, row: usize, column: usize, slot: usize) -> usize {
    column + row * side + slot * side * side
}

/// Static per-column height multiplier.
///
/// `1 + sin(3πt) − cos(2πt) − sin(πt)` over `t ∈ [0, 1]` across the tile
/// width: zero at both edges, two ridges, and a shallow valley down the
/// middle where the camera flies.
pub fn shape_curve(side: usize) -> Vec<f32> {
    let span = (side - 1) as f64;
    (0..side)
        .map(|column| {
            let t = PI * column as f64 / span;
            (1.0 + (3.0 * t).sin() - (2.0 * t).cos() - t.sin()) as f32
        })
        .collect()
}

/// Write the static x/z offsets of one slot for the chunk at `chunk_index` along the scroll axis.
///
/// y is left untouched; the compositor overwrites it every frame.
pub fn write_chunk_positions(vertices: &mut [Vertex], side: usize, slot: usize, chunk_index: u64) {
    let half = (side / 2) as f32;
    let origin = chunk_index as f32 * (side - 1) as f32;
    for row in 0..side {
        for column in 0..side {
            let position = &mut vertices[cell_index(side, row, column, slot)].position;
            position[0] = column as f32 - half;
            position[2] = row as f32 - half + origin;
        }
    }
}

/// Triangle list covering every tile: two triangles per quad, rows in order
pub fn triangle_indices(side: usize, chunk_count: usize) -> Vec<u32> {
    let quads = (side - 1) * (side - 1) * chunk_count;
    let mut indices = Vec::with_capacity(quads * 6);

    for slot in 0..chunk_count {
        for row in 0..side - 1 {
            for column in 0..side - 1 {
                let top_left = cell_index(side, row, column, slot) as u32;
                let top_right = top_left + 1;
                let bottom_left = top_left + side as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    top_right,
                    bottom_left,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }
    }

    indices
}

/// Line list tracing every triangle edge, for the wireframe overlay
pub fn wireframe_indices(triangles: &[u32]) -> Vec<u32> {
    let mut lines = Vec::with_capacity(triangles.len() * 2);
    for tri in triangles.chunks_exact(3) {
        lines.extend_from_slice(&[tri[0], tri[1], tri[1], tri[2], tri[2], tri[0]]);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_index_layout() {
        assert_eq!(cell_index(24, 0, 0, 0), 0);
        assert_eq!(cell_index(24, 0, 5, 0), 5);
        assert_eq!(cell_index(24, 2, 5, 0), 53);
        assert_eq!(cell_index(24, 2, 5, 3), 53 + 3 * 576);
    }

    #[test]
    fn test_shape_curve_tapers_at_edges() {
        let shape = shape_curve(24);
        assert_eq!(shape.len(), 24);
        assert!(shape[0].abs() < 1e-6);
        assert!(shape[23].abs() < 1e-5);
        assert!(shape.iter().any(|&s| s > 1.0));
    }

    #[test]
    fn test_chunk_positions() {
        let side = 4;
        let mut vertices = vec![Vertex::default(); side * side * 2];
        write_chunk_positions(&mut vertices, side, 1, 5);

        let first = vertices[cell_index(side, 0, 0, 1)].position;
        assert_eq!(first, [-2.0, 0.0, -2.0 + 15.0]);

        let last = vertices[cell_index(side, 3, 3, 1)].position;
        assert_eq!(last, [1.0, 0.0, 1.0 + 15.0]);

        // Slot 0 untouched
        assert!(vertices[..side * side].iter().all(|v| *v == Vertex::default()));
    }

    #[test]
    fn test_triangle_count() {
        let indices = triangle_indices(24, 8);
        assert_eq!(indices.len(), 23 * 23 * 8 * 6);
        assert!(indices.iter().all(|&i| (i as usize) < 24 * 24 * 8));
    }

    #[test]
    fn test_quads_stay_inside_their_tile() {
        let side = 5;
        let indices = triangle_indices(side, 3);
        for tri in indices.chunks_exact(3) {
            let slot = tri[0] as usize / (side * side);
            assert!(tri.iter().all(|&i| i as usize / (side * side) == slot));
        }
    }

    #[test]
    fn test_wireframe_edges() {
        let lines = wireframe_indices(&[0, 1, 2]);
        assert_eq!(lines, vec![0, 1, 1, 2, 2, 0]);
    }
}
