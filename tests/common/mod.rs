//! Common test utilities for LBP3D-core integration tests

#![allow(dead_code)]

use lbp3d_core::lbp::{NeighborConvention, NEIGHBOR_OFFSETS};

/// Flat Fortran index
pub fn idx(dims: (usize, usize, usize), i: usize, j: usize, k: usize) -> usize {
    i + j * dims.0 + k * dims.0 * dims.1
}

/// Build a volume from a function of voxel coordinates
pub fn volume_from_fn<F>(dims: (usize, usize, usize), f: F) -> Vec<f64>
where
    F: Fn(usize, usize, usize) -> f64,
{
    let (nx, ny, nz) = dims;
    let mut data = Vec::with_capacity(nx * ny * nz);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                data.push(f(i, j, k));
            }
        }
    }
    data
}

/// Mask holding a single voxel
pub fn single_voxel_mask(dims: (usize, usize, usize), i: usize, j: usize, k: usize) -> Vec<u8> {
    let mut mask = vec![0u8; dims.0 * dims.1 * dims.2];
    mask[idx(dims, i, j, k)] = 1;
    mask
}

/// Set the six face neighbours of (i, j, k) so that neighbour `n` of the
/// convention reads `values[n]`
pub fn place_neighbors(
    volume: &mut [f64],
    dims: (usize, usize, usize),
    center: (usize, usize, usize),
    values: [f64; 6],
    convention: NeighborConvention,
) {
    for (n, &offset) in NEIGHBOR_OFFSETS.iter().enumerate() {
        let (dx, dy, dz) = convention.displacement(offset);
        let p = idx(
            dims,
            (center.0 as isize + dx) as usize,
            (center.1 as isize + dy) as usize,
            (center.2 as isize + dz) as usize,
        );
        volume[p] = values[n];
    }
}

/// Neighbour values per grid direction for the voxel at `center`
///
/// Order: -x, +x, -y, +y, -z, +z
pub fn grid_neighbors(
    volume: &[f64],
    dims: (usize, usize, usize),
    center: (usize, usize, usize),
) -> [f64; 6] {
    let (i, j, k) = center;
    [
        volume[idx(dims, i - 1, j, k)],
        volume[idx(dims, i + 1, j, k)],
        volume[idx(dims, i, j - 1, k)],
        volume[idx(dims, i, j + 1, k)],
        volume[idx(dims, i, j, k - 1)],
        volume[idx(dims, i, j, k + 1)],
    ]
}

/// Sum of frequencies must be 1 within tolerance
pub fn assert_normalized(total: f64) {
    assert!((total - 1.0).abs() < 1e-9, "Frequencies sum to {}, expected 1", total);
}

/// Deterministic pseudo-random intensities
pub fn lcg_volume(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) % 16) as f64
        })
        .collect()
}
