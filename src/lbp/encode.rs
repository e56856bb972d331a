//! Per-voxel 6-bit pattern encoding
//!
//! Every masked voxel is compared against its six face neighbours. Bit `j`
//! of the code is 1 when neighbour `j` (see [`NEIGHBOR_OFFSETS`]) is greater
//! than or equal to the centre, and 0 when it is strictly smaller.
//!
//! With the `parallel` feature the z-slices are encoded on the rayon pool.
//! Each slice owns a disjoint chunk of the output so no synchronisation is
//! needed.

use std::ops::ControlFlow;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{check_len, LbpError, Result};
use super::offsets::{NeighborConvention, NEIGHBOR_OFFSETS, NUM_NEIGHBORS};
use super::shift::shift_unchecked;

/// Encode one voxel from its centre value and neighbour values in bit order
///
/// Comparisons involving NaN are not "less than", so they set the bit.
///
/// # Examples
/// ```
/// use lbp3d_core::lbp::pattern_code;
///
/// let code = pattern_code(5.0, &[6.0, 4.0, 5.0, 1.0, 9.0, 0.0]);
/// assert_eq!(code, 0b010101);
/// ```
#[inline]
pub fn pattern_code(center: f64, neighbors: &[f64; NUM_NEIGHBORS]) -> u8 {
    let mut code = 0u8;
    for (j, &n) in neighbors.iter().enumerate() {
        if !(n < center) {
            code |= 1 << j;
        }
    }
    code
}

/// The six shifted neighbour volumes, in bit order
fn neighbor_volumes(
    volume: &[f64],
    nx: usize, ny: usize, nz: usize,
    convention: NeighborConvention,
) -> [Vec<f64>; NUM_NEIGHBORS] {
    std::array::from_fn(|j| shift_unchecked(volume, nx, ny, nz, NEIGHBOR_OFFSETS[j], convention))
}

/// Encode slice `k` into `slab` (length nx*ny)
fn encode_slice(
    k: usize,
    slab: &mut [u8],
    volume: &[f64],
    mask: &[u8],
    shifted: &[Vec<f64>; NUM_NEIGHBORS],
) {
    let offset = k * slab.len();
    for (local, code) in slab.iter_mut().enumerate() {
        let idx = local + offset;
        if mask[idx] != 1 {
            continue;
        }
        let neighbors: [f64; NUM_NEIGHBORS] = std::array::from_fn(|j| shifted[j][idx]);
        *code = pattern_code(volume[idx], &neighbors);
    }
}

#[cfg(feature = "parallel")]
fn encode_all_slices(
    codes: &mut [u8],
    slice_len: usize,
    volume: &[f64],
    mask: &[u8],
    shifted: &[Vec<f64>; NUM_NEIGHBORS],
) {
    codes.par_chunks_mut(slice_len)
        .enumerate()
        .for_each(|(k, slab)| encode_slice(k, slab, volume, mask, shifted));
}

#[cfg(not(feature = "parallel"))]
fn encode_all_slices(
    codes: &mut [u8],
    slice_len: usize,
    volume: &[f64],
    mask: &[u8],
    shifted: &[Vec<f64>; NUM_NEIGHBORS],
) {
    for (k, slab) in codes.chunks_mut(slice_len).enumerate() {
        encode_slice(k, slab, volume, mask, shifted);
    }
}

/// Compute raw LBP codes for every masked voxel
///
/// Voxels outside the mask are never evaluated and hold 0.
///
/// # Arguments
/// * `volume` - Intensity volume (nx * ny * nz)
/// * `mask` - Binary mask (nx * ny * nz), 1 = voxel of interest
/// * `nx`, `ny`, `nz` - Volume dimensions
/// * `convention` - Offset to displacement mapping
///
/// # Returns
/// Raw codes in [0, 63], length nx*ny*nz. `LengthMismatch` if the volume
/// or mask does not hold nx*ny*nz voxels.
pub fn encode_patterns(
    volume: &[f64],
    mask: &[u8],
    nx: usize, ny: usize, nz: usize,
    convention: NeighborConvention,
) -> Result<Vec<u8>> {
    let n_total = nx * ny * nz;
    check_len("volume", n_total, volume.len())?;
    check_len("mask", n_total, mask.len())?;

    let mut codes = vec![0u8; n_total];
    if n_total == 0 {
        return Ok(codes);
    }

    let shifted = neighbor_volumes(volume, nx, ny, nz, convention);
    encode_all_slices(&mut codes, nx * ny, volume, mask, &shifted);
    Ok(codes)
}

/// Compute raw LBP codes slice by slice with a progress callback
///
/// `progress(done, total)` is called after every z-slice. Returning
/// `ControlFlow::Break(())` stops the pass and the partial codes are dropped.
pub fn encode_patterns_with_progress<F>(
    volume: &[f64],
    mask: &[u8],
    nx: usize, ny: usize, nz: usize,
    convention: NeighborConvention,
    mut progress: F,
) -> Result<Vec<u8>>
where
    F: FnMut(usize, usize) -> ControlFlow<()>,
{
    let n_total = nx * ny * nz;
    check_len("volume", n_total, volume.len())?;
    check_len("mask", n_total, mask.len())?;

    let mut codes = vec![0u8; n_total];
    if n_total == 0 {
        return Ok(codes);
    }

    let shifted = neighbor_volumes(volume, nx, ny, nz, convention);
    for (k, slab) in codes.chunks_mut(nx * ny).enumerate() {
        encode_slice(k, slab, volume, mask, &shifted);
        if progress(k + 1, nz).is_break() {
            return Err(LbpError::Cancelled);
        }
    }

    Ok(codes)
}
