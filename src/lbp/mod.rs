//! Rotation-invariant 3D local binary patterns (P=6, R=1)
//!
//! Pipeline stages:
//! - `shift`: zero-padded neighbour volumes
//! - `encode`: per-voxel 6-bit codes
//! - `pattern_table` / `mapper`: rotation-invariant canonicalization
//! - `histogram`: normalized label frequencies inside the mask

mod encode;
mod histogram;
mod mapper;
mod offsets;
mod pattern_table;
mod shift;

use std::ops::ControlFlow;
use std::time::Instant;

pub use encode::{encode_patterns, encode_patterns_with_progress, pattern_code};
pub use histogram::{build_histogram, FrequencyVector};
pub use mapper::map_to_canonical;
pub use offsets::{NeighborConvention, Offset, NEIGHBOR_OFFSETS, NUM_CODES, NUM_NEIGHBORS};
pub use pattern_table::{CanonicalTable, PatternClass};
pub use shift::shift_volume;

use crate::error::{check_len, Result};
use crate::utils::mask::{count_mask_voxels, validate_mask};

/// LBP extraction parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LbpParams {
    /// Offset to displacement mapping (default `Legacy`, matching
    /// precomputed rotation-invariant tables)
    pub convention: NeighborConvention,
}

/// Output of one extraction
#[derive(Debug, Clone, PartialEq)]
pub struct LbpFeatures {
    /// Canonical code per voxel, 0 outside the mask
    pub codes: Vec<u8>,
    /// Label frequencies inside the mask
    pub frequencies: FrequencyVector,
    /// Number of masked voxels
    pub voxel_count: usize,
}

fn check_inputs(volume: &[f64], mask: &[u8], nx: usize, ny: usize, nz: usize) -> Result<()> {
    let n_total = nx * ny * nz;
    check_len("volume", n_total, volume.len())?;
    check_len("mask", n_total, mask.len())?;
    validate_mask(mask)
}

fn finish(
    raw: Vec<u8>,
    mask: &[u8],
    table: &CanonicalTable,
    start: Instant,
) -> Result<LbpFeatures> {
    let codes = map_to_canonical(&raw, mask, table)?;
    let frequencies = build_histogram(&codes, mask, table)?;
    let voxel_count = count_mask_voxels(mask);

    log::debug!(
        "LBP: {} masked voxels, {} pattern classes in {:.2?}",
        voxel_count, frequencies.len(), start.elapsed()
    );

    Ok(LbpFeatures { codes, frequencies, voxel_count })
}

/// Compute the rotation-invariant LBP feature vector of a masked volume
///
/// # Arguments
/// * `volume` - Intensity volume (nx * ny * nz), Fortran order
/// * `mask` - Binary mask (nx * ny * nz), 1 = region of interest
/// * `nx`, `ny`, `nz` - Volume dimensions
/// * `table` - Rotation-invariant pattern table
/// * `params` - Extraction parameters
///
/// # Returns
/// Canonical code map and label frequencies. An all-zero mask gives an
/// empty frequency vector.
pub fn lbp_feature_vector(
    volume: &[f64],
    mask: &[u8],
    nx: usize, ny: usize, nz: usize,
    table: &CanonicalTable,
    params: &LbpParams,
) -> Result<LbpFeatures> {
    check_inputs(volume, mask, nx, ny, nz)?;
    let start = Instant::now();

    let raw = encode_patterns(volume, mask, nx, ny, nz, params.convention)?;
    finish(raw, mask, table, start)
}

/// LBP feature vector with default parameters
pub fn lbp_feature_vector_default(
    volume: &[f64],
    mask: &[u8],
    nx: usize, ny: usize, nz: usize,
    table: &CanonicalTable,
) -> Result<LbpFeatures> {
    lbp_feature_vector(volume, mask, nx, ny, nz, table, &LbpParams::default())
}

/// LBP feature vector with a per-slice progress callback
///
/// Returning `ControlFlow::Break(())` from the callback aborts with
/// [`crate::LbpError::Cancelled`]; nothing partial is returned.
pub fn lbp_feature_vector_with_progress<F>(
    volume: &[f64],
    mask: &[u8],
    nx: usize, ny: usize, nz: usize,
    table: &CanonicalTable,
    params: &LbpParams,
    progress: F,
) -> Result<LbpFeatures>
where
    F: FnMut(usize, usize) -> ControlFlow<()>,
{
    check_inputs(volume, mask, nx, ny, nz)?;
    let start = Instant::now();

    let raw = encode_patterns_with_progress(volume, mask, nx, ny, nz, params.convention, progress)?;
    finish(raw, mask, table, start)
}
