//! Raw code to canonical code mapping

use crate::error::{check_len, Result};
use super::pattern_table::CanonicalTable;

/// Replace raw codes by their canonical codes inside the mask
///
/// Voxels outside the mask are 0 in the result. A raw code without a
/// table row aborts the whole mapping.
///
/// # Arguments
/// * `codes` - Raw pattern codes (nx * ny * nz)
/// * `mask` - Binary mask (nx * ny * nz)
/// * `table` - Rotation-invariant pattern table
///
/// A mask of a different length than `codes` is a `LengthMismatch`.
pub fn map_to_canonical(codes: &[u8], mask: &[u8], table: &CanonicalTable) -> Result<Vec<u8>> {
    check_len("mask", codes.len(), mask.len())?;

    let mut result = vec![0u8; codes.len()];
    for ((out, &code), &m) in result.iter_mut().zip(codes).zip(mask) {
        if m == 1 {
            *out = table.lookup(code)?.code;
        }
    }
    Ok(result)
}
