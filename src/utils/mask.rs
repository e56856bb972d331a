//! Region-of-interest mask utilities
//!
//! Masks are flat `u8` buffers in NIfTI order holding exactly 0 or 1.

use crate::error::{LbpError, Result};

/// Convert loaded mask intensities to a binary mask
///
/// Only exact 0.0 and 1.0 are accepted. Anything else (including NaN and
/// label values such as 2) is rejected rather than thresholded.
pub fn mask_from_values(values: &[f64]) -> Result<Vec<u8>> {
    values.iter()
        .enumerate()
        .map(|(index, &value)| {
            if value == 0.0 {
                Ok(0)
            } else if value == 1.0 {
                Ok(1)
            } else {
                Err(LbpError::InvalidMaskValue { index, value })
            }
        })
        .collect()
}

/// Check that every mask entry is 0 or 1
pub fn validate_mask(mask: &[u8]) -> Result<()> {
    match mask.iter().position(|&m| m > 1) {
        Some(index) => Err(LbpError::InvalidMaskValue { index, value: mask[index] as f64 }),
        None => Ok(()),
    }
}

/// Number of voxels selected by the mask
pub fn count_mask_voxels(mask: &[u8]) -> usize {
    mask.iter().filter(|&&m| m == 1).count()
}
