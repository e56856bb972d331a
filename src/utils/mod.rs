//! Shared volume utilities

pub mod mask;

pub use mask::{count_mask_voxels, mask_from_values, validate_mask};
