//! LBP3D-Core: rotation-invariant 3D local binary patterns
//!
//! Texture features for radiomics: every voxel inside a region-of-interest
//! mask is encoded by comparing it with its six face neighbours, the 6-bit
//! codes are collapsed into rotation classes, and the class frequencies
//! form the feature vector.
//!
//! # Modules
//! - `lbp`: neighbour shifting, encoding, canonical table, histogram
//! - `pipeline`: file-level extraction from NIfTI image and mask
//! - `nifti_io`: NIfTI volume reading and writing
//! - `utils`: mask conversion and validation
//! - `error`: error type shared by all modules
//!
//! # Features
//! - `parallel` (default): encode z-slices on the rayon thread pool

pub mod error;

// Core
pub mod lbp;
pub mod utils;

// I/O
pub mod nifti_io;
pub mod pipeline;

pub use error::{LbpError, Result};
