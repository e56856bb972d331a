//! File-level LBP extraction
//!
//! Loads an image and its mask from NIfTI files, reads the canonical
//! pattern table and runs the extraction. The returned [`NiftiData`] of the
//! image carries the geometry needed to write the code map back out.

use std::path::Path;
use std::time::Instant;

use crate::error::{LbpError, Result};
use crate::lbp::{lbp_feature_vector, CanonicalTable, LbpFeatures, LbpParams};
use crate::nifti_io::{read_nifti_file, save_nifti_to_file, NiftiData};
use crate::utils::mask::mask_from_values;

/// Extract LBP features from an image file, mask file and table file
pub fn extract_from_files(
    image_path: &Path,
    mask_path: &Path,
    table_path: &Path,
    params: &LbpParams,
) -> Result<(LbpFeatures, NiftiData)> {
    let table = CanonicalTable::from_file(table_path)?;
    log::debug!("Loaded pattern table with {} classes from {}", table.num_classes(), table_path.display());

    extract_with_table(image_path, mask_path, &table, params)
}

/// Extract LBP features from image and mask files with an already loaded table
pub fn extract_with_table(
    image_path: &Path,
    mask_path: &Path,
    table: &CanonicalTable,
    params: &LbpParams,
) -> Result<(LbpFeatures, NiftiData)> {
    let start = Instant::now();
    let image = read_nifti_file(image_path)?;
    let mask_nii = read_nifti_file(mask_path)?;

    if image.dims != mask_nii.dims {
        return Err(LbpError::DimensionMismatch { volume: image.dims, mask: mask_nii.dims });
    }
    let mask = mask_from_values(&mask_nii.data)?;

    let (nx, ny, nz) = image.dims;
    log::debug!("Loaded {}x{}x{} volume and mask in {:.2?}", nx, ny, nz, start.elapsed());

    let features = lbp_feature_vector(&image.data, &mask, nx, ny, nz, table, params)?;
    log::info!(
        "{}: {} masked voxels, {} pattern classes",
        image_path.display(), features.voxel_count, features.frequencies.len()
    );

    Ok((features, image))
}

/// Write the canonical code map with the geometry of the source image
pub fn save_result_volume(path: &Path, features: &LbpFeatures, image: &NiftiData) -> Result<()> {
    let data: Vec<f64> = features.codes.iter().map(|&c| c as f64).collect();
    save_nifti_to_file(path, &data, image.dims, image.voxel_size, &image.affine)
}
