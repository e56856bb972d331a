//! Rotation-invariant LBP features from a NIfTI image and mask
//!
//! Usage: cargo run --release --example lbp_nifti -- <image.nii[.gz]> <mask.nii[.gz]> [table.txt] [codes.nii.gz]
//!
//! Without a table file the rotation-invariant table is generated.
//! `LBP_CONVENTION=axis_aligned` switches the neighbour convention
//! (default `legacy`).

use std::path::Path;
use std::time::Instant;

use lbp3d_core::lbp::{CanonicalTable, LbpParams, NeighborConvention};
use lbp3d_core::pipeline::{extract_with_table, save_result_volume};

fn main() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        return Err(format!("usage: {} <image> <mask> [table] [codes-out]", args[0]));
    }
    let image_path = Path::new(&args[1]);
    let mask_path = Path::new(&args[2]);

    let convention = match std::env::var("LBP_CONVENTION") {
        Ok(value) => value.parse::<NeighborConvention>().map_err(|e| e.to_string())?,
        Err(_) => NeighborConvention::default(),
    };
    let params = LbpParams { convention };
    println!("[INFO] Neighbour convention: {:?}", params.convention);
    let table = match args.get(3) {
        Some(path) => CanonicalTable::from_file(Path::new(path)).map_err(|e| e.to_string())?,
        None => CanonicalTable::rotation_invariant(params.convention),
    };
    println!("[INFO] Pattern table: {} rotation classes", table.num_classes());

    let start = Instant::now();
    let (features, image) = extract_with_table(image_path, mask_path, &table, &params)
        .map_err(|e| e.to_string())?;
    let (nx, ny, nz) = image.dims;
    println!("[INFO] Volume: {}x{}x{}, {} masked voxels, extracted in {:.2?}",
        nx, ny, nz, features.voxel_count, start.elapsed());

    println!("\n{:<12} {:>10}", "pattern", "frequency");
    for (label, freq) in features.frequencies.dense(&table) {
        println!("{:<12} {:>10.6}", label, freq);
    }

    if let Some(out) = args.get(4) {
        save_result_volume(Path::new(out), &features, &image).map_err(|e| e.to_string())?;
        println!("\n[INFO] Saved code map to {}", out);
    }

    Ok(())
}
