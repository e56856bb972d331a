//! Neighbour shifting with zero padding

use crate::error::{check_len, Result};
use super::offsets::{NeighborConvention, Offset};

/// Shift a volume so that each voxel holds its neighbour's intensity
///
/// The value at (x, y, z) is the input value at the position displaced by
/// `offset` (as interpreted by `convention`), or 0 when that position lies
/// outside the volume. Equivalent to embedding the volume in a zero-padded
/// buffer and reading back a translated window.
///
/// # Arguments
/// * `volume` - Input volume (nx * ny * nz), Fortran order
/// * `nx`, `ny`, `nz` - Volume dimensions
/// * `offset` - Face offset to read
/// * `convention` - Offset to displacement mapping
///
/// # Returns
/// Shifted volume of length nx*ny*nz, or `LengthMismatch` if `volume`
/// does not hold nx*ny*nz voxels
pub fn shift_volume(
    volume: &[f64],
    nx: usize, ny: usize, nz: usize,
    offset: Offset,
    convention: NeighborConvention,
) -> Result<Vec<f64>> {
    check_len("volume", nx * ny * nz, volume.len())?;
    Ok(shift_unchecked(volume, nx, ny, nz, offset, convention))
}

/// [`shift_volume`] for a volume whose length is already checked
pub(super) fn shift_unchecked(
    volume: &[f64],
    nx: usize, ny: usize, nz: usize,
    offset: Offset,
    convention: NeighborConvention,
) -> Vec<f64> {
    let n_total = nx * ny * nz;

    let (ddx, ddy, ddz) = convention.displacement(offset);
    let mut shifted = vec![0.0; n_total];

    for k in 0..nz {
        let Some(ks) = displaced(k, ddz, nz) else { continue };
        for j in 0..ny {
            let Some(js) = displaced(j, ddy, ny) else { continue };
            let row = j * nx + k * nx * ny;
            let src_row = js * nx + ks * nx * ny;
            for i in 0..nx {
                if let Some(is) = displaced(i, ddx, nx) {
                    shifted[i + row] = volume[is + src_row];
                }
            }
        }
    }

    shifted
}

/// Coordinate `c + d` if it lies in `[0, n)`
#[inline]
fn displaced(c: usize, d: isize, n: usize) -> Option<usize> {
    c.checked_add_signed(d).filter(|&v| v < n)
}
