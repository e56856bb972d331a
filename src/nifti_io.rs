//! NIfTI-1 volume I/O
//!
//! Loads `.nii` / `.nii.gz` volumes (gzip detected from the magic bytes)
//! into flat `f64` buffers in NIfTI order, `index = x + y*nx + z*nx*ny`,
//! and writes float32 volumes such as LBP code maps.

use std::io::{Cursor, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use ndarray::{ArrayViewD, Axis};
use nifti::volume::ndarray::IntoNdArray;
use nifti::{InMemNiftiObject, NiftiHeader, NiftiObject};

use crate::error::{LbpError, Result};

const HEADER_SIZE: usize = 348;
const VOX_OFFSET: usize = HEADER_SIZE + 4;

/// A loaded 3D volume
#[derive(Debug, Clone)]
pub struct NiftiData {
    /// Voxel values, Fortran order
    pub data: Vec<f64>,
    /// Dimensions (nx, ny, nz)
    pub dims: (usize, usize, usize),
    /// Voxel sizes in mm
    pub voxel_size: (f64, f64, f64),
    /// Affine transformation matrix (4x4, row-major)
    pub affine: [f64; 16],
}

fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&[0x1f, 0x8b])
}

/// Short header summary used in error messages
fn describe_header(bytes: &[u8]) -> String {
    if bytes.len() < HEADER_SIZE {
        return format!("only {} bytes, a header needs {}", bytes.len(), HEADER_SIZE);
    }
    let sizeof_hdr = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let datatype = i16::from_le_bytes([bytes[70], bytes[71]]);
    let magic = String::from_utf8_lossy(&bytes[344..348]);
    format!("sizeof_hdr={}, datatype={}, magic='{}'", sizeof_hdr, datatype, magic.trim_end_matches('\0'))
}

fn decode_object(bytes: &[u8]) -> Result<InMemNiftiObject> {
    if is_gzip(bytes) {
        InMemNiftiObject::from_reader(GzDecoder::new(Cursor::new(bytes))).map_err(|e| {
            let mut raw = Vec::new();
            let detail = match GzDecoder::new(Cursor::new(bytes)).read_to_end(&mut raw) {
                Ok(_) => describe_header(&raw),
                Err(_) => "corrupt gzip stream".to_string(),
            };
            LbpError::Nifti(format!("gzipped volume: {} ({})", e, detail))
        })
    } else {
        InMemNiftiObject::from_reader(Cursor::new(bytes))
            .map_err(|e| LbpError::Nifti(format!("{} ({})", e, describe_header(bytes))))
    }
}

/// Flatten the first 3D volume of an array in Fortran order
fn flatten_first_volume(array: ArrayViewD<'_, f64>) -> Result<(Vec<f64>, (usize, usize, usize))> {
    if array.ndim() < 3 {
        return Err(LbpError::Nifti(format!("expected a 3D volume, got {}D", array.ndim())));
    }

    let mut view = array;
    while view.ndim() > 3 {
        let last = view.ndim() - 1;
        view = view.index_axis_move(Axis(last), 0);
    }

    let shape = view.shape();
    let dims = (shape[0], shape[1], shape[2]);
    // Reversed axes iterate x fastest
    let data = view.t().iter().copied().collect();
    Ok((data, dims))
}

/// Affine from the sform rows, or a voxel-size diagonal without sform
fn get_affine(header: &NiftiHeader) -> [f64; 16] {
    let mut affine = [0.0; 16];
    affine[15] = 1.0;
    if header.sform_code > 0 {
        for (r, row) in [header.srow_x, header.srow_y, header.srow_z].iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                affine[r * 4 + c] = v as f64;
            }
        }
    } else {
        for axis in 0..3 {
            affine[axis * 5] = header.pixdim[axis + 1] as f64;
        }
    }
    affine
}

/// Load a NIfTI volume from bytes
pub fn load_nifti(bytes: &[u8]) -> Result<NiftiData> {
    let obj = decode_object(bytes)?;
    let header = obj.header();

    if header.dim[0] < 3 {
        return Err(LbpError::Nifti(format!("expected a 3D volume, got {}D", header.dim[0])));
    }
    let voxel_size = (
        header.pixdim[1] as f64,
        header.pixdim[2] as f64,
        header.pixdim[3] as f64,
    );
    let affine = get_affine(header);

    let array = obj.into_volume()
        .into_ndarray::<f64>()
        .map_err(|e| LbpError::Nifti(format!("failed to read voxel data: {}", e)))?;
    let (data, dims) = flatten_first_volume(array.view())?;

    Ok(NiftiData { data, dims, voxel_size, affine })
}

/// Read a `.nii` or `.nii.gz` file
pub fn read_nifti_file(path: &Path) -> Result<NiftiData> {
    let bytes = std::fs::read(path).map_err(|source| LbpError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_nifti(&bytes)
}

fn put_i16(buf: &mut [u8], offset: usize, v: i16) {
    buf[offset..offset + 2].copy_from_slice(&v.to_le_bytes());
}

fn put_f32(buf: &mut [u8], offset: usize, v: f32) {
    buf[offset..offset + 4].copy_from_slice(&v.to_le_bytes());
}

/// Encode a float32 single-file NIfTI-1 volume
pub fn save_nifti(
    data: &[f64],
    dims: (usize, usize, usize),
    voxel_size: (f64, f64, f64),
    affine: &[f64; 16],
) -> Result<Vec<u8>> {
    let (nx, ny, nz) = dims;
    if data.len() != nx * ny * nz {
        return Err(LbpError::LengthMismatch { what: "volume", expected: nx * ny * nz, actual: data.len() });
    }
    let dim_i16 = |n: usize| {
        i16::try_from(n).map_err(|_| LbpError::Nifti(format!("dimension {} does not fit a NIfTI-1 header", n)))
    };

    let mut header = [0u8; HEADER_SIZE];
    header[0..4].copy_from_slice(&(HEADER_SIZE as i32).to_le_bytes());

    let dim = [3, dim_i16(nx)?, dim_i16(ny)?, dim_i16(nz)?, 1, 1, 1, 1];
    for (i, &d) in dim.iter().enumerate() {
        put_i16(&mut header, 40 + i * 2, d);
    }
    put_i16(&mut header, 70, 16); // datatype FLOAT32
    put_i16(&mut header, 72, 32); // bitpix

    let pixdim = [1.0, voxel_size.0 as f32, voxel_size.1 as f32, voxel_size.2 as f32, 1.0, 1.0, 1.0, 1.0];
    for (i, &p) in pixdim.iter().enumerate() {
        put_f32(&mut header, 76 + i * 4, p);
    }
    put_f32(&mut header, 108, VOX_OFFSET as f32);
    put_f32(&mut header, 112, 1.0); // scl_slope
    put_i16(&mut header, 254, 1); // sform_code

    for (i, &v) in affine[..12].iter().enumerate() {
        put_f32(&mut header, 280 + i * 4, v as f32);
    }
    header[344..348].copy_from_slice(b"n+1\0");

    let mut buffer = Vec::with_capacity(VOX_OFFSET + data.len() * 4);
    buffer.extend_from_slice(&header);
    buffer.extend_from_slice(&[0u8; 4]);
    for &v in data {
        buffer.extend_from_slice(&(v as f32).to_le_bytes());
    }
    Ok(buffer)
}

/// Encode a gzipped float32 NIfTI-1 volume
pub fn save_nifti_gz(
    data: &[f64],
    dims: (usize, usize, usize),
    voxel_size: (f64, f64, f64),
    affine: &[f64; 16],
) -> Result<Vec<u8>> {
    let raw = save_nifti(data, dims, voxel_size, affine)?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw)
        .and_then(|_| encoder.finish())
        .map_err(|e| LbpError::Nifti(format!("gzip compression failed: {}", e)))
}

/// Write a volume to disk, gzipped when the path ends in `.nii.gz`
pub fn save_nifti_to_file(
    path: &Path,
    data: &[f64],
    dims: (usize, usize, usize),
    voxel_size: (f64, f64, f64),
    affine: &[f64; 16],
) -> Result<()> {
    let bytes = if path.to_string_lossy().ends_with(".nii.gz") {
        save_nifti_gz(data, dims, voxel_size, affine)?
    } else {
        save_nifti(data, dims, voxel_size, affine)?
    };
    std::fs::write(path, bytes).map_err(|source| LbpError::Io {
        path: path.to_path_buf(),
        source,
    })
}
