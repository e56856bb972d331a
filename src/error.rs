//! Error types for LBP extraction

use std::path::PathBuf;

/// Errors raised while loading inputs or extracting LBP features
#[derive(Debug, thiserror::Error)]
pub enum LbpError {
    #[error("Volume and mask shapes differ: volume {volume:?}, mask {mask:?}")]
    DimensionMismatch {
        volume: (usize, usize, usize),
        mask: (usize, usize, usize),
    },

    #[error("{what} has {actual} voxels, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Mask value {value} at index {index} is not 0 or 1")]
    InvalidMaskValue { index: usize, value: f64 },

    #[error("Canonical table has no entry for pattern code {code}")]
    IncompleteCanonicalTable { code: u8 },

    #[error("Pattern code {code} is outside 0..64")]
    PatternCodeOutOfRange { code: u8 },

    #[error("Canonical table lists pattern code {code} more than once")]
    DuplicateTableEntry { code: u8 },

    #[error("Pattern code {original} maps to invalid canonical code {canonical}")]
    InvalidCanonicalCode { original: u8, canonical: i64 },

    #[error("Canonical table is missing column '{0}'")]
    MissingTableColumn(&'static str),

    #[error("Canonical table line {line}: {message}")]
    TableParse { line: usize, message: String },

    #[error("Unknown neighbour convention '{0}'")]
    UnknownConvention(String),

    #[error("Extraction cancelled")]
    Cancelled,

    #[error("Failed to access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("NIfTI error: {0}")]
    Nifti(String),
}

/// Result type alias for LBP operations
pub type Result<T> = std::result::Result<T, LbpError>;

/// `LengthMismatch` unless `actual == expected`
pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(LbpError::LengthMismatch { what, expected, actual })
    }
}
