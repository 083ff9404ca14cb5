use std::path::PathBuf;
use thiserror::Error;

/// Reasons a single slice file is skipped. None of these abort a conversion.
#[derive(Debug, Error)]
pub enum SliceParseError {
    #[error("not a readable DICOM file: {0}")]
    Open(#[from] dicom::object::ReadError),

    #[error("missing attribute {0}")]
    MissingAttribute(&'static str),

    #[error("attribute {name} has {found} values, expected {expected}")]
    InvalidAttribute {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("pixel data could not be decoded: {0}")]
    PixelData(String),
}

/// Errors that abort a whole conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("No slices to assemble")]
    NoSlicesFound,

    #[error(
        "Slice {} has shape {found:?}, expected {expected:?}",
        path.display()
    )]
    SliceShapeMismatch {
        path: PathBuf,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Degenerate window: low ({low}) must be below high ({high})")]
    DegenerateWindow { low: f64, high: f64 },

    #[error("Voxel values {min}..={max} do not fit into a 16-bit signed integer")]
    VoxelOutOfRange { min: f64, max: f64 },

    #[error("{count} voxels are NaN and cannot be stored as integers")]
    NonFiniteVoxels { count: usize },

    #[error("Slice index {index} out of range for a volume with {count} slices")]
    SliceIndexOutOfRange { index: usize, count: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("NIfTI error: {0}")]
    Nifti(#[from] nifti::NiftiError),

    #[error("Unexpected array shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("NumPy write error: {0}")]
    NpyWrite(#[from] ndarray_npy::WriteNpyError),

    #[error("NumPy read error: {0}")]
    NpyRead(#[from] ndarray_npy::ReadNpyError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
