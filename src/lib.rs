//! # DICOM-convert library
//!
//! This crate converts directories of DICOM (or Siemens `.ima`) slices into
//! volume formats used by downstream tools.
//!
//! Built on the dicom-rs ecosystem, it reads every slice file of a
//! directory, keeps the series with the most slices, orders the slices
//! along z and stacks them into a volume with a voxel-to-world affine.
//! Headers and pixel data are decoded in parallel using rayon. Supported
//! outputs are:
//!  - NIfTI-1 (`.nii` or gzip-compressed `.nii.gz`)
//!  - NumPy `.npy` arrays
//!  - numbered JPEG slices, windowed per slice
//!
//!  A small [`SliceViewer`] renders single slices of a saved volume.
//!  DICOM files are assumed to have the following attributes:
//!   - ImagePositionPatient, ImageOrientationPatient and PixelSpacing
//!   - No multiframe (always the first frame is used)
//!   - Voxel values that fit into 16-bit signed integers after rescaling
//!     (see [`NarrowingPolicy`])
//!
//! Files that cannot be read are skipped with a warning; a directory
//! without any valid slice yields `None` rather than an error.
//!
//! # Examples
//!
//! ## Converting a series to NIfTI
//!
//! ```no_run
//! # use dicom_convert::{ConversionConfig, convert::dicom_to_nifti};
//! let config = ConversionConfig::new("dcm/201", "nii", "patient.nii.gz")
//!     .expect("paths should not be empty");
//! match dicom_to_nifti(&config).expect("conversion should succeed") {
//!     Some(path) => println!("wrote {}", path.display()),
//!     None => println!("no slices found"),
//! }
//! ```

pub mod affine;
pub mod config;
pub mod convert;
pub mod enums;
pub mod error;
pub mod jpeg_export;
pub mod logging;
pub mod nifti_io;
pub mod npy_io;
pub mod slice;
pub mod slice_collector;
#[cfg(test)]
mod test_support;
pub mod viewer;
pub mod volume;
pub mod volume_assembler;
pub mod windowing;

pub use affine::Affine;
pub use config::ConversionConfig;
pub use enums::{NarrowingPolicy, SliceFormat};
pub use error::{ConvertError, SliceParseError};
pub use slice::SliceRecord;
pub use slice_collector::SliceCollector;
pub use viewer::SliceViewer;
pub use volume::VolumeDescriptor;
pub use volume_assembler::VolumeAssembler;
