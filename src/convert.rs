//! End-to-end conversions, one per output format.

use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::{
    config::ConversionConfig, enums::SliceFormat, error::ConvertError, jpeg_export::JpegExporter,
    nifti_io::write_nifti, npy_io::write_npy, slice_collector::SliceCollector,
    volume::VolumeDescriptor, volume_assembler::VolumeAssembler,
};

/// Collect and assemble the largest series of the input directory.
///
/// `Ok(None)` means no valid slice was found (already reported).
pub fn load_volume(config: &ConversionConfig) -> Result<Option<VolumeDescriptor>, ConvertError> {
    let Some(slices) = SliceCollector::new(config.slice_format()).collect(config.input_dir())?
    else {
        return Ok(None);
    };
    info!("Collected {} slices from {}", slices.len(), config.input_dir().display());

    VolumeAssembler::assemble(&slices, config.narrowing()).map(Some)
}

/// DICOM/IMA series to NIfTI. Returns the written path, or `None` when the
/// input directory held no valid slice.
pub fn dicom_to_nifti(config: &ConversionConfig) -> Result<Option<PathBuf>, ConvertError> {
    let Some(volume) = load_volume(config)? else {
        return Ok(None);
    };

    fs::create_dir_all(config.output_dir())?;
    let output_path = config.output_path();
    write_nifti(&output_path, &volume)?;
    info!("Saved: {}", output_path.display());

    Ok(Some(output_path))
}

/// DICOM/IMA series to a `(slice, row, col)` NumPy array.
pub fn dicom_to_npy(config: &ConversionConfig) -> Result<Option<PathBuf>, ConvertError> {
    let Some(volume) = load_volume(config)? else {
        return Ok(None);
    };

    fs::create_dir_all(config.output_dir())?;
    let output_path = config.output_path();
    write_npy(&output_path, &volume)?;
    info!("Saved: {}", output_path.display());

    Ok(Some(output_path))
}

/// Every slice file of `input_dir` to a numbered JPEG in `output_dir`.
pub fn dicom_to_jpeg(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    slice_format: SliceFormat,
) -> Result<Vec<PathBuf>, ConvertError> {
    JpegExporter::new(slice_format).export(input_dir, output_dir)
}
