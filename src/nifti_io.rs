use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions, writer::WriterOptions};
use ndarray::Ix3;
use std::path::Path;

use crate::{affine::Affine, error::ConvertError, volume::VolumeDescriptor};

/// NIfTI `sform_code`/`qform_code` for scanner-based anatomical coordinates.
const NIFTI_XFORM_SCANNER_ANAT: i16 = 1;
/// NIfTI `xyzt_units` value for millimetres.
const NIFTI_UNITS_MM: u8 = 2;

/// Write a volume as int16 NIfTI-1. A `.gz` suffix on `path` selects gzip
/// compression.
///
/// The affine is stored as the sform, voxel sizes in `pixdim`. Both are
/// `f32` in NIfTI-1, so a read-back affine matches to single precision.
pub fn write_nifti(path: impl AsRef<Path>, volume: &VolumeDescriptor) -> Result<(), ConvertError> {
    let header = build_header(volume);
    WriterOptions::new(path.as_ref())
        .reference_header(&header)
        .write_nifti(volume.data())?;
    Ok(())
}

/// Read a 3D NIfTI file back into a volume.
///
/// The affine comes from the sform when present, otherwise from `pixdim`
/// alone.
pub fn read_nifti(path: impl AsRef<Path>) -> Result<VolumeDescriptor, ConvertError> {
    let obj = ReaderOptions::new().read_file(path.as_ref())?;
    let affine = affine_from_header(obj.header());

    let data = obj
        .into_volume()
        .into_ndarray::<i16>()?
        .into_dimensionality::<Ix3>()?
        .as_standard_layout()
        .into_owned();

    Ok(VolumeDescriptor::new(data, affine))
}

fn build_header(volume: &VolumeDescriptor) -> NiftiHeader {
    let [dx, dy, dz] = volume.spacing();
    let [srow_x, srow_y, srow_z] = volume.affine().rows().map(|row| row.map(|v| v as f32));

    let mut header = NiftiHeader::default();
    header.pixdim = [1.0, dx as f32, dy as f32, dz as f32, 1.0, 1.0, 1.0, 1.0];
    header.srow_x = srow_x;
    header.srow_y = srow_y;
    header.srow_z = srow_z;
    header.sform_code = NIFTI_XFORM_SCANNER_ANAT;
    header.qform_code = 0;
    header.scl_slope = 1.0;
    header.scl_inter = 0.0;
    header.xyzt_units = NIFTI_UNITS_MM;
    header
}

fn affine_from_header(header: &NiftiHeader) -> Affine {
    if header.sform_code > 0 {
        Affine::from_rows(
            [header.srow_x, header.srow_y, header.srow_z].map(|row| row.map(f64::from)),
        )
    } else {
        let [_, dx, dy, dz, ..] = header.pixdim.map(f64::from);
        Affine::from_rows([
            [dx, 0.0, 0.0, 0.0],
            [0.0, dy, 0.0, 0.0],
            [0.0, 0.0, dz, 0.0],
        ])
    }
}
