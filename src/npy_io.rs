use ndarray::Array3;
use std::path::Path;

use crate::{error::ConvertError, volume::VolumeDescriptor};

/// Save the voxels as a NumPy int16 array shaped `(slice, row, col)`.
pub fn write_npy(path: impl AsRef<Path>, volume: &VolumeDescriptor) -> Result<(), ConvertError> {
    ndarray_npy::write_npy(path, &volume.to_slice_major())?;
    Ok(())
}

/// Load a `(slice, row, col)` int16 array saved by [`write_npy`].
pub fn read_npy(path: impl AsRef<Path>) -> Result<Array3<i16>, ConvertError> {
    Ok(ndarray_npy::read_npy(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affine::Affine;

    #[test]
    fn saved_array_is_slice_major() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("volume.npy");
        let slices = Array3::from_shape_fn((3, 2, 4), |(k, r, c)| (k * 100 + r * 10 + c) as i16);
        let volume = VolumeDescriptor::from_slice_major(slices.clone(), Affine::default());

        write_npy(&path, &volume).unwrap();
        let loaded = read_npy(&path).unwrap();

        assert_eq!(loaded, slices);
        assert_eq!(loaded[[2, 1, 3]], 213);
    }

    #[test]
    fn wrong_dimensionality_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.npy");
        ndarray_npy::write_npy(&path, &ndarray::Array1::<i16>::zeros(5)).unwrap();

        assert!(matches!(read_npy(&path), Err(ConvertError::NpyRead(_))));
    }
}
