use ndarray::{Array3, ArrayView2, s};

use crate::affine::Affine;

/// An assembled volume: voxels indexed `(x, y, slice)` plus the transform
/// that places them in physical space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VolumeDescriptor {
    pub data: Array3<i16>,
    pub affine: Affine,
}

impl VolumeDescriptor {
    pub fn new(data: Array3<i16>, affine: Affine) -> Self {
        Self { data, affine }
    }

    /// Get the dimensions of the volume (x, y, slices)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<i16> {
        &self.data
    }

    pub fn affine(&self) -> &Affine {
        &self.affine
    }

    /// Voxel size along x, y and the slice axis.
    pub fn spacing(&self) -> [f64; 3] {
        self.affine.spacing()
    }

    /// Slice `index` as a `(row, col)` view, the orientation it was read in.
    pub fn get_slice(&self, index: usize) -> Option<ArrayView2<'_, i16>> {
        if index >= self.dim().2 {
            return None;
        }
        Some(self.data.slice(s![.., .., index]).reversed_axes())
    }

    /// Voxels in `(slice, row, col)` order, contiguous.
    pub fn to_slice_major(&self) -> Array3<i16> {
        self.data
            .view()
            .permuted_axes([2, 1, 0])
            .as_standard_layout()
            .into_owned()
    }

    /// Inverse of [`VolumeDescriptor::to_slice_major`].
    pub fn from_slice_major(slices: Array3<i16>, affine: Affine) -> Self {
        let data = slices
            .permuted_axes([2, 1, 0])
            .as_standard_layout()
            .into_owned();
        Self { data, affine }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VolumeDescriptor {
        // 2 slices of 2 rows x 3 cols, value = 100 * slice + 10 * row + col
        let slices = Array3::from_shape_fn((2, 2, 3), |(k, r, c)| (100 * k + 10 * r + c) as i16);
        VolumeDescriptor::from_slice_major(slices, Affine::default())
    }

    #[test]
    fn axes_are_col_row_slice() {
        let volume = sample();
        assert_eq!(volume.dim(), (3, 2, 2));
        assert_eq!(volume.data()[[2, 1, 1]], 112);
    }

    #[test]
    fn slice_view_restores_row_col() {
        let volume = sample();
        let slice = volume.get_slice(1).unwrap();
        assert_eq!(slice.dim(), (2, 3));
        assert_eq!(slice[[1, 2]], 112);
        assert!(volume.get_slice(2).is_none());
    }

    #[test]
    fn slice_major_round_trip() {
        let volume = sample();
        let slices = volume.to_slice_major();
        assert_eq!(slices.dim(), (2, 2, 3));
        assert!(slices.is_standard_layout());
        assert_eq!(VolumeDescriptor::from_slice_major(slices, Affine::default()), volume);
    }
}
