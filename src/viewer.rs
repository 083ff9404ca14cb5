use image::GrayImage;
use ndarray::{Array3, ArrayView2, Axis};
use std::path::Path;
use tracing::debug;

use crate::{
    error::ConvertError, npy_io::read_npy, volume::VolumeDescriptor, windowing::window_slice,
};

/// Browses a volume one slice at a time.
///
/// The volume is held `(slice, row, col)`; rendering windows the current
/// slice with its own min/max.
#[derive(Clone, Debug)]
pub struct SliceViewer {
    slices: Array3<i16>,
    current: usize,
}

impl SliceViewer {
    /// # Errors
    ///
    /// Returns [`ConvertError::SliceIndexOutOfRange`] for a volume with no slices.
    pub fn new(slices: Array3<i16>) -> Result<Self, ConvertError> {
        if slices.len_of(Axis(0)) == 0 {
            return Err(ConvertError::SliceIndexOutOfRange { index: 0, count: 0 });
        }
        Ok(Self { slices, current: 0 })
    }

    pub fn from_volume(volume: &VolumeDescriptor) -> Result<Self, ConvertError> {
        Self::new(volume.to_slice_major())
    }

    pub fn from_npy(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        Self::new(read_npy(path)?)
    }

    pub fn slice_count(&self) -> usize {
        self.slices.len_of(Axis(0))
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn set_slice_index(&mut self, index: usize) -> Result<(), ConvertError> {
        let count = self.slice_count();
        if index >= count {
            return Err(ConvertError::SliceIndexOutOfRange { index, count });
        }
        debug!("Slice {}/{}", index, count - 1);
        self.current = index;
        Ok(())
    }

    /// `(row, col)` view of the current slice.
    pub fn current_slice(&self) -> ArrayView2<'_, i16> {
        self.slices.index_axis(Axis(0), self.current)
    }

    /// The current slice as an 8-bit image. A uniform slice renders black.
    pub fn render(&self) -> GrayImage {
        let slice = self.current_slice();
        window_slice(slice).unwrap_or_else(|_| {
            let (height, width) = slice.dim();
            GrayImage::new(width as u32, height as u32)
        })
    }
}
