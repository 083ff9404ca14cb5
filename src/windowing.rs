use image::{GrayImage, ImageBuffer};
use ndarray::ArrayView2;
use rayon::prelude::*;

use crate::error::ConvertError;

/// Linear intensity window mapping `[low, high]` onto `0..=255`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Window {
    low: f64,
    high: f64,
}

impl Window {
    /// # Errors
    ///
    /// Returns [`ConvertError::DegenerateWindow`] unless `low < high`.
    pub fn new(low: f64, high: f64) -> Result<Self, ConvertError> {
        // also rejects NaN bounds
        if !(low < high) {
            return Err(ConvertError::DegenerateWindow { low, high });
        }
        Ok(Self { low, high })
    }

    /// Window spanning the minimum and maximum of `pixels`.
    pub fn from_min_max<T>(pixels: ArrayView2<'_, T>) -> Result<Self, ConvertError>
    where
        T: Copy + Into<f64>,
    {
        let (low, high) = min_max(pixels);
        Self::new(low, high)
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// `(value - low) / (high - low) * 255`, clamped, truncated toward zero.
    #[inline]
    pub fn apply(&self, value: f64) -> u8 {
        ((value - self.low) / (self.high - self.low) * 255.0).clamp(0.0, 255.0) as u8
    }

    /// Window a `(row, col)` slice into an 8-bit grayscale image.
    pub fn to_image<T>(&self, pixels: ArrayView2<'_, T>) -> Option<GrayImage>
    where
        T: Copy + Into<f64> + Sync,
    {
        let (height, width) = pixels.dim();
        let pixel_data: Vec<u8> = pixels
            .as_standard_layout()
            .as_slice()?
            .par_iter()
            .map(|&v| self.apply(v.into()))
            .collect();
        ImageBuffer::from_raw(width as u32, height as u32, pixel_data)
    }
}

/// Window a slice with its own min/max. A uniform slice yields
/// [`ConvertError::DegenerateWindow`].
pub fn window_slice<T>(pixels: ArrayView2<'_, T>) -> Result<GrayImage, ConvertError>
where
    T: Copy + Into<f64> + Sync,
{
    let window = Window::from_min_max(pixels.view())?;
    let (height, width) = pixels.dim();
    Ok(window
        .to_image(pixels)
        .unwrap_or_else(|| GrayImage::new(width as u32, height as u32)))
}

fn min_max<T>(pixels: ArrayView2<'_, T>) -> (f64, f64)
where
    T: Copy + Into<f64>,
{
    pixels
        .iter()
        .map(|&v| v.into())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v: f64| (lo.min(v), hi.max(v)))
}
