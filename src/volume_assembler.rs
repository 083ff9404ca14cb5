use nalgebra::Vector3;
use ndarray::{Array3, Zip, s};
use tracing::{debug, warn};

use crate::{
    affine::Affine, enums::NarrowingPolicy, error::ConvertError, slice::SliceRecord,
    volume::VolumeDescriptor,
};

/// Stacks ordered slices into a [`VolumeDescriptor`].
pub struct VolumeAssembler;

impl VolumeAssembler {
    /// Assemble slices, already ordered by z, into a volume.
    ///
    /// Voxels are laid out `(col, row, slice)` and narrowed to `i16`
    /// according to `narrowing`.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::NoSlicesFound`] for an empty input
    /// - [`ConvertError::SliceShapeMismatch`] naming the first slice whose
    ///   shape differs from the first one
    /// - [`ConvertError::DegenerateGeometry`] if the slice axis cannot be derived
    /// - [`ConvertError::VoxelOutOfRange`] or [`ConvertError::NonFiniteVoxels`]
    ///   under [`NarrowingPolicy::Reject`]
    pub fn assemble(
        slices: &[SliceRecord],
        narrowing: NarrowingPolicy,
    ) -> Result<VolumeDescriptor, ConvertError> {
        let (first, last) = match (slices.first(), slices.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(ConvertError::NoSlicesFound),
        };

        Self::validate_dimensions(slices)?;
        let affine = Self::compute_affine(first, last, slices.len())?;

        let stacked = Self::build_volume_array(slices);
        let narrowed = Self::narrow(&stacked, narrowing)?;

        // (slice, row, col) -> (col, row, slice)
        let data = narrowed
            .permuted_axes([2, 1, 0])
            .as_standard_layout()
            .into_owned();

        debug!("Assembled volume {:?} with spacing {:?}", data.dim(), affine.spacing());
        Ok(VolumeDescriptor::new(data, affine))
    }

    /// X and Y columns are the negated direction cosines of the first slice
    /// scaled by pixel spacing. The Z column is the first-to-last
    /// displacement divided by `count - 1`. The origin is the first slice's
    /// position.
    pub fn compute_affine(
        first: &SliceRecord,
        last: &SliceRecord,
        count: usize,
    ) -> Result<Affine, ConvertError> {
        if count < 2 {
            return Err(ConvertError::DegenerateGeometry(format!(
                "{count} slice(s), at least 2 are needed to derive the slice axis"
            )));
        }

        let orientation = first.orientation();
        let row_cosines = Vector3::new(orientation[0], orientation[1], orientation[2]);
        let col_cosines = Vector3::new(orientation[3], orientation[4], orientation[5]);
        let (dx, dy) = first.pixel_spacing();

        let origin = Vector3::from(first.image_position());
        let z_axis = (Vector3::from(last.image_position()) - origin) / (count - 1) as f64;
        if z_axis.norm() <= f64::EPSILON {
            return Err(ConvertError::DegenerateGeometry(format!(
                "first and last slice share position {:?}",
                first.image_position()
            )));
        }

        Ok(Affine::from_columns(
            -row_cosines * dx,
            -col_cosines * dy,
            z_axis,
            origin,
        ))
    }

    fn validate_dimensions(slices: &[SliceRecord]) -> Result<(), ConvertError> {
        let expected = slices[0].shape();
        match slices.iter().find(|slice| slice.shape() != expected) {
            Some(slice) => Err(ConvertError::SliceShapeMismatch {
                path: slice.file_path().to_path_buf(),
                expected,
                found: slice.shape(),
            }),
            None => Ok(()),
        }
    }

    fn build_volume_array(slices: &[SliceRecord]) -> Array3<f32> {
        let (height, width) = slices[0].shape();
        let depth = slices.len();
        let mut volume = Array3::<f32>::zeros((depth, height, width));

        for (i, slice) in slices.iter().enumerate() {
            volume.slice_mut(s![i, .., ..]).assign(slice.pixels());
        }

        volume
    }

    fn narrow(
        volume: &Array3<f32>,
        narrowing: NarrowingPolicy,
    ) -> Result<Array3<i16>, ConvertError> {
        let lower = f32::from(i16::MIN);
        let upper = f32::from(i16::MAX);

        let non_finite = volume.iter().filter(|v| v.is_nan()).count();
        if non_finite > 0 {
            match narrowing {
                NarrowingPolicy::Reject => {
                    return Err(ConvertError::NonFiniteVoxels { count: non_finite });
                }
                NarrowingPolicy::Saturate => {
                    warn!("Replaced {} NaN voxels with 0", non_finite);
                }
            }
        }

        let (min, max) = volume
            .iter()
            .filter(|v| !v.is_nan())
            .map(|v| v.round())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        if min < lower || max > upper {
            match narrowing {
                NarrowingPolicy::Reject => {
                    return Err(ConvertError::VoxelOutOfRange {
                        min: f64::from(min),
                        max: f64::from(max),
                    });
                }
                NarrowingPolicy::Saturate => {
                    let clamped = volume
                        .iter()
                        .filter(|v| !v.is_nan() && !(lower..=upper).contains(&v.round()))
                        .count();
                    warn!(
                        "Clamped {} voxels outside {}..={} (data range {}..={})",
                        clamped,
                        i16::MIN,
                        i16::MAX,
                        min,
                        max
                    );
                }
            }
        }

        // NaN casts to 0
        Ok(Zip::from(volume).par_map_collect(|&v| v.round().clamp(lower, upper) as i16))
    }
}
