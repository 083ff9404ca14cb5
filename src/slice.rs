use dicom::{
    core::Tag,
    object::{DefaultDicomObject, open_file},
    pixeldata::{ConvertOptions, PixelDecoder, VoiLutOption},
};
use dicom_dictionary_std::tags;
use ndarray::{Array2, s};
use std::path::{Path, PathBuf};

use crate::error::SliceParseError;

/// One 2D slice with the geometry needed to place it in a volume.
///
/// Pixel values are modality-rescaled (e.g. Hounsfield units for CT).
#[derive(Clone, Debug)]
pub struct SliceRecord {
    file_path: PathBuf,
    image_position: [f64; 3],
    orientation: [f64; 6],
    pixel_spacing: (f64, f64),
    slice_thickness: f64,
    pixels: Array2<f32>,
}

impl SliceRecord {
    /// `pixel_spacing` is `(dx, dy)`: the distance between adjacent columns,
    /// then between adjacent rows.
    pub fn new(
        file_path: impl Into<PathBuf>,
        image_position: [f64; 3],
        orientation: [f64; 6],
        pixel_spacing: (f64, f64),
        slice_thickness: f64,
        pixels: Array2<f32>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            image_position,
            orientation,
            pixel_spacing,
            slice_thickness,
            pixels,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Third component of the image position, the sort key of a series.
    pub fn z_position(&self) -> f64 {
        self.image_position[2]
    }

    pub fn image_position(&self) -> [f64; 3] {
        self.image_position
    }

    /// Row direction cosines followed by column direction cosines.
    pub fn orientation(&self) -> [f64; 6] {
        self.orientation
    }

    pub fn pixel_spacing(&self) -> (f64, f64) {
        self.pixel_spacing
    }

    pub fn slice_thickness(&self) -> f64 {
        self.slice_thickness
    }

    pub fn pixels(&self) -> &Array2<f32> {
        &self.pixels
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        self.pixels.dim()
    }
}

/// Header and pixel content of a slice file before the series is ordered.
///
/// Slice thickness stays optional here since it may have to be derived from
/// the neighbouring slice.
#[derive(Debug)]
pub(crate) struct ParsedSlice {
    pub(crate) file_path: PathBuf,
    pub(crate) series_uid: String,
    pub(crate) image_position: [f64; 3],
    pub(crate) orientation: [f64; 6],
    pub(crate) pixel_spacing: (f64, f64),
    pub(crate) slice_thickness: Option<f64>,
    pub(crate) pixels: Array2<f32>,
}

impl ParsedSlice {
    pub(crate) fn read(path: &Path) -> Result<Self, SliceParseError> {
        let dicom_object = open_file(path)?;

        let image_position = get_fixed::<3>(
            &dicom_object,
            tags::IMAGE_POSITION_PATIENT,
            "ImagePositionPatient",
        )?;
        let orientation = get_fixed::<6>(
            &dicom_object,
            tags::IMAGE_ORIENTATION_PATIENT,
            "ImageOrientationPatient",
        )?;
        // PixelSpacing is stored as (row spacing, column spacing)
        let [dy, dx] = get_fixed::<2>(&dicom_object, tags::PIXEL_SPACING, "PixelSpacing")?;
        let slice_thickness =
            get_f64(&dicom_object, tags::SLICE_THICKNESS).filter(|thickness| *thickness > 0.0);
        let series_uid =
            get_string(&dicom_object, tags::SERIES_INSTANCE_UID).unwrap_or_default();
        let pixels = decode_pixels(&dicom_object)?;

        Ok(Self {
            file_path: path.to_path_buf(),
            series_uid,
            image_position,
            orientation,
            pixel_spacing: (dx, dy),
            slice_thickness,
            pixels,
        })
    }

    pub(crate) fn into_record(self, slice_thickness: f64) -> SliceRecord {
        SliceRecord::new(
            self.file_path,
            self.image_position,
            self.orientation,
            self.pixel_spacing,
            slice_thickness,
            self.pixels,
        )
    }
}

/// Read only the first frame of a slice file, ignoring its geometry.
pub fn read_pixels(path: &Path) -> Result<Array2<f32>, SliceParseError> {
    let dicom_object = open_file(path)?;
    decode_pixels(&dicom_object)
}

fn decode_pixels(dicom_object: &DefaultDicomObject) -> Result<Array2<f32>, SliceParseError> {
    let pixel_data = dicom_object
        .decode_pixel_data()
        .map_err(|e| SliceParseError::PixelData(e.to_string()))?;
    let options = ConvertOptions::new().with_voi_lut(VoiLutOption::Identity);
    pixel_data
        .to_ndarray_with_options::<f32>(&options)
        .map(|arr| arr.slice_move(s![0, .., .., 0]))
        .map_err(|e| SliceParseError::PixelData(e.to_string()))
}

// --- Helpers ---

fn get_string(dicom_object: &DefaultDicomObject, tag: Tag) -> Option<String> {
    dicom_object
        .element(tag)
        .ok()?
        .to_str()
        .ok()
        .map(|s| s.trim_end_matches(['\0', ' ']).to_string())
}

fn get_f64(dicom_object: &DefaultDicomObject, tag: Tag) -> Option<f64> {
    dicom_object.element(tag).ok()?.to_float64().ok()
}

fn get_fixed<const N: usize>(
    dicom_object: &DefaultDicomObject,
    tag: Tag,
    name: &'static str,
) -> Result<[f64; N], SliceParseError> {
    let values = dicom_object
        .element(tag)
        .ok()
        .and_then(|element| element.to_multi_float64().ok())
        .ok_or(SliceParseError::MissingAttribute(name))?;

    <[f64; N]>::try_from(values.as_slice()).map_err(|_| SliceParseError::InvalidAttribute {
        name,
        expected: N,
        found: values.len(),
    })
}
