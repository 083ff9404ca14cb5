#![allow(dead_code)]

use dicom::core::{DataElement, PrimitiveValue, Tag, VR};
use dicom::object::{FileMetaTableBuilder, InMemDicomObject};
use dicom_dictionary_std::tags;
use std::path::Path;

const CT_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.2";
const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";

/// Geometry and content of one synthetic CT slice.
pub struct SyntheticSlice<'a> {
    pub series_uid: &'a str,
    pub position: [f64; 3],
    pub orientation: [f64; 6],
    /// (row spacing, column spacing) as stored in PixelSpacing
    pub pixel_spacing: [f64; 2],
    pub rows: u16,
    pub columns: u16,
    pub pixels: Vec<u16>,
    pub rescale: Option<(f64, f64)>,
}

impl SyntheticSlice<'_> {
    pub fn axial(z: f64, rows: u16, columns: u16, pixels: Vec<u16>) -> Self {
        SyntheticSlice {
            series_uid: "1.2.826.0.1.3680043.2.1125.1",
            position: [-100.0, -50.0, z],
            orientation: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            pixel_spacing: [0.75, 0.5],
            rows,
            columns,
            pixels,
            rescale: None,
        }
    }
}

fn ds(values: &[f64]) -> PrimitiveValue {
    PrimitiveValue::Strs(values.iter().map(|v| v.to_string()).collect())
}

fn element(tag: Tag, vr: VR, value: PrimitiveValue) -> DataElement<InMemDicomObject> {
    DataElement::new(tag, vr, value)
}

/// Write `slice` as an uncompressed, explicit VR little endian DICOM file.
pub fn write_slice(path: &Path, instance: u32, slice: &SyntheticSlice) {
    assert_eq!(slice.pixels.len(), slice.rows as usize * slice.columns as usize);
    let sop_instance_uid = format!("{}.{}", slice.series_uid, instance);

    let mut obj = InMemDicomObject::from_element_iter([
        element(tags::SOP_CLASS_UID, VR::UI, PrimitiveValue::from(CT_IMAGE_STORAGE)),
        element(tags::SOP_INSTANCE_UID, VR::UI, PrimitiveValue::from(sop_instance_uid.as_str())),
        element(tags::MODALITY, VR::CS, PrimitiveValue::from("CT")),
        element(tags::SERIES_INSTANCE_UID, VR::UI, PrimitiveValue::from(slice.series_uid)),
        element(tags::INSTANCE_NUMBER, VR::IS, PrimitiveValue::from(instance.to_string())),
        element(tags::IMAGE_POSITION_PATIENT, VR::DS, ds(&slice.position)),
        element(tags::IMAGE_ORIENTATION_PATIENT, VR::DS, ds(&slice.orientation)),
        element(tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16)),
        element(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, PrimitiveValue::from("MONOCHROME2")),
        element(tags::ROWS, VR::US, PrimitiveValue::from(slice.rows)),
        element(tags::COLUMNS, VR::US, PrimitiveValue::from(slice.columns)),
        element(tags::PIXEL_SPACING, VR::DS, ds(&slice.pixel_spacing)),
        element(tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(16_u16)),
        element(tags::BITS_STORED, VR::US, PrimitiveValue::from(16_u16)),
        element(tags::HIGH_BIT, VR::US, PrimitiveValue::from(15_u16)),
        element(tags::PIXEL_REPRESENTATION, VR::US, PrimitiveValue::from(0_u16)),
        element(
            tags::PIXEL_DATA,
            VR::OW,
            PrimitiveValue::U16(slice.pixels.iter().copied().collect()),
        ),
    ]);

    if let Some((slope, intercept)) = slice.rescale {
        obj.put(element(tags::RESCALE_SLOPE, VR::DS, ds(&[slope])));
        obj.put(element(tags::RESCALE_INTERCEPT, VR::DS, ds(&[intercept])));
    }

    let file_obj = obj
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN)
                .media_storage_sop_class_uid(CT_IMAGE_STORAGE)
                .media_storage_sop_instance_uid(sop_instance_uid),
        )
        .expect("meta table should build");
    file_obj.write_to_file(path).expect("slice should be written");
}

/// Pixel value of slice `k` at `(row, col)` used across tests.
pub fn pattern(k: usize, row: usize, col: usize) -> u16 {
    (100 * k + 10 * row + col) as u16
}

pub fn pattern_pixels(k: usize, rows: u16, columns: u16) -> Vec<u16> {
    (0..rows as usize)
        .flat_map(|r| (0..columns as usize).map(move |c| pattern(k, r, c)))
        .collect()
}
