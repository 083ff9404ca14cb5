use image::{GrayImage, codecs::jpeg::JpegEncoder};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use crate::{
    enums::SliceFormat, error::ConvertError, slice::read_pixels, slice_collector::SliceCollector,
    windowing::window_slice,
};

pub const JPEG_QUALITY: u8 = 100;

/// Writes every slice file of a directory as a windowed 8-bit JPEG.
#[derive(Clone, Copy, Debug, Default)]
pub struct JpegExporter {
    format: SliceFormat,
}

impl JpegExporter {
    pub fn new(format: SliceFormat) -> Self {
        Self { format }
    }

    /// Export the slices of `input_dir` as `1.jpg`, `2.jpg`, ... into
    /// `output_dir`, in descending order of the numeric file name prefix.
    ///
    /// Each slice is windowed with its own min/max. Unreadable files and
    /// files without a numeric prefix are skipped; uniform slices become
    /// black images. Returns the written paths, empty if nothing matched.
    pub fn export(
        &self,
        input_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<Vec<PathBuf>, ConvertError> {
        let input_dir = input_dir.as_ref();
        let output_dir = output_dir.as_ref();

        let candidates = SliceCollector::new(self.format).list_candidates(input_dir)?;
        let ordered = order_by_prefix(candidates);
        if ordered.is_empty() {
            warn!("No slice files found in {}", input_dir.display());
            return Ok(Vec::new());
        }

        fs::create_dir_all(output_dir)?;

        let mut written = Vec::with_capacity(ordered.len());
        for path in ordered {
            let pixels = match read_pixels(&path) {
                Ok(pixels) => pixels,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            let image = match window_slice(pixels.view()) {
                Ok(image) => image,
                Err(ConvertError::DegenerateWindow { low, .. }) => {
                    warn!("{} is uniform ({}), writing a black image", path.display(), low);
                    let (height, width) = pixels.dim();
                    GrayImage::new(width as u32, height as u32)
                }
                Err(e) => return Err(e),
            };

            let jpg_path = output_dir.join(format!("{}.jpg", written.len() + 1));
            write_jpeg(&jpg_path, &image)?;
            info!("Saved {}", jpg_path.display());
            written.push(jpg_path);
        }

        Ok(written)
    }
}

/// The integer before the first `_` of the file name, or the whole stem
/// when there is no `_`.
pub fn numeric_prefix(path: &Path) -> Option<u64> {
    let name = path.file_name()?.to_str()?;
    let head = match name.split_once('_') {
        Some((head, _)) => head,
        None => path.file_stem()?.to_str()?,
    };
    head.parse().ok()
}

/// Descending by numeric prefix; equal prefixes keep their input order.
fn order_by_prefix(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut keyed: Vec<(u64, PathBuf)> = paths
        .into_iter()
        .filter_map(|path| match numeric_prefix(&path) {
            Some(prefix) => Some((prefix, path)),
            None => {
                warn!("Skipping {}: no numeric file name prefix", path.display());
                None
            }
        })
        .collect();
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    keyed.into_iter().map(|(_, path)| path).collect()
}

fn write_jpeg(path: &Path, image: &GrayImage) -> Result<(), ConvertError> {
    let mut writer = BufWriter::new(File::create(path)?);
    JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY).encode_image(image)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CapturedLogs;

    #[test]
    fn prefix_parsing() {
        assert_eq!(numeric_prefix(Path::new("dir/12_CT_head.dcm")), Some(12));
        assert_eq!(numeric_prefix(Path::new("007.IMA")), Some(7));
        assert_eq!(numeric_prefix(Path::new("CT_12.dcm")), None);
        assert_eq!(numeric_prefix(Path::new("slice.dcm")), None);
    }

    #[test]
    fn ordering_is_descending_and_stable() {
        let ordered = order_by_prefix(
            ["1_a.dcm", "3_a.dcm", "2_b.dcm", "2_a.dcm", "x.dcm", "10_a.dcm"]
                .map(PathBuf::from)
                .to_vec(),
        );
        assert_eq!(
            ordered,
            ["10_a.dcm", "3_a.dcm", "2_b.dcm", "2_a.dcm", "1_a.dcm"].map(PathBuf::from)
        );
    }

    #[test]
    fn jpeg_is_written_and_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let image = GrayImage::from_fn(16, 8, |x, y| image::Luma([(x * 16 + y) as u8]));

        write_jpeg(&dir.path().join("a.jpg"), &image).unwrap();
        write_jpeg(&dir.path().join("b.jpg"), &image).unwrap();

        let a = fs::read(dir.path().join("a.jpg")).unwrap();
        let b = fs::read(dir.path().join("b.jpg")).unwrap();
        assert_eq!(&a[..2], &[0xFF, 0xD8]);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_input_writes_nothing() {
        let input = tempfile::tempdir().unwrap();
        let output = input.path().join("jpg");

        let logs = CapturedLogs::default();

        let written = logs.capture(|| JpegExporter::default().export(input.path(), &output));

        assert!(written.unwrap().is_empty());
        assert!(!output.exists());
        let output = logs.contents();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("No slice files found"), "{output}");
    }
}
