use nalgebra::Vector3;
use rayon::prelude::*;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

use crate::{
    enums::SliceFormat,
    error::ConvertError,
    slice::{ParsedSlice, SliceRecord},
};

/// Thickness used for the last slice when neither the header nor a
/// following slice provides one.
pub const DEFAULT_SLICE_THICKNESS: f64 = 1.0;

/// Lists, parses and orders the slice files of one directory.
#[derive(Clone, Copy, Debug, Default)]
pub struct SliceCollector {
    format: SliceFormat,
}

impl SliceCollector {
    pub fn new(format: SliceFormat) -> Self {
        Self { format }
    }

    /// Files in `dir` (not recursing) whose extension matches the slice
    /// format, sorted by file name.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Io`] if the directory cannot be read.
    pub fn list_candidates(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, ConvertError> {
        let mut paths: Vec<_> = fs::read_dir(dir.as_ref())?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| self.format.matches_extension(ext))
            })
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Collect the slices of the largest series in `dir`, ordered by
    /// ascending z position.
    ///
    /// Files that fail to parse are skipped with a warning. Returns
    /// `Ok(None)` (and warns) when no valid slice remains.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Io`] if the directory cannot be read.
    pub fn collect(
        &self,
        dir: impl AsRef<Path>,
    ) -> Result<Option<Vec<SliceRecord>>, ConvertError> {
        let dir = dir.as_ref();
        let candidates = self.list_candidates(dir)?;
        if candidates.is_empty() {
            warn!("No slice files found in {}", dir.display());
            return Ok(None);
        }

        let parsed: Vec<ParsedSlice> = candidates
            .par_iter()
            .filter_map(|path| match ParsedSlice::read(path) {
                Ok(slice) => Some(slice),
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    None
                }
            })
            .collect();

        if parsed.is_empty() {
            warn!("No valid slices found in {}", dir.display());
            return Ok(None);
        }

        let series = Self::select_largest_series(parsed);
        Ok(Some(Self::order_slices(series)))
    }

    /// Keep the series with the most slices. Ties go to the smallest UID.
    fn select_largest_series(slices: Vec<ParsedSlice>) -> Vec<ParsedSlice> {
        let mut series: BTreeMap<String, Vec<ParsedSlice>> = BTreeMap::new();
        for slice in slices {
            series.entry(slice.series_uid.clone()).or_default().push(slice);
        }

        if series.len() > 1 {
            for (uid, members) in &series {
                debug!("Series {:?}: {} slices", uid, members.len());
            }
        }

        let mut largest: Option<(String, Vec<ParsedSlice>)> = None;
        for (uid, members) in series {
            if largest
                .as_ref()
                .is_none_or(|(_, best)| members.len() > best.len())
            {
                largest = Some((uid, members));
            }
        }

        match largest {
            Some((uid, members)) => {
                info!("Using series {:?} with {} slices", uid, members.len());
                members
            }
            None => Vec::new(),
        }
    }

    /// Stable sort by z, then fill in missing slice thickness from the
    /// distance to the next slice.
    fn order_slices(mut slices: Vec<ParsedSlice>) -> Vec<SliceRecord> {
        slices.sort_by(|a, b| a.image_position[2].total_cmp(&b.image_position[2]));

        let thicknesses: Vec<f64> = slices
            .iter()
            .enumerate()
            .map(|(i, slice)| {
                slice.slice_thickness.unwrap_or_else(|| {
                    slices.get(i + 1).map_or(DEFAULT_SLICE_THICKNESS, |next| {
                        (Vector3::from(next.image_position) - Vector3::from(slice.image_position))
                            .norm()
                    })
                })
            })
            .collect();

        slices
            .into_iter()
            .zip(thicknesses)
            .map(|(slice, thickness)| slice.into_record(thickness))
            .collect()
    }
}
