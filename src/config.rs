use std::path::{Path, PathBuf};

use crate::enums::{NarrowingPolicy, SliceFormat};
use crate::error::ConvertError;

/// Parameters of one conversion run.
#[derive(Clone, Debug)]
pub struct ConversionConfig {
    input_dir: PathBuf,
    output_dir: PathBuf,
    output_name: String,
    slice_format: SliceFormat,
    narrowing: NarrowingPolicy,
}

impl ConversionConfig {
    /// Create a configuration, rejecting empty paths and names.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidConfig`] if any of the three values is empty.
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        output_name: impl Into<String>,
    ) -> Result<Self, ConvertError> {
        let input_dir = input_dir.into();
        let output_dir = output_dir.into();
        let output_name = output_name.into();

        if input_dir.as_os_str().is_empty() {
            return Err(ConvertError::InvalidConfig("input directory is empty".into()));
        }
        if output_dir.as_os_str().is_empty() {
            return Err(ConvertError::InvalidConfig("output directory is empty".into()));
        }
        if output_name.trim().is_empty() {
            return Err(ConvertError::InvalidConfig("output file name is empty".into()));
        }

        Ok(Self {
            input_dir,
            output_dir,
            output_name,
            slice_format: SliceFormat::default(),
            narrowing: NarrowingPolicy::default(),
        })
    }

    pub fn with_slice_format(mut self, slice_format: SliceFormat) -> Self {
        self.slice_format = slice_format;
        self
    }

    pub fn with_narrowing(mut self, narrowing: NarrowingPolicy) -> Self {
        self.narrowing = narrowing;
        self
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    pub fn slice_format(&self) -> SliceFormat {
        self.slice_format
    }

    pub fn narrowing(&self) -> NarrowingPolicy {
        self.narrowing
    }

    /// Full path of the single output file.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_name)
    }
}
