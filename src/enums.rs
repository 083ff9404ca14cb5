/// Which slice files a directory scan picks up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SliceFormat {
    /// `.dcm` files only
    Dicom,
    /// Siemens `.ima` files only
    Ima,
    /// Both `.dcm` and `.ima`
    #[default]
    Any,
}

impl SliceFormat {
    /// Returns true if `ext` is one of this format's extensions (case-insensitive).
    pub fn matches_extension(&self, ext: &str) -> bool {
        let dcm = ext.eq_ignore_ascii_case("dcm");
        let ima = ext.eq_ignore_ascii_case("ima");
        match self {
            SliceFormat::Dicom => dcm,
            SliceFormat::Ima => ima,
            SliceFormat::Any => dcm || ima,
        }
    }
}

/// What to do with voxels that do not fit into `i16`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NarrowingPolicy {
    /// Fail the conversion
    #[default]
    Reject,
    /// Clamp to `i16::MIN..=i16::MAX` and report how many voxels were clamped
    Saturate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_match_ignores_case() {
        assert!(SliceFormat::Dicom.matches_extension("DCM"));
        assert!(!SliceFormat::Dicom.matches_extension("ima"));
        assert!(SliceFormat::Ima.matches_extension("IMA"));
        assert!(SliceFormat::Any.matches_extension("Ima"));
        assert!(SliceFormat::Any.matches_extension("dcm"));
        assert!(!SliceFormat::Any.matches_extension("npy"));
    }
}
