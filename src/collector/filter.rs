// SPDX-License-Identifier: MPL-2.0
//! Extension allow-list predicate for collected files.
//!
//! The predicate is a pure function of the file name: the substring after
//! the last `.` is compared against the allow-list. Matching is
//! case-sensitive and evaluated independently per file.

/// File extensions accepted by the scanner by default.
///
/// The set is configuration, not a guarantee that every entry decodes; it
/// mirrors what the intake historically accepted.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "psd", "gif"];

/// Stateless allow-list filter over file-name extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    allowed: Vec<String>,
}

impl ExtensionFilter {
    /// Creates a filter from an explicit allow-list.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates the default image filter used by the scanner.
    #[must_use]
    pub fn image_defaults() -> Self {
        Self::new(IMAGE_EXTENSIONS.iter().copied())
    }

    /// Returns `true` if the file name's extension is on the allow-list.
    ///
    /// The extension is the substring after the last `.`; a name without a
    /// dot, or ending in a dot, never matches.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() && !extension.is_empty() => {
                self.allowed.iter().any(|allowed| allowed == extension)
            }
            _ => false,
        }
    }

    /// Returns the allow-list, for building dialog filters.
    #[must_use]
    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::image_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_accepts_allow_listed_extensions() {
        let filter = ExtensionFilter::default();
        for name in ["a.png", "b.jpg", "c.jpeg", "d.bmp", "e.psd", "f.gif"] {
            assert!(filter.matches(name), "{name} should match");
        }
    }

    #[test]
    fn default_filter_rejects_other_extensions() {
        let filter = ExtensionFilter::default();
        for name in ["a.txt", "b.pdf", "c.webp", "d.svg", "e.tiff"] {
            assert!(!filter.matches(name), "{name} should not match");
        }
    }

    #[test]
    fn matching_is_case_sensitive() {
        let filter = ExtensionFilter::default();
        assert!(!filter.matches("photo.PNG"));
        assert!(!filter.matches("photo.Jpg"));
    }

    #[test]
    fn extension_is_taken_after_the_last_dot() {
        let filter = ExtensionFilter::default();
        assert!(filter.matches("archive.backup.png"));
        assert!(!filter.matches("archive.png.gz"));
    }

    #[test]
    fn names_without_extension_never_match() {
        let filter = ExtensionFilter::default();
        assert!(!filter.matches("README"));
        assert!(!filter.matches("trailing."));
        assert!(!filter.matches(".hidden"));
    }

    #[test]
    fn custom_allow_list_is_respected() {
        let filter = ExtensionFilter::new(["webp"]);
        assert!(filter.matches("a.webp"));
        assert!(!filter.matches("a.png"));
    }
}
