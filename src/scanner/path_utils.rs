//! Unicode path normalization utilities.
//!
//! Document paths are normalized to NFC before they are used as identifiers
//! or sort keys. macOS stores file names decomposed (NFD) while Linux and
//! Windows usually store them composed (NFC); without normalization the same
//! visual name would sort differently and change origin attribution.
//!
//! # Example
//!
//! ```
//! use textdupe::scanner::path_utils::normalize_path_str;
//!
//! let nfc = "café.md";
//! let nfd = "cafe\u{0301}.md";
//! assert_eq!(normalize_path_str(nfc), normalize_path_str(nfd));
//! ```

use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Normalize a path string to NFC (Composed) form.
#[must_use]
pub fn normalize_path_str(s: &str) -> String {
    s.nfc().collect()
}

/// Build the display path of `path` relative to `root`.
///
/// The result uses `/` separators on every platform and is NFC-normalized.
/// Paths outside `root` are returned in full.
#[must_use]
pub fn display_path(root: &Path, path: &Path) -> String {
    let joined = match path.strip_prefix(root) {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.to_string_lossy().replace('\\', "/"),
    };
    normalize_path_str(&joined)
}
