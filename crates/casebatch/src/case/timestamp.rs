//! Case folder timestamp suffixes.
//!
//! Case directories are named `<caseName>_<timestamp>` with a
//! seconds-resolution timestamp, so repeated case creation at normal
//! tooling cadence never collides.

use chrono::Local;

/// `_YYYY_MM_DD_HH_MM_SS`: underscore separator plus 19 timestamp chars.
pub const TIME_STAMP_SUFFIX_LEN: usize = 20;

const TIME_STAMP_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

/// Creates a timestamp string for a new case folder name.
pub fn create_time_stamp() -> String {
    Local::now().format(TIME_STAMP_FORMAT).to_string()
}

/// Whether a folder name ends with `_<timestamp>`.
pub fn ends_with_time_stamp(name: &str) -> bool {
    let all = name.as_bytes();
    if all.len() <= TIME_STAMP_SUFFIX_LEN {
        return false;
    }
    let bytes = &all[all.len() - TIME_STAMP_SUFFIX_LEN..];
    // Underscores at the separator positions, digits everywhere else:
    // _2026_08_07_10_30_00
    for (i, b) in bytes.iter().enumerate() {
        match i {
            0 | 5 | 8 | 11 | 14 | 17 => {
                if *b != b'_' {
                    return false;
                }
            }
            _ => {
                if !b.is_ascii_digit() {
                    return false;
                }
            }
        }
    }
    true
}

/// Strips the trailing `_<timestamp>` from a folder name.
///
/// Callers must check [`ends_with_time_stamp`] first.
pub fn strip_time_stamp(name: &str) -> &str {
    &name[..name.len() - TIME_STAMP_SUFFIX_LEN]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_time_stamp_has_expected_shape() {
        let stamp = create_time_stamp();
        assert_eq!(stamp.len(), TIME_STAMP_SUFFIX_LEN - 1);
        assert!(ends_with_time_stamp(&format!("Case_{}", stamp)));
    }

    #[test]
    fn test_ends_with_time_stamp_accepts_valid_suffix() {
        assert!(ends_with_time_stamp("CaseA_2026_08_07_10_30_00"));
        assert!(ends_with_time_stamp("my case_1999_01_01_00_00_00"));
    }

    #[test]
    fn test_ends_with_time_stamp_rejects_invalid() {
        // No suffix at all.
        assert!(!ends_with_time_stamp("CaseA"));
        // Bare timestamp with no preceding name.
        assert!(!ends_with_time_stamp("2026_08_07_10_30_00"));
        // Letters where digits belong.
        assert!(!ends_with_time_stamp("CaseA_2026_08_07_10_30_xx"));
        // Wrong separator layout.
        assert!(!ends_with_time_stamp("CaseA_2026-08-07_10_30_00"));
    }

    #[test]
    fn test_strip_time_stamp() {
        assert_eq!(strip_time_stamp("CaseA_2026_08_07_10_30_00"), "CaseA");
        assert_eq!(
            strip_time_stamp("Case_B_2026_08_07_10_30_00"),
            "Case_B"
        );
    }
}
