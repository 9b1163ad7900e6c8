// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell index-path validation against the geometry snapshot.

use core::fmt;
use core::ops::Range;

use crate::config::SectionRangePolicy;
use crate::geometry::{DataSourceCounts, SectionItemMap};
use crate::index_path::IndexPath;

/// Why a cell index path was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexPathValidationError {
    /// The section is outside the valid section range.
    NoSuchSection {
        /// The requested section.
        section: usize,
        /// Sections that would have been accepted.
        valid: Range<usize>,
    },
    /// The section is in range but the snapshot has no item count for it.
    ///
    /// This is an internal consistency failure, reported instead of panicking.
    SectionItemMapCorrupted {
        /// The requested section.
        section: usize,
        /// The snapshot's map at the time of the query.
        section_item_map: SectionItemMap,
    },
    /// The item is outside the section's item range.
    NoSuchItem {
        /// The requested section.
        section: usize,
        /// The requested item.
        item: usize,
        /// Items that would have been accepted.
        valid: Range<usize>,
    },
}

impl fmt::Display for IndexPathValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchSection { section, valid } => write!(
                f,
                "no such section ({section}); valid sections: {}..{}",
                valid.start, valid.end
            ),
            Self::SectionItemMapCorrupted {
                section,
                section_item_map,
            } => write!(
                f,
                "section item map corrupted at section {section}: {section_item_map:?}"
            ),
            Self::NoSuchItem {
                section,
                item,
                valid,
            } => write!(
                f,
                "no such item ({item}) in section {section}; valid items: {}..{}",
                valid.start, valid.end
            ),
        }
    }
}

impl core::error::Error for IndexPathValidationError {}

/// Returns the section range accepted under `policy`.
#[must_use]
pub fn section_range(policy: SectionRangePolicy, counts: &DataSourceCounts) -> Range<usize> {
    match policy {
        SectionRangePolicy::FirstSectionOnly => 0..1,
        SectionRangePolicy::SectionCount => 0..counts.section_count,
    }
}

/// Checks `index_path` against `counts`.
///
/// The caller is responsible for making sure `counts` is current; the engine
/// prepares itself before calling this.
pub fn validate_index_path(
    index_path: IndexPath,
    counts: &DataSourceCounts,
    policy: SectionRangePolicy,
) -> Result<(), IndexPathValidationError> {
    let IndexPath { section, item } = index_path;

    let sections = section_range(policy, counts);
    if !sections.contains(&section) {
        return Err(IndexPathValidationError::NoSuchSection {
            section,
            valid: sections,
        });
    }

    let Some(items_in_section) = counts.items_in(section) else {
        return Err(IndexPathValidationError::SectionItemMapCorrupted {
            section,
            section_item_map: counts.section_item_map.clone(),
        });
    };

    let items = 0..items_in_section;
    if !items.contains(&item) {
        return Err(IndexPathValidationError::NoSuchItem {
            section,
            item,
            valid: items,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    fn one_section_of_five() -> DataSourceCounts {
        DataSourceCounts::from_sections(&[5])
    }

    #[test]
    fn last_item_is_valid() {
        let counts = one_section_of_five();
        assert_eq!(
            validate_index_path(
                IndexPath::new(0, 4),
                &counts,
                SectionRangePolicy::FirstSectionOnly
            ),
            Ok(())
        );
    }

    #[test]
    fn item_past_end_is_rejected() {
        let counts = one_section_of_five();
        assert_eq!(
            validate_index_path(
                IndexPath::new(0, 5),
                &counts,
                SectionRangePolicy::FirstSectionOnly
            ),
            Err(IndexPathValidationError::NoSuchItem {
                section: 0,
                item: 5,
                valid: 0..5,
            })
        );
    }

    #[test]
    fn section_past_end_is_rejected() {
        let counts = one_section_of_five();
        assert_eq!(
            validate_index_path(
                IndexPath::new(1, 0),
                &counts,
                SectionRangePolicy::FirstSectionOnly
            ),
            Err(IndexPathValidationError::NoSuchSection {
                section: 1,
                valid: 0..1,
            })
        );
    }

    #[test]
    fn first_section_policy_rejects_later_sections() {
        let counts = DataSourceCounts::from_sections(&[2, 3]);
        let err = validate_index_path(
            IndexPath::new(1, 0),
            &counts,
            SectionRangePolicy::FirstSectionOnly,
        );
        assert!(
            matches!(err, Err(IndexPathValidationError::NoSuchSection { section: 1, .. })),
            "second section is outside the fixed range"
        );
        assert_eq!(
            validate_index_path(
                IndexPath::new(1, 2),
                &counts,
                SectionRangePolicy::SectionCount
            ),
            Ok(())
        );
    }

    #[test]
    fn missing_map_entry_is_reported_not_panicked() {
        let mut counts = DataSourceCounts::from_sections(&[2, 3]);
        counts.section_item_map.remove(&1);
        let err = validate_index_path(
            IndexPath::new(1, 0),
            &counts,
            SectionRangePolicy::SectionCount,
        );
        assert!(
            matches!(
                err,
                Err(IndexPathValidationError::SectionItemMapCorrupted { section: 1, .. })
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn empty_collection_rejects_everything() {
        let counts = DataSourceCounts::default();
        assert!(
            validate_index_path(
                IndexPath::new(0, 0),
                &counts,
                SectionRangePolicy::SectionCount
            )
            .is_err()
        );
        // Section 0 is in the fixed range but was never counted.
        assert!(matches!(
            validate_index_path(
                IndexPath::new(0, 0),
                &counts,
                SectionRangePolicy::FirstSectionOnly
            ),
            Err(IndexPathValidationError::SectionItemMapCorrupted { .. })
        ));
    }

    #[test]
    fn errors_display() {
        let err = IndexPathValidationError::NoSuchItem {
            section: 0,
            item: 9,
            valid: 0..5,
        };
        assert_eq!(
            err.to_string(),
            "no such item (9) in section 0; valid items: 0..5"
        );
    }
}
