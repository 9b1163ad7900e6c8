// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.

/// How the index-path validator bounds the section index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SectionRangePolicy {
    /// Only section `0` is considered valid, whatever the section count.
    ///
    /// This matches the behavior layouts built on this engine have always
    /// observed: item queries past the first section fail validation with
    /// [`NoSuchSection`](crate::validate::IndexPathValidationError::NoSuchSection).
    /// It is likely a latent defect for multi-section layouts, which should
    /// opt into [`SectionCount`](Self::SectionCount).
    #[default]
    FirstSectionOnly,
    /// Sections `0..section_count` are valid.
    SectionCount,
}

/// Tunables for a [`MetaLayout`](crate::engine::MetaLayout).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayoutConfig {
    /// Section bound applied by index-path validation.
    pub section_range: SectionRangePolicy,
}

impl LayoutConfig {
    /// Returns the config with `section_range` replaced.
    #[must_use]
    pub const fn with_section_range(mut self, policy: SectionRangePolicy) -> Self {
        self.section_range = policy;
        self
    }
}
