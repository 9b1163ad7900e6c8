// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element addressing: index paths and element kinds.

use alloc::string::String;
use alloc::rc::Rc;
use core::fmt;

/// The address of one element in a sectioned collection.
///
/// Index paths order lexicographically by `(section, item)`, which is the
/// order a collection presents its cells in.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IndexPath {
    /// Section index.
    pub section: usize,
    /// Item index within the section.
    pub item: usize,
}

impl IndexPath {
    /// Creates an index path.
    #[inline]
    #[must_use]
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl From<(usize, usize)> for IndexPath {
    fn from((section, item): (usize, usize)) -> Self {
        Self { section, item }
    }
}

impl fmt::Debug for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndexPath({}, {})", self.section, self.item)
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}

/// The flavor tag of a supplementary or decoration view, e.g. `"header"`.
///
/// Cells carry no kind. Kinds are cheap to clone; the string is shared.
///
/// Layouts that describe their kinds with an enum can implement
/// `From<TheirKind> for ElementKind` and pass the enum wherever an
/// `impl Into<ElementKind>` is accepted.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementKind(Rc<str>);

impl ElementKind {
    /// Creates a kind from a string tag.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self(Rc::from(tag))
    }

    /// Returns the string tag.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementKind {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for ElementKind {
    fn from(tag: String) -> Self {
        Self(Rc::from(tag))
    }
}

impl From<&Self> for ElementKind {
    fn from(kind: &Self) -> Self {
        kind.clone()
    }
}

impl AsRef<str> for ElementKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Debug for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementKind({:?})", self.as_str())
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;

    #[test]
    fn index_paths_order_by_section_then_item() {
        let mut paths = [
            IndexPath::new(1, 0),
            IndexPath::new(0, 7),
            IndexPath::new(0, 2),
            IndexPath::new(2, 0),
        ];
        paths.sort();
        assert_eq!(
            paths,
            [
                IndexPath::new(0, 2),
                IndexPath::new(0, 7),
                IndexPath::new(1, 0),
                IndexPath::new(2, 0),
            ]
        );
    }

    #[test]
    fn index_path_formats() {
        let path = IndexPath::from((3, 4));
        assert_eq!(format!("{path}"), "[3, 4]");
        assert_eq!(format!("{path:?}"), "IndexPath(3, 4)");
    }

    #[test]
    fn kinds_compare_by_tag() {
        #[derive(Clone, Copy)]
        enum Kind {
            Header,
        }
        impl From<Kind> for ElementKind {
            fn from(kind: Kind) -> Self {
                match kind {
                    Kind::Header => Self::new("header"),
                }
            }
        }

        let typed: ElementKind = Kind::Header.into();
        let raw = ElementKind::from("header");
        assert_eq!(typed, raw);
        assert_eq!(typed.as_str(), "header");

        let kinds: [ElementKind; 2] = ["b".into(), String::from("a").into()];
        assert!(kinds[1] < kinds[0], "kinds order by tag");
    }

    #[test]
    fn kind_clones_share_the_tag() {
        let kind = ElementKind::from("header");
        let copy = kind.clone();
        assert!(Rc::ptr_eq(&kind.0, &copy.0), "clones share one tag");
        assert_eq!(Rc::strong_count(&kind.0), 2);
    }
}
