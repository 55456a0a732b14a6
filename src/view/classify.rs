//! View classification.
//!
//! The family of a view is decided by folding a small state machine over
//! its indexers, left to right, starting from `Scalar`:
//!
//! | state       | next `Scalar` | next `All` | next `Simple` | next `Regular` | next `Irregular` |
//! |-------------|---------------|------------|---------------|----------------|------------------|
//! | `Scalar`    | `Scalar`      | `Simple`   | `Simple`      | `Regular`      | `Irregular`      |
//! | `Simple`    | `Regular`     | `Simple`   | `Irregular`   | `Irregular`    | `Irregular`      |
//! | `Regular`   | `Regular`     | `Irregular`| `Irregular`   | `Irregular`    | `Irregular`      |
//! | `Irregular` | `Irregular`   | `Irregular`| `Irregular`   | `Irregular`    | `Irregular`      |
//!
//! `Simple` and `Regular` views admit constant-stride element access;
//! `Irregular` views need per-element index lookups.

use crate::view::indexer::{Indexer, IndexerKind};

/// The representational family of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Every dimension seen so far was consumed; only a fold state.
    Scalar,
    /// Elements are contiguous in the base buffer.
    Simple,
    /// Elements are a fixed stride apart in the base buffer.
    Regular,
    /// Elements need an explicit per-dimension lookup.
    Irregular,
    /// The owning array itself. Never produced by [`classify`].
    Array,
}

impl ViewKind {
    /// Advances the classification state by one indexer.
    pub fn next(self, indexer: IndexerKind) -> ViewKind {
        use IndexerKind as I;
        match (self, indexer) {
            (ViewKind::Scalar, I::Scalar) => ViewKind::Scalar,
            (ViewKind::Scalar, I::All | I::Simple) => ViewKind::Simple,
            (ViewKind::Scalar, I::Regular) => ViewKind::Regular,
            (ViewKind::Scalar, I::Irregular) => ViewKind::Irregular,
            (ViewKind::Simple, I::Scalar) => ViewKind::Regular,
            (ViewKind::Simple, I::All) => ViewKind::Simple,
            (ViewKind::Simple, _) => ViewKind::Irregular,
            (ViewKind::Regular, I::Scalar) => ViewKind::Regular,
            (ViewKind::Regular, _) => ViewKind::Irregular,
            (ViewKind::Irregular | ViewKind::Array, _) => ViewKind::Irregular,
        }
    }
}

/// Classifies a sequence of indexer families.
pub fn classify_kinds(kinds: impl IntoIterator<Item = IndexerKind>) -> ViewKind {
    kinds
        .into_iter()
        .fold(ViewKind::Scalar, |state, kind| state.next(kind))
}

/// Classifies an indexer tuple.
pub fn classify(indexers: &[Indexer]) -> ViewKind {
    classify_kinds(indexers.iter().map(Indexer::kind))
}

/// Classifies the iteration over the sub-views found at `base_level`: the
/// indexers up to and including `base_level` are kept and every level below
/// is treated as consumed.
pub fn classify_prefix(indexers: &[Indexer], base_level: usize) -> ViewKind {
    classify_kinds(
        indexers[..=base_level]
            .iter()
            .map(Indexer::kind)
            .chain(std::iter::once(IndexerKind::Scalar)),
    )
}

/// Maps view levels to base levels.
///
/// Level `i` of a view is its `i`-th non-scalar indexer; the table records
/// which base level that indexer sits on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    levels: Vec<usize>,
}

impl LevelTable {
    /// Builds the table for an indexer tuple.
    pub fn new(indexers: &[Indexer]) -> Self {
        let levels = indexers
            .iter()
            .enumerate()
            .filter(|(_, indexer)| !indexer.is_scalar())
            .map(|(base_level, _)| base_level)
            .collect();
        Self { levels }
    }

    /// Number of view levels (non-scalar indexers).
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Base level of the given view level.
    pub fn base_level(&self, level: usize) -> usize {
        self.levels[level]
    }

    /// Base level of the outermost view level.
    pub fn first(&self) -> usize {
        self.levels.first().copied().unwrap_or(0)
    }

    /// One past the base level of the innermost view level. Base levels
    /// from here on are all consumed and only contribute to the base stride.
    pub fn stride_depth(&self) -> usize {
        self.levels.last().map_or(0, |&level| level + 1)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(size: usize) -> Indexer {
        Indexer::Simple { size }
    }

    fn regular(size: usize, step: isize) -> Indexer {
        Indexer::Regular { size, step }
    }

    #[test]
    fn test_simple_views() {
        assert_eq!(classify(&[Indexer::All, Indexer::All, Indexer::All]), ViewKind::Simple);
        assert_eq!(classify(&[Indexer::Scalar, simple(2), Indexer::All]), ViewKind::Simple);
        assert_eq!(classify(&[Indexer::Scalar, simple(2)]), ViewKind::Simple);
    }

    #[test]
    fn test_regular_views() {
        assert_eq!(classify(&[Indexer::All, Indexer::All, Indexer::Scalar]), ViewKind::Regular);
        assert_eq!(classify(&[simple(2), Indexer::All, Indexer::Scalar]), ViewKind::Regular);
        assert_eq!(classify(&[Indexer::Scalar, regular(3, 2)]), ViewKind::Regular);
        assert_eq!(classify(&[regular(3, 2), Indexer::Scalar]), ViewKind::Regular);
    }

    #[test]
    fn test_irregular_views() {
        assert_eq!(classify(&[Indexer::All, Indexer::Scalar, Indexer::All]), ViewKind::Irregular);
        assert_eq!(classify(&[regular(3, 2), Indexer::All]), ViewKind::Irregular);
        assert_eq!(classify(&[Indexer::All, simple(2)]), ViewKind::Irregular);
        assert_eq!(classify(&[Indexer::All, regular(5, -1)]), ViewKind::Irregular);
        let list = Indexer::Irregular(vec![0, 2].into());
        assert_eq!(classify(&[list, Indexer::Scalar]), ViewKind::Irregular);
    }

    #[test]
    fn test_all_scalar_stays_scalar() {
        assert_eq!(classify(&[Indexer::Scalar, Indexer::Scalar]), ViewKind::Scalar);
        assert_eq!(classify(&[]), ViewKind::Scalar);
    }

    #[test]
    fn test_prefix_classification() {
        let indexers = [Indexer::All, Indexer::All, Indexer::All];
        assert_eq!(classify_prefix(&indexers, 0), ViewKind::Regular);
        assert_eq!(classify_prefix(&indexers, 1), ViewKind::Regular);

        let indexers = [Indexer::All, regular(3, 2), Indexer::All];
        assert_eq!(classify_prefix(&indexers, 0), ViewKind::Regular);
        assert_eq!(classify_prefix(&indexers, 1), ViewKind::Irregular);
    }

    #[test]
    fn test_level_table() {
        let table = LevelTable::new(&[Indexer::Scalar, Indexer::All, Indexer::Scalar, simple(2), Indexer::Scalar]);
        assert_eq!(table.as_slice(), &[1, 3]);
        assert_eq!(table.depth(), 2);
        assert_eq!(table.first(), 1);
        assert_eq!(table.base_level(1), 3);
        assert_eq!(table.stride_depth(), 4);
    }
}
