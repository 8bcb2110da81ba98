//! Insertion-ordered containers, re-exports *indexmap*.

use crate::hash::FixedHashState;

pub use indexmap;

/// An [`indexmap::IndexMap`] using [`FixedHashState`] by default.
///
/// Iteration follows insertion order, which is what encoded objects rely on.
///
/// ```
/// use fl_utils::index::IndexMap;
///
/// let mut map: IndexMap<&str, i32> = IndexMap::default();
/// map.insert("b", 1);
/// map.insert("a", 2);
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["b", "a"]);
/// ```
pub type IndexMap<K, V, S = FixedHashState> = indexmap::IndexMap<K, V, S>;
