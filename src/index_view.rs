//! `IndexDomainView`: dense index ↔ value mapping for one variable.
//!
//! The view captures an ascending snapshot of a variable's domain at
//! construction time and never changes afterwards, so the indices baked
//! into a diagram stay valid regardless of later live-domain changes.
//! `index_of` returning `None` is a normal signal, not an error: callers
//! prune the tuple at compile time and fail closed at query time.

use crate::variable::TableVar;

/// Frozen ascending snapshot of one variable's domain with binary-search
/// lookup from value to dense index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexDomainView {
    values: Vec<i32>,
}

impl IndexDomainView {
    /// Snapshots `var`'s current domain.
    pub fn from_var<V: TableVar>(var: &V) -> Self {
        let values: Vec<i32> = var.domain_values().collect();
        debug_assert!(values.windows(2).all(|w| w[0] < w[1]));
        Self { values }
    }

    /// Builds a view from an already-sorted, duplicate-free value list.
    pub fn from_sorted(values: Vec<i32>) -> Self {
        debug_assert!(values.windows(2).all(|w| w[0] < w[1]));
        Self { values }
    }

    /// Dense index of `value` in the captured domain, or `None` if the
    /// value lies outside it.
    #[inline]
    pub fn index_of(&self, value: i32) -> Option<usize> {
        self.values.binary_search(&value).ok()
    }

    /// Value at dense index `index`, if in range.
    #[inline]
    pub fn value_at(&self, index: usize) -> Option<i32> {
        self.values.get(index).copied()
    }

    /// Number of captured values.
    #[inline]
    pub fn value_count(&self) -> usize {
        self.values.len()
    }
}
