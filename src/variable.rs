//! Variable capability consumed by the MDD.
//!
//! The diagram only ever needs three things from a variable: its domain
//! values in ascending order (snapshotted once into an
//! [`IndexDomainView`](crate::index_view::IndexDomainView)), its live domain
//! size (for capacity checks in `reuse`), and — for whole-assignment
//! queries — whether it is currently assigned a single value. Solvers
//! implement [`TableVar`] on their own variable type; [`SimpleVar`] is a
//! minimal in-memory implementation for tests and standalone use.

/// Minimal interface a constraint variable exposes to the MDD.
pub trait TableVar {
    /// Domain values in strictly ascending order.
    fn domain_values(&self) -> impl Iterator<Item = i32> + '_;

    /// Current live domain size.
    fn domain_size(&self) -> usize;

    /// The assigned value if the domain is a singleton, `None` otherwise.
    fn assigned_value(&self) -> Option<i32>;
}

/// A plain in-memory variable: a fixed ascending domain plus an optional
/// singleton assignment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimpleVar {
    values: Vec<i32>,
    assigned: Option<i32>,
}

impl SimpleVar {
    /// Builds a variable over the given domain values.
    ///
    /// Values are sorted and deduplicated, so any order is accepted.
    pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
        let mut values: Vec<i32> = values.into_iter().collect();
        values.sort_unstable();
        values.dedup();
        Self {
            values,
            assigned: None,
        }
    }

    /// Records a singleton assignment, as a solver would after instantiation.
    pub fn assign(&mut self, value: i32) {
        self.assigned = Some(value);
    }

    /// Clears the assignment.
    pub fn clear(&mut self) {
        self.assigned = None;
    }
}

impl TableVar for SimpleVar {
    fn domain_values(&self) -> impl Iterator<Item = i32> + '_ {
        self.values.iter().copied()
    }

    fn domain_size(&self) -> usize {
        self.values.len()
    }

    fn assigned_value(&self) -> Option<i32> {
        self.assigned
    }
}
