//! # mdd-table
//!
//! mdd-table is a compact multi-valued decision diagram (MDD) builder and
//! membership engine for n-ary table constraints. A constraint solver
//! compiles the allowed tuples of a table constraint into one flat integer
//! array — a trie of fixed-stride node blocks — then canonicalizes it
//! bottom-up into a minimal DAG and compacts the array in place, leaving a
//! frozen structure that answers `check_tuple` / `check_assignment` for
//! generalized-arc-consistency filtering.
//!
//! ## Features
//! - Batch compilation from a tuple table, or incremental `add_tuple`
//! - BDD-style hash-consing reduction generalized to k-ary branching
//! - Two-pass array compaction with pointer fix-up
//! - `reuse`: rebinding one compiled diagram to capacity-compatible
//!   variable lists, sharing the frozen cells
//! - A flat text codec (two integer vectors) for persistence
//!
//! The crate is a pure, synchronous data structure: it decides membership,
//! never which domain values a propagator should remove, and callers
//! serialize access to a diagram while it is being built.
//!
//! ## Usage
//! ```
//! use mdd_table::prelude::*;
//!
//! let vars = vec![SimpleVar::new([0, 1, 2]), SimpleVar::new([0, 1, 2])];
//! let table = vec![vec![0, 0], vec![1, 1], vec![2, 2]];
//! let mut mdd = Mdd::from_table(vars, &table, None)?;
//! mdd.reduce()?;
//! assert!(mdd.check_tuple(&[1, 1]));
//! assert!(!mdd.check_tuple(&[0, 1]));
//! # Ok::<(), MddError>(())
//! ```

pub mod codec;
pub mod diagram;
pub mod index_view;
pub mod mdd;
pub mod mdd_error;
pub mod variable;

pub use mdd::Mdd;
pub use mdd_error::MddError;

/// A convenient prelude importing the most-used types.
pub mod prelude {
    pub use crate::codec::MddDump;
    pub use crate::index_view::IndexDomainView;
    pub use crate::mdd::Mdd;
    pub use crate::mdd_error::MddError;
    pub use crate::variable::{SimpleVar, TableVar};
}
