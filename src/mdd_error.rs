//! MddError: unified error type for mdd-table public APIs.
//!
//! Fatal caller-contract violations (arity mismatch, extending a frozen
//! diagram, a second `reduce()`) and codec failures surface here. Per-value
//! domain mismatches are deliberately *not* errors: out-of-domain tuples are
//! dropped at compile time and rejected at query time, and a failed
//! `reuse()` is reported as `None`, not as an `Err`.

use thiserror::Error;

/// Unified error type for mdd-table operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MddError {
    /// A tuple's length does not match the number of variables.
    #[error("tuple arity {found} does not match variable count {expected}")]
    ArityMismatch { expected: usize, found: usize },
    /// An MDD must span at least one variable.
    #[error("an MDD needs at least one variable")]
    EmptyScope,
    /// A variable with an empty domain (and no override) leaves a
    /// zero-width block, which would collide with the `NO_EDGE` sentinel.
    #[error("variable {index} has an empty domain and no capacity override")]
    EmptyDomain { index: usize },
    /// `add_tuple` on a frozen diagram, or on one built from a batch table.
    #[error("diagram cannot be extended; add_tuple is only legal on an incrementally built MDD before reduce()")]
    NotExtendable,
    /// `reduce()` called on an already-frozen diagram.
    #[error("reduce() has already run on this diagram")]
    AlreadyReduced,
    /// A node block would start past the representable offset range.
    #[error("diagram offset {0} exceeds the representable range")]
    DiagramTooLarge(usize),
    /// The text encoding could not be parsed.
    #[error("malformed diagram encoding: {0}")]
    MalformedEncoding(String),
    /// A serialized limits vector does not match the fresh variable list.
    #[error("encoded limit count {found} does not match variable count {expected}")]
    LimitCountMismatch { expected: usize, found: usize },
    /// A fresh variable's live domain exceeds the reserved limit.
    #[error("variable {index} has domain size {domain}, exceeding reserved limit {limit}")]
    CapacityExceeded {
        index: usize,
        domain: usize,
        limit: usize,
    },
    /// A cell holds a value that is neither a sentinel nor a valid block start.
    #[error("cell {position} holds {value}, which is not a sentinel or an in-bounds block start")]
    InvalidCell { position: usize, value: i32 },
}
