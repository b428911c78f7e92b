//! Tuple compilation: table (or single tuple) → uncompressed trie.
//!
//! Each tuple is threaded through the diagram level by level, allocating a
//! fresh child block the first time a value index is used at a node and
//! writing [`Cell::Terminal`] at the last level. Tuples that reference a
//! value outside a variable's captured domain are pruned silently: the
//! table's universe is implicitly intersected with the declared domains.

use log::trace;

use crate::diagram::{Cell, Diagram};
use crate::index_view::IndexDomainView;
use crate::mdd_error::MddError;

/// Inserts one tuple into the trie.
///
/// Returns `Ok(true)` if the tuple was inserted (or already present) and
/// `Ok(false)` if it was pruned because some coordinate is outside its
/// variable's domain. All coordinates are mapped before the first write, so
/// a pruned tuple leaves the diagram untouched.
///
/// # Errors
/// [`MddError::ArityMismatch`] if the tuple length differs from the
/// variable count.
pub(crate) fn insert_tuple(
    diagram: &mut Diagram,
    views: &[IndexDomainView],
    limits: &[usize],
    tuple: &[i32],
) -> Result<bool, MddError> {
    let arity = limits.len();
    if tuple.len() != arity {
        return Err(MddError::ArityMismatch {
            expected: arity,
            found: tuple.len(),
        });
    }

    let mut indices = Vec::with_capacity(arity);
    for (value, view) in tuple.iter().zip(views) {
        match view.index_of(*value) {
            Some(index) => indices.push(index),
            None => {
                trace!("pruning tuple {tuple:?}: value {value} outside captured domain");
                return Ok(false);
            }
        }
    }

    let mut node = 0usize;
    for (level, &index) in indices.iter().enumerate() {
        let position = node + index;
        match diagram.get(position) {
            Cell::NoEdge => {
                if level + 1 == arity {
                    diagram.set(position, Cell::Terminal);
                } else {
                    let child = diagram.alloc_block(limits[level + 1])?;
                    diagram.set(position, Cell::Child(child as u32));
                    node = child;
                }
            }
            Cell::Child(child) => node = child as usize,
            Cell::Terminal => {
                // Uniform arity means a terminal only ever sits at the last
                // level; hitting one there is a duplicate tuple, a no-op.
                debug_assert_eq!(level + 1, arity, "terminal above the last level");
            }
        }
    }
    Ok(true)
}

/// Compiles a whole rectangular table into the trie.
pub(crate) fn compile_table(
    diagram: &mut Diagram,
    views: &[IndexDomainView],
    limits: &[usize],
    table: &[Vec<i32>],
) -> Result<(), MddError> {
    for tuple in table {
        insert_tuple(diagram, views, limits, tuple)?;
    }
    Ok(())
}
