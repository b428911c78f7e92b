//! Flat-array diagram arena.
//!
//! The whole MDD lives in one growable `Vec<i32>` partitioned into
//! fixed-stride node blocks: the block for a node at level `L` is
//! `domain_limits[L]` contiguous cells, and the root block always starts at
//! offset 0. A cell holds one of three cases, encoded directly in the
//! integer domain for serialization compatibility:
//!
//! - [`NO_EDGE`] (`0`): no tuple uses this value index here,
//! - [`TERMINAL`] (`-1`): an accepting path ends here,
//! - any positive value: the absolute offset of the child block.
//!
//! Valid child offsets are always `>= domain_limits[0]` (the root block
//! occupies the low addresses), so the three cases never collide. Inside
//! the crate, cells are handled through the tagged [`Cell`] view rather
//! than raw sentinels.

pub mod compact;
pub mod compile;
pub mod reduce;

use hashbrown::HashSet;

use crate::mdd_error::MddError;

/// Raw cell value meaning "no outgoing edge on this value index".
pub const NO_EDGE: i32 = 0;
/// Raw cell value meaning "accepting path ends here".
pub const TERMINAL: i32 = -1;

/// Tagged view of one diagram cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// No tuple uses this value index at this node.
    NoEdge,
    /// An accepting path ends here.
    Terminal,
    /// Absolute offset of the child block.
    Child(u32),
}

impl Cell {
    /// Decodes a raw cell value.
    ///
    /// Raw values below [`TERMINAL`] never occur in a well-formed diagram;
    /// [`validate_cells`] rejects them before decoding.
    #[inline]
    pub fn decode(raw: i32) -> Self {
        debug_assert!(raw >= TERMINAL);
        match raw {
            NO_EDGE => Cell::NoEdge,
            TERMINAL => Cell::Terminal,
            child => Cell::Child(child as u32),
        }
    }

    /// Encodes back to the raw integer representation.
    #[inline]
    pub fn encode(self) -> i32 {
        match self {
            Cell::NoEdge => NO_EDGE,
            Cell::Terminal => TERMINAL,
            Cell::Child(offset) => offset as i32,
        }
    }
}

/// Growable flat arena holding the diagram cells.
///
/// `free` is the next unused offset; cells past it are zeroed spare
/// capacity from geometric growth and are not part of the diagram.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagram {
    cells: Vec<i32>,
    free: usize,
}

impl Diagram {
    /// Creates a diagram holding just the (empty) root block.
    pub fn with_root(root_width: usize) -> Self {
        Self {
            cells: vec![NO_EDGE; root_width],
            free: root_width,
        }
    }

    /// Rewraps an existing cell vector; every cell is considered live.
    pub fn from_cells(cells: Vec<i32>) -> Self {
        let free = cells.len();
        Self { cells, free }
    }

    /// Next unused offset; equals the logical diagram length.
    #[inline]
    pub fn free_position(&self) -> usize {
        self.free
    }

    /// The live cells, `[0, free_position)`.
    #[inline]
    pub fn raw(&self) -> &[i32] {
        &self.cells[..self.free]
    }

    /// Tagged view of the cell at `position`.
    #[inline]
    pub fn get(&self, position: usize) -> Cell {
        Cell::decode(self.cells[position])
    }

    /// Overwrites the cell at `position`.
    #[inline]
    pub fn set(&mut self, position: usize, cell: Cell) {
        self.cells[position] = cell.encode();
    }

    /// Allocates a zeroed block of `width` cells at the free position and
    /// returns its starting offset.
    ///
    /// # Errors
    /// [`MddError::DiagramTooLarge`] if the block would start past the
    /// representable offset range.
    pub fn alloc_block(&mut self, width: usize) -> Result<usize, MddError> {
        let start = self.free;
        if start > i32::MAX as usize {
            return Err(MddError::DiagramTooLarge(start));
        }
        self.ensure_size(start + width);
        self.free = start + width;
        Ok(start)
    }

    /// Grows the backing array so it can hold `needed` cells: double the
    /// current size, or double the requested size if that is still not
    /// enough. New cells are zeroed, which is exactly [`NO_EDGE`].
    fn ensure_size(&mut self, needed: usize) {
        if needed <= self.cells.len() {
            return;
        }
        let target = (self.cells.len() * 2).max(needed * 2);
        self.cells.resize(target, NO_EDGE);
    }
}

/// Structural validation of a cell array against the per-level widths.
///
/// Walks every reachable block from the root and checks that each child
/// cell points at an in-bounds block start below the last level. Used after
/// decoding untrusted input and by debug invariant checks.
pub(crate) fn validate_cells(cells: &[i32], limits: &[usize]) -> Result<(), MddError> {
    if limits.is_empty() {
        return Err(MddError::EmptyScope);
    }
    if cells.len() < limits[0] {
        return Err(MddError::MalformedEncoding(format!(
            "diagram has {} cells, root block needs {}",
            cells.len(),
            limits[0]
        )));
    }
    // keyed by (offset, level): a block referenced from two levels is read
    // with a different stride at each, so each pairing needs its own walk
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut stack = vec![(0usize, 0usize)];
    while let Some((node, level)) = stack.pop() {
        for d in 0..limits[level] {
            let position = node + d;
            let raw = cells[position];
            if raw < TERMINAL {
                return Err(MddError::InvalidCell {
                    position,
                    value: raw,
                });
            }
            if let Cell::Child(child) = Cell::decode(raw) {
                let target = child as usize;
                let in_bounds = level + 1 < limits.len()
                    && target >= limits[0]
                    && target + limits[level + 1] <= cells.len();
                if !in_bounds {
                    return Err(MddError::InvalidCell {
                        position,
                        value: raw,
                    });
                }
                if seen.insert((target, level + 1)) {
                    stack.push((target, level + 1));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod layout_tests {
    //! `Cell` must stay a single machine word; it is created per cell visit
    //! on every query and reduction step.
    use super::*;
    use static_assertions::const_assert;

    const_assert!(std::mem::size_of::<Cell>() <= 8);
}
