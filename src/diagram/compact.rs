//! Array compaction: physically remove reclaimed ranges and fix up every
//! surviving child offset.
//!
//! Two passes. The first copies each untouched span between consecutive
//! reclaimed ranges into the output, accumulating how many dead cells lie
//! before each boundary. The second rewrites every surviving child cell by
//! subtracting the cumulative shift of the reclaimed space strictly before
//! its target. The fix-up cannot be fused into the copy: a pointer's
//! correction depends on the total dead space preceding its *target*, which
//! is only known once all ranges are accounted for.

use std::collections::BTreeMap;

use log::debug;

use crate::diagram::{Cell, Diagram};

/// Builds the compacted cell array for `diagram`, removing the given
/// reclaimed ranges (start → width, sorted by start).
///
/// The output length is exactly `diagram.free_position()` minus the total
/// reclaimed width. With no reclaimed ranges this is a plain truncating
/// copy of the live cells.
pub(crate) fn compact(diagram: &Diagram, reclaimed: &BTreeMap<usize, usize>) -> Vec<i32> {
    let cells = diagram.raw();
    if reclaimed.is_empty() {
        return cells.to_vec();
    }

    let total: usize = reclaimed.values().sum();
    let mut out = Vec::with_capacity(cells.len() - total);
    let mut starts = Vec::with_capacity(reclaimed.len());
    let mut shifts = Vec::with_capacity(reclaimed.len());
    let mut cursor = 0usize;
    let mut shift = 0usize;
    for (&start, &width) in reclaimed {
        debug_assert!(start >= cursor, "reclaimed ranges overlap");
        out.extend_from_slice(&cells[cursor..start]);
        cursor = start + width;
        shift += width;
        starts.push(start);
        shifts.push(shift);
    }
    out.extend_from_slice(&cells[cursor..]);

    for cell in &mut out {
        if let Cell::Child(child) = Cell::decode(*cell) {
            let target = child as usize;
            // number of reclaimed ranges strictly before the target; the
            // target itself is a survivor, never inside a reclaimed range
            let preceding = starts.partition_point(|&s| s < target);
            if preceding > 0 {
                *cell = Cell::Child((target - shifts[preceding - 1]) as u32).encode();
            }
        }
    }

    debug!(
        "compaction dropped {total} cell(s): {} -> {}",
        cells.len(),
        out.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{NO_EDGE, TERMINAL};

    #[test]
    fn no_holes_is_a_truncating_copy() {
        let d = Diagram::from_cells(vec![2, NO_EDGE, TERMINAL, TERMINAL]);
        let out = compact(&d, &BTreeMap::new());
        assert_eq!(out, vec![2, NO_EDGE, TERMINAL, TERMINAL]);
    }

    #[test]
    fn holes_removed_and_pointers_shifted() {
        // layout (widths [2, 2, 2]):
        //   root [2, 6]    -> blocks at 2 (dead), 4 (dead), 6 (live)
        // after removing [2,2) and [4,2) the live block lands at offset 2
        let cells = vec![6, 6, TERMINAL, NO_EDGE, TERMINAL, NO_EDGE, TERMINAL, TERMINAL];
        let d = Diagram::from_cells(cells);
        let mut reclaimed = BTreeMap::new();
        reclaimed.insert(2usize, 2usize);
        reclaimed.insert(4usize, 2usize);
        let out = compact(&d, &reclaimed);
        assert_eq!(out, vec![2, 2, TERMINAL, TERMINAL]);
    }

    #[test]
    fn pointer_before_first_hole_is_untouched() {
        // root [3] width 1; block at 1 (live, width 2) -> block at 5 (live)
        // dead range [3,2) sits between them
        let cells = vec![1, 5, NO_EDGE, TERMINAL, TERMINAL, TERMINAL, NO_EDGE];
        let d = Diagram::from_cells(cells);
        let mut reclaimed = BTreeMap::new();
        reclaimed.insert(3usize, 2usize);
        let out = compact(&d, &reclaimed);
        assert_eq!(out, vec![1, 3, NO_EDGE, TERMINAL, NO_EDGE]);
    }

    #[test]
    fn length_accounting_holds() {
        let cells = vec![NO_EDGE; 16];
        let d = Diagram::from_cells(cells);
        let mut reclaimed = BTreeMap::new();
        reclaimed.insert(4usize, 3usize);
        reclaimed.insert(10usize, 2usize);
        let out = compact(&d, &reclaimed);
        assert_eq!(out.len(), 16 - 5);
    }
}
