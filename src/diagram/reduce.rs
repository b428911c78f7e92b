//! Bottom-up canonicalization of the trie into a minimal-node DAG.
//!
//! A post-order walk resolves every child to its canonical offset,
//! overwriting cells in place, then asks whether an identical block has
//! already been seen at the same level and out-degree. If so, the node is
//! dead: its block is recorded as a reclaimable range and the earlier
//! offset stands in for it everywhere. Overwriting before comparing is
//! what makes the equality test canonical — two blocks are compared after
//! their subtrees have already been merged, so element-wise equality
//! coincides with subtree equivalence.
//!
//! All bookkeeping lives in a [`ReduceCtx`] local to one `reduce` call;
//! nothing about the reduction survives except the reclaimed-range map
//! handed to the compactor.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use log::debug;

use crate::diagram::{Cell, Diagram};

/// What one reduction pass found: the dead block ranges (start → width,
/// ordered by start) and the total number of reclaimable cells.
#[derive(Debug, Default)]
pub(crate) struct ReduceOutcome {
    pub reclaimed: BTreeMap<usize, usize>,
    pub reclaimed_cells: usize,
}

/// Ephemeral state for a single reduction pass.
///
/// `buckets[level]` groups previously-seen canonical blocks by out-degree;
/// each bucket keeps `(offset, block snapshot)` pairs in insertion order
/// and is probed most-recent-first.
struct ReduceCtx {
    buckets: Vec<HashMap<usize, Vec<(usize, Vec<i32>)>>>,
    outcome: ReduceOutcome,
}

impl ReduceCtx {
    fn new(levels: usize) -> Self {
        Self {
            buckets: (0..levels).map(|_| HashMap::new()).collect(),
            outcome: ReduceOutcome::default(),
        }
    }
}

/// Canonicalizes the whole diagram in place and reports the dead ranges.
///
/// The diagram still contains the dead blocks afterwards; compaction is a
/// separate pass. Recursion depth is bounded by the variable count.
pub(crate) fn reduce(diagram: &mut Diagram, limits: &[usize]) -> ReduceOutcome {
    let mut ctx = ReduceCtx::new(limits.len());
    let root = reduce_node(diagram, limits, 0, 0, &mut ctx);
    debug_assert_eq!(root, 0, "the root has no duplicate to merge into");
    debug!(
        "reduction merged {} block(s), {} cell(s) reclaimable",
        ctx.outcome.reclaimed.len(),
        ctx.outcome.reclaimed_cells
    );
    ctx.outcome
}

fn reduce_node(
    diagram: &mut Diagram,
    limits: &[usize],
    node: usize,
    level: usize,
    ctx: &mut ReduceCtx,
) -> usize {
    let width = limits[level];
    let mut degree = 0usize;
    for d in 0..width {
        match diagram.get(node + d) {
            Cell::Terminal => degree += 1,
            Cell::Child(child) => {
                let canonical = reduce_node(diagram, limits, child as usize, level + 1, ctx);
                diagram.set(node + d, Cell::Child(canonical as u32));
                degree += 1;
            }
            Cell::NoEdge => {}
        }
    }

    let children: Vec<i32> = diagram.raw()[node..node + width].to_vec();
    let bucket = ctx.buckets[level].entry(degree).or_default();
    for (canonical, snapshot) in bucket.iter().rev() {
        if *snapshot == children {
            ctx.outcome.reclaimed.insert(node, width);
            ctx.outcome.reclaimed_cells += width;
            return *canonical;
        }
    }
    bucket.push((node, children));
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::compile::insert_tuple;
    use crate::index_view::IndexDomainView;

    fn build(table: &[[i32; 3]]) -> (Diagram, Vec<IndexDomainView>, [usize; 3]) {
        let views: Vec<_> = (0..3)
            .map(|_| IndexDomainView::from_sorted(vec![0, 1, 2]))
            .collect();
        let limits = [3, 3, 3];
        let mut d = Diagram::with_root(3);
        for t in table {
            insert_tuple(&mut d, &views, &limits, t).unwrap();
        }
        (d, views, limits)
    }

    #[test]
    fn identical_leaf_blocks_merge() {
        // every accepted (x, y) allows all z, so the three z-blocks are
        // identical and two of them must die
        let table: Vec<[i32; 3]> = (0..3).flat_map(|x| (0..3).map(move |z| [x, x, z])).collect();
        let (mut d, _, limits) = build(&table);
        let free_before = d.free_position();
        let outcome = reduce(&mut d, &limits);
        assert_eq!(outcome.reclaimed.len(), 2);
        assert_eq!(outcome.reclaimed_cells, 6);
        // in-place: the diagram itself has not shrunk yet
        assert_eq!(d.free_position(), free_before);
    }

    #[test]
    fn distinct_blocks_survive() {
        let table = [[0, 0, 0], [1, 1, 1], [2, 2, 2]];
        let (mut d, _, limits) = build(&table);
        let outcome = reduce(&mut d, &limits);
        // z-blocks differ (terminal at a different index each), y-blocks too
        assert_eq!(outcome.reclaimed_cells, 0);
        assert!(outcome.reclaimed.is_empty());
    }

    #[test]
    fn merged_parent_cells_point_at_canonical_child() {
        let table: Vec<[i32; 3]> = (0..3).flat_map(|x| (0..3).map(move |z| [x, x, z])).collect();
        let (mut d, _, limits) = build(&table);
        reduce(&mut d, &limits);
        // collect the child offsets the y-blocks now carry; all three must
        // agree on the single surviving z-block
        let mut leaf_targets = Vec::new();
        for x in 0..3 {
            let Cell::Child(y_block) = d.get(x) else {
                panic!("root edge missing")
            };
            let Cell::Child(z_block) = d.get(y_block as usize + x) else {
                panic!("y edge missing")
            };
            leaf_targets.push(z_block);
        }
        assert_eq!(leaf_targets[0], leaf_targets[1]);
        assert_eq!(leaf_targets[1], leaf_targets[2]);
    }
}
