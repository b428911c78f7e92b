//! `Mdd`: the public façade tying compilation, reduction, compaction,
//! queries, and reuse together.
//!
//! The lifecycle is explicit in the storage type: a diagram starts out as
//! [`Storage::Building`] (a private growable arena), is canonicalized and
//! compacted exactly once by [`Mdd::reduce`], and from then on lives as
//! [`Storage::Frozen`] — an immutable `Arc<[i32]>` that [`Mdd::reuse`]
//! shares between sibling MDDs without copying or recompiling. Nothing
//! mutates a frozen diagram, which is what makes that aliasing safe.

use std::sync::Arc;

use crate::diagram::{self, Cell, Diagram};
use crate::diagram::{compact, compile, reduce};
use crate::index_view::IndexDomainView;
use crate::mdd_error::MddError;
use crate::variable::TableVar;

/// Backing storage for the diagram cells.
#[derive(Clone, Debug)]
pub(crate) enum Storage {
    /// Mutable arena, before `reduce()`.
    Building(Diagram),
    /// Immutable compacted cells, shared by `reuse()`.
    Frozen(Arc<[i32]>),
}

/// A multi-valued decision diagram over an ordered list of variables,
/// answering tuple-membership queries for a table constraint.
#[derive(Clone, Debug)]
pub struct Mdd<V> {
    pub(crate) vars: Vec<V>,
    pub(crate) views: Vec<IndexDomainView>,
    pub(crate) limits: Vec<usize>,
    pub(crate) storage: Storage,
    extendable: bool,
    savings: usize,
}

impl<V: TableVar> Mdd<V> {
    /// Creates an empty, incrementally extendable MDD over `vars`.
    ///
    /// Tuples are added with [`add_tuple`](Self::add_tuple) until
    /// [`reduce`](Self::reduce) freezes the diagram. `overrides`, when
    /// given, raises per-variable capacity above the live domain size to
    /// allow later [`reuse`](Self::reuse) by wider variables.
    pub fn new(vars: Vec<V>, overrides: Option<&[usize]>) -> Result<Self, MddError> {
        Self::with_extendable(vars, overrides, true)
    }

    /// Compiles a rectangular tuple table into an MDD.
    ///
    /// Tuples containing values outside a variable's domain are pruned
    /// silently. The result is not extendable; call
    /// [`reduce`](Self::reduce) to canonicalize and compact it.
    ///
    /// # Errors
    /// [`MddError::ArityMismatch`] if any tuple's length differs from the
    /// variable count, [`MddError::EmptyScope`] for an empty variable list.
    pub fn from_table(
        vars: Vec<V>,
        table: &[Vec<i32>],
        overrides: Option<&[usize]>,
    ) -> Result<Self, MddError> {
        let mut mdd = Self::with_extendable(vars, overrides, false)?;
        let Storage::Building(diagram) = &mut mdd.storage else {
            unreachable!("freshly constructed MDDs are building");
        };
        compile::compile_table(diagram, &mdd.views, &mdd.limits, table)?;
        Ok(mdd)
    }

    fn with_extendable(
        vars: Vec<V>,
        overrides: Option<&[usize]>,
        extendable: bool,
    ) -> Result<Self, MddError> {
        if vars.is_empty() {
            return Err(MddError::EmptyScope);
        }
        if let Some(overrides) = overrides {
            if overrides.len() != vars.len() {
                return Err(MddError::ArityMismatch {
                    expected: vars.len(),
                    found: overrides.len(),
                });
            }
        }
        let views: Vec<_> = vars.iter().map(IndexDomainView::from_var).collect();
        let limits: Vec<usize> = vars
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let floor = overrides.map_or(0, |o| o[i]);
                v.domain_size().max(floor)
            })
            .collect();
        // a zero-width block would make a child offset of 0 collide with
        // the NO_EDGE sentinel
        if let Some(index) = limits.iter().position(|&w| w == 0) {
            return Err(MddError::EmptyDomain { index });
        }
        let storage = Storage::Building(Diagram::with_root(limits[0]));
        Ok(Self {
            vars,
            views,
            limits,
            storage,
            extendable,
            savings: 0,
        })
    }

    /// Constructs a frozen MDD directly from limits and compacted cells;
    /// used by `reuse` and the codec.
    pub(crate) fn frozen(vars: Vec<V>, limits: Vec<usize>, cells: Arc<[i32]>) -> Self {
        let views = vars.iter().map(IndexDomainView::from_var).collect();
        Self {
            vars,
            views,
            limits,
            storage: Storage::Frozen(cells),
            extendable: false,
            savings: 0,
        }
    }

    /// Adds one tuple to an incrementally built MDD.
    ///
    /// Out-of-domain tuples are pruned silently (this is `Ok(())`, same as
    /// at batch compile time).
    ///
    /// # Errors
    /// [`MddError::NotExtendable`] unless this MDD was created with
    /// [`new`](Self::new) and has not been reduced;
    /// [`MddError::ArityMismatch`] for a wrong-length tuple.
    pub fn add_tuple(&mut self, tuple: &[i32]) -> Result<(), MddError> {
        if !self.extendable {
            return Err(MddError::NotExtendable);
        }
        let Storage::Building(diagram) = &mut self.storage else {
            return Err(MddError::NotExtendable);
        };
        compile::insert_tuple(diagram, &self.views, &self.limits, tuple)?;
        Ok(())
    }

    /// Canonicalizes and compacts the diagram, freezing it.
    ///
    /// Structurally identical subtrees are merged bottom-up, dead blocks
    /// are removed from the array, and all surviving offsets are fixed up.
    /// Queries answer identically before and after. Runs at most once.
    ///
    /// # Errors
    /// [`MddError::AlreadyReduced`] on a second call.
    pub fn reduce(&mut self) -> Result<(), MddError> {
        let Storage::Building(diagram) = &mut self.storage else {
            return Err(MddError::AlreadyReduced);
        };
        let free_before = diagram.free_position();
        let outcome = reduce::reduce(diagram, &self.limits);
        let compacted = compact::compact(diagram, &outcome.reclaimed);
        debug_assert_eq!(compacted.len(), free_before - outcome.reclaimed_cells);
        self.savings = outcome.reclaimed_cells;
        self.storage = Storage::Frozen(compacted.into());
        self.extendable = false;
        Ok(())
    }

    /// Whether [`reduce`](Self::reduce) has run (the diagram is frozen).
    #[inline]
    pub fn is_reduced(&self) -> bool {
        matches!(self.storage, Storage::Frozen(_))
    }

    /// Membership test for an explicit tuple.
    ///
    /// Fails closed: a wrong-length tuple or a value outside a variable's
    /// captured domain simply answers `false`.
    pub fn check_tuple(&self, tuple: &[i32]) -> bool {
        if tuple.len() != self.views.len() {
            return false;
        }
        let cells = self.cells();
        let mut node = 0usize;
        for (value, view) in tuple.iter().zip(&self.views) {
            let Some(index) = view.index_of(*value) else {
                return false;
            };
            match Cell::decode(cells[node + index]) {
                Cell::NoEdge => return false,
                Cell::Terminal => return true,
                Cell::Child(child) => node = child as usize,
            }
        }
        false
    }

    /// Membership test for the variables' current singleton assignment.
    ///
    /// Fails closed if any variable on the walked path is not yet assigned
    /// or is assigned a value outside its captured domain.
    pub fn check_assignment(&self) -> bool {
        let cells = self.cells();
        let mut node = 0usize;
        for (var, view) in self.vars.iter().zip(&self.views) {
            let Some(value) = var.assigned_value() else {
                return false;
            };
            let Some(index) = view.index_of(value) else {
                return false;
            };
            match Cell::decode(cells[node + index]) {
                Cell::NoEdge => return false,
                Cell::Terminal => return true,
                Cell::Child(child) => node = child as usize,
            }
        }
        false
    }

    /// Binds this frozen diagram to a new ordered variable list without
    /// rebuilding.
    ///
    /// Returns `None` — the normal "not reusable" signal, caller builds
    /// fresh — unless the diagram is frozen, the arity matches, and every
    /// replacement variable's live domain fits inside the reserved limit.
    /// On success the sibling MDD shares the same backing cells.
    pub fn reuse<W: TableVar>(&self, vars: Vec<W>) -> Option<Mdd<W>> {
        let Storage::Frozen(cells) = &self.storage else {
            return None;
        };
        if vars.len() != self.limits.len() {
            return None;
        }
        if vars
            .iter()
            .zip(&self.limits)
            .any(|(v, &limit)| v.domain_size() > limit)
        {
            return None;
        }
        Some(Mdd::frozen(vars, self.limits.clone(), Arc::clone(cells)))
    }

    /// Structural validation of the current diagram against the per-level
    /// widths; checked automatically in debug builds after `reduce`.
    pub fn validate_invariants(&self) -> Result<(), MddError> {
        diagram::validate_cells(self.cells(), &self.limits)
    }

    /// Number of live diagram cells (`free_position`).
    #[inline]
    pub fn diagram_len(&self) -> usize {
        self.cells().len()
    }

    /// Cells reclaimed by the reduction that froze this diagram; zero
    /// before `reduce()` and on reused/decoded siblings.
    #[inline]
    pub fn memory_savings(&self) -> usize {
        self.savings
    }

    /// Number of variables (the arity of the stored tuples).
    #[inline]
    pub fn arity(&self) -> usize {
        self.limits.len()
    }

    /// Per-variable reserved block widths.
    #[inline]
    pub fn domain_limits(&self) -> &[usize] {
        &self.limits
    }

    /// The variables this MDD is bound to.
    #[inline]
    pub fn variables(&self) -> &[V] {
        &self.vars
    }

    /// The live cells of the current diagram, whatever its state.
    #[inline]
    pub(crate) fn cells(&self) -> &[i32] {
        match &self.storage {
            Storage::Building(diagram) => diagram.raw(),
            Storage::Frozen(cells) => cells,
        }
    }
}
