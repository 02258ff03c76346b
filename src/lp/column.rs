//! # Exact columns
//!
//! One decision variable's column of the rational constraint matrix: objective coefficient and
//! bounds, the flushed shadows of the values last shipped to the backend, the row-list with its
//! LP-linked prefix, and the solution values of the last solve, each guarded by a validity
//! stamp.
use num_traits::Zero;

use crate::data::elements::BasisStatus;
use crate::data::number_types::rational::Rational;
use crate::lp::matrix::ColEntry;

/// Pending changes of a column that the backend has not seen yet.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ColumnDirty {
    /// The objective coefficient changed.
    pub objective: bool,
    /// The lower bound changed.
    pub lower: bool,
    /// The upper bound changed.
    pub upper: bool,
    /// A coefficient changed and was recorded on this column.
    pub coefficients: bool,
}

impl ColumnDirty {
    /// Whether any change is pending.
    #[must_use]
    pub fn any(&self) -> bool {
        self.objective || self.lower || self.upper || self.coefficients
    }
}

/// A column of the exact LP.
#[derive(Debug)]
pub struct Column {
    /// Index of the paired column in the floating-point peer.
    pub(crate) peer: usize,
    pub(crate) name: String,
    pub(crate) objective: Rational,
    pub(crate) lower: Rational,
    pub(crate) upper: Rational,
    /// Values last shipped to the backend.
    pub(crate) flushed_objective: Rational,
    pub(crate) flushed_lower: Rational,
    pub(crate) flushed_upper: Rational,
    /// Whether the paired variable is integer, used for row integrality.
    pub(crate) integral: bool,

    /// Row-list; the prefix `[0, nr_lp_rows)` holds the linked entries whose row is in the LP.
    pub(crate) entries: Vec<ColEntry>,
    pub(crate) nr_lp_rows: usize,
    /// Entries whose link index is absent.
    pub(crate) nr_unlinked: usize,
    pub(crate) lp_rows_sorted: bool,
    pub(crate) nonlp_rows_sorted: bool,

    /// Position in the container's column array, when attached.
    pub(crate) lp_position: Option<usize>,
    /// Position in the backend, when flushed.
    pub(crate) lpi_position: Option<usize>,
    pub(crate) dirty: ColumnDirty,
    pub(crate) use_count: usize,

    pub(crate) primal: Rational,
    pub(crate) reduced_cost: Rational,
    pub(crate) farkas_coefficient: Rational,
    pub(crate) basis_status: BasisStatus,
    pub(crate) valid_solution_stamp: u64,
    pub(crate) valid_farkas_stamp: u64,
}

impl Column {
    pub(crate) fn new(
        peer: usize,
        name: String,
        objective: Rational,
        lower: Rational,
        upper: Rational,
        integral: bool,
    ) -> Self {
        Self {
            peer,
            name,
            flushed_objective: objective.clone(),
            flushed_lower: lower.clone(),
            flushed_upper: upper.clone(),
            objective,
            lower,
            upper,
            integral,
            entries: Vec::new(),
            nr_lp_rows: 0,
            nr_unlinked: 0,
            lp_rows_sorted: true,
            nonlp_rows_sorted: true,
            lp_position: None,
            lpi_position: None,
            dirty: ColumnDirty::default(),
            use_count: 0,
            primal: Rational::zero(),
            reduced_cost: Rational::zero(),
            farkas_coefficient: Rational::zero(),
            basis_status: BasisStatus::Lower,
            valid_solution_stamp: 0,
            valid_farkas_stamp: 0,
        }
    }

    /// Index of the paired floating-point column.
    #[must_use]
    pub fn peer(&self) -> usize {
        self.peer
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Objective coefficient.
    #[must_use]
    pub fn objective(&self) -> &Rational {
        &self.objective
    }

    /// Lower bound.
    #[must_use]
    pub fn lower(&self) -> &Rational {
        &self.lower
    }

    /// Upper bound.
    #[must_use]
    pub fn upper(&self) -> &Rational {
        &self.upper
    }

    /// Whether the paired variable is integer.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        self.integral
    }

    /// Number of stored coefficients.
    #[must_use]
    pub fn nr_entries(&self) -> usize {
        self.entries.len()
    }

    /// Whether both bounds are finite.
    #[must_use]
    pub fn has_finite_bounds(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }

    /// The count of infinite bound directions, `0` through `2`.
    pub(crate) fn nr_infinite_bounds(&self) -> usize {
        usize::from(self.lower.is_infinite()) + usize::from(self.upper.is_infinite())
    }

    /// The objective contribution of the best bound, for the pseudo-objective accumulator.
    ///
    /// `None` when the needed bound is infinite.
    pub(crate) fn best_bound_contribution(&self) -> Option<Rational> {
        let bound = match self.objective.signum() {
            1 => &self.lower,
            -1 => &self.upper,
            _ => return Some(Rational::zero()),
        };
        bound.is_finite().then(|| &self.objective * bound)
    }
}
