//! # The rational LP backend seam
//!
//! The capability set this layer requires from an exact LP solver: batched additions and
//! deletions, queued change application, both simplex entry points, and full access to the
//! primal/dual certificates of the last solve. All quantities cross this seam as rationals.
use std::fmt;

use crate::data::elements::BasisStatus;
use crate::data::number_types::rational::Rational;

/// The backend returned its error sentinel.
///
/// The caller may retry once from scratch; a second failure abandons the bound.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BackendError {
    description: String,
}

impl BackendError {
    /// Wrap a backend-specific failure description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self { description: description.into() }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LP backend error: {}", self.description)
    }
}

impl std::error::Error for BackendError {}

/// Terminal state of the backend after a solve call.
///
/// Exactly one of the primal/dual/ray outcomes holds.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum BackendStatus {
    /// No solve has happened since the last modification.
    #[default]
    NotSolved,
    /// An optimal basic solution was found.
    Optimal,
    /// The problem is primal infeasible; a dual ray should exist.
    Infeasible,
    /// The problem is primal unbounded; a primal ray should exist.
    Unbounded,
    /// The objective limit was exceeded.
    ObjectiveLimit,
    /// The iteration limit was exhausted.
    IterationLimit,
    /// The time limit was exhausted.
    TimeLimit,
    /// The backend failed internally.
    Error,
}

/// Real-valued backend parameters.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RealParam {
    /// Objective cutoff: the solve may stop once the bound proves the cutoff.
    ObjectiveLimit,
    /// Wall-clock limit in seconds.
    TimeLimit,
}

/// Integer-valued backend parameters.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IntParam {
    /// Simplex iteration limit; negative means unlimited.
    IterationLimit,
    /// Nonzero discards warm-start information on the next solve.
    FromScratch,
    /// Nonzero asks the backend to emit solve statistics.
    LpInfo,
    /// Pricing rule selection, see the `PRICING_*` constants.
    Pricing,
}

/// Value for [`IntParam::Pricing`]: backend default pricing.
pub const PRICING_DEFAULT: i64 = 0;
/// Value for [`IntParam::Pricing`]: steepest-edge pricing.
pub const PRICING_STEEPEST_EDGE: i64 = 1;

/// A column shipped to the backend, in CSC form.
#[derive(Clone, Debug)]
pub struct BackendColumn {
    /// Column name, for backend diagnostics.
    pub name: String,
    /// Objective coefficient.
    pub objective: Rational,
    /// Lower bound.
    pub lower: Rational,
    /// Upper bound.
    pub upper: Rational,
    /// `(row index, coefficient)` pairs, sorted by row index.
    pub entries: Vec<(usize, Rational)>,
}

/// A row shipped to the backend, in CSR form.
#[derive(Clone, Debug)]
pub struct BackendRow {
    /// Row name, for backend diagnostics.
    pub name: String,
    /// Left-hand side.
    pub left: Rational,
    /// Right-hand side.
    pub right: Rational,
    /// `(column index, coefficient)` pairs, sorted by column index.
    pub entries: Vec<(usize, Rational)>,
}

/// Warm-start state of the backend, snapshotted around diving excursions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BackendState {
    /// Basis status per column.
    pub columns: Vec<BasisStatus>,
    /// Basis status per row.
    pub rows: Vec<BasisStatus>,
}

/// An exact LP solver consumed by the management layer.
///
/// Implementations are entered synchronously and run to completion or limit; they never call
/// back into this layer.
pub trait RationalLpBackend {
    /// Number of columns the backend currently holds.
    fn nr_columns(&self) -> usize;
    /// Number of rows the backend currently holds.
    fn nr_rows(&self) -> usize;

    /// Append columns.
    fn add_columns(&mut self, columns: Vec<BackendColumn>) -> Result<(), BackendError>;
    /// Append rows.
    fn add_rows(&mut self, rows: Vec<BackendRow>) -> Result<(), BackendError>;
    /// Delete all columns from index `first` onward.
    fn delete_columns_from(&mut self, first: usize) -> Result<(), BackendError>;
    /// Delete all rows from index `first` onward.
    fn delete_rows_from(&mut self, first: usize) -> Result<(), BackendError>;

    /// Change objective coefficients of existing columns.
    fn change_objectives(&mut self, changes: &[(usize, Rational)]) -> Result<(), BackendError>;
    /// Change bounds of existing columns.
    fn change_bounds(
        &mut self,
        changes: &[(usize, Rational, Rational)],
    ) -> Result<(), BackendError>;
    /// Change sides of existing rows.
    fn change_sides(
        &mut self,
        changes: &[(usize, Rational, Rational)],
    ) -> Result<(), BackendError>;

    /// Solve with the dual simplex method.
    fn solve_dual(&mut self) -> Result<(), BackendError>;
    /// Solve with the primal simplex method.
    fn solve_primal(&mut self) -> Result<(), BackendError>;

    /// Terminal state of the last solve.
    fn status(&self) -> BackendStatus;
    /// Whether the last solve ended with a primal feasible solution.
    fn is_primal_feasible(&self) -> bool;
    /// Whether the last solve ended with a dual feasible solution.
    fn is_dual_feasible(&self) -> bool;

    /// Objective value of the last solve.
    fn objective_value(&self) -> Rational;
    /// Primal value per column.
    fn primal_values(&self) -> Vec<Rational>;
    /// Dual value per row.
    fn dual_values(&self) -> Vec<Rational>;
    /// Row activity per row.
    fn activities(&self) -> Vec<Rational>;
    /// Reduced cost per column.
    fn reduced_costs(&self) -> Vec<Rational>;
    /// Dual Farkas ray proving infeasibility, when one exists.
    fn dual_farkas(&self) -> Option<Vec<Rational>>;
    /// Primal ray witnessing unboundedness, when one exists.
    fn primal_ray(&self) -> Option<Vec<Rational>>;

    /// Basis statuses `(columns, rows)` of the last solve.
    fn basis(&self) -> (Vec<BasisStatus>, Vec<BasisStatus>);
    /// Load a basis.
    fn set_basis(
        &mut self,
        columns: &[BasisStatus],
        rows: &[BasisStatus],
    ) -> Result<(), BackendError>;
    /// Snapshot the warm-start state.
    fn state(&self) -> BackendState;
    /// Restore a warm-start state.
    fn set_state(&mut self, state: &BackendState) -> Result<(), BackendError>;

    /// Set a real-valued parameter.
    fn set_real_param(&mut self, parameter: RealParam, value: f64);
    /// Set an integer-valued parameter.
    fn set_int_param(&mut self, parameter: IntParam, value: i64);

    /// The backend's infinity sentinel, used to translate between container-level and
    /// backend-level unbounded values.
    fn infinity(&self) -> Rational {
        Rational::infinity()
    }
}
