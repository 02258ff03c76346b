//! # The exact LP container
//!
//! An in-memory linear program over the rationals that mirrors a floating-point relaxation
//! owned by the caller. Mutations are lazy: they mark columns and rows dirty and queue them,
//! and only a flush replays the accumulated change set to the rational backend. A solve then
//! classifies the backend's answer, validates its certificates and hands a safely rounded
//! double bound back to the floating-point peer.
//!
//! Columns and rows are reference-counted pool entries addressed by [`ColId`] and [`RowId`];
//! they can outlive their LP membership, which is what the loose-objective accumulator tracks.
use num_traits::Zero;

use crate::data::elements::SolutionStatus;
use crate::data::number_types::rational::Rational;
use crate::interface::backend::RationalLpBackend;
use crate::interface::peer::FloatingPeer;
use crate::lp::column::{Column, ColumnDirty};
use crate::lp::error::LpError;
use crate::lp::matrix::{CoefChange, Mat};
use crate::lp::row::{Row, RowDirty};
use crate::lp::safe_bound::ProjShift;
use crate::lp::settings::Settings;

pub mod column;
mod diving;
pub mod error;
mod flush;
pub(crate) mod matrix;
pub mod row;
mod safe_bound;
pub mod settings;
mod solve;


/// Stable identifier of a column in its pool.
pub type ColId = usize;
/// Stable identifier of a row in its pool.
pub type RowId = usize;

/// The exact LP and its synchronization state with a rational backend.
pub struct ExactLp<B> {
    pub(crate) backend: B,
    pub(crate) mat: Mat,

    /// Columns in the LP, by LP position.
    pub(crate) columns: Vec<ColId>,
    /// Rows in the LP, by LP position.
    pub(crate) rows: Vec<RowId>,
    /// Columns the backend holds, by backend position.
    pub(crate) lpi_columns: Vec<ColId>,
    /// Rows the backend holds, by backend position.
    pub(crate) lpi_rows: Vec<RowId>,
    /// First backend column position that no longer matches the container.
    pub(crate) lpi_first_changed_column: usize,
    /// First backend row position that no longer matches the container.
    pub(crate) lpi_first_changed_row: usize,
    /// Columns with pending bound or objective changes, each queued at most once.
    pub(crate) changed_columns: Vec<ColId>,
    /// Rows with pending side changes, each queued at most once.
    pub(crate) changed_rows: Vec<RowId>,

    pub(crate) flushed: bool,
    pub(crate) solved: bool,
    pub(crate) primal_feasible: bool,
    pub(crate) primal_checked: bool,
    pub(crate) dual_feasible: bool,
    pub(crate) dual_checked: bool,
    pub(crate) solution_is_basic: bool,
    pub(crate) diving: bool,
    pub(crate) has_proved_bound: bool,
    pub(crate) force_exact: bool,

    pub(crate) status: SolutionStatus,
    /// Certified rational objective value of the last solve or post-processing.
    pub(crate) objective: Rational,
    /// Finite part of the best-bound objective sum over all captured columns.
    pub(crate) pseudo_objective: Rational,
    pub(crate) nr_pseudo_infinite: usize,
    /// Finite part of the best-bound objective sum over columns not in the LP.
    pub(crate) loose_objective: Rational,
    pub(crate) nr_loose_infinite: usize,
    /// Infinite bound directions over LP columns; bound-shifting needs this to be zero.
    pub(crate) nr_infinite_bounds: usize,
    /// Validity stamp; solution fields on columns and rows are current iff their stamp matches.
    pub(crate) solve_stamp: u64,
    pub(crate) primal_ray: Option<Vec<Rational>>,

    pub(crate) settings: Settings,
    pub(crate) time_limit: Option<f64>,
    pub(crate) iteration_limit: Option<i64>,
    pub(crate) diving_snapshot: Option<diving::DivingSnapshot>,
    pub(crate) projshift: ProjShift,
}

impl<B: RationalLpBackend> ExactLp<B> {
    /// An empty LP over the given backend, with default settings.
    pub fn new(backend: B) -> Self {
        Self::with_settings(backend, Settings::default())
    }

    /// An empty LP over the given backend.
    pub fn with_settings(backend: B, settings: Settings) -> Self {
        Self {
            backend,
            mat: Mat::default(),
            columns: Vec::new(),
            rows: Vec::new(),
            lpi_columns: Vec::new(),
            lpi_rows: Vec::new(),
            lpi_first_changed_column: 0,
            lpi_first_changed_row: 0,
            changed_columns: Vec::new(),
            changed_rows: Vec::new(),
            flushed: true,
            solved: false,
            primal_feasible: false,
            primal_checked: false,
            dual_feasible: false,
            dual_checked: false,
            solution_is_basic: false,
            diving: false,
            has_proved_bound: false,
            force_exact: false,
            status: SolutionStatus::NotSolved,
            objective: Rational::zero(),
            pseudo_objective: Rational::zero(),
            nr_pseudo_infinite: 0,
            loose_objective: Rational::zero(),
            nr_loose_infinite: 0,
            nr_infinite_bounds: 0,
            solve_stamp: 0,
            primal_ray: None,
            settings,
            time_limit: None,
            iteration_limit: None,
            diving_snapshot: None,
            projshift: ProjShift::default(),
        }
    }

    /// The configuration of the layer.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Set a configuration toggle by key.
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<(), LpError> {
        self.settings.set(key, value)
    }

    /// Wall-clock limit in seconds forwarded to the backend on each solve.
    pub fn set_time_limit(&mut self, seconds: Option<f64>) {
        self.time_limit = seconds;
    }

    /// Simplex iteration limit forwarded to the backend on each solve.
    pub fn set_iteration_limit(&mut self, iterations: Option<i64>) {
        self.iteration_limit = iterations;
    }

    /// Demand that the next bound comes from an exact solve, not a post-processor.
    pub fn force_exact_solve(&mut self) {
        self.force_exact = true;
    }

    /// Whether an exact solve is currently demanded.
    #[must_use]
    pub fn is_exact_solve_forced(&self) -> bool {
        self.force_exact
    }

    /// Number of columns in the LP.
    #[must_use]
    pub fn nr_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows in the LP.
    #[must_use]
    pub fn nr_rows(&self) -> usize {
        self.rows.len()
    }

    /// The column record behind an identifier.
    #[must_use]
    pub fn column(&self, id: ColId) -> &Column {
        self.mat.col(id)
    }

    /// The row record behind an identifier.
    #[must_use]
    pub fn row(&self, id: RowId) -> &Row {
        self.mat.row(id)
    }

    /// Columns currently in the LP, by LP position.
    #[must_use]
    pub fn lp_columns(&self) -> &[ColId] {
        &self.columns
    }

    /// Rows currently in the LP, by LP position.
    #[must_use]
    pub fn lp_rows(&self) -> &[RowId] {
        &self.rows
    }

    /// The backend consumed by this container.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    // Mutators. Each leaves the container consistent and, when it touches the LP, unsolved.

    /// Create a captured column that is not yet part of the LP.
    ///
    /// The caller holds the returned reference and must pair it with
    /// [`release_column`](Self::release_column).
    pub fn create_column(
        &mut self,
        peer: usize,
        name: impl Into<String>,
        objective: Rational,
        lower: Rational,
        upper: Rational,
        integral: bool,
    ) -> ColId {
        let mut column = Column::new(peer, name.into(), objective, lower, upper, integral);
        column.use_count = 1;
        let id = self.mat.cols.insert(column);
        self.account_column_entry(id);
        id
    }

    /// Create a captured row that is not yet part of the LP.
    pub fn create_row(
        &mut self,
        peer: usize,
        name: impl Into<String>,
        left: Rational,
        right: Rational,
        constant: Rational,
    ) -> RowId {
        let mut row = Row::new(peer, name.into(), left, right, constant);
        row.use_count = 1;
        self.mat.rows.insert(row)
    }

    /// Take a further reference on a column.
    pub fn capture_column(&mut self, id: ColId) {
        self.mat.col_mut(id).use_count += 1;
    }

    /// Drop a reference on a column; the final release unlinks and frees it.
    pub fn release_column(&mut self, id: ColId) {
        let column = self.mat.col_mut(id);
        debug_assert!(column.use_count > 0);
        debug_assert!(column.lp_position.is_none() || column.use_count > 1);
        column.use_count -= 1;
        if column.use_count == 0 {
            self.unaccount_column_entry(id);
            self.mat.unlink_column(id);
            self.changed_columns.retain(|&queued| queued != id);
            self.mat.cols.remove(id);
        }
    }

    /// Take a further reference on a row.
    pub fn capture_row(&mut self, id: RowId) {
        self.mat.row_mut(id).use_count += 1;
    }

    /// Drop a reference on a row; the final release unlinks and frees it.
    pub fn release_row(&mut self, id: RowId) {
        let row = self.mat.row_mut(id);
        debug_assert!(row.use_count > 0);
        debug_assert!(row.lp_position.is_none() || row.use_count > 1);
        row.use_count -= 1;
        if row.use_count == 0 {
            self.mat.unlink_row(id);
            self.changed_rows.retain(|&queued| queued != id);
            self.mat.rows.remove(id);
        }
    }

    /// Forbid coefficient and side changes on a row.
    pub fn lock_row(&mut self, id: RowId) {
        self.mat.row_mut(id).lock_count += 1;
    }

    /// Release one lock on a row.
    pub fn unlock_row(&mut self, id: RowId) {
        let row = self.mat.row_mut(id);
        debug_assert!(row.lock_count > 0);
        row.lock_count -= 1;
    }

    /// Append a column to the LP.
    pub fn add_column_to_lp(&mut self, id: ColId) -> Result<(), LpError> {
        if self.diving {
            return Err(LpError::DivingRestriction);
        }
        if self.mat.col(id).lp_position.is_some() {
            return Err(LpError::InvalidData(String::from("column is already in the LP")));
        }

        self.capture_column(id);
        let position = self.columns.len();
        self.columns.push(id);
        self.mat.col_mut(id).lp_position = Some(position);
        self.mat.col_entered_lp(id);

        // The column stops being loose.
        match self.mat.col(id).best_bound_contribution() {
            Some(value) => self.loose_objective -= value,
            None => self.nr_loose_infinite -= 1,
        }
        self.nr_infinite_bounds += self.mat.col(id).nr_infinite_bounds();
        self.mark_mutated();

        Ok(())
    }

    /// Append a row to the LP.
    pub fn add_row_to_lp(&mut self, id: RowId) -> Result<(), LpError> {
        if self.diving {
            return Err(LpError::DivingRestriction);
        }
        if self.mat.row(id).lp_position.is_some() {
            return Err(LpError::InvalidData(String::from("row is already in the LP")));
        }

        self.capture_row(id);
        let position = self.rows.len();
        self.rows.push(id);
        self.mat.row_mut(id).lp_position = Some(position);
        self.mat.row_entered_lp(id);
        self.mark_mutated();

        Ok(())
    }

    /// Remove all columns with LP position `new_size` and beyond, in reverse order.
    pub fn shrink_columns(&mut self, new_size: usize) -> Result<(), LpError> {
        if self.diving {
            return Err(LpError::DivingRestriction);
        }
        if new_size > self.columns.len() {
            return Err(LpError::InvalidData(String::from("shrinking beyond the LP size")));
        }

        while self.columns.len() > new_size {
            let id = self.columns.pop().expect("nonempty by the loop condition");
            self.mat.col_left_lp(id);
            self.mat.col_mut(id).lp_position = None;
            self.nr_infinite_bounds -= self.mat.col(id).nr_infinite_bounds();
            match self.mat.col(id).best_bound_contribution() {
                Some(value) => self.loose_objective += value,
                None => self.nr_loose_infinite += 1,
            }
            self.release_column(id);
        }
        self.lpi_first_changed_column = self.lpi_first_changed_column.min(new_size);
        self.projshift = ProjShift::default();
        self.mark_mutated();

        Ok(())
    }

    /// Remove all rows with LP position `new_size` and beyond, in reverse order.
    pub fn shrink_rows(&mut self, new_size: usize) -> Result<(), LpError> {
        if self.diving {
            return Err(LpError::DivingRestriction);
        }
        if new_size > self.rows.len() {
            return Err(LpError::InvalidData(String::from("shrinking beyond the LP size")));
        }

        while self.rows.len() > new_size {
            let id = self.rows.pop().expect("nonempty by the loop condition");
            self.mat.row_left_lp(id);
            self.mat.row_mut(id).lp_position = None;
            self.release_row(id);
        }
        self.lpi_first_changed_row = self.lpi_first_changed_row.min(new_size);
        self.projshift = ProjShift::default();
        self.mark_mutated();

        Ok(())
    }

    /// Change a column's objective coefficient. Not permitted while diving.
    pub fn change_objective(&mut self, id: ColId, value: Rational) -> Result<(), LpError> {
        if self.diving {
            return Err(LpError::DivingRestriction);
        }
        if self.mat.col(id).objective == value {
            return Ok(());
        }

        self.unaccount_column_entry(id);
        self.mat.col_mut(id).objective = value;
        self.account_column_entry(id);

        if self.mat.col(id).lp_position.is_some() {
            self.mark_column(id, |dirty| dirty.objective = true);
            self.mark_mutated();
        }

        Ok(())
    }

    /// Change a column's bounds. This is the one mutation allowed while diving.
    pub fn change_bounds(
        &mut self,
        id: ColId,
        lower: Rational,
        upper: Rational,
    ) -> Result<(), LpError> {
        let column = self.mat.col(id);
        if column.lower == lower && column.upper == upper {
            return Ok(());
        }
        let in_lp = column.lp_position.is_some();
        let lower_changed = column.lower != lower;
        let upper_changed = column.upper != upper;

        self.unaccount_column_entry(id);
        if in_lp {
            self.nr_infinite_bounds -= self.mat.col(id).nr_infinite_bounds();
        }
        {
            let column = self.mat.col_mut(id);
            column.lower = lower;
            column.upper = upper;
        }
        if in_lp {
            self.nr_infinite_bounds += self.mat.col(id).nr_infinite_bounds();
        }
        self.account_column_entry(id);

        if in_lp {
            self.mark_column(id, |dirty| {
                dirty.lower |= lower_changed;
                dirty.upper |= upper_changed;
            });
            self.mark_mutated();
        }

        Ok(())
    }

    /// Change a row's sides. Not permitted while diving or on a locked row.
    pub fn change_sides(
        &mut self,
        id: RowId,
        left: Rational,
        right: Rational,
    ) -> Result<(), LpError> {
        if self.diving {
            return Err(LpError::DivingRestriction);
        }
        if self.mat.row(id).is_locked() {
            return Err(LpError::LockedRow);
        }
        let row = self.mat.row(id);
        if row.left == left && row.right == right {
            return Ok(());
        }
        let left_changed = row.left != left;
        let right_changed = row.right != right;

        {
            let row = self.mat.row_mut(id);
            row.left = left;
            row.right = right;
        }

        if self.mat.row(id).lp_position.is_some() {
            self.mark_row(id, |dirty| {
                dirty.left |= left_changed;
                dirty.right |= right_changed;
            });
            self.mark_mutated();
        }

        Ok(())
    }

    /// Change a row's additive constant; both effective sides move with it.
    pub fn change_constant(&mut self, id: RowId, value: Rational) -> Result<(), LpError> {
        if self.diving {
            return Err(LpError::DivingRestriction);
        }
        if self.mat.row(id).is_locked() {
            return Err(LpError::LockedRow);
        }
        if self.mat.row(id).constant == value {
            return Ok(());
        }

        self.mat.row_mut(id).constant = value;

        if self.mat.row(id).lp_position.is_some() {
            self.mark_row(id, |dirty| {
                dirty.left = true;
                dirty.right = true;
            });
            self.mark_mutated();
        }

        Ok(())
    }

    /// Store a coefficient on the column side; the row-side partner is created on linking.
    pub fn add_coefficient(
        &mut self,
        col: ColId,
        row: RowId,
        value: Rational,
    ) -> Result<(), LpError> {
        if self.diving {
            return Err(LpError::DivingRestriction);
        }
        self.mat.col_add_coefficient(col, row, value)?;
        self.record_coefficient_change(col, row);
        Ok(())
    }

    /// Store a coefficient on the row side, for rows built up before they join the LP.
    pub fn add_row_coefficient(
        &mut self,
        row: RowId,
        col: ColId,
        value: Rational,
    ) -> Result<(), LpError> {
        if self.diving {
            return Err(LpError::DivingRestriction);
        }
        self.mat.row_add_coefficient(row, col, value)?;
        self.record_coefficient_change(col, row);
        Ok(())
    }

    /// Remove a coefficient wherever it is stored.
    pub fn delete_coefficient(&mut self, col: ColId, row: RowId) -> Result<(), LpError> {
        if self.diving {
            return Err(LpError::DivingRestriction);
        }
        if self.mat.delete_coefficient(col, row)? {
            self.record_coefficient_change(col, row);
        }
        Ok(())
    }

    /// Set a coefficient to a value; zero deletes, a missing entry is added.
    pub fn change_coefficient(
        &mut self,
        col: ColId,
        row: RowId,
        value: Rational,
    ) -> Result<(), LpError> {
        if self.diving {
            return Err(LpError::DivingRestriction);
        }
        if self.mat.change_coefficient(col, row, value)? != CoefChange::Nothing {
            self.record_coefficient_change(col, row);
        }
        Ok(())
    }

    /// Defer sorting and duplicate merging on a row until [`force_sort_row`](Self::force_sort_row).
    pub fn delay_row_sort(&mut self, id: RowId) {
        self.mat.row_mut(id).delay_sort = true;
    }

    /// End delayed sorting on a row, merging duplicate entries and dropping zeros.
    pub fn force_sort_row(&mut self, id: RowId) -> Result<(), LpError> {
        self.mat.force_sort_row(id)
    }

    // Observers of the synchronization and solution state.

    /// Whether every mutation has been replayed to the backend.
    #[must_use]
    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    /// Whether the exact mirror covers the full floating-point LP.
    #[must_use]
    pub fn is_synced_with_peer(&self, peer: &impl FloatingPeer) -> bool {
        self.columns.len() == peer.nr_columns()
            && self.columns.iter().all(|&id| self.mat.col(id).peer < peer.nr_columns())
    }

    /// Whether bound-shifting can certify: every LP column has two finite bounds.
    #[must_use]
    pub fn is_boundshift_possible(&self) -> bool {
        self.nr_infinite_bounds == 0
    }

    /// Whether project-and-shift is enabled and not known to have failed.
    #[must_use]
    pub fn is_projectshift_possible(&self) -> bool {
        self.settings.use_projshift && !self.projshift.failed
    }

    /// Classification of the last solve.
    #[must_use]
    pub fn status(&self) -> SolutionStatus {
        self.status
    }

    /// The certified rational objective value of the last solve or post-processing.
    #[must_use]
    pub fn objective_value(&self) -> &Rational {
        &self.objective
    }

    /// Whether the container currently holds a certified dual bound.
    #[must_use]
    pub fn has_proved_bound(&self) -> bool {
        self.has_proved_bound
    }

    /// Whether the last solve produced a basic solution.
    #[must_use]
    pub fn is_solution_basic(&self) -> bool {
        self.solution_is_basic
    }

    /// Whether a diving excursion is open.
    #[must_use]
    pub fn is_diving(&self) -> bool {
        self.diving
    }

    /// The best-bound objective sum over all captured columns; `-inf` when any needed bound is
    /// absent.
    #[must_use]
    pub fn pseudo_objective_value(&self) -> Rational {
        if self.nr_pseudo_infinite > 0 {
            Rational::negative_infinity()
        } else {
            self.pseudo_objective.clone()
        }
    }

    /// The best-bound objective sum over captured columns outside the LP.
    #[must_use]
    pub fn loose_objective_value(&self) -> Rational {
        if self.nr_loose_infinite > 0 {
            Rational::negative_infinity()
        } else {
            self.loose_objective.clone()
        }
    }

    /// The primal value of a column in the last solve, if still valid.
    #[must_use]
    pub fn column_primal(&self, id: ColId) -> Option<&Rational> {
        let column = self.mat.col(id);
        (self.solve_stamp > 0 && column.valid_solution_stamp == self.solve_stamp)
            .then_some(&column.primal)
    }

    /// The reduced cost of a column in the last solve, if still valid.
    #[must_use]
    pub fn column_reduced_cost(&self, id: ColId) -> Option<&Rational> {
        let column = self.mat.col(id);
        (self.solve_stamp > 0 && column.valid_solution_stamp == self.solve_stamp)
            .then_some(&column.reduced_cost)
    }

    /// The dual value of a row in the last solve, if still valid.
    #[must_use]
    pub fn row_dual(&self, id: RowId) -> Option<&Rational> {
        let row = self.mat.row(id);
        (self.solve_stamp > 0 && row.valid_solution_stamp == self.solve_stamp)
            .then_some(&row.dual)
    }

    /// The activity of a row in the last solve, constant included, if still valid.
    #[must_use]
    pub fn row_activity(&self, id: RowId) -> Option<&Rational> {
        let row = self.mat.row(id);
        (self.solve_stamp > 0 && row.valid_activity_stamp == self.solve_stamp)
            .then_some(&row.activity)
    }

    /// The Farkas multiplier of a row in the last infeasible solve, if still valid.
    #[must_use]
    pub fn row_farkas_multiplier(&self, id: RowId) -> Option<&Rational> {
        let row = self.mat.row(id);
        (self.solve_stamp > 0 && row.valid_farkas_stamp == self.solve_stamp)
            .then_some(&row.farkas_multiplier)
    }

    /// The validated Farkas vector of the last infeasible solve, by LP row position.
    #[must_use]
    pub fn dual_farkas(&self) -> Option<Vec<Rational>> {
        if self.status != SolutionStatus::Infeasible {
            return None;
        }
        self.rows.iter()
            .map(|&id| self.row_farkas_multiplier(id).cloned())
            .collect()
    }

    /// The primal ray of the last unbounded solve, by LP column position.
    #[must_use]
    pub fn unbounded_ray(&self) -> Option<&[Rational]> {
        (self.status == SolutionStatus::UnboundedRay)
            .then_some(self.primal_ray.as_deref())
            .flatten()
    }

    // Internal bookkeeping.

    /// A mutation touched the LP: the backend view and any solution are stale.
    pub(crate) fn mark_mutated(&mut self) {
        self.flushed = false;
        self.solved = false;
        self.status = SolutionStatus::NotSolved;
        self.has_proved_bound = false;
        self.primal_checked = false;
        self.dual_checked = false;
    }

    /// Queue a column change, at most once per column.
    fn mark_column(&mut self, id: ColId, change: impl FnOnce(&mut ColumnDirty)) {
        let column = self.mat.col_mut(id);
        if !column.dirty.any() {
            self.changed_columns.push(id);
        }
        change(&mut self.mat.col_mut(id).dirty);
    }

    /// Queue a row change, at most once per row.
    fn mark_row(&mut self, id: RowId, change: impl FnOnce(&mut RowDirty)) {
        let row = self.mat.row_mut(id);
        if !row.dirty.any() {
            self.changed_rows.push(id);
        }
        change(&mut self.mat.row_mut(id).dirty);
    }

    /// Record a coefficient change on the endpoint closer to its flushed prefix pointer, so
    /// that flushing replays the smallest suffix.
    fn record_coefficient_change(&mut self, col: ColId, row: RowId) {
        let col_position = self.mat.col(col).lp_position;
        let row_position = self.mat.row(row).lp_position;
        let (Some(col_position), Some(row_position)) = (col_position, row_position) else {
            // The coefficient is outside the LP's linked prefix; flushing ships it when the
            // missing endpoint joins the LP.
            return;
        };

        let col_distance = self.lpi_first_changed_column.saturating_sub(col_position);
        let row_distance = self.lpi_first_changed_row.saturating_sub(row_position);
        if col_distance <= row_distance {
            self.mark_column(col, |dirty| dirty.coefficients = true);
            self.lpi_first_changed_column = self.lpi_first_changed_column.min(col_position);
        } else {
            self.mark_row(row, |dirty| dirty.coefficients = true);
            self.lpi_first_changed_row = self.lpi_first_changed_row.min(row_position);
        }
        self.projshift = ProjShift::default();
        self.mark_mutated();
    }

    /// Add a column's best-bound contribution to the pseudo and, when loose, loose accumulators.
    fn account_column_entry(&mut self, id: ColId) {
        let in_lp = self.mat.col(id).lp_position.is_some();
        match self.mat.col(id).best_bound_contribution() {
            Some(value) => {
                self.pseudo_objective += &value;
                if !in_lp {
                    self.loose_objective += value;
                }
            },
            None => {
                self.nr_pseudo_infinite += 1;
                if !in_lp {
                    self.nr_loose_infinite += 1;
                }
            },
        }
    }

    /// Remove a column's best-bound contribution from the accumulators.
    fn unaccount_column_entry(&mut self, id: ColId) {
        let in_lp = self.mat.col(id).lp_position.is_some();
        match self.mat.col(id).best_bound_contribution() {
            Some(value) => {
                self.pseudo_objective -= &value;
                if !in_lp {
                    self.loose_objective -= value;
                }
            },
            None => {
                self.nr_pseudo_infinite -= 1;
                if !in_lp {
                    self.nr_loose_infinite -= 1;
                }
            },
        }
    }
}
