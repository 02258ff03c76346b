//! # A reference exact simplex backend
//!
//! A dense bounded-variable primal simplex over the rationals, implementing the backend seam of
//! the management layer. Row sides become bounds on slack variables, so the constraint system is
//! `Ax - s = 0` and a basis is any invertible column subset of `[A | -I]`. Phase one introduces
//! an artificial variable only on rows whose initial activity violates a side.
//!
//! The implementation favours auditability over speed: the basis inverse is kept explicitly,
//! Bland's rule guarantees termination, and every quantity is exact. `solve_dual` runs the same
//! primal algorithm as `solve_primal`; warm-start state is recorded for inspection but each
//! solve starts from the slack basis, which keeps results deterministic.
use std::time::Instant;

use num_traits::Zero;
use tracing::debug;

use crate::data::elements::BasisStatus;
use crate::data::number_types::rational::Rational;
use crate::interface::backend::{
    BackendColumn, BackendError, BackendRow, BackendState, BackendStatus, IntParam,
    RationalLpBackend, RealParam,
};

#[cfg(test)]
mod test;
mod worker;

use worker::{PhaseOutcome, Worker};

/// An exact LP instance together with the outcome of its last solve.
#[derive(Default)]
pub struct SimplexLp {
    columns: Vec<BackendColumn>,
    rows: Vec<BackendRow>,

    status: BackendStatus,
    solution: Option<Solution>,
    farkas: Option<Vec<Rational>>,
    ray: Option<Vec<Rational>>,
    saved_state: Option<BackendState>,

    objective_limit: Option<f64>,
    time_limit: Option<f64>,
    iteration_limit: Option<u64>,
    lp_info: bool,
}

/// A complete optimal basic solution.
#[derive(Clone, Debug)]
struct Solution {
    objective: Rational,
    primal: Vec<Rational>,
    dual: Vec<Rational>,
    activity: Vec<Rational>,
    reduced_cost: Vec<Rational>,
    column_basis: Vec<BasisStatus>,
    row_basis: Vec<BasisStatus>,
}

impl SimplexLp {
    /// An empty problem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn invalidate(&mut self) {
        self.status = BackendStatus::NotSolved;
        self.solution = None;
        self.farkas = None;
        self.ray = None;
    }

    fn solve(&mut self) -> Result<(), BackendError> {
        self.invalidate();

        for column in &self.columns {
            if column.lower > column.upper {
                return Err(BackendError::new(format!(
                    "column {} has conflicting bounds", column.name,
                )));
            }
        }

        let started = Instant::now();
        let deadline = self.time_limit;
        let mut budget = self.iteration_limit;

        let mut worker = Worker::new(&self.columns, &self.rows);

        let out_of_time = |started: &Instant| match deadline {
            Some(limit) => started.elapsed().as_secs_f64() >= limit,
            None => false,
        };

        match worker.phase_one(&mut budget, &started, deadline) {
            PhaseOutcome::Finished => {},
            PhaseOutcome::IterationLimit => {
                self.status = BackendStatus::IterationLimit;
                return Ok(());
            },
            PhaseOutcome::TimeLimit => {
                self.status = BackendStatus::TimeLimit;
                return Ok(());
            },
            PhaseOutcome::Unbounded(_) => {
                return Err(BackendError::new("phase one cannot be unbounded"));
            },
        }

        if worker.infeasibility().is_positive() {
            self.farkas = Some(worker.duals());
            self.status = BackendStatus::Infeasible;
            if self.lp_info {
                debug!(rows = self.rows.len(), "exact LP infeasible");
            }
            return Ok(());
        }

        if out_of_time(&started) {
            self.status = BackendStatus::TimeLimit;
            return Ok(());
        }

        match worker.phase_two(&mut budget, &started, deadline) {
            PhaseOutcome::Finished => {},
            PhaseOutcome::IterationLimit => {
                self.status = BackendStatus::IterationLimit;
                return Ok(());
            },
            PhaseOutcome::TimeLimit => {
                self.status = BackendStatus::TimeLimit;
                return Ok(());
            },
            PhaseOutcome::Unbounded(ray) => {
                self.ray = Some(ray);
                self.status = BackendStatus::Unbounded;
                return Ok(());
            },
        }

        let solution = Solution {
            objective: worker.objective_value(),
            primal: worker.primal_values(),
            dual: worker.duals(),
            activity: worker.activities(),
            reduced_cost: worker.reduced_costs(),
            column_basis: worker.column_basis(),
            row_basis: worker.row_basis(),
        };
        if self.lp_info {
            debug!(objective = %solution.objective, "exact LP solved to optimality");
        }

        // The objective limit is only reported at optimality: the optimum is then itself the
        // certificate that the limit is exceeded.
        self.status = match self.objective_limit {
            Some(limit) if limit.is_finite()
                && solution.objective >= Rational::from_f64(limit) =>
            {
                BackendStatus::ObjectiveLimit
            },
            _ => BackendStatus::Optimal,
        };
        self.solution = Some(solution);

        Ok(())
    }

    fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }
}

impl RationalLpBackend for SimplexLp {
    fn nr_columns(&self) -> usize {
        self.columns.len()
    }

    fn nr_rows(&self) -> usize {
        self.rows.len()
    }

    fn add_columns(&mut self, columns: Vec<BackendColumn>) -> Result<(), BackendError> {
        for column in &columns {
            if column.entries.iter().any(|&(row, _)| row >= self.rows.len()) {
                return Err(BackendError::new("column entry references unknown row"));
            }
        }
        // Rows are stored in CSR form as well; mirror the new entries.
        for (offset, column) in columns.iter().enumerate() {
            let index = self.columns.len() + offset;
            for (row, value) in &column.entries {
                self.rows[*row].entries.push((index, value.clone()));
            }
        }
        self.columns.extend(columns);
        self.invalidate();
        Ok(())
    }

    fn add_rows(&mut self, rows: Vec<BackendRow>) -> Result<(), BackendError> {
        for row in &rows {
            if row.entries.iter().any(|&(column, _)| column >= self.columns.len()) {
                return Err(BackendError::new("row entry references unknown column"));
            }
        }
        for (offset, row) in rows.iter().enumerate() {
            let index = self.rows.len() + offset;
            for (column, value) in &row.entries {
                self.columns[*column].entries.push((index, value.clone()));
            }
        }
        self.rows.extend(rows);
        self.invalidate();
        Ok(())
    }

    fn delete_columns_from(&mut self, first: usize) -> Result<(), BackendError> {
        if first > self.columns.len() {
            return Err(BackendError::new("column deletion beyond problem size"));
        }
        self.columns.truncate(first);
        for row in &mut self.rows {
            row.entries.retain(|&(column, _)| column < first);
        }
        self.invalidate();
        Ok(())
    }

    fn delete_rows_from(&mut self, first: usize) -> Result<(), BackendError> {
        if first > self.rows.len() {
            return Err(BackendError::new("row deletion beyond problem size"));
        }
        self.rows.truncate(first);
        for column in &mut self.columns {
            column.entries.retain(|&(row, _)| row < first);
        }
        self.invalidate();
        Ok(())
    }

    fn change_objectives(&mut self, changes: &[(usize, Rational)]) -> Result<(), BackendError> {
        for (index, objective) in changes {
            let column = self.columns.get_mut(*index)
                .ok_or_else(|| BackendError::new("objective change for unknown column"))?;
            column.objective = objective.clone();
        }
        self.invalidate();
        Ok(())
    }

    fn change_bounds(
        &mut self,
        changes: &[(usize, Rational, Rational)],
    ) -> Result<(), BackendError> {
        for (index, lower, upper) in changes {
            let column = self.columns.get_mut(*index)
                .ok_or_else(|| BackendError::new("bound change for unknown column"))?;
            column.lower = lower.clone();
            column.upper = upper.clone();
        }
        self.invalidate();
        Ok(())
    }

    fn change_sides(
        &mut self,
        changes: &[(usize, Rational, Rational)],
    ) -> Result<(), BackendError> {
        for (index, left, right) in changes {
            let row = self.rows.get_mut(*index)
                .ok_or_else(|| BackendError::new("side change for unknown row"))?;
            row.left = left.clone();
            row.right = right.clone();
        }
        self.invalidate();
        Ok(())
    }

    fn solve_dual(&mut self) -> Result<(), BackendError> {
        self.solve()
    }

    fn solve_primal(&mut self) -> Result<(), BackendError> {
        self.solve()
    }

    fn status(&self) -> BackendStatus {
        self.status
    }

    fn is_primal_feasible(&self) -> bool {
        matches!(self.status, BackendStatus::Optimal | BackendStatus::ObjectiveLimit)
    }

    fn is_dual_feasible(&self) -> bool {
        matches!(self.status, BackendStatus::Optimal | BackendStatus::ObjectiveLimit)
    }

    fn objective_value(&self) -> Rational {
        self.solution().map_or_else(Rational::zero, |solution| solution.objective.clone())
    }

    fn primal_values(&self) -> Vec<Rational> {
        self.solution().map_or_else(Vec::new, |solution| solution.primal.clone())
    }

    fn dual_values(&self) -> Vec<Rational> {
        self.solution().map_or_else(Vec::new, |solution| solution.dual.clone())
    }

    fn activities(&self) -> Vec<Rational> {
        self.solution().map_or_else(Vec::new, |solution| solution.activity.clone())
    }

    fn reduced_costs(&self) -> Vec<Rational> {
        self.solution().map_or_else(Vec::new, |solution| solution.reduced_cost.clone())
    }

    fn dual_farkas(&self) -> Option<Vec<Rational>> {
        self.farkas.clone()
    }

    fn primal_ray(&self) -> Option<Vec<Rational>> {
        self.ray.clone()
    }

    fn basis(&self) -> (Vec<BasisStatus>, Vec<BasisStatus>) {
        match self.solution() {
            Some(solution) => (solution.column_basis.clone(), solution.row_basis.clone()),
            None => (
                vec![BasisStatus::Lower; self.columns.len()],
                vec![BasisStatus::Basic; self.rows.len()],
            ),
        }
    }

    fn set_basis(
        &mut self,
        columns: &[BasisStatus],
        rows: &[BasisStatus],
    ) -> Result<(), BackendError> {
        if columns.len() != self.columns.len() || rows.len() != self.rows.len() {
            return Err(BackendError::new("basis dimensions do not match the problem"));
        }
        self.saved_state = Some(BackendState { columns: columns.to_vec(), rows: rows.to_vec() });
        Ok(())
    }

    fn state(&self) -> BackendState {
        let (columns, rows) = self.basis();
        BackendState { columns, rows }
    }

    fn set_state(&mut self, state: &BackendState) -> Result<(), BackendError> {
        self.set_basis(&state.columns, &state.rows)
    }

    fn set_real_param(&mut self, parameter: RealParam, value: f64) {
        match parameter {
            RealParam::ObjectiveLimit => {
                self.objective_limit = value.is_finite().then_some(value);
            },
            RealParam::TimeLimit => {
                self.time_limit = (value > 0.0 && value.is_finite()).then_some(value);
            },
        }
    }

    fn set_int_param(&mut self, parameter: IntParam, value: i64) {
        match parameter {
            IntParam::IterationLimit => {
                self.iteration_limit = (value >= 0).then_some(value as u64);
            },
            IntParam::FromScratch => {
                if value != 0 {
                    self.saved_state = None;
                }
            },
            IntParam::LpInfo => self.lp_info = value != 0,
            IntParam::Pricing => {
                // The reference implementation prices with Bland's rule regardless; the
                // parameter is accepted for interface compatibility.
            },
        }
    }
}
