//! # Diving excursions
//!
//! A dive temporarily tightens column bounds, typically to probe a branching candidate, and
//! must end with the container bit-for-bit in its pre-dive state. Starting a dive snapshots the
//! bounds, the stored solution values and the backend's basis; ending it replays the original
//! bounds through the normal change path and re-stamps the snapshotted solution under a fresh
//! solve stamp. While a dive is open, every mutation other than a column bound change is
//! rejected.
use tracing::debug;

use crate::data::elements::{BasisStatus, SolutionStatus};
use crate::data::number_types::rational::Rational;
use crate::interface::backend::{BackendState, RationalLpBackend};
use crate::lp::error::LpError;
use crate::lp::{ColId, ExactLp, RowId};

/// Everything needed to restore the container after a dive.
pub(crate) struct DivingSnapshot {
    backend_state: BackendState,
    columns: Vec<ColumnSnapshot>,
    rows: Vec<RowSnapshot>,

    status: SolutionStatus,
    objective: Rational,
    solved: bool,
    primal_feasible: bool,
    primal_checked: bool,
    dual_feasible: bool,
    dual_checked: bool,
    solution_is_basic: bool,
    has_proved_bound: bool,
    primal_ray: Option<Vec<Rational>>,
}

struct ColumnSnapshot {
    id: ColId,
    lower: Rational,
    upper: Rational,
    primal: Rational,
    reduced_cost: Rational,
    farkas_coefficient: Rational,
    basis_status: BasisStatus,
    solution_valid: bool,
    farkas_valid: bool,
}

struct RowSnapshot {
    id: RowId,
    activity: Rational,
    dual: Rational,
    farkas_multiplier: Rational,
    basis_status: BasisStatus,
    solution_valid: bool,
    activity_valid: bool,
    farkas_valid: bool,
}

impl<B: RationalLpBackend> ExactLp<B> {
    /// Open a dive: snapshot bounds, solution values and the backend basis.
    ///
    /// # Errors
    ///
    /// [`LpError::InvalidData`] when a dive is already open.
    pub fn start_dive(&mut self) -> Result<(), LpError> {
        if self.diving {
            return Err(LpError::InvalidData(String::from("a dive is already open")));
        }
        self.flush()?;

        let columns = self.columns.iter()
            .map(|&id| {
                let column = self.mat.col(id);
                ColumnSnapshot {
                    id,
                    lower: column.lower.clone(),
                    upper: column.upper.clone(),
                    primal: column.primal.clone(),
                    reduced_cost: column.reduced_cost.clone(),
                    farkas_coefficient: column.farkas_coefficient.clone(),
                    basis_status: column.basis_status,
                    solution_valid: self.solve_stamp > 0
                        && column.valid_solution_stamp == self.solve_stamp,
                    farkas_valid: self.solve_stamp > 0
                        && column.valid_farkas_stamp == self.solve_stamp,
                }
            })
            .collect();
        let rows = self.rows.iter()
            .map(|&id| {
                let row = self.mat.row(id);
                RowSnapshot {
                    id,
                    activity: row.activity.clone(),
                    dual: row.dual.clone(),
                    farkas_multiplier: row.farkas_multiplier.clone(),
                    basis_status: row.basis_status,
                    solution_valid: self.solve_stamp > 0
                        && row.valid_solution_stamp == self.solve_stamp,
                    activity_valid: self.solve_stamp > 0
                        && row.valid_activity_stamp == self.solve_stamp,
                    farkas_valid: self.solve_stamp > 0
                        && row.valid_farkas_stamp == self.solve_stamp,
                }
            })
            .collect();

        self.diving_snapshot = Some(DivingSnapshot {
            backend_state: self.backend.state(),
            columns,
            rows,
            status: self.status,
            objective: self.objective.clone(),
            solved: self.solved,
            primal_feasible: self.primal_feasible,
            primal_checked: self.primal_checked,
            dual_feasible: self.dual_feasible,
            dual_checked: self.dual_checked,
            solution_is_basic: self.solution_is_basic,
            has_proved_bound: self.has_proved_bound,
            primal_ray: self.primal_ray.clone(),
        });
        self.diving = true;
        debug!(columns = self.columns.len(), "dive opened");

        Ok(())
    }

    /// Close a dive: restore bounds, solution values, status and the backend basis.
    ///
    /// # Errors
    ///
    /// [`LpError::InvalidData`] when no dive is open.
    pub fn end_dive(&mut self) -> Result<(), LpError> {
        if !self.diving {
            return Err(LpError::InvalidData(String::from("no dive is open")));
        }
        let snapshot = self.diving_snapshot.take()
            .expect("an open dive has a snapshot");
        self.diving = false;

        // Bound restoration goes through the normal change path so that the backend replay
        // machinery sees it like any other modification.
        for entry in &snapshot.columns {
            self.change_bounds(entry.id, entry.lower.clone(), entry.upper.clone())?;
        }

        // Solution values come back under a fresh stamp; values that were stale before the
        // dive stay stale.
        self.solve_stamp += 1;
        for entry in snapshot.columns {
            let column = self.mat.col_mut(entry.id);
            column.primal = entry.primal;
            column.reduced_cost = entry.reduced_cost;
            column.farkas_coefficient = entry.farkas_coefficient;
            column.basis_status = entry.basis_status;
            if entry.solution_valid {
                column.valid_solution_stamp = self.solve_stamp;
            }
            if entry.farkas_valid {
                column.valid_farkas_stamp = self.solve_stamp;
            }
        }
        for entry in snapshot.rows {
            let row = self.mat.row_mut(entry.id);
            row.activity = entry.activity;
            row.dual = entry.dual;
            row.farkas_multiplier = entry.farkas_multiplier;
            row.basis_status = entry.basis_status;
            if entry.solution_valid {
                row.valid_solution_stamp = self.solve_stamp;
            }
            if entry.activity_valid {
                row.valid_activity_stamp = self.solve_stamp;
            }
            if entry.farkas_valid {
                row.valid_farkas_stamp = self.solve_stamp;
            }
        }

        self.status = snapshot.status;
        self.objective = snapshot.objective;
        self.solved = snapshot.solved;
        self.primal_feasible = snapshot.primal_feasible;
        self.primal_checked = snapshot.primal_checked;
        self.dual_feasible = snapshot.dual_feasible;
        self.dual_checked = snapshot.dual_checked;
        self.solution_is_basic = snapshot.solution_is_basic;
        self.has_proved_bound = snapshot.has_proved_bound;
        self.primal_ray = snapshot.primal_ray;

        self.backend.set_state(&snapshot.backend_state)?;
        debug!("dive closed");

        Ok(())
    }
}
