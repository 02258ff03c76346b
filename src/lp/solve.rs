//! # Solve and evaluate
//!
//! Flushes, configures and enters the rational backend, then classifies its answer. Optimal
//! solutions are copied onto the columns and rows and optionally re-verified in rational
//! arithmetic; infeasible outcomes must present a Farkas proof that survives validation;
//! objective-limit outcomes below the limit are re-solved for one pivot to remove the artefact.
//! Every certified outcome ends with a safely rounded double handed to the floating-point peer.
use num_traits::Zero;
use tracing::debug;

use crate::data::elements::SolutionStatus;
use crate::data::number_types::rational::{Rational, RoundMode};
use crate::interface::backend::{
    BackendStatus, IntParam, RationalLpBackend, RealParam, PRICING_DEFAULT,
    PRICING_STEEPEST_EDGE,
};
use crate::interface::peer::FloatingPeer;
use crate::lp::error::LpError;
use crate::lp::ExactLp;

impl<B: RationalLpBackend> ExactLp<B> {
    /// Flush, solve with the rational backend and evaluate the outcome.
    ///
    /// With `use_farkas`, an infeasible outcome retrieves and validates the dual ray; a proof
    /// that fails validation reverts the status to not-solved without an error.
    ///
    /// # Errors
    ///
    /// [`LpError::Backend`] when the backend fails twice, [`LpError::TimeLimit`] when the time
    /// limit is already spent before the solve.
    pub fn solve(
        &mut self,
        use_farkas: bool,
        peer: &mut impl FloatingPeer,
    ) -> Result<SolutionStatus, LpError> {
        if !self.settings.exact_enabled {
            return Err(LpError::InvalidData(String::from("exact solving is disabled")));
        }
        if self.time_limit.is_some_and(|seconds| seconds <= 0.0) {
            return Err(LpError::TimeLimit);
        }

        self.flush()?;
        self.solve_stamp += 1;
        self.primal_ray = None;

        // The cutoff is snapshotted once per solve; later peer changes wait for the next one.
        let cutoff = peer.cutoff_bound();
        let send_cutoff = !self.settings.pseudoobj_cutoff_disable && cutoff.is_finite();
        self.backend.set_real_param(
            RealParam::ObjectiveLimit,
            if send_cutoff { cutoff } else { f64::INFINITY },
        );
        if let Some(seconds) = self.time_limit {
            self.backend.set_real_param(RealParam::TimeLimit, seconds);
        }
        self.backend.set_int_param(
            IntParam::IterationLimit,
            self.iteration_limit.unwrap_or(-1),
        );

        // Dual simplex first; an error answer gets one primal retry from scratch.
        let status = match self.backend.solve_dual() {
            Ok(()) if self.backend.status() != BackendStatus::Error => self.backend.status(),
            first_failure => {
                debug!("backend failed, retrying with primal simplex from scratch");
                self.backend.set_int_param(IntParam::FromScratch, 1);
                let retry = self.backend.solve_primal();
                self.backend.set_int_param(IntParam::FromScratch, 0);
                match retry {
                    Ok(()) if self.backend.status() != BackendStatus::Error => {
                        self.backend.status()
                    },
                    Err(error) => {
                        self.solved = false;
                        self.status = SolutionStatus::Error;
                        return Err(error.into());
                    },
                    Ok(()) => {
                        self.solved = false;
                        self.status = SolutionStatus::Error;
                        return Err(match first_failure {
                            Err(error) => error.into(),
                            Ok(()) => LpError::InvalidData(String::from(
                                "backend reported an error status twice",
                            )),
                        });
                    },
                }
            },
        };

        self.solved = true;
        self.force_exact = false;
        self.evaluate(status, use_farkas, cutoff, true, peer)?;

        Ok(self.status)
    }

    fn evaluate(
        &mut self,
        status: BackendStatus,
        use_farkas: bool,
        cutoff: f64,
        allow_recovery: bool,
        peer: &mut impl FloatingPeer,
    ) -> Result<(), LpError> {
        match status {
            BackendStatus::Optimal => self.evaluate_optimal(peer),
            BackendStatus::Infeasible => self.evaluate_infeasible(use_farkas, peer),
            BackendStatus::Unbounded => self.evaluate_unbounded(),
            BackendStatus::ObjectiveLimit => {
                self.evaluate_objective_limit(use_farkas, cutoff, allow_recovery, peer)?;
            },
            BackendStatus::IterationLimit => self.status = SolutionStatus::IterationLimit,
            BackendStatus::TimeLimit => self.status = SolutionStatus::TimeLimit,
            BackendStatus::NotSolved | BackendStatus::Error => {
                self.solved = false;
                self.status = SolutionStatus::Error;
            },
        }

        Ok(())
    }

    /// Copy the optimal solution onto columns and rows, verify it as configured, and hand the
    /// rounded-down objective to the peer.
    fn evaluate_optimal(&mut self, peer: &mut impl FloatingPeer) {
        self.objective = self.backend.objective_value();
        self.populate_solution();
        self.solution_is_basic = true;

        self.primal_feasible = self.backend.is_primal_feasible();
        self.dual_feasible = self.backend.is_dual_feasible();
        if self.settings.check_primal_feasibility {
            self.primal_feasible = self.verify_primal_feasibility();
            self.primal_checked = true;
        }
        if self.settings.check_dual_feasibility {
            self.dual_feasible = self.verify_dual_feasibility();
            self.dual_checked = true;
        }

        if self.primal_feasible && self.dual_feasible {
            self.status = SolutionStatus::Optimal;
            self.has_proved_bound = true;
            let safe = self.objective.to_f64(RoundMode::Down);
            peer.set_safe_objective_bound(safe);
            debug!(objective = %self.objective, bound = safe, "optimal exact solution verified");
        } else {
            debug!("exact solution failed verification");
            self.status = SolutionStatus::NotSolved;
        }
    }

    fn evaluate_infeasible(&mut self, use_farkas: bool, peer: &mut impl FloatingPeer) {
        self.status = SolutionStatus::Infeasible;
        if !use_farkas {
            return;
        }

        let Some(multipliers) = self.backend.dual_farkas() else {
            debug!("infeasible without a dual ray");
            self.status = SolutionStatus::NotSolved;
            return;
        };
        if multipliers.len() != self.rows.len() {
            self.status = SolutionStatus::NotSolved;
            return;
        }

        if self.settings.check_farkas && !self.validate_farkas(&multipliers) {
            debug!("Farkas proof rejected");
            self.status = SolutionStatus::NotSolved;
            return;
        }

        // Store the accepted proof: multipliers on the rows, the combined coefficients on the
        // columns.
        for (position, value) in multipliers.iter().enumerate() {
            let row = self.mat.row_mut(self.rows[position]);
            row.farkas_multiplier = value.clone();
            row.valid_farkas_stamp = self.solve_stamp;
        }
        for &id in &self.columns.clone() {
            let combined = self.combined_row_coefficient(id, &multipliers);
            let column = self.mat.col_mut(id);
            column.farkas_coefficient = combined;
            column.valid_farkas_stamp = self.solve_stamp;
        }

        // An infeasible node certifies the strongest possible bound.
        self.objective = Rational::infinity();
        self.has_proved_bound = true;
        peer.set_safe_objective_bound(f64::INFINITY);
    }

    fn evaluate_unbounded(&mut self) {
        let Some(ray) = self.backend.primal_ray() else {
            debug!("unbounded without a primal ray");
            self.status = SolutionStatus::NotSolved;
            return;
        };
        if ray.len() != self.columns.len() || !self.validate_ray(&ray) {
            debug!("primal ray rejected");
            self.status = SolutionStatus::NotSolved;
            return;
        }

        self.primal_ray = Some(ray);
        self.status = SolutionStatus::UnboundedRay;
    }

    /// The backend stopped at the objective limit. When its recorded objective is still below
    /// the limit the stop is an artefact of the missing final pivot: re-solve for one
    /// iteration with the cutoff lifted and steepest-edge pricing, then re-evaluate.
    fn evaluate_objective_limit(
        &mut self,
        use_farkas: bool,
        cutoff: f64,
        allow_recovery: bool,
        peer: &mut impl FloatingPeer,
    ) -> Result<(), LpError> {
        let objective = self.backend.objective_value();

        if allow_recovery && objective < Rational::from_f64(cutoff) {
            debug!(%objective, cutoff, "objective limit artefact, pivoting once");
            self.backend.set_real_param(RealParam::ObjectiveLimit, f64::INFINITY);
            self.backend.set_int_param(IntParam::Pricing, PRICING_STEEPEST_EDGE);
            self.backend.set_int_param(IntParam::IterationLimit, 1);
            let outcome = self.backend.solve_dual();
            self.backend.set_int_param(
                IntParam::IterationLimit,
                self.iteration_limit.unwrap_or(-1),
            );
            self.backend.set_int_param(IntParam::Pricing, PRICING_DEFAULT);
            outcome?;

            let status = self.backend.status();
            return self.evaluate(status, use_farkas, cutoff, false, peer);
        }

        self.status = SolutionStatus::ObjectiveLimit;
        if self.backend.is_dual_feasible() {
            // A dual feasible value at or above the limit is itself a usable bound.
            self.objective = objective;
            self.has_proved_bound = true;
            peer.set_safe_objective_bound(self.objective.to_f64(RoundMode::Down));
        }

        Ok(())
    }

    /// Copy primal and dual vectors from the backend onto the columns and rows, stamped with
    /// the current solve.
    fn populate_solution(&mut self) {
        let primal = self.backend.primal_values();
        let reduced = self.backend.reduced_costs();
        let duals = self.backend.dual_values();
        let activities = self.backend.activities();
        let (column_basis, row_basis) = self.backend.basis();

        for (position, &id) in self.columns.iter().enumerate() {
            let column = self.mat.cols.get_mut(id);
            debug_assert_eq!(column.lpi_position, Some(position));
            column.primal = primal[position].clone();
            column.reduced_cost = reduced[position].clone();
            column.basis_status = column_basis[position];
            column.valid_solution_stamp = self.solve_stamp;
        }
        for (position, &id) in self.rows.iter().enumerate() {
            let row = self.mat.rows.get_mut(id);
            row.dual = duals[position].clone();
            row.activity = &activities[position] + &row.constant;
            row.basis_status = row_basis[position];
            row.valid_solution_stamp = self.solve_stamp;
            row.valid_activity_stamp = self.solve_stamp;
        }
    }

    /// Every primal value within its rational bounds, every activity within its sides.
    fn verify_primal_feasibility(&self) -> bool {
        let columns_ok = self.columns.iter().all(|&id| {
            let column = self.mat.col(id);
            &column.primal >= &column.lower && &column.primal <= &column.upper
        });
        let rows_ok = self.rows.iter().all(|&id| {
            let row = self.mat.row(id);
            &row.activity >= &row.left && &row.activity <= &row.right
        });
        columns_ok && rows_ok
    }

    /// Complementary slackness on columns and rows, and the exact dual objective equal to the
    /// returned primal objective.
    fn verify_dual_feasibility(&self) -> bool {
        let mut dual_objective = Rational::zero();

        for &id in &self.columns {
            let column = self.mat.col(id);
            let interior = column.primal > column.lower && column.primal < column.upper;
            if interior && !column.reduced_cost.is_zero() {
                return false;
            }
            if column.reduced_cost.is_positive() && column.primal != column.lower {
                return false;
            }
            if column.reduced_cost.is_negative() && column.primal != column.upper {
                return false;
            }

            match column.reduced_cost.signum() {
                1 => dual_objective += &column.reduced_cost * &column.lower,
                -1 => dual_objective += &column.reduced_cost * &column.upper,
                _ => {},
            }
        }

        for &id in &self.rows {
            let row = self.mat.row(id);
            let interior = row.activity > row.left && row.activity < row.right;
            if interior && !row.dual.is_zero() {
                return false;
            }
            if row.dual.is_positive() && row.activity != row.left {
                return false;
            }
            if row.dual.is_negative() && row.activity != row.right {
                return false;
            }

            match row.dual.signum() {
                1 => dual_objective += &row.dual * &(&row.left - &row.constant),
                -1 => dual_objective += &row.dual * &(&row.right - &row.constant),
                _ => {},
            }
        }

        dual_objective == self.objective
    }

    /// The combined coefficient `sum_i y_i a_ij` of one column under row multipliers indexed by
    /// LP position.
    pub(crate) fn combined_row_coefficient(&self, id: usize, multipliers: &[Rational]) -> Rational {
        let column = self.mat.col(id);
        column.entries[..column.nr_lp_rows].iter()
            .filter_map(|entry| {
                let position = self.mat.row(entry.row).lp_position?;
                let multiplier = &multipliers[position];
                (!multiplier.is_zero()).then(|| multiplier * &entry.value)
            })
            .sum()
    }

    /// Whether a Farkas vector proves infeasibility: each multiplier prices a finite side, free
    /// rows carry zero, and the priced side sum strictly exceeds the combined row's maximum
    /// over the column boxes.
    fn validate_farkas(&self, multipliers: &[Rational]) -> bool {
        let mut priced_sides = Rational::zero();
        for (position, multiplier) in multipliers.iter().enumerate() {
            if multiplier.is_zero() {
                continue;
            }
            let row = self.mat.row(self.rows[position]);
            if row.is_free() {
                return false;
            }
            let side = if multiplier.is_positive() { &row.left } else { &row.right };
            if !side.is_finite() {
                return false;
            }
            priced_sides += multiplier * &(side - &row.constant);
        }

        let mut box_maximum = Rational::zero();
        for &id in &self.columns {
            let coefficient = self.combined_row_coefficient(id, multipliers);
            let column = self.mat.col(id);
            let bound = match coefficient.signum() {
                1 => &column.upper,
                -1 => &column.lower,
                _ => continue,
            };
            if !bound.is_finite() {
                // The combined row is unbounded over the box; nothing exceeds it.
                return false;
            }
            box_maximum += &coefficient * bound;
        }

        priced_sides > box_maximum
    }

    /// Whether a primal ray respects all bound and side directions and improves the objective.
    fn validate_ray(&self, ray: &[Rational]) -> bool {
        let mut objective_slope = Rational::zero();
        for (position, &id) in self.columns.iter().enumerate() {
            let column = self.mat.col(id);
            if ray[position].is_positive() && column.upper.is_finite() {
                return false;
            }
            if ray[position].is_negative() && column.lower.is_finite() {
                return false;
            }
            objective_slope += &column.objective * &ray[position];
        }
        if !objective_slope.is_negative() {
            return false;
        }

        for &id in &self.rows {
            let row = self.mat.row(id);
            let slope = row.entries[..row.nr_lp_cols].iter()
                .filter_map(|entry| {
                    let position = self.mat.col(entry.col).lp_position?;
                    Some(&entry.value * &ray[position])
                })
                .sum::<Rational>();
            if slope.is_positive() && row.right.is_finite() {
                return false;
            }
            if slope.is_negative() && row.left.is_finite() {
                return false;
            }
        }

        true
    }
}
