//! # Safe dual bounds without an exact solve
//!
//! Two post-processors turn an approximate dual solution of the floating-point peer into a
//! rigorous rational bound on the exact objective, at a fraction of the cost of a full exact
//! solve.
//!
//! Bound-shifting prices every row side with the approximate multipliers and absorbs the dual
//! residual `c - A^T y - z` into the column bounds, evaluated with directed-rounding intervals.
//! It needs every LP column to have two finite bounds.
//!
//! Project-and-shift repairs the approximate multipliers instead: a one-time setup computes a
//! relative-interior point (or ray) of the dual feasibility region and a factorization of the
//! equality part, after which each call projects the multipliers onto the equalities and shifts
//! them towards the interior until all inequalities hold exactly.
use num_traits::{One, Zero};
use tracing::debug;

use crate::algorithm::simplex::SimplexLp;
use crate::data::linear_algebra::lu::RectangularLu;
use crate::data::number_types::interval::Interval;
use crate::data::number_types::rational::{Rational, RoundMode};
use crate::interface::backend::{
    BackendColumn, BackendRow, BackendStatus, RationalLpBackend, RealParam,
};
use crate::interface::peer::FloatingPeer;
use crate::lp::error::SafeBoundError;
use crate::lp::ExactLp;

/// Cached project-and-shift setup, invalidated by any change to the LP's shape or coefficients.
pub(crate) struct ProjShift {
    /// Whether the setup ran for the current LP.
    pub(crate) computed: bool,
    /// Whether the setup failed for the current LP; further calls are pointless until a change.
    pub(crate) failed: bool,
    /// Whether `interior` is a ray of the dual region rather than a point in it.
    is_ray: bool,
    /// Relative-interior point or ray, by LP row position.
    interior: Vec<Rational>,
    /// Common slack of `interior` in all dual inequalities.
    common_slack: Rational,
    /// Factorization of the dual equality system on the free columns.
    lu: Option<RectangularLu>,
    /// LP positions of the columns without any finite bound.
    free_columns: Vec<usize>,
}

impl Default for ProjShift {
    fn default() -> Self {
        Self {
            computed: false,
            failed: false,
            is_ray: false,
            interior: Vec::new(),
            common_slack: Rational::zero(),
            lu: None,
            free_columns: Vec::new(),
        }
    }
}

impl<B: RationalLpBackend> ExactLp<B> {
    /// Derive a safe rational bound from approximate row multipliers and reduced costs by
    /// shifting the dual residual into the column bounds.
    ///
    /// Certifies the bound on the container and hands its rounded-down double to the peer.
    ///
    /// # Errors
    ///
    /// [`SafeBoundError::BoundUnavailable`] when some LP column lacks a finite bound, so the
    /// residual cannot be absorbed, or when a pending change fails to flush.
    pub fn bound_shift(
        &mut self,
        duals: &[f64],
        reduced_costs: &[f64],
        peer: &mut impl FloatingPeer,
    ) -> Result<Rational, SafeBoundError> {
        if !self.is_boundshift_possible()
            || duals.len() != self.rows.len()
            || reduced_costs.len() != self.columns.len()
        {
            return Err(SafeBoundError::BoundUnavailable);
        }
        // The linked LP prefixes walked below are only complete once all pending changes have
        // gone through the flush machinery.
        self.flush().map_err(|_| SafeBoundError::BoundUnavailable)?;

        // Price the sides. A multiplier whose priced side is infinite is dropped; any
        // multiplier vector yields a valid bound, a truncated one merely a weaker one.
        let mut multipliers = duals.to_vec();
        let mut bound = Rational::zero();
        for (position, &id) in self.rows.iter().enumerate() {
            let row = self.mat.row(id);
            let value = multipliers[position];
            if value == 0.0 {
                continue;
            }
            let side = if value > 0.0 { &row.left } else { &row.right };
            if !side.is_finite() {
                multipliers[position] = 0.0;
                continue;
            }
            bound += Rational::from_f64(value) * (side - &row.constant);
        }

        // Enclose the residual c - A^T y - z per column in double intervals, recover the
        // coefficient interval of c - A^T y by adding z back exactly, and take the worst corner
        // over the finite column box.
        for (position, &id) in self.columns.iter().enumerate() {
            let column = self.mat.col(id);
            let mut residual = Interval::from_rational(&column.objective)
                - Interval::point(reduced_costs[position]);
            for entry in &column.entries[..column.nr_lp_rows] {
                let Some(row_position) = self.mat.row(entry.row).lp_position else {
                    return Err(SafeBoundError::BoundUnavailable);
                };
                if multipliers[row_position] == 0.0 {
                    continue;
                }
                residual = residual
                    - Interval::from_rational(&entry.value)
                        * Interval::point(multipliers[row_position]);
            }
            if !residual.is_finite() {
                return Err(SafeBoundError::BoundUnavailable);
            }

            let exact_z = Rational::from_f64(reduced_costs[position]);
            let low = residual.inf_rational() + &exact_z;
            let high = residual.sup_rational() + exact_z;
            let corners = [
                &low * &column.lower,
                &low * &column.upper,
                &high * &column.lower,
                &high * &column.upper,
            ];
            bound += corners.into_iter().min().expect("four corners");
        }

        self.certify(bound, peer)
    }

    /// Derive a safe rational bound by projecting approximate row multipliers onto the dual
    /// equalities and shifting towards a precomputed relative-interior point or ray.
    ///
    /// # Errors
    ///
    /// [`SafeBoundError::ProjectionUnavailable`] when project-and-shift is disabled, its setup
    /// failed for this LP, or a pending change fails to flush; [`SafeBoundError::Interrupted`]
    /// when the setup ran out of time.
    pub fn project_and_shift(
        &mut self,
        duals: &[f64],
        peer: &mut impl FloatingPeer,
    ) -> Result<Rational, SafeBoundError> {
        if !self.is_projectshift_possible() || duals.len() != self.rows.len() {
            return Err(SafeBoundError::ProjectionUnavailable);
        }
        self.flush().map_err(|_| SafeBoundError::ProjectionUnavailable)?;
        if !self.projshift.computed {
            self.prepare_projshift()?;
        }

        let mut multipliers = duals.iter()
            .map(|&value| Rational::from_f64(value))
            .collect::<Vec<_>>();
        for (position, &id) in self.rows.iter().enumerate() {
            if self.mat.row(id).is_free() {
                multipliers[position] = Rational::zero();
            }
        }

        // Projection: a correction supported on the factorization's pivot rows makes the free
        // columns' dual equalities hold exactly.
        if let Some(lu) = &self.projshift.lu {
            let violations = self.projshift.free_columns.iter()
                .map(|&position| {
                    let id = self.columns[position];
                    &self.mat.col(id).objective
                        - &self.combined_row_coefficient(id, &multipliers)
                })
                .collect::<Vec<_>>();
            let correction = lu.solve_transpose(&violations);
            for (index, &row_position) in lu.selected_rows().iter().enumerate() {
                multipliers[row_position] += &correction[index];
            }
        }

        // Largest violation of the dual inequalities and sign restrictions.
        let mut worst = Rational::zero();
        for &id in &self.columns {
            let column = self.mat.col(id);
            let violation = match (column.lower.is_finite(), column.upper.is_finite()) {
                (true, false) => {
                    self.combined_row_coefficient(id, &multipliers) - &column.objective
                },
                (false, true) => {
                    &column.objective - self.combined_row_coefficient(id, &multipliers)
                },
                _ => continue,
            };
            if violation > worst {
                worst = violation;
            }
        }
        for (position, &id) in self.rows.iter().enumerate() {
            let row = self.mat.row(id);
            let violation = match (row.left.is_finite(), row.right.is_finite()) {
                (true, false) => -&multipliers[position],
                (false, true) => multipliers[position].clone(),
                _ => continue,
            };
            if violation > worst {
                worst = violation;
            }
        }

        if worst.is_positive() {
            if self.projshift.is_ray {
                let step = &worst / &self.projshift.common_slack;
                for (position, direction) in self.projshift.interior.iter().enumerate() {
                    multipliers[position] += &step * direction;
                }
            } else {
                let towards = &worst / &(&worst + &self.projshift.common_slack);
                let keep = Rational::one() - &towards;
                for (position, point) in self.projshift.interior.iter().enumerate() {
                    multipliers[position] =
                        &keep * &multipliers[position] + &towards * point;
                }
            }
        }

        // The repaired multipliers are exactly dual feasible; price the sides and bounds.
        let mut bound = Rational::zero();
        for (position, &id) in self.rows.iter().enumerate() {
            let row = self.mat.row(id);
            match multipliers[position].signum() {
                1 => bound += &multipliers[position] * &(&row.left - &row.constant),
                -1 => bound += &multipliers[position] * &(&row.right - &row.constant),
                _ => {},
            }
        }
        for &id in &self.columns {
            let column = self.mat.col(id);
            let reduced = &column.objective - &self.combined_row_coefficient(id, &multipliers);
            match reduced.signum() {
                1 => bound += &reduced * &column.lower,
                -1 => bound += &reduced * &column.upper,
                _ => {},
            }
        }

        self.certify(bound, peer)
    }

    /// One-time setup: solve an auxiliary LP for a point (or ray) of the dual region with
    /// maximal common inequality slack, and factor the dual equality system.
    fn prepare_projshift(&mut self) -> Result<(), SafeBoundError> {
        let nr_multipliers = self.rows.len();
        let delta = nr_multipliers;
        let homogeneous = !self.settings.use_interior_point;
        let mut auxiliary = SimplexLp::new();

        let mut variables = Vec::with_capacity(nr_multipliers + 1);
        for (position, &id) in self.rows.iter().enumerate() {
            let fixed = self.mat.row(id).is_free();
            variables.push(BackendColumn {
                name: format!("y{position}"),
                objective: Rational::zero(),
                lower: if fixed { Rational::zero() } else { Rational::negative_infinity() },
                upper: if fixed { Rational::zero() } else { Rational::infinity() },
                entries: Vec::new(),
            });
        }
        variables.push(BackendColumn {
            name: String::from("delta"),
            objective: -Rational::one(),
            lower: Rational::zero(),
            upper: Rational::one(),
            entries: Vec::new(),
        });

        let mut constraints = Vec::new();
        let mut free_columns = Vec::new();
        for (position, &id) in self.columns.iter().enumerate() {
            let column = self.mat.col(id);
            let mut entries = column.entries[..column.nr_lp_rows].iter()
                .filter_map(|entry| {
                    self.mat.row(entry.row).lp_position
                        .map(|row_position| (row_position, entry.value.clone()))
                })
                .collect::<Vec<_>>();
            entries.sort_by_key(|&(row_position, _)| row_position);
            let target = if homogeneous { Rational::zero() } else { column.objective.clone() };

            let (left, right) = match (column.lower.is_finite(), column.upper.is_finite()) {
                (true, true) => continue,
                (false, false) => {
                    free_columns.push(position);
                    (target.clone(), target)
                },
                // Only a lower bound: the reduced cost must come out nonnegative.
                (true, false) => {
                    entries.push((delta, Rational::one()));
                    (Rational::negative_infinity(), target)
                },
                (false, true) => {
                    entries.push((delta, -Rational::one()));
                    (target, Rational::infinity())
                },
            };
            constraints.push(BackendRow {
                name: format!("col{position}"),
                left,
                right,
                entries,
            });
        }
        for (position, &id) in self.rows.iter().enumerate() {
            let row = self.mat.row(id);
            let (left, right, slack) = match (row.left.is_finite(), row.right.is_finite()) {
                (true, false) => {
                    (Rational::zero(), Rational::infinity(), -Rational::one())
                },
                (false, true) => {
                    (Rational::negative_infinity(), Rational::zero(), Rational::one())
                },
                _ => continue,
            };
            constraints.push(BackendRow {
                name: format!("sign{position}"),
                left,
                right,
                entries: vec![(position, Rational::one()), (delta, slack)],
            });
        }

        let failed = |lp: &mut Self| {
            lp.projshift.computed = true;
            lp.projshift.failed = true;
            debug!("project-and-shift setup failed");
            Err(SafeBoundError::ProjectionUnavailable)
        };

        if auxiliary.add_columns(variables).is_err()
            || auxiliary.add_rows(constraints).is_err()
        {
            return failed(self);
        }
        if let Some(seconds) = self.time_limit {
            auxiliary.set_real_param(RealParam::TimeLimit, seconds);
        }
        if auxiliary.solve_primal().is_err() {
            return failed(self);
        }
        match auxiliary.status() {
            BackendStatus::Optimal => {},
            BackendStatus::TimeLimit => return Err(SafeBoundError::Interrupted),
            _ => return failed(self),
        }

        let mut solution = auxiliary.primal_values();
        let common_slack = solution.pop().expect("the slack variable exists");
        if !common_slack.is_positive() {
            // The dual region has an empty relative interior; shifting cannot repair anything.
            return failed(self);
        }

        // Factor the free columns' equality system, with entries on fixed multipliers zeroed so
        // that no pivot lands on a row the projection must not touch.
        let lu = if free_columns.is_empty() {
            None
        } else {
            let factor_columns = free_columns.iter()
                .map(|&position| {
                    let column = self.mat.col(self.columns[position]);
                    let mut dense = vec![Rational::zero(); nr_multipliers];
                    for entry in &column.entries[..column.nr_lp_rows] {
                        let row = self.mat.row(entry.row);
                        if let Some(row_position) = row.lp_position {
                            if !row.is_free() {
                                dense[row_position] = entry.value.clone();
                            }
                        }
                    }
                    dense
                })
                .collect::<Vec<_>>();
            match RectangularLu::factor(nr_multipliers, &factor_columns) {
                Some(lu) => Some(lu),
                None => return failed(self),
            }
        };

        debug!(
            slack = %common_slack,
            free_columns = free_columns.len(),
            ray = homogeneous,
            "project-and-shift setup complete",
        );
        self.projshift = ProjShift {
            computed: true,
            failed: false,
            is_ray: homogeneous,
            interior: solution,
            common_slack,
            lu,
            free_columns,
        };

        Ok(())
    }

    /// Record a proved rational bound and hand its rounded-down double to the peer.
    fn certify(
        &mut self,
        bound: Rational,
        peer: &mut impl FloatingPeer,
    ) -> Result<Rational, SafeBoundError> {
        let safe = bound.to_f64(RoundMode::Down);
        debug!(bound = %bound, safe, "safe dual bound certified");
        self.objective = bound.clone();
        self.has_proved_bound = true;
        peer.set_safe_objective_bound(safe);

        Ok(bound)
    }
}
