//! # The simplex working state
//!
//! Basis, explicit basis inverse and variable statuses for one solve. Variables are the
//! structural columns, then one slack per row, then any phase-one artificials. The constraint
//! system is `D z = 0` with `D = [A | -I | S]` where `S` holds a signed unit column per
//! initially violated row.
use std::time::Instant;

use num_traits::Zero;

use crate::data::elements::BasisStatus;
use crate::data::number_types::rational::Rational;
use crate::interface::backend::{BackendColumn, BackendRow};

/// How a phase of the simplex loop ended.
pub(super) enum PhaseOutcome {
    /// The phase reached optimality for its cost vector.
    Finished,
    /// The objective is unbounded; the payload is a primal ray over the structural columns.
    Unbounded(Vec<Rational>),
    /// The iteration budget ran out.
    IterationLimit,
    /// The deadline passed.
    TimeLimit,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum VarStatus {
    AtLower,
    AtUpper,
    /// Nonbasic free variable resting at zero.
    AtZero,
    Basic,
}

#[derive(Debug)]
struct Variable {
    column: Vec<Rational>,
    lower: Rational,
    upper: Rational,
    cost: Rational,
    phase_one_cost: Rational,
    status: VarStatus,
    artificial: bool,
}

impl Variable {
    fn is_fixed(&self) -> bool {
        self.lower.is_finite() && self.lower == self.upper
    }
}

pub(super) struct Worker {
    nr_rows: usize,
    nr_structural: usize,
    variables: Vec<Variable>,
    /// Basic variable per row.
    basis: Vec<usize>,
    /// Explicit basis inverse.
    binv: Vec<Vec<Rational>>,
    /// Value of the basic variable per row.
    x_basic: Vec<Rational>,
    in_phase_one: bool,
}

fn dot(left: &[Rational], right: &[Rational]) -> Rational {
    debug_assert_eq!(left.len(), right.len());

    left.iter().zip(right)
        .filter(|(a, b)| !a.is_zero() && !b.is_zero())
        .map(|(a, b)| a * b)
        .sum()
}

impl Worker {
    pub(super) fn new(columns: &[BackendColumn], rows: &[BackendRow]) -> Self {
        let nr_rows = rows.len();
        let nr_structural = columns.len();

        let mut variables = Vec::with_capacity(nr_structural + nr_rows);
        for column in columns {
            let mut dense = vec![Rational::zero(); nr_rows];
            for (row, value) in &column.entries {
                dense[*row] = value.clone();
            }
            let status = initial_status(&column.lower, &column.upper);
            variables.push(Variable {
                column: dense,
                lower: column.lower.clone(),
                upper: column.upper.clone(),
                cost: column.objective.clone(),
                phase_one_cost: Rational::zero(),
                status,
                artificial: false,
            });
        }
        for (i, row) in rows.iter().enumerate() {
            let mut dense = vec![Rational::zero(); nr_rows];
            dense[i] = -Rational::from_integer(1);
            variables.push(Variable {
                column: dense,
                lower: row.left.clone(),
                upper: row.right.clone(),
                cost: Rational::zero(),
                phase_one_cost: Rational::zero(),
                status: VarStatus::Basic,
                artificial: false,
            });
        }

        // Start from the slack basis. Rows whose activity at the nonbasic point violates a side
        // get their slack pushed to the violated side and an artificial basic variable covering
        // the gap.
        let mut basis = (0..nr_rows).map(|i| nr_structural + i).collect::<Vec<_>>();
        let mut binv = (0..nr_rows)
            .map(|i| {
                let mut row = vec![Rational::zero(); nr_rows];
                row[i] = -Rational::from_integer(1);
                row
            })
            .collect::<Vec<_>>();
        let mut x_basic = vec![Rational::zero(); nr_rows];

        let activities = (0..nr_rows)
            .map(|i| {
                (0..nr_structural)
                    .filter(|&j| variables[j].status != VarStatus::AtZero)
                    .map(|j| {
                        let value = match variables[j].status {
                            VarStatus::AtLower => &variables[j].lower,
                            VarStatus::AtUpper => &variables[j].upper,
                            _ => unreachable!(),
                        };
                        &variables[j].column[i] * value
                    })
                    .sum::<Rational>()
            })
            .collect::<Vec<_>>();

        for (i, activity) in activities.into_iter().enumerate() {
            let slack = nr_structural + i;
            let (violated_side, sigma) = if activity > variables[slack].upper {
                (VarStatus::AtUpper, -Rational::from_integer(1))
            } else if activity < variables[slack].lower {
                (VarStatus::AtLower, Rational::from_integer(1))
            } else {
                x_basic[i] = activity;
                continue;
            };

            variables[slack].status = violated_side;
            let side = match violated_side {
                VarStatus::AtUpper => variables[slack].upper.clone(),
                _ => variables[slack].lower.clone(),
            };

            let mut dense = vec![Rational::zero(); nr_rows];
            dense[i] = sigma.clone();
            let artificial = variables.len();
            variables.push(Variable {
                column: dense,
                lower: Rational::zero(),
                upper: Rational::infinity(),
                cost: Rational::zero(),
                phase_one_cost: Rational::from_integer(1),
                status: VarStatus::Basic,
                artificial: true,
            });

            basis[i] = artificial;
            binv[i][i] = sigma.clone();
            // z_B(i) = -sigma * (activity - side), which is positive by choice of sigma.
            x_basic[i] = -&sigma * (&activity - &side);
        }

        Self {
            nr_rows,
            nr_structural,
            variables,
            basis,
            binv,
            x_basic,
            in_phase_one: true,
        }
    }

    fn cost(&self, variable: usize) -> &Rational {
        if self.in_phase_one {
            &self.variables[variable].phase_one_cost
        } else {
            &self.variables[variable].cost
        }
    }

    fn nonbasic_value(&self, variable: usize) -> Rational {
        match self.variables[variable].status {
            VarStatus::AtLower => self.variables[variable].lower.clone(),
            VarStatus::AtUpper => self.variables[variable].upper.clone(),
            VarStatus::AtZero => Rational::zero(),
            VarStatus::Basic => panic!("basic variable has no nonbasic value"),
        }
    }

    /// Dual vector `y = c_B B^-1` for the current phase's costs.
    pub(super) fn duals(&self) -> Vec<Rational> {
        (0..self.nr_rows)
            .map(|i| {
                (0..self.nr_rows)
                    .map(|r| self.cost(self.basis[r]) * &self.binv[r][i])
                    .sum()
            })
            .collect()
    }

    fn reduced_cost(&self, y: &[Rational], variable: usize) -> Rational {
        self.cost(variable) - dot(y, &self.variables[variable].column)
    }

    /// Minimize the phase-one infeasibility sum.
    pub(super) fn phase_one(
        &mut self,
        budget: &mut Option<u64>,
        started: &Instant,
        deadline: Option<f64>,
    ) -> PhaseOutcome {
        self.in_phase_one = true;
        self.run(budget, started, deadline)
    }

    /// Remaining total infeasibility after phase one.
    pub(super) fn infeasibility(&self) -> Rational {
        (0..self.nr_rows)
            .filter(|&r| self.variables[self.basis[r]].artificial)
            .map(|r| self.x_basic[r].clone())
            .sum()
    }

    /// Minimize the true objective; artificials are fixed at zero first.
    pub(super) fn phase_two(
        &mut self,
        budget: &mut Option<u64>,
        started: &Instant,
        deadline: Option<f64>,
    ) -> PhaseOutcome {
        for variable in &mut self.variables {
            if variable.artificial {
                variable.upper = Rational::zero();
            }
        }
        self.in_phase_one = false;
        self.run(budget, started, deadline)
    }

    /// The bounded-variable primal simplex loop with Bland's rule.
    fn run(
        &mut self,
        budget: &mut Option<u64>,
        started: &Instant,
        deadline: Option<f64>,
    ) -> PhaseOutcome {
        loop {
            if let Some(limit) = deadline {
                if started.elapsed().as_secs_f64() >= limit {
                    return PhaseOutcome::TimeLimit;
                }
            }
            if *budget == Some(0) {
                return PhaseOutcome::IterationLimit;
            }

            let y = self.duals();

            // Entering variable: the lowest index with a profitable reduced cost.
            let entering = (0..self.variables.len()).find_map(|k| {
                let variable = &self.variables[k];
                if variable.status == VarStatus::Basic || variable.is_fixed() {
                    return None;
                }
                let reduced = self.reduced_cost(&y, k);
                let direction = match variable.status {
                    VarStatus::AtLower if reduced.is_negative() => 1,
                    VarStatus::AtUpper if reduced.is_positive() => -1,
                    VarStatus::AtZero if reduced.is_negative() => 1,
                    VarStatus::AtZero if reduced.is_positive() => -1,
                    _ => return None,
                };
                Some((k, direction))
            });
            let (entering, direction) = match entering {
                Some(found) => found,
                None => return PhaseOutcome::Finished,
            };

            let alpha = (0..self.nr_rows)
                .map(|r| dot(&self.binv[r], &self.variables[entering].column))
                .collect::<Vec<_>>();

            // Ratio test: the entering variable moves by t in its direction, basic variables
            // move against rate = direction * alpha.
            enum Blocking {
                OwnBound,
                Row(usize),
            }

            let own_range = {
                let variable = &self.variables[entering];
                if variable.lower.is_finite() && variable.upper.is_finite() {
                    Some(&variable.upper - &variable.lower)
                } else {
                    None
                }
            };
            let mut best: Option<(Rational, Blocking)> = own_range.map(|t| (t, Blocking::OwnBound));

            for r in 0..self.nr_rows {
                let rate = if direction > 0 { alpha[r].clone() } else { -&alpha[r] };
                let basic = &self.variables[self.basis[r]];
                let limit = if rate.is_positive() && basic.lower.is_finite() {
                    Some(&(&self.x_basic[r] - &basic.lower) / &rate)
                } else if rate.is_negative() && basic.upper.is_finite() {
                    Some(&(&basic.upper - &self.x_basic[r]) / &-&rate)
                } else {
                    None
                };
                if let Some(t) = limit {
                    let replace = match &best {
                        None => true,
                        Some((best_t, _)) if &t < best_t => true,
                        // Bland's tie-break: the leaving variable with the lowest index.
                        Some((best_t, Blocking::Row(other))) => {
                            &t == best_t && self.basis[r] < self.basis[*other]
                        },
                        Some((best_t, Blocking::OwnBound)) => &t == best_t,
                    };
                    if replace {
                        best = Some((t, Blocking::Row(r)));
                    }
                }
            }

            let (step, blocking) = match best {
                Some(found) => found,
                None => return PhaseOutcome::Unbounded(self.extract_ray(entering, direction, &alpha)),
            };

            match blocking {
                Blocking::OwnBound => {
                    // A bound flip: no basis change.
                    for r in 0..self.nr_rows {
                        let rate = if direction > 0 { alpha[r].clone() } else { -&alpha[r] };
                        let update = &step * &rate;
                        self.x_basic[r] -= update;
                    }
                    self.variables[entering].status = match self.variables[entering].status {
                        VarStatus::AtLower => VarStatus::AtUpper,
                        VarStatus::AtUpper => VarStatus::AtLower,
                        other => other,
                    };
                },
                Blocking::Row(pivot_row) => {
                    let entering_value = {
                        let offset = if direction > 0 { step.clone() } else { -&step };
                        self.nonbasic_value(entering) + offset
                    };

                    let leaving = self.basis[pivot_row];
                    let rate = if direction > 0 {
                        alpha[pivot_row].clone()
                    } else {
                        -&alpha[pivot_row]
                    };
                    self.variables[leaving].status = if rate.is_positive() {
                        VarStatus::AtLower
                    } else {
                        VarStatus::AtUpper
                    };

                    // Update the explicit inverse: eliminate the entering column.
                    let pivot = alpha[pivot_row].clone();
                    for value in &mut self.binv[pivot_row] {
                        *value = &*value / &pivot;
                    }
                    for r in 0..self.nr_rows {
                        if r == pivot_row || alpha[r].is_zero() {
                            continue;
                        }
                        for i in 0..self.nr_rows {
                            let update = &alpha[r] * &self.binv[pivot_row][i];
                            self.binv[r][i] -= update;
                        }
                    }

                    for r in 0..self.nr_rows {
                        if r == pivot_row {
                            continue;
                        }
                        let rate = if direction > 0 { alpha[r].clone() } else { -&alpha[r] };
                        let update = &step * &rate;
                        self.x_basic[r] -= update;
                    }
                    self.x_basic[pivot_row] = entering_value;

                    self.variables[entering].status = VarStatus::Basic;
                    self.basis[pivot_row] = entering;
                },
            }

            if let Some(remaining) = budget {
                *remaining -= 1;
            }
        }
    }

    fn extract_ray(&self, entering: usize, direction: i32, alpha: &[Rational]) -> Vec<Rational> {
        let mut ray = vec![Rational::zero(); self.nr_structural];
        if entering < self.nr_structural {
            ray[entering] = Rational::from_integer(direction.into());
        }
        for r in 0..self.nr_rows {
            let variable = self.basis[r];
            if variable < self.nr_structural {
                let rate = if direction > 0 { alpha[r].clone() } else { -&alpha[r] };
                ray[variable] = -rate;
            }
        }
        ray
    }

    /// Objective value of the current point for the true costs.
    pub(super) fn objective_value(&self) -> Rational {
        let basic = (0..self.nr_rows)
            .map(|r| &self.variables[self.basis[r]].cost * &self.x_basic[r])
            .sum::<Rational>();
        let nonbasic = (0..self.variables.len())
            .filter(|&k| self.variables[k].status != VarStatus::Basic)
            .filter(|&k| !self.variables[k].cost.is_zero())
            .map(|k| &self.variables[k].cost * self.nonbasic_value(k))
            .sum::<Rational>();
        basic + nonbasic
    }

    /// Value per structural column.
    pub(super) fn primal_values(&self) -> Vec<Rational> {
        let mut values = (0..self.nr_structural)
            .map(|j| match self.variables[j].status {
                VarStatus::Basic => Rational::zero(),
                _ => self.nonbasic_value(j),
            })
            .collect::<Vec<_>>();
        for r in 0..self.nr_rows {
            if self.basis[r] < self.nr_structural {
                values[self.basis[r]] = self.x_basic[r].clone();
            }
        }
        values
    }

    /// Value per slack, which is the row activity.
    pub(super) fn activities(&self) -> Vec<Rational> {
        let mut values = (0..self.nr_rows)
            .map(|i| {
                let slack = self.nr_structural + i;
                match self.variables[slack].status {
                    VarStatus::Basic => Rational::zero(),
                    _ => self.nonbasic_value(slack),
                }
            })
            .collect::<Vec<_>>();
        for r in 0..self.nr_rows {
            let variable = self.basis[r];
            if variable >= self.nr_structural && variable < self.nr_structural + self.nr_rows {
                values[variable - self.nr_structural] = self.x_basic[r].clone();
            }
        }
        values
    }

    /// Reduced cost per structural column for the current phase's costs.
    pub(super) fn reduced_costs(&self) -> Vec<Rational> {
        let y = self.duals();
        (0..self.nr_structural)
            .map(|j| self.reduced_cost(&y, j))
            .collect()
    }

    pub(super) fn column_basis(&self) -> Vec<BasisStatus> {
        (0..self.nr_structural)
            .map(|j| to_basis_status(self.variables[j].status))
            .collect()
    }

    pub(super) fn row_basis(&self) -> Vec<BasisStatus> {
        (0..self.nr_rows)
            .map(|i| to_basis_status(self.variables[self.nr_structural + i].status))
            .collect()
    }
}

fn initial_status(lower: &Rational, upper: &Rational) -> VarStatus {
    if lower.is_finite() {
        VarStatus::AtLower
    } else if upper.is_finite() {
        VarStatus::AtUpper
    } else {
        VarStatus::AtZero
    }
}

fn to_basis_status(status: VarStatus) -> BasisStatus {
    match status {
        VarStatus::AtLower => BasisStatus::Lower,
        VarStatus::AtUpper => BasisStatus::Upper,
        VarStatus::Basic => BasisStatus::Basic,
        VarStatus::AtZero => BasisStatus::Zero,
    }
}
