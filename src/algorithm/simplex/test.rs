use num_traits::Zero;

use crate::data::elements::BasisStatus;
use crate::data::number_types::rational::Rational;
use crate::interface::backend::{
    BackendColumn, BackendRow, BackendStatus, IntParam, RationalLpBackend, RealParam,
};

use super::SimplexLp;

fn r(value: i64) -> Rational {
    Rational::from_integer(value)
}

fn column(
    name: &str,
    objective: i64,
    lower: Rational,
    upper: Rational,
    entries: Vec<(usize, i64)>,
) -> BackendColumn {
    BackendColumn {
        name: name.to_string(),
        objective: r(objective),
        lower,
        upper,
        entries: entries.into_iter().map(|(i, v)| (i, r(v))).collect(),
    }
}

fn row(name: &str, left: Rational, right: Rational) -> BackendRow {
    BackendRow { name: name.to_string(), left, right, entries: Vec::new() }
}

/// min -x - y subject to x + y <= 4 with x, y in [0, 3].
fn packing_problem() -> SimplexLp {
    let mut lp = SimplexLp::new();
    lp.add_rows(vec![row("capacity", Rational::negative_infinity(), r(4))]).unwrap();
    lp.add_columns(vec![
        column("x", -1, r(0), r(3), vec![(0, 1)]),
        column("y", -1, r(0), r(3), vec![(0, 1)]),
    ]).unwrap();
    lp
}

#[test]
fn optimal_bounded() {
    let mut lp = packing_problem();

    lp.solve_primal().unwrap();

    assert_eq!(lp.status(), BackendStatus::Optimal);
    assert!(lp.is_primal_feasible());
    assert_eq!(lp.objective_value(), r(-4));
    let primal = lp.primal_values();
    assert_eq!(&primal[0] + &primal[1], r(4));
    assert_eq!(lp.activities(), vec![r(4)]);
}

#[test]
fn duals_and_reduced_costs_are_complementary() {
    // min -x with x in [0, 10] and x <= 4; at the optimum x is basic, so its reduced cost
    // vanishes and the row price carries the whole objective gradient.
    let mut lp = SimplexLp::new();
    lp.add_rows(vec![row("r", Rational::negative_infinity(), r(4))]).unwrap();
    lp.add_columns(vec![column("x", -1, r(0), r(10), vec![(0, 1)])]).unwrap();

    lp.solve_dual().unwrap();

    assert_eq!(lp.status(), BackendStatus::Optimal);
    assert_eq!(lp.objective_value(), r(-4));
    assert_eq!(lp.primal_values(), vec![r(4)]);
    assert_eq!(lp.reduced_costs(), vec![Rational::zero()]);
    assert_eq!(lp.dual_values(), vec![r(-1)]);
    let (columns, rows) = lp.basis();
    assert_eq!(columns, vec![BasisStatus::Basic]);
    assert_eq!(rows, vec![BasisStatus::Upper]);
}

#[test]
fn infeasible_yields_valid_farkas() {
    // x fixed at 5 but x <= 4.
    let mut lp = SimplexLp::new();
    lp.add_rows(vec![row("r", Rational::negative_infinity(), r(4))]).unwrap();
    lp.add_columns(vec![column("x", 0, r(5), r(5), vec![(0, 1)])]).unwrap();

    lp.solve_dual().unwrap();

    assert_eq!(lp.status(), BackendStatus::Infeasible);
    assert!(!lp.is_primal_feasible());
    let farkas = lp.dual_farkas().unwrap();
    assert_eq!(farkas.len(), 1);

    // The row's left side is infinite, so a valid certificate must price its right side.
    assert!(farkas[0].is_negative());
    // The certificate proves y_0 * right > max over the bound box of (y^T A) x, where y^T A
    // has the single entry y_0 and x ranges over [5, 5].
    let lhs = &farkas[0] * r(4);
    let rhs = &farkas[0] * r(5);
    assert!(lhs > rhs);
}

#[test]
fn unbounded_yields_ray() {
    let mut lp = SimplexLp::new();
    lp.add_columns(vec![column("x", -1, r(0), Rational::infinity(), vec![])]).unwrap();

    lp.solve_primal().unwrap();

    assert_eq!(lp.status(), BackendStatus::Unbounded);
    let ray = lp.primal_ray().unwrap();
    // The ray decreases the objective: c^T d < 0.
    assert!((&r(-1) * &ray[0]).is_negative());
}

#[test]
fn equality_row() {
    let mut lp = SimplexLp::new();
    lp.add_rows(vec![row("balance", r(2), r(2))]).unwrap();
    lp.add_columns(vec![
        column("x", 1, r(0), r(10), vec![(0, 1)]),
        column("y", 1, r(0), r(10), vec![(0, 1)]),
    ]).unwrap();

    lp.solve_primal().unwrap();

    assert_eq!(lp.status(), BackendStatus::Optimal);
    assert_eq!(lp.objective_value(), r(2));
    assert_eq!(lp.activities(), vec![r(2)]);
}

#[test]
fn bound_flip_without_pivot() {
    // No rows at all: the only move available is flipping x to its upper bound.
    let mut lp = SimplexLp::new();
    lp.add_columns(vec![column("x", -1, r(0), r(2), vec![])]).unwrap();

    lp.solve_primal().unwrap();

    assert_eq!(lp.status(), BackendStatus::Optimal);
    assert_eq!(lp.objective_value(), r(-2));
    assert_eq!(lp.primal_values(), vec![r(2)]);
}

#[test]
fn free_variable_enters_the_basis() {
    let mut lp = SimplexLp::new();
    lp.add_rows(vec![row("floor", r(1), Rational::infinity())]).unwrap();
    lp.add_columns(vec![
        column("x", 1, Rational::negative_infinity(), Rational::infinity(), vec![(0, 1)]),
    ]).unwrap();

    lp.solve_primal().unwrap();

    assert_eq!(lp.status(), BackendStatus::Optimal);
    assert_eq!(lp.objective_value(), r(1));
    assert_eq!(lp.primal_values(), vec![r(1)]);
}

#[test]
fn iteration_limit_interrupts() {
    let mut lp = packing_problem();
    lp.set_int_param(IntParam::IterationLimit, 0);

    lp.solve_primal().unwrap();

    assert_eq!(lp.status(), BackendStatus::IterationLimit);
    assert!(!lp.is_primal_feasible());
}

#[test]
fn objective_limit_reported_at_optimality() {
    // min x with x in [1, 3]: the optimum 1 exceeds the limit 1/2.
    let mut lp = SimplexLp::new();
    lp.add_columns(vec![column("x", 1, r(1), r(3), vec![])]).unwrap();
    lp.set_real_param(RealParam::ObjectiveLimit, 0.5);

    lp.solve_dual().unwrap();

    assert_eq!(lp.status(), BackendStatus::ObjectiveLimit);
    assert!(lp.is_primal_feasible());
    assert!(lp.is_dual_feasible());
    assert_eq!(lp.objective_value(), r(1));
}

#[test]
fn conflicting_bounds_are_an_error() {
    let mut lp = SimplexLp::new();
    lp.add_columns(vec![column("x", 0, r(2), r(1), vec![])]).unwrap();

    assert!(lp.solve_primal().is_err());
}

#[test]
fn modifications_invalidate_the_solution() {
    let mut lp = packing_problem();
    lp.solve_primal().unwrap();
    assert_eq!(lp.status(), BackendStatus::Optimal);

    lp.change_objectives(&[(0, r(1))]).unwrap();

    assert_eq!(lp.status(), BackendStatus::NotSolved);
    assert!(lp.primal_values().is_empty());
}

#[test]
fn deletion_truncates_both_directions() {
    let mut lp = packing_problem();
    lp.delete_columns_from(1).unwrap();

    assert_eq!(lp.nr_columns(), 1);
    assert_eq!(lp.rows[0].entries.len(), 1);

    lp.delete_rows_from(0).unwrap();
    assert_eq!(lp.nr_rows(), 0);
    assert!(lp.columns[0].entries.is_empty());
}
