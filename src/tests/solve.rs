//! Solve-and-evaluate scenarios on the reference simplex backend.
use num_traits::Zero;

use crate::data::elements::SolutionStatus;
use crate::data::number_types::rational::{Rational, RoundMode};
use crate::interface::peer::SimplePeer;
use crate::lp::error::LpError;

use super::{exact_lp, r};

#[test]
fn a_small_feasible_program_is_solved_and_certified() {
    // min x + 2y subject to x + y >= 3, both in [0, 5]; optimum x = 3, y = 0.
    let mut lp = exact_lp();
    let mut peer = SimplePeer::new();
    let x = lp.create_column(0, "x", r(1), r(0), r(5), false);
    let y = lp.create_column(1, "y", r(2), r(0), r(5), false);
    let row = lp.create_row(0, "c", r(3), Rational::infinity(), r(0));
    lp.add_coefficient(x, row, r(1)).unwrap();
    lp.add_coefficient(y, row, r(1)).unwrap();
    lp.add_column_to_lp(x).unwrap();
    lp.add_column_to_lp(y).unwrap();
    lp.add_row_to_lp(row).unwrap();

    let status = lp.solve(true, &mut peer).unwrap();

    assert_eq!(status, SolutionStatus::Optimal);
    assert_eq!(lp.objective_value(), &r(3));
    assert!(lp.has_proved_bound());
    assert!(lp.is_solution_basic());
    assert_eq!(peer.safe_bound, Some(3.0));
    assert_eq!(lp.column_primal(x), Some(&r(3)));
    assert_eq!(lp.column_primal(y), Some(&r(0)));
    assert_eq!(lp.row_activity(row), Some(&r(3)));
    assert_eq!(lp.row_dual(row), Some(&r(1)));
    assert_eq!(lp.column_reduced_cost(y), Some(&r(1)));
}

#[test]
fn fractional_optima_round_towards_the_safe_side() {
    // min x subject to 3x >= 1: the optimum 1/3 has no exact double.
    let mut lp = exact_lp();
    let mut peer = SimplePeer::new();
    let x = lp.create_column(0, "x", r(1), r(0), r(10), false);
    let row = lp.create_row(0, "c", r(1), Rational::infinity(), r(0));
    lp.add_coefficient(x, row, r(3)).unwrap();
    lp.add_column_to_lp(x).unwrap();
    lp.add_row_to_lp(row).unwrap();

    lp.solve(true, &mut peer).unwrap();

    let third = &r(1) / &r(3);
    assert_eq!(lp.objective_value(), &third);
    let bound = peer.safe_bound.unwrap();
    assert!(bound <= 1.0 / 3.0);
    assert_eq!(bound, third.to_f64(RoundMode::Down));
}

#[test]
fn an_empty_program_is_optimal_at_zero() {
    let mut lp = exact_lp();
    let mut peer = SimplePeer::new();

    let status = lp.solve(true, &mut peer).unwrap();

    assert_eq!(status, SolutionStatus::Optimal);
    assert!(lp.objective_value().is_zero());
    assert_eq!(peer.safe_bound, Some(0.0));
}

#[test]
fn equal_bounds_fix_a_column() {
    let mut lp = exact_lp();
    let mut peer = SimplePeer::new();
    let x = lp.create_column(0, "x", r(1), r(5), r(5), false);
    lp.add_column_to_lp(x).unwrap();

    let status = lp.solve(true, &mut peer).unwrap();

    assert_eq!(status, SolutionStatus::Optimal);
    assert_eq!(lp.objective_value(), &r(5));
    assert_eq!(lp.column_primal(x), Some(&r(5)));
}

#[test]
fn infeasibility_comes_with_a_validated_farkas_proof() {
    // x fixed to 5 against x <= 4.
    let mut lp = exact_lp();
    let mut peer = SimplePeer::new();
    let x = lp.create_column(0, "x", r(0), r(5), r(5), false);
    let row = lp.create_row(0, "c", Rational::negative_infinity(), r(4), r(0));
    lp.add_coefficient(x, row, r(1)).unwrap();
    lp.add_column_to_lp(x).unwrap();
    lp.add_row_to_lp(row).unwrap();

    let status = lp.solve(true, &mut peer).unwrap();

    assert_eq!(status, SolutionStatus::Infeasible);
    assert!(lp.has_proved_bound());
    // An infeasible node certifies the strongest possible bound to the peer.
    assert_eq!(peer.safe_bound, Some(f64::INFINITY));
    let farkas = lp.dual_farkas().unwrap();
    assert_eq!(farkas.len(), 1);
    // The multiplier prices the finite right-hand side.
    assert!(farkas[0].is_negative());
    assert_eq!(lp.row_farkas_multiplier(row), Some(&farkas[0]));
}

#[test]
fn free_rows_carry_a_zero_farkas_multiplier() {
    let mut lp = exact_lp();
    let mut peer = SimplePeer::new();
    let x = lp.create_column(0, "x", r(0), r(5), r(5), false);
    let tight = lp.create_row(0, "c", Rational::negative_infinity(), r(4), r(0));
    let free = lp.create_row(
        1,
        "free",
        Rational::negative_infinity(),
        Rational::infinity(),
        r(0),
    );
    lp.add_coefficient(x, tight, r(1)).unwrap();
    lp.add_coefficient(x, free, r(1)).unwrap();
    lp.add_column_to_lp(x).unwrap();
    lp.add_row_to_lp(tight).unwrap();
    lp.add_row_to_lp(free).unwrap();

    let status = lp.solve(true, &mut peer).unwrap();

    assert_eq!(status, SolutionStatus::Infeasible);
    assert_eq!(lp.row_farkas_multiplier(free), Some(&r(0)));
}

#[test]
fn unboundedness_comes_with_a_validated_ray() {
    let mut lp = exact_lp();
    let mut peer = SimplePeer::new();
    let x = lp.create_column(0, "x", r(-1), r(0), Rational::infinity(), false);
    lp.add_column_to_lp(x).unwrap();

    let status = lp.solve(true, &mut peer).unwrap();

    assert_eq!(status, SolutionStatus::UnboundedRay);
    assert!(!lp.has_proved_bound());
    let ray = lp.unbounded_ray().unwrap();
    assert_eq!(ray.len(), 1);
    assert!(ray[0].is_positive());
}

#[test]
fn repeated_solves_give_identical_answers() {
    let mut lp = exact_lp();
    let mut peer = SimplePeer::new();
    let x = lp.create_column(0, "x", r(1), r(0), r(5), false);
    let y = lp.create_column(1, "y", r(2), r(0), r(5), false);
    let row = lp.create_row(0, "c", r(3), Rational::infinity(), r(0));
    lp.add_coefficient(x, row, r(1)).unwrap();
    lp.add_coefficient(y, row, r(1)).unwrap();
    lp.add_column_to_lp(x).unwrap();
    lp.add_column_to_lp(y).unwrap();
    lp.add_row_to_lp(row).unwrap();

    lp.solve(true, &mut peer).unwrap();
    let first_objective = lp.objective_value().clone();
    let first_primal = (lp.column_primal(x).cloned(), lp.column_primal(y).cloned());

    lp.solve(true, &mut peer).unwrap();

    assert_eq!(lp.objective_value(), &first_objective);
    assert_eq!((lp.column_primal(x).cloned(), lp.column_primal(y).cloned()), first_primal);
}

#[test]
fn diving_round_trips_the_container_state() {
    let mut lp = exact_lp();
    let mut peer = SimplePeer::new();
    let x = lp.create_column(0, "x", r(1), r(0), r(5), false);
    let y = lp.create_column(1, "y", r(2), r(0), r(5), false);
    let row = lp.create_row(0, "c", r(3), Rational::infinity(), r(0));
    lp.add_coefficient(x, row, r(1)).unwrap();
    lp.add_coefficient(y, row, r(1)).unwrap();
    lp.add_column_to_lp(x).unwrap();
    lp.add_column_to_lp(y).unwrap();
    lp.add_row_to_lp(row).unwrap();
    lp.solve(true, &mut peer).unwrap();
    assert_eq!(lp.objective_value(), &r(3));

    lp.start_dive().unwrap();
    lp.change_bounds(x, r(0), r(0)).unwrap();
    lp.solve(true, &mut peer).unwrap();
    assert_eq!(lp.objective_value(), &r(6));
    assert_eq!(lp.column_primal(y), Some(&r(3)));
    lp.end_dive().unwrap();

    assert_eq!(lp.status(), SolutionStatus::Optimal);
    assert_eq!(lp.objective_value(), &r(3));
    assert_eq!(lp.column_primal(x), Some(&r(3)));
    assert_eq!(lp.column_primal(y), Some(&r(0)));
    assert_eq!(lp.column(x).lower(), &r(0));
    assert_eq!(lp.column(x).upper(), &r(5));

    // A fresh solve of the restored program reproduces the original optimum.
    lp.solve(true, &mut peer).unwrap();
    assert_eq!(lp.objective_value(), &r(3));
}

#[test]
fn solving_requires_the_exact_layer_to_be_enabled() {
    let mut lp = exact_lp();
    let mut peer = SimplePeer::new();
    lp.set_setting("exact-enabled", "false").unwrap();

    assert!(matches!(lp.solve(true, &mut peer), Err(LpError::InvalidData(_))));
}

#[test]
fn a_spent_time_limit_fails_before_the_backend_is_entered() {
    let mut lp = exact_lp();
    let mut peer = SimplePeer::new();
    lp.set_time_limit(Some(0.0));

    assert_eq!(lp.solve(true, &mut peer), Err(LpError::TimeLimit));
}
