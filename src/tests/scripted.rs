//! Solve evaluation against a scripted backend: limit handling, retries and proof rejection.
use crate::data::elements::{BasisStatus, SolutionStatus};
use crate::data::number_types::rational::Rational;
use crate::interface::backend::{
    BackendStatus, IntParam, RealParam, PRICING_DEFAULT, PRICING_STEEPEST_EDGE,
};
use crate::interface::peer::SimplePeer;
use crate::interface::testing::{Call, MockBackend, ScriptedSolve};
use crate::lp::error::LpError;
use crate::lp::{ColId, ExactLp, RowId};

use super::r;

/// One column in `[0, 5]` with objective 1, and one covering row `x >= 0`, with the rational
/// re-verification off so that scripted solutions do not have to be consistent.
fn scripted_lp() -> (ExactLp<MockBackend>, ColId, RowId) {
    let mut lp = ExactLp::new(MockBackend::new());
    lp.set_setting("check-primal-feas", "false").unwrap();
    lp.set_setting("check-dual-feas", "false").unwrap();
    let x = lp.create_column(0, "x", r(1), r(0), r(5), false);
    let row = lp.create_row(0, "c", r(0), Rational::infinity(), r(0));
    lp.add_coefficient(x, row, r(1)).unwrap();
    lp.add_column_to_lp(x).unwrap();
    lp.add_row_to_lp(row).unwrap();
    (lp, x, row)
}

fn optimal(objective: i64) -> ScriptedSolve {
    let mut answer = ScriptedSolve::status(BackendStatus::Optimal);
    answer.objective = r(objective);
    answer.primal = vec![r(objective)];
    answer.dual = vec![r(0)];
    answer.activity = vec![r(objective)];
    answer.reduced_cost = vec![r(0)];
    answer.column_basis = vec![BasisStatus::Basic];
    answer.row_basis = vec![BasisStatus::Basic];
    answer.primal_feasible = true;
    answer.dual_feasible = true;
    answer
}

#[test]
fn an_objective_limit_artifact_is_recovered_with_one_extra_pivot() {
    let (mut lp, _, _) = scripted_lp();
    let mut peer = SimplePeer::new();
    peer.cutoff = Some(10.0);

    // The backend stops at the limit while its objective is still below the cutoff: the stop
    // is an artefact of the missing final pivot.
    let mut stopped = ScriptedSolve::status(BackendStatus::ObjectiveLimit);
    stopped.objective = r(8);
    stopped.dual_feasible = true;
    lp.backend.expect_solve(stopped);
    lp.backend.expect_solve(optimal(12));

    let status = lp.solve(true, &mut peer).unwrap();

    assert_eq!(status, SolutionStatus::Optimal);
    assert_eq!(lp.objective_value(), &r(12));
    assert_eq!(peer.safe_bound, Some(12.0));
    assert_eq!(lp.backend.solve_calls(), 2);
    let calls = &lp.backend.calls;
    assert!(calls.contains(&Call::SetRealParam(RealParam::ObjectiveLimit, 10.0)));
    assert!(calls.contains(&Call::SetRealParam(RealParam::ObjectiveLimit, f64::INFINITY)));
    assert!(calls.contains(&Call::SetIntParam(IntParam::Pricing, PRICING_STEEPEST_EDGE)));
    assert!(calls.contains(&Call::SetIntParam(IntParam::IterationLimit, 1)));
    // The temporary parameters are restored afterwards.
    assert_eq!(calls.last(), Some(&Call::SetIntParam(IntParam::Pricing, PRICING_DEFAULT)));
}

#[test]
fn an_objective_limit_beyond_the_cutoff_is_accepted_as_a_bound() {
    let (mut lp, _, _) = scripted_lp();
    let mut peer = SimplePeer::new();
    peer.cutoff = Some(10.0);

    let mut stopped = ScriptedSolve::status(BackendStatus::ObjectiveLimit);
    stopped.objective = r(11);
    stopped.dual_feasible = true;
    lp.backend.expect_solve(stopped);

    let status = lp.solve(true, &mut peer).unwrap();

    assert_eq!(status, SolutionStatus::ObjectiveLimit);
    assert!(lp.has_proved_bound());
    assert_eq!(lp.objective_value(), &r(11));
    assert_eq!(peer.safe_bound, Some(11.0));
    assert_eq!(lp.backend.solve_calls(), 1);
}

#[test]
fn a_backend_failure_gets_one_retry_from_scratch() {
    let (mut lp, _, _) = scripted_lp();
    let mut peer = SimplePeer::new();
    lp.backend.expect_solve(ScriptedSolve::failure("numerical trouble"));
    lp.backend.expect_solve(optimal(4));

    let status = lp.solve(true, &mut peer).unwrap();

    assert_eq!(status, SolutionStatus::Optimal);
    assert_eq!(lp.objective_value(), &r(4));
    let calls = &lp.backend.calls;
    let dual_position = calls.iter().position(|call| call == &Call::SolveDual).unwrap();
    let primal_position = calls.iter().position(|call| call == &Call::SolvePrimal).unwrap();
    assert!(dual_position < primal_position);
    assert!(calls.contains(&Call::SetIntParam(IntParam::FromScratch, 1)));
    // The from-scratch flag is temporary; later solves may warm-start again.
    let restored = calls.iter()
        .position(|call| call == &Call::SetIntParam(IntParam::FromScratch, 0))
        .unwrap();
    assert!(restored > primal_position);
}

#[test]
fn two_backend_failures_abandon_the_solve() {
    let (mut lp, _, _) = scripted_lp();
    let mut peer = SimplePeer::new();
    lp.backend.expect_solve(ScriptedSolve::failure("first"));
    lp.backend.expect_solve(ScriptedSolve::failure("second"));

    assert!(matches!(lp.solve(true, &mut peer), Err(LpError::Backend(_))));
    assert_eq!(lp.status(), SolutionStatus::Error);
    assert!(!lp.has_proved_bound());
}

#[test]
fn the_cutoff_can_be_withheld_from_the_backend() {
    let (mut lp, _, _) = scripted_lp();
    lp.set_setting("pseudoobj-cutoff-disable", "true").unwrap();
    let mut peer = SimplePeer::new();
    peer.cutoff = Some(10.0);
    lp.backend.expect_solve(optimal(4));

    lp.solve(true, &mut peer).unwrap();

    let calls = &lp.backend.calls;
    assert!(calls.contains(&Call::SetRealParam(RealParam::ObjectiveLimit, f64::INFINITY)));
    assert!(!calls.contains(&Call::SetRealParam(RealParam::ObjectiveLimit, 10.0)));
}

#[test]
fn infeasibility_without_a_proof_is_not_accepted() {
    let (mut lp, _, _) = scripted_lp();
    let mut peer = SimplePeer::new();
    lp.backend.expect_solve(ScriptedSolve::status(BackendStatus::Infeasible));

    let status = lp.solve(true, &mut peer).unwrap();

    assert_eq!(status, SolutionStatus::NotSolved);
    assert!(!lp.has_proved_bound());
    assert!(lp.dual_farkas().is_none());
}

#[test]
fn a_rejected_farkas_proof_reverts_to_not_solved() {
    let (mut lp, _, row) = scripted_lp();
    let mut peer = SimplePeer::new();

    // The claimed multiplier prices the left side 0 against a box maximum of 5: no proof.
    let mut infeasible = ScriptedSolve::status(BackendStatus::Infeasible);
    infeasible.farkas = Some(vec![r(1)]);
    lp.backend.expect_solve(infeasible);

    let status = lp.solve(true, &mut peer).unwrap();

    assert_eq!(status, SolutionStatus::NotSolved);
    assert_eq!(lp.row_farkas_multiplier(row), None);
}

#[test]
fn farkas_retrieval_can_be_skipped() {
    let (mut lp, _, _) = scripted_lp();
    let mut peer = SimplePeer::new();
    lp.backend.expect_solve(ScriptedSolve::status(BackendStatus::Infeasible));

    let status = lp.solve(false, &mut peer).unwrap();

    assert_eq!(status, SolutionStatus::Infeasible);
    assert!(lp.dual_farkas().is_none());
}

#[test]
fn iteration_and_time_limits_map_to_their_statuses() {
    let (mut lp, _, _) = scripted_lp();
    let mut peer = SimplePeer::new();

    lp.backend.expect_solve(ScriptedSolve::status(BackendStatus::IterationLimit));
    assert_eq!(lp.solve(true, &mut peer).unwrap(), SolutionStatus::IterationLimit);

    lp.backend.expect_solve(ScriptedSolve::status(BackendStatus::TimeLimit));
    assert_eq!(lp.solve(true, &mut peer).unwrap(), SolutionStatus::TimeLimit);
}
