//! # Problem tests
//!
//! End-to-end scenarios driving the full stack: the management layer on top of the reference
//! simplex backend, certified against hand-computed rational optima.
use crate::algorithm::simplex::SimplexLp;
use crate::data::number_types::rational::Rational;
use crate::lp::ExactLp;

mod scripted;
mod solve;

pub(crate) fn r(value: i64) -> Rational {
    Rational::from_integer(value)
}

pub(crate) fn exact_lp() -> ExactLp<SimplexLp> {
    ExactLp::new(SimplexLp::new())
}
