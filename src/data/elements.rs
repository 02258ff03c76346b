//! # Building blocks to describe exact linear programs.
use std::ops::Not;

/// Role of a variable or row in a simplex basis.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BasisStatus {
    /// Nonbasic at its lower bound (for a row: activity at the left-hand side).
    Lower,
    /// Nonbasic at its upper bound (for a row: activity at the right-hand side).
    Upper,
    /// In the basis.
    Basic,
    /// Nonbasic free variable resting at zero.
    Zero,
}

/// Outcome classification of the last exact solve.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SolutionStatus {
    /// Nothing certified yet, or a previous result was invalidated.
    NotSolved,
    /// An optimal primal/dual pair is available.
    Optimal,
    /// A dual Farkas proof of infeasibility is available.
    Infeasible,
    /// A primal ray witnessing unboundedness is available.
    UnboundedRay,
    /// The objective limit was reached before optimality.
    ObjectiveLimit,
    /// The iteration limit was reached.
    IterationLimit,
    /// The time limit was reached.
    TimeLimit,
    /// The backend failed.
    Error,
}

impl SolutionStatus {
    /// Whether this outcome carries a certified dual bound.
    #[must_use]
    pub fn certifies_bound(self) -> bool {
        matches!(self, SolutionStatus::Optimal | SolutionStatus::Infeasible)
    }
}

/// Direction of a variable bound.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BoundDirection {
    /// The bound below, `x >= b`.
    Lower,
    /// The bound above, `x <= b`.
    Upper,
}

impl Not for BoundDirection {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Lower => Self::Upper,
            Self::Upper => Self::Lower,
        }
    }
}

/// Side of a row: rows are two-sided, `lhs <= a^T x <= rhs`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SideType {
    /// The left-hand side.
    Left,
    /// The right-hand side.
    Right,
}

impl Not for SideType {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}
