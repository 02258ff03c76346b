//! # Errors of the exact LP layer
//!
//! Two families: fatal per-call errors that abort the operation with the container left in a
//! consistent state, and the recoverable outcomes of the safe-bound post-processors, which the
//! caller answers by trying the other strategy or an exact solve.
use std::fmt;

use crate::interface::backend::BackendError;

/// A fatal error of one container operation.
///
/// The container stays consistent but unsolved; the failed operation had no partial effect on
/// the LP data.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum LpError {
    /// A stored coefficient's link partner no longer references it back.
    InvalidLink,
    /// A coefficient or side change was attempted on a row with a nonzero lock count.
    LockedRow,
    /// An operation other than a column bound change was attempted while diving.
    DivingRestriction,
    /// The rational backend failed, also after the one from-scratch retry.
    Backend(BackendError),
    /// The wall clock elapsed before or inside the solve.
    TimeLimit,
    /// An argument was rejected.
    InvalidData(String),
}

impl fmt::Display for LpError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidLink => write!(f, "matrix link invariant violated"),
            Self::LockedRow => write!(f, "modification of a locked row"),
            Self::DivingRestriction => {
                write!(f, "only column bound changes are permitted while diving")
            },
            Self::Backend(error) => error.fmt(f),
            Self::TimeLimit => write!(f, "time limit exceeded"),
            Self::InvalidData(description) => write!(f, "invalid data: {description}"),
        }
    }
}

impl std::error::Error for LpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Backend(error) => Some(error),
            _ => None,
        }
    }
}

impl From<BackendError> for LpError {
    fn from(error: BackendError) -> Self {
        Self::Backend(error)
    }
}

/// A recoverable failure of a safe-bound post-processor.
///
/// No bound was certified; the container is unchanged. The caller may try the other strategy or
/// fall back to an exact solve.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SafeBoundError {
    /// Bound-shifting needs a finite column bound that is absent.
    BoundUnavailable,
    /// Project-and-shift has no usable interior point or factorization.
    ProjectionUnavailable,
    /// The computation hit its time or iteration budget.
    Interrupted,
}

impl fmt::Display for SafeBoundError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::BoundUnavailable => write!(f, "a required finite column bound is absent"),
            Self::ProjectionUnavailable => {
                write!(f, "no interior point or factorization is available")
            },
            Self::Interrupted => write!(f, "safe bound computation interrupted"),
        }
    }
}

impl std::error::Error for SafeBoundError {}
