//! # Exact rows
//!
//! One constraint of the rational LP: left and right side, the additive constant, the
//! column-list with per-entry interval enclosures, reference and lock counts, and the dual
//! solution values of the last solve.
use num_traits::Zero;

use crate::data::elements::BasisStatus;
use crate::data::number_types::rational::Rational;
use crate::lp::matrix::RowEntry;

/// Pending changes of a row that the backend has not seen yet.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RowDirty {
    /// The left-hand side changed.
    pub left: bool,
    /// The right-hand side changed.
    pub right: bool,
    /// A coefficient changed and was recorded on this row.
    pub coefficients: bool,
}

impl RowDirty {
    /// Whether any change is pending.
    #[must_use]
    pub fn any(&self) -> bool {
        self.left || self.right || self.coefficients
    }
}

/// A row of the exact LP.
///
/// The constraint reads `left <= sum_j a_j x_j + constant <= right`. The backend sees the sides
/// with the constant subtracted.
#[derive(Debug)]
pub struct Row {
    /// Index of the paired row in the floating-point peer.
    pub(crate) peer: usize,
    pub(crate) name: String,
    pub(crate) left: Rational,
    pub(crate) right: Rational,
    pub(crate) constant: Rational,
    /// Sides last shipped to the backend, already net of the constant.
    pub(crate) flushed_left: Rational,
    pub(crate) flushed_right: Rational,
    /// All columns integer and all coefficients integer.
    pub(crate) integral: bool,

    /// Column-list; the prefix `[0, nr_lp_cols)` holds the linked entries whose column is in
    /// the LP.
    pub(crate) entries: Vec<RowEntry>,
    pub(crate) nr_lp_cols: usize,
    pub(crate) nr_unlinked: usize,
    pub(crate) lp_cols_sorted: bool,
    pub(crate) nonlp_cols_sorted: bool,
    /// Defer sorting and duplicate merging until an explicit force-sort.
    pub(crate) delay_sort: bool,

    pub(crate) lp_position: Option<usize>,
    pub(crate) lpi_position: Option<usize>,
    pub(crate) dirty: RowDirty,
    pub(crate) use_count: usize,
    pub(crate) lock_count: usize,

    /// Row activity including the constant.
    pub(crate) activity: Rational,
    pub(crate) dual: Rational,
    pub(crate) farkas_multiplier: Rational,
    pub(crate) basis_status: BasisStatus,
    pub(crate) valid_solution_stamp: u64,
    pub(crate) valid_activity_stamp: u64,
    pub(crate) valid_farkas_stamp: u64,
}

impl Row {
    pub(crate) fn new(
        peer: usize,
        name: String,
        left: Rational,
        right: Rational,
        constant: Rational,
    ) -> Self {
        Self {
            peer,
            name,
            flushed_left: &left - &constant,
            flushed_right: &right - &constant,
            left,
            right,
            constant,
            integral: true,
            entries: Vec::new(),
            nr_lp_cols: 0,
            nr_unlinked: 0,
            lp_cols_sorted: true,
            nonlp_cols_sorted: true,
            delay_sort: false,
            lp_position: None,
            lpi_position: None,
            dirty: RowDirty::default(),
            use_count: 0,
            lock_count: 0,
            activity: Rational::zero(),
            dual: Rational::zero(),
            farkas_multiplier: Rational::zero(),
            basis_status: BasisStatus::Basic,
            valid_solution_stamp: 0,
            valid_activity_stamp: 0,
            valid_farkas_stamp: 0,
        }
    }

    /// Index of the paired floating-point row.
    #[must_use]
    pub fn peer(&self) -> usize {
        self.peer
    }

    /// Row name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Left-hand side, inclusive of the constant.
    #[must_use]
    pub fn left(&self) -> &Rational {
        &self.left
    }

    /// Right-hand side, inclusive of the constant.
    #[must_use]
    pub fn right(&self) -> &Rational {
        &self.right
    }

    /// The additive constant.
    #[must_use]
    pub fn constant(&self) -> &Rational {
        &self.constant
    }

    /// Number of stored coefficients.
    #[must_use]
    pub fn nr_entries(&self) -> usize {
        self.entries.len()
    }

    /// Whether all columns and all coefficients are integral.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        self.integral
    }

    /// Whether the row is locked against coefficient and side changes.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock_count > 0
    }

    /// Whether both sides are infinite, making any Farkas multiplier on the row invalid unless
    /// it is zero.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.left.is_infinite() && self.right.is_infinite()
    }
}
