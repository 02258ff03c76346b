//! # The floating-point peer seam
//!
//! The exact LP mirrors a floating-point relaxation owned by the caller. The mirror only ever
//! needs a narrow view of its peer: the paired column data, row names, the current cutoff bound,
//! whether the caller is mid-dive, and a place to write the certified safe bound back to.
/// A floating-point column paired with an exact column.
#[derive(Clone, Debug, PartialEq)]
pub struct PeerColumn {
    /// Column name.
    pub name: String,
    /// Objective coefficient.
    pub objective: f64,
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
}

/// The floating-point LP that the exact layer mirrors.
pub trait FloatingPeer {
    /// Number of columns in the peer.
    fn nr_columns(&self) -> usize;
    /// The paired column. Must exist for every exact column.
    fn column(&self, index: usize) -> &PeerColumn;
    /// Name of the paired row.
    fn row_name(&self, index: usize) -> &str;
    /// A double that is a safe upper cutoff bound for the minimization.
    fn cutoff_bound(&self) -> f64;
    /// Whether the caller is currently inside a diving excursion.
    fn in_diving(&self) -> bool;
    /// Receive a certified safe dual bound, already rounded in the safe direction.
    fn set_safe_objective_bound(&mut self, bound: f64);
}

/// A plain in-memory peer, for tests and for embedders without a full floating-point LP.
#[derive(Clone, Debug, Default)]
pub struct SimplePeer {
    /// Paired columns.
    pub columns: Vec<PeerColumn>,
    /// Row names by index.
    pub row_names: Vec<String>,
    /// Cutoff bound reported to the exact layer.
    pub cutoff: Option<f64>,
    /// Diving flag reported to the exact layer.
    pub diving: bool,
    /// The last safe bound written back by the exact layer.
    pub safe_bound: Option<f64>,
}

impl SimplePeer {
    /// An empty peer with no columns or rows.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a paired column, returning its index.
    pub fn add_column(&mut self, name: impl Into<String>, objective: f64, lower: f64, upper: f64) -> usize {
        self.columns.push(PeerColumn { name: name.into(), objective, lower, upper });
        self.columns.len() - 1
    }

    /// Append a row name, returning its index.
    pub fn add_row(&mut self, name: impl Into<String>) -> usize {
        self.row_names.push(name.into());
        self.row_names.len() - 1
    }
}

impl FloatingPeer for SimplePeer {
    fn nr_columns(&self) -> usize {
        self.columns.len()
    }

    fn column(&self, index: usize) -> &PeerColumn {
        &self.columns[index]
    }

    fn row_name(&self, index: usize) -> &str {
        &self.row_names[index]
    }

    fn cutoff_bound(&self) -> f64 {
        self.cutoff.unwrap_or(f64::INFINITY)
    }

    fn in_diving(&self) -> bool {
        self.diving
    }

    fn set_safe_objective_bound(&mut self, bound: f64) {
        self.safe_bound = Some(bound);
    }
}
