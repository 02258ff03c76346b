//! # Algorithms
//!
//! The reference exact simplex implementation that realizes the backend seam. The management
//! layer under `crate::lp` never depends on it directly; it is one concrete
//! [`RationalLpBackend`](crate::interface::backend::RationalLpBackend) among possible others.
pub mod simplex;
