//! # Exact linear algebra
//!
//! Dense factorization utilities over the rationals. Everything here is exact; there are no
//! tolerances and any nonzero pivot is a valid pivot.
pub mod lu;
