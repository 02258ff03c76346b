//! # Data structures
//!
//! Number types and small building blocks shared by the exact LP layer and the reference
//! simplex backend.
pub mod elements;
pub mod linear_algebra;
pub mod number_types;
