//! # Number types
//!
//! The exact layer works with two number representations: an arbitrary-precision rational
//! extended with two infinities, and a directed-rounding double interval used wherever a rigorous
//! floating-point enclosure of a rational quantity is needed.
pub mod interval;
pub mod rational;
