//! # Exact linear programming management
//!
//! The in-memory representation of a linear program over the rationals, kept as the exact mirror
//! of a floating-point LP relaxation. The layer tracks mutations lazily, flushes them to a
//! rational LP backend only when a safe dual bound is required, and certifies bounds either by an
//! exact re-solve or by post-processing a floating-point solution (bound-shifting and
//! project-and-shift).
#![warn(missing_docs)]

pub mod algorithm;
pub mod data;
pub mod interface;
pub mod lp;

#[cfg(test)]
mod tests;
