//! # External collaborators
//!
//! The exact layer has exactly two seams to the outside: the rational LP backend it drives, and
//! the floating-point LP peer it mirrors. Both are traits so that the management layer stays
//! independent of any concrete solver or relaxation implementation.
pub mod backend;
pub mod peer;

#[cfg(test)]
pub(crate) mod testing;
