//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod assignment;

pub use assignment::Assignment;
