//! Application ports for assignment persistence.

#![forbid(unsafe_code)]

mod assignment_ports;

pub use assignment_ports::AssignmentsStorage;
