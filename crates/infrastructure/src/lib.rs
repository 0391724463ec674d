//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_assignment_repository;
mod postgres_assignment_repository;

pub use in_memory_assignment_repository::InMemoryAssignmentRepository;
pub use postgres_assignment_repository::PostgresAssignmentRepository;
