//! Database-backed repository implementations

pub mod mysql;
