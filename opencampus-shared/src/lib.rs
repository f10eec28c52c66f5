//! # OpenCampus Shared Library
//!
//! This crate contains shared types, utilities, and business logic used across
//! the OpenCampus API server and worker systems.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `access`: Execution context, ownership scoping, and role resolution
//! - `analytics`: Admin dashboard metric aggregation
//! - `metering`: Per-user usage counter recomputation
//! - `auth`: Authentication primitives (passwords, JWT)
//! - `db`: Connection pool and migrations

pub mod access;
pub mod analytics;
pub mod auth;
pub mod db;
pub mod metering;
pub mod models;

/// Current version of the OpenCampus shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
