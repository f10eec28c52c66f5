//! HTTP server for OpenCampus
//!
//! The binary in `main.rs` wires configuration, the database pool, and the
//! router together; everything reusable lives here so integration tests can
//! build the app without binding a socket.

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
