//! # OpenCampus Worker Library
//!
//! Background processing for OpenCampus: drains the usage-recount job queue
//! and recomputes per-user usage counters.
//!
//! ## Modules
//!
//! - `queue`: Recount job queue reader (claim, complete, fail)
//! - `runner`: Poll loop that claims jobs and runs recounts

pub mod queue;
pub mod runner;
