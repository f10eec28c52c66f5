/// Database models for OpenCampus
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and authentication
/// - `role`: Roles and permissions (shared reference data)
/// - `project`, `course`, `lesson`, `task`: Owned content, queried through
///   an [`OwnershipScope`](crate::access::OwnershipScope)
/// - `subscription`: Billing subscriptions (active/trialing/canceled)
/// - `payment`: Payments with decimal currency amounts
/// - `prompt_usage`: Prompt execution events (engagement signal)
/// - `usage`: Per-user usage counter snapshots

pub mod course;
pub mod lesson;
pub mod payment;
pub mod project;
pub mod prompt_usage;
pub mod role;
pub mod subscription;
pub mod task;
pub mod usage;
pub mod user;
