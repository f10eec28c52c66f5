/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength validation
/// - [`jwt`]: JWT token generation and validation
///
/// Authorization (roles, permissions, ownership scoping) lives in
/// [`access`](crate::access); this module only answers "who is this",
/// never "what may they do".

pub mod jwt;
pub mod password;
