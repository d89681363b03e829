//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access tokens, refresh tokens and single-use link tokens.

pub mod jwt;
pub mod password;
