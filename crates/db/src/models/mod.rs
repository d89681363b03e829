//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod course;
pub mod financing;
pub mod library_file;
pub mod mfa_factor;
pub mod professional;
pub mod role;
pub mod session;
pub mod testimonial;
pub mod user;
pub mod user_token;
