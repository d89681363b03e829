//! Campus domain core.
//!
//! Pure domain logic shared by the database, storage and API crates: error
//! types, id/timestamp aliases, role names, input validation and the small
//! formatting utilities used by the public site. Nothing in here performs I/O.

pub mod cache;
pub mod currency;
pub mod error;
pub mod financing;
pub mod password;
pub mod roles;
pub mod sanitize;
pub mod testimonial;
pub mod totp;
pub mod types;
pub mod uploads;
pub mod validation;
pub mod whatsapp;
