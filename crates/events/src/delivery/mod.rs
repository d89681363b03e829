//! Outbound email: SMTP transport and the transactional templates.

pub mod email;
pub mod templates;
