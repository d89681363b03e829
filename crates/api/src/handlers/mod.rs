pub mod account;
pub mod auth;
pub mod courses;
pub mod financing;
pub mod library;
pub mod professionals;
pub mod testimonials;
