//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod course_repo;
pub mod financing_repo;
pub mod library_file_repo;
pub mod mfa_factor_repo;
pub mod pending_testimonial_repo;
pub mod professional_repo;
pub mod role_repo;
pub mod session_repo;
pub mod testimonial_repo;
pub mod user_repo;
pub mod user_token_repo;

pub use course_repo::CourseRepo;
pub use financing_repo::FinancingRepo;
pub use library_file_repo::LibraryFileRepo;
pub use mfa_factor_repo::MfaFactorRepo;
pub use pending_testimonial_repo::PendingTestimonialRepo;
pub use professional_repo::ProfessionalRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use testimonial_repo::TestimonialRepo;
pub use user_repo::UserRepo;
pub use user_token_repo::UserTokenRepo;
