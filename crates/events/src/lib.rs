//! Campus event bus and outbound email.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`; carries cache-invalidation notices to the
//!   query cache and to changefeed subscribers.
//! - [`PlatformEvent`]: the event envelope.
//! - [`delivery`]: SMTP delivery and the transactional email templates.

pub mod bus;
pub mod delivery;

pub use bus::{EventBus, PlatformEvent};
pub use delivery::email::{EmailConfig, EmailDelivery, EmailError, Mailer};
pub use delivery::templates::RenderedEmail;
