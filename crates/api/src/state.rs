use std::sync::Arc;

use campus_events::{EventBus, Mailer};
use campus_storage::ObjectStore;

use crate::config::ServerConfig;
use crate::moderation::ModerationService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything inside is an `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: campus_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Testimonial workflow (pending queue, published list, photos).
    pub moderation: Arc<ModerationService>,
    /// Object storage for library files.
    pub objects: Arc<dyn ObjectStore>,
    /// Centralized event bus for platform events.
    pub event_bus: Arc<EventBus>,
    /// Outbound email; `None` when SMTP is not configured.
    pub mailer: Option<Arc<dyn Mailer>>,
}
