use crate::helper::notification_helpers::Notifier;

/// Process-wide state shared by all workers.
pub struct AppState {
    /// Present only when mail credentials are configured.
    pub notifier: Option<Notifier>,
    pub public_base_url: Option<String>,
}

pub mod config;
pub mod helper;
pub mod models;
pub mod routes;
pub mod setup;
