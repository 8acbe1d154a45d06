// Dashboard module - HTTP/SSE surface for browser clients
//
// Serves the reduced monitor state as JSON snapshots, streams incremental
// UI events over SSE and exposes the latest video frame.

mod api;
mod event_stream;

pub use api::{DashboardContext, DashboardServer};
pub use event_stream::{UiBroadcaster, UiEvent};

/// Dashboard configuration
#[derive(Clone, Debug)]
pub struct DashboardConfig {
    pub port: u16,
    pub host: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: 4040,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("VIGIL_DASHBOARD_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4040),
            host: std::env::var("VIGIL_DASHBOARD_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
        }
    }

    pub fn enabled() -> bool {
        std::env::var("VIGIL_DASHBOARD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false)
    }
}
