// Vigil Core Library
// Real-time sensor monitoring runtime

pub mod clock;
pub mod dashboard;
pub mod event;
pub mod faces;
pub mod feed;
pub mod reducers;
pub mod state;
pub mod video;

// Export core types
pub use clock::{Clock, ManualClock, SystemClock};
pub use event::{AccessEvent, FaceEvent, FeedEvent, TelemetryUpdate};
pub use feed::{FeedConfig, FeedOrchestrator, FeedStatus};
pub use state::{MonitorState, SharedState, StateSnapshot};
pub use video::{CameraStatus, VideoConfig, VideoRelay};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VigilError {
    #[error("feed error: {0}")]
    FeedError(String),

    #[error("video error: {0}")]
    VideoError(String),

    #[error("dashboard error: {0}")]
    DashboardError(String),

    #[error("face service error: {0}")]
    FaceServiceError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
pub type Result<T> = std::result::Result<T, VigilError>;

/// Aborts the wrapped background task when dropped, so a torn-down owner
/// never leaks a running interval or connection loop.
#[derive(Debug)]
pub struct TaskGuard {
    handle: tokio::task::JoinHandle<()>,
}

impl TaskGuard {
    pub fn new(handle: tokio::task::JoinHandle<()>) -> Self {
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

use std::sync::Arc;

use dashboard::UiBroadcaster;

/// Core runtime
pub struct Vigil {
    pub state: SharedState,
    pub broadcaster: UiBroadcaster,
    pub feed: FeedOrchestrator,
    pub video: VideoRelay,
    clock: Arc<dyn Clock>,
}

/// Top-level runtime configuration
#[derive(Clone, Debug, Default)]
pub struct VigilConfig {
    pub feed: FeedConfig,
    pub video: VideoConfig,
}

impl VigilConfig {
    pub fn from_env() -> Self {
        Self {
            feed: FeedConfig::from_env(),
            video: VideoConfig::from_env(),
        }
    }
}

impl Vigil {
    pub async fn new(config: VigilConfig) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let state = MonitorState::new().shared();
        let broadcaster = UiBroadcaster::default();
        let feed = FeedOrchestrator::new(
            config.feed,
            Arc::clone(&state),
            broadcaster.clone(),
            Arc::clone(&clock),
        );
        let video = VideoRelay::new(config.video, broadcaster.clone());

        Ok(Self {
            state,
            broadcaster,
            feed,
            video,
            clock,
        })
    }

    pub async fn start(&mut self) -> Result<()> {
        tracing::info!("Starting Vigil...");

        self.feed.start().await?;
        self.video.start().await?;

        tracing::info!("Vigil started successfully");
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down Vigil...");

        self.video.shutdown().await?;
        self.feed.shutdown().await?;

        tracing::info!("Vigil shut down successfully");
        Ok(())
    }

    /// Everything the Dashboard server needs to serve this runtime.
    pub fn dashboard_context(
        &self,
        faces: Arc<faces::KnownFaceClient>,
    ) -> dashboard::DashboardContext {
        dashboard::DashboardContext {
            state: Arc::clone(&self.state),
            broadcaster: self.broadcaster.clone(),
            frames: self.video.frames(),
            feed_status: self.feed.status(),
            camera_status: self.video.status(),
            stats: self.feed.stats(),
            faces,
            clock: Arc::clone(&self.clock),
        }
    }
}
