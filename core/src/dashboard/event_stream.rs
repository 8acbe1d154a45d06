// Event streaming for the Dashboard
//
// Uses a tokio broadcast channel to push incremental updates to multiple
// SSE clients; the full state lives behind the snapshot endpoint.

use crate::event::TelemetryUpdate;
use crate::feed::FeedStatus;
use crate::reducers::{Alert, LogEntry};
use crate::state::Notice;
use crate::video::CameraStatus;
use crate::{AccessEvent, FaceEvent};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Incremental update pushed to Dashboard clients.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// One telemetry tick was applied.
    Telemetry {
        timestamp: String,
        update: TelemetryUpdate,
    },
    /// An alert fired.
    AlertRaised { timestamp: String, alert: Alert },
    /// An access event entered the log.
    AccessLogged {
        timestamp: String,
        entry: LogEntry<AccessEvent>,
    },
    /// A face event entered the log.
    FaceObserved {
        timestamp: String,
        entry: LogEntry<FaceEvent>,
    },
    /// A face-log entry was promoted to known.
    FacePromoted {
        timestamp: String,
        image_url: String,
        name: String,
    },
    /// Telemetry feed connection status changed.
    FeedStatusChanged {
        timestamp: String,
        status: FeedStatus,
    },
    /// Video feed connection status changed.
    CameraStatusChanged {
        timestamp: String,
        status: CameraStatus,
    },
    /// A transient notice was raised.
    NoticeRaised { timestamp: String, notice: Notice },
}

impl UiEvent {
    fn stamp() -> String {
        chrono::Utc::now().to_rfc3339()
    }

    pub fn telemetry(update: TelemetryUpdate) -> Self {
        UiEvent::Telemetry {
            timestamp: Self::stamp(),
            update,
        }
    }

    pub fn alert_raised(alert: Alert) -> Self {
        UiEvent::AlertRaised {
            timestamp: Self::stamp(),
            alert,
        }
    }

    pub fn access_logged(entry: LogEntry<AccessEvent>) -> Self {
        UiEvent::AccessLogged {
            timestamp: Self::stamp(),
            entry,
        }
    }

    pub fn face_observed(entry: LogEntry<FaceEvent>) -> Self {
        UiEvent::FaceObserved {
            timestamp: Self::stamp(),
            entry,
        }
    }

    pub fn face_promoted(image_url: &str, name: &str) -> Self {
        UiEvent::FacePromoted {
            timestamp: Self::stamp(),
            image_url: image_url.to_string(),
            name: name.to_string(),
        }
    }

    pub fn feed_status(status: FeedStatus) -> Self {
        UiEvent::FeedStatusChanged {
            timestamp: Self::stamp(),
            status,
        }
    }

    pub fn camera_status(status: CameraStatus) -> Self {
        UiEvent::CameraStatusChanged {
            timestamp: Self::stamp(),
            status,
        }
    }

    pub fn notice_raised(notice: Notice) -> Self {
        UiEvent::NoticeRaised {
            timestamp: Self::stamp(),
            notice,
        }
    }
}

/// Event broadcaster for the Dashboard
#[derive(Clone)]
pub struct UiBroadcaster {
    sender: broadcast::Sender<UiEvent>,
}

impl UiBroadcaster {
    /// Create a new broadcaster with buffer size
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Broadcast an event to all subscribers
    pub fn broadcast(&self, event: UiEvent) {
        // Ignore error if no subscribers
        let _ = self.sender.send(event);
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.sender.subscribe()
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for UiBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}
