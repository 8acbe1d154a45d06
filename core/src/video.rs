// Video relay
//
// Owns the binary video WebSocket. Latest-frame-wins: each incoming JPEG
// replaces the previous one, and the frame dimensions are scanned from the
// SOF header so dependents observe size changes. Decoding the image stays
// with the consumer. One reconnect is scheduled per disconnect, at a fixed
// delay; the loop dies with its guard so a disposed relay never reconnects.

use crate::dashboard::{UiBroadcaster, UiEvent};
use crate::{Result, TaskGuard};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Video feed configuration
#[derive(Clone, Debug)]
pub struct VideoConfig {
    pub url: String,
    /// Fixed delay before the single reconnect attempt per disconnect.
    pub reconnect_delay: Duration,
    /// None retries forever.
    pub max_reconnect_attempts: Option<u32>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:9876".to_string(),
            reconnect_delay: Duration::from_millis(2000),
            max_reconnect_attempts: None,
        }
    }
}

impl VideoConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("VIGIL_VIDEO_URL").unwrap_or(defaults.url),
            reconnect_delay: std::env::var("VIGIL_VIDEO_RECONNECT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.reconnect_delay),
            max_reconnect_attempts: std::env::var("VIGIL_VIDEO_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }
}

/// Camera connection status, written only by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraStatus {
    Active,
    Offline,
    Reconnecting,
}

/// Holds exactly one frame: a frame arriving mid-read of the previous one
/// simply replaces it afterwards (last-writer-wins, accepted for a live,
/// loss-tolerant feed).
#[derive(Debug, Default)]
pub struct FrameBuffer {
    frame: Option<Vec<u8>>,
    width: u32,
    height: u32,
    frames_received: u64,
}

impl FrameBuffer {
    /// Store one frame. Returns true when the frame dimensions changed
    /// (the resize signal for dependents).
    pub fn store(&mut self, frame: Vec<u8>) -> bool {
        self.frames_received += 1;
        let mut resized = false;
        if let Some((width, height)) = jpeg_dimensions(&frame) {
            resized = width != self.width || height != self.height;
            self.width = width;
            self.height = height;
        }
        self.frame = Some(frame);
        resized
    }

    pub fn latest(&self) -> Option<&[u8]> {
        self.frame.as_deref()
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some((self.width, self.height))
        }
    }

    pub fn frames_received(&self) -> u64 {
        self.frames_received
    }
}

/// Read width and height from a JPEG start-of-frame segment. Returns None
/// for anything that does not carry one.
pub fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return None;
    }
    let mut i = 2;
    while i + 4 <= data.len() {
        if data[i] != 0xFF {
            return None;
        }
        let marker = data[i + 1];
        match marker {
            // Standalone markers carry no length.
            0x01 | 0xD0..=0xD8 => {
                i += 2;
                continue;
            }
            // End of image or start of scan: no SOF segment was seen.
            0xD9 | 0xDA => return None,
            // SOF segments, excluding DHT (C4), JPG (C8) and DAC (CC).
            0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF => {
                if i + 9 > data.len() {
                    return None;
                }
                let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
                let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
                return Some((width, height));
            }
            _ => {
                let len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
                if len < 2 {
                    return None;
                }
                i += 2 + len;
            }
        }
    }
    None
}

/// Connection owner for the binary video stream.
pub struct VideoRelay {
    config: VideoConfig,
    frames: Arc<RwLock<FrameBuffer>>,
    broadcaster: UiBroadcaster,
    status_tx: Arc<watch::Sender<CameraStatus>>,
    status_rx: watch::Receiver<CameraStatus>,
    task: Option<TaskGuard>,
}

impl VideoRelay {
    pub fn new(config: VideoConfig, broadcaster: UiBroadcaster) -> Self {
        let (status_tx, status_rx) = watch::channel(CameraStatus::Offline);
        Self {
            config,
            frames: Arc::new(RwLock::new(FrameBuffer::default())),
            broadcaster,
            status_tx: Arc::new(status_tx),
            status_rx,
            task: None,
        }
    }

    pub fn frames(&self) -> Arc<RwLock<FrameBuffer>> {
        Arc::clone(&self.frames)
    }

    pub fn status(&self) -> watch::Receiver<CameraStatus> {
        self.status_rx.clone()
    }

    pub async fn start(&mut self) -> Result<()> {
        self.task = Some(TaskGuard::new(tokio::spawn(relay_loop(
            self.config.clone(),
            Arc::clone(&self.frames),
            Arc::clone(&self.status_tx),
            self.broadcaster.clone(),
        ))));
        info!(target: "video", url = %self.config.url, "Video relay started");
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        // Dropping the guard aborts the relay loop, including a pending
        // reconnect sleep, so a disposed relay never reconnects.
        self.task = None;
        self.status_tx.send_replace(CameraStatus::Offline);
        info!(target: "video", "Video relay shut down");
        Ok(())
    }
}

fn publish_status(
    status_tx: &watch::Sender<CameraStatus>,
    broadcaster: &UiBroadcaster,
    status: CameraStatus,
) {
    if *status_tx.borrow() != status {
        status_tx.send_replace(status);
        broadcaster.broadcast(UiEvent::camera_status(status));
    }
}

async fn relay_loop(
    config: VideoConfig,
    frames: Arc<RwLock<FrameBuffer>>,
    status_tx: Arc<watch::Sender<CameraStatus>>,
    broadcaster: UiBroadcaster,
) {
    let mut attempts: u32 = 0;
    loop {
        publish_status(&status_tx, &broadcaster, CameraStatus::Reconnecting);
        match connect_async(config.url.as_str()).await {
            Ok((ws, _response)) => {
                attempts = 0;
                info!(target: "video", url = %config.url, "Camera stream connected");
                publish_status(&status_tx, &broadcaster, CameraStatus::Active);

                let (_write, mut read) = ws.split();
                while let Some(message) = read.next().await {
                    match message {
                        Ok(Message::Binary(frame)) => {
                            let mut buffer = frames.write().await;
                            if buffer.store(frame) {
                                let dims = buffer.dimensions();
                                debug!(target: "video", ?dims, "Frame dimensions changed");
                            }
                        }
                        Ok(Message::Text(_)) => {
                            debug!(target: "video", "Ignoring text frame on video feed");
                        }
                        Ok(Message::Close(_)) => break,
                        Ok(_) => {}
                        Err(e) => {
                            warn!(target: "video", error = %e, "Camera stream read error");
                            break;
                        }
                    }
                }
                info!(target: "video", "Camera stream disconnected");
            }
            Err(e) => {
                warn!(target: "video", url = %config.url, error = %e, "Camera stream connect failed");
            }
        }
        publish_status(&status_tx, &broadcaster, CameraStatus::Offline);

        attempts += 1;
        if let Some(cap) = config.max_reconnect_attempts {
            if attempts >= cap {
                warn!(target: "video", attempts, "Reconnect attempt cap reached, giving up");
                break;
            }
        }
        tokio::time::sleep(config.reconnect_delay).await;
    }
}
