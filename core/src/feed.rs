// Telemetry feed orchestrator
//
// Owns the persistent telemetry WebSocket: parses each text frame, routes
// the event to its reducer through the shared state, tracks per-kind
// stats, publishes connection status and reconnects after a fixed delay.
// A separate 100 ms maintenance ticker drives the time-driven passes
// (detection decay, notice expiry, seismic smoothing).

use crate::clock::Clock;
use crate::dashboard::{UiBroadcaster, UiEvent};
use crate::event::FeedEvent;
use crate::state::SharedState;
use crate::{Result, TaskGuard};
use async_trait::async_trait;
use dashmap::DashMap;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Cadence of the time-driven maintenance pass, ms.
pub const MAINTENANCE_TICK_MS: u64 = 100;

/// Telemetry feed configuration
#[derive(Clone, Debug)]
pub struct FeedConfig {
    pub url: String,
    /// Fixed delay between reconnection attempts.
    pub reconnect_delay: Duration,
    /// None retries forever (constant interval, no backoff).
    pub max_reconnect_attempts: Option<u32>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:5000/feed".to_string(),
            reconnect_delay: Duration::from_millis(1000),
            max_reconnect_attempts: None,
        }
    }
}

impl FeedConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("VIGIL_FEED_URL").unwrap_or(defaults.url),
            reconnect_delay: std::env::var("VIGIL_FEED_RECONNECT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.reconnect_delay),
            max_reconnect_attempts: std::env::var("VIGIL_FEED_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }
}

/// Telemetry feed connection status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedStatus {
    Active,
    Offline,
    Reconnecting,
}

/// Per-kind delivery counters for one stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamStats {
    pub received: u64,
    pub duplicates: u64,
}

/// Feed-wide statistics, shared with the dashboard.
#[derive(Debug, Default)]
pub struct FeedStats {
    kinds: DashMap<String, StreamStats>,
    malformed: AtomicU64,
    reconnects: AtomicU64,
}

impl FeedStats {
    pub fn record_received(&self, kind: &str) {
        self.kinds.entry(kind.to_string()).or_default().received += 1;
    }

    pub fn record_duplicate(&self, kind: &str) {
        self.kinds.entry(kind.to_string()).or_default().duplicates += 1;
    }

    pub fn record_malformed(&self) {
        self.malformed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reconnect(&self) {
        self.reconnects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> FeedStatsSnapshot {
        FeedStatsSnapshot {
            kinds: self
                .kinds
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().clone()))
                .collect(),
            malformed: self.malformed.load(Ordering::Relaxed),
            reconnects: self.reconnects.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedStatsSnapshot {
    pub kinds: HashMap<String, StreamStats>,
    pub malformed: u64,
    pub reconnects: u64,
}

/// Destination for parsed feed events. The production sink applies them to
/// the shared monitor state; tests can inject a recorder.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver one event. Returns false when it was suppressed as a
    /// duplicate.
    async fn deliver(&self, event: FeedEvent) -> Result<bool>;
}

/// Production sink: routes each event kind to its reducer and broadcasts
/// the resulting UI updates.
pub struct StateSink {
    state: SharedState,
    broadcaster: UiBroadcaster,
    clock: Arc<dyn Clock>,
}

impl StateSink {
    pub fn new(state: SharedState, broadcaster: UiBroadcaster, clock: Arc<dyn Clock>) -> Self {
        Self {
            state,
            broadcaster,
            clock,
        }
    }
}

#[async_trait]
impl EventSink for StateSink {
    async fn deliver(&self, event: FeedEvent) -> Result<bool> {
        let now_ms = self.clock.now_ms();
        match event {
            FeedEvent::Update(update) => {
                let label = chrono::Local::now().format("%H:%M:%S").to_string();
                let outcome = self
                    .state
                    .write()
                    .await
                    .apply_telemetry(update, now_ms, &label);
                self.broadcaster.broadcast(UiEvent::telemetry(update));
                for alert in outcome.alerts {
                    self.broadcaster.broadcast(UiEvent::alert_raised(alert));
                }
                Ok(true)
            }
            FeedEvent::Access(event) => {
                let mut state = self.state.write().await;
                if !state.apply_access(event) {
                    return Ok(false);
                }
                if let Some(entry) = state.access_log.entries().next() {
                    self.broadcaster
                        .broadcast(UiEvent::access_logged(entry.clone()));
                }
                Ok(true)
            }
            FeedEvent::Face(event) => {
                let mut state = self.state.write().await;
                if !state.apply_face(event) {
                    return Ok(false);
                }
                if let Some(entry) = state.face_log.entries().next() {
                    self.broadcaster
                        .broadcast(UiEvent::face_observed(entry.clone()));
                }
                Ok(true)
            }
        }
    }
}

/// Connection and fan-out orchestrator for the telemetry feed.
pub struct FeedOrchestrator {
    config: FeedConfig,
    state: SharedState,
    broadcaster: UiBroadcaster,
    clock: Arc<dyn Clock>,
    stats: Arc<FeedStats>,
    status_tx: Arc<watch::Sender<FeedStatus>>,
    status_rx: watch::Receiver<FeedStatus>,
    tasks: Vec<TaskGuard>,
}

impl FeedOrchestrator {
    pub fn new(
        config: FeedConfig,
        state: SharedState,
        broadcaster: UiBroadcaster,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (status_tx, status_rx) = watch::channel(FeedStatus::Offline);
        Self {
            config,
            state,
            broadcaster,
            clock,
            stats: Arc::new(FeedStats::default()),
            status_tx: Arc::new(status_tx),
            status_rx,
            tasks: Vec::new(),
        }
    }

    pub fn status(&self) -> watch::Receiver<FeedStatus> {
        self.status_rx.clone()
    }

    pub fn stats(&self) -> Arc<FeedStats> {
        Arc::clone(&self.stats)
    }

    pub async fn start(&mut self) -> Result<()> {
        let sink: Arc<dyn EventSink> = Arc::new(StateSink::new(
            Arc::clone(&self.state),
            self.broadcaster.clone(),
            Arc::clone(&self.clock),
        ));

        self.tasks.push(TaskGuard::new(tokio::spawn(ingest_loop(
            self.config.clone(),
            sink,
            Arc::clone(&self.stats),
            Arc::clone(&self.status_tx),
            self.broadcaster.clone(),
        ))));

        self.tasks.push(TaskGuard::new(tokio::spawn(maintenance_loop(
            Arc::clone(&self.state),
            Arc::clone(&self.clock),
        ))));

        info!(target: "feed", url = %self.config.url, "Feed orchestrator started");
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        // Dropping the guards aborts the ingest and maintenance tasks,
        // including any reconnect sleep in flight.
        self.tasks.clear();
        self.status_tx.send_replace(FeedStatus::Offline);
        info!(target: "feed", "Feed orchestrator shut down");
        Ok(())
    }
}

fn publish_status(
    status_tx: &watch::Sender<FeedStatus>,
    broadcaster: &UiBroadcaster,
    status: FeedStatus,
) {
    if *status_tx.borrow() != status {
        status_tx.send_replace(status);
        broadcaster.broadcast(UiEvent::feed_status(status));
    }
}

async fn maintenance_loop(state: SharedState, clock: Arc<dyn Clock>) {
    let mut interval = tokio::time::interval(Duration::from_millis(MAINTENANCE_TICK_MS));
    loop {
        interval.tick().await;
        let now_ms = clock.now_ms();
        state.write().await.tick(now_ms);
    }
}

async fn ingest_loop(
    config: FeedConfig,
    sink: Arc<dyn EventSink>,
    stats: Arc<FeedStats>,
    status_tx: Arc<watch::Sender<FeedStatus>>,
    broadcaster: UiBroadcaster,
) {
    let mut attempts: u32 = 0;
    loop {
        publish_status(&status_tx, &broadcaster, FeedStatus::Reconnecting);
        match connect_async(config.url.as_str()).await {
            Ok((ws, _response)) => {
                attempts = 0;
                info!(target: "feed", url = %config.url, "Telemetry feed connected");
                publish_status(&status_tx, &broadcaster, FeedStatus::Active);

                let (_write, mut read) = ws.split();
                while let Some(message) = read.next().await {
                    match message {
                        Ok(Message::Text(text)) => handle_frame(&text, &sink, &stats).await,
                        Ok(Message::Binary(_)) => {
                            debug!(target: "feed", "Ignoring binary frame on telemetry feed");
                        }
                        Ok(Message::Close(_)) => break,
                        Ok(_) => {}
                        Err(e) => {
                            warn!(target: "feed", error = %e, "Telemetry feed read error");
                            break;
                        }
                    }
                }
                info!(target: "feed", "Telemetry feed disconnected");
            }
            Err(e) => {
                warn!(target: "feed", url = %config.url, error = %e, "Telemetry feed connect failed");
            }
        }
        publish_status(&status_tx, &broadcaster, FeedStatus::Offline);

        attempts += 1;
        stats.record_reconnect();
        if let Some(cap) = config.max_reconnect_attempts {
            if attempts >= cap {
                warn!(target: "feed", attempts, "Reconnect attempt cap reached, giving up");
                break;
            }
        }
        tokio::time::sleep(config.reconnect_delay).await;
    }
}

async fn handle_frame(text: &str, sink: &Arc<dyn EventSink>, stats: &FeedStats) {
    match FeedEvent::parse(text) {
        Ok(event) => {
            let kind = event.kind();
            stats.record_received(kind);
            match sink.deliver(event).await {
                Ok(true) => {}
                Ok(false) => stats.record_duplicate(kind),
                Err(e) => warn!(target: "feed", error = %e, kind, "Failed to deliver feed event"),
            }
        }
        Err(e) => {
            stats.record_malformed();
            warn!(target: "feed", error = %e, "Dropping malformed feed frame");
        }
    }
}
