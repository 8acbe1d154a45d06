// Monitor state
//
// The single shared aggregate behind one RwLock: every reducer instance,
// the latest telemetry, the vibration latch, the smoothed seismic level
// and transient notices. Reducer buffers are owned exclusively here; no
// reducer depends on another.

use crate::event::{
    format_face_time, AccessEvent, FaceEvent, FaceStatus, TelemetryUpdate,
};
use crate::reducers::{
    scan_rotation, Alert, AlertFeed, AsymmetricSmoother, DedupLog, DetectionView,
    EnvironmentWindows, LogEntry, SamplePoint, SweepField,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// How long one vib=1 sample keeps the vibration signal active, ms.
pub const VIBRATION_HOLD_MS: u64 = 1500;
/// Transient notice lifetime, ms.
pub const NOTICE_TTL_MS: u64 = 3000;

pub type SharedState = Arc<RwLock<MonitorState>>;

/// Holds the binary vibration signal active for a fixed window after each
/// vib=1 sample; re-triggering extends the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct VibrationLatch {
    active_until_ms: u64,
}

impl VibrationLatch {
    pub fn trigger(&mut self, now_ms: u64) {
        self.active_until_ms = now_ms + VIBRATION_HOLD_MS;
    }

    pub fn is_active(&self, now_ms: u64) -> bool {
        now_ms < self.active_until_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient user-visible notice, auto-expired by the maintenance tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    pub expires_at_ms: u64,
}

/// Alerts raised while applying one telemetry tick.
#[derive(Debug, Clone, Default)]
pub struct TelemetryOutcome {
    pub alerts: Vec<Alert>,
}

pub struct MonitorState {
    pub telemetry: Option<TelemetryUpdate>,
    pub last_update: Option<String>,
    pub access_log: DedupLog<AccessEvent>,
    pub face_log: DedupLog<FaceEvent>,
    pub alerts: AlertFeed,
    pub environment: EnvironmentWindows,
    pub radar: SweepField,
    vibration: VibrationLatch,
    smoother: AsymmetricSmoother,
    seismic_level: f64,
    notices: Vec<Notice>,
}

impl MonitorState {
    pub fn new() -> Self {
        Self {
            telemetry: None,
            last_update: None,
            access_log: DedupLog::default(),
            face_log: DedupLog::default(),
            alerts: AlertFeed::default(),
            environment: EnvironmentWindows::default(),
            radar: SweepField::default(),
            vibration: VibrationLatch::default(),
            smoother: AsymmetricSmoother::default(),
            seismic_level: 0.0,
            notices: Vec::new(),
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    /// Fan one telemetry tick out to every interested reducer. `time_label`
    /// is the wall-clock stamp used for chart labels and alert times.
    pub fn apply_telemetry(
        &mut self,
        update: TelemetryUpdate,
        now_ms: u64,
        time_label: &str,
    ) -> TelemetryOutcome {
        self.telemetry = Some(update);
        self.last_update = Some(time_label.to_string());

        // Chart labels use the HH:MM prefix of the stamp.
        let chart_label = time_label.get(..5).unwrap_or(time_label);
        self.environment.record(
            chart_label,
            update.sensors.temp,
            update.sensors.hum,
            update.sensors.gas,
        );

        self.radar
            .observe(update.radar.angle, update.radar.distance, now_ms);

        if update.sensors.vib == 1 {
            self.vibration.trigger(now_ms);
        }
        let vib_active = self.vibration.is_active(now_ms);

        let mut outcome = TelemetryOutcome::default();
        if let Some(alert) = self.alerts.observe_vibration(vib_active, time_label) {
            outcome.alerts.push(alert.clone());
        }
        if let Some(alert) = self.alerts.observe_gas(update.sensors.gas, time_label) {
            outcome.alerts.push(alert.clone());
        }
        outcome
    }

    /// Returns false when the event was a suppressed duplicate.
    pub fn apply_access(&mut self, event: AccessEvent) -> bool {
        self.access_log.ingest(event)
    }

    /// Returns false when the event was a suppressed duplicate.
    pub fn apply_face(&mut self, event: FaceEvent) -> bool {
        self.face_log.ingest(event)
    }

    /// Time-driven maintenance pass: detection decay, notice expiry and one
    /// smoother step toward the current vibration target. Runs on the
    /// orchestrator's 100 ms ticker, separate from the ingestion path.
    pub fn tick(&mut self, now_ms: u64) {
        self.radar.sweep(now_ms);
        self.notices.retain(|n| n.expires_at_ms > now_ms);

        let target = if self.vibration.is_active(now_ms) {
            1.0
        } else {
            0.0
        };
        self.seismic_level = self.smoother.step(target);
    }

    pub fn push_notice(&mut self, message: &str, kind: NoticeKind, now_ms: u64) -> Notice {
        let notice = Notice {
            message: message.to_string(),
            kind,
            expires_at_ms: now_ms + NOTICE_TTL_MS,
        };
        self.notices.push(notice.clone());
        notice
    }

    /// Mark every face-log entry for `image_url` as known under `name`.
    /// Returns the number of entries rewritten.
    pub fn promote_face(&mut self, image_url: &str, name: &str) -> usize {
        let mut updated = 0;
        self.face_log.update_all(|face| {
            if face.image_url == image_url {
                face.name = name.to_string();
                face.status = FaceStatus::Known;
                updated += 1;
            }
        });
        updated
    }

    pub fn vibration_active(&self, now_ms: u64) -> bool {
        self.vibration.is_active(now_ms)
    }

    pub fn seismic_level(&self) -> f64 {
        self.seismic_level
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn snapshot(&self, now_ms: u64) -> StateSnapshot {
        StateSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            last_update: self.last_update.clone(),
            telemetry: self.telemetry,
            environment: EnvironmentSnapshot {
                temperature: self.environment.temperature.to_vec(),
                humidity: self.environment.humidity.to_vec(),
                gas: self.environment.gas.to_vec(),
            },
            radar: RadarSnapshot {
                scan_rotation: self.telemetry.map(|t| scan_rotation(t.radar.angle)),
                detections: self.radar.points(now_ms),
            },
            seismic_level: self.seismic_level,
            vibration_active: self.vibration.is_active(now_ms),
            alerts: self.alerts.to_vec(),
            access_log: self.access_log.to_vec(),
            face_log: self
                .face_log
                .entries()
                .map(|entry| FaceLogView {
                    id: entry.id,
                    name: entry.event.name.clone(),
                    status: entry.event.status,
                    image_url: entry.event.image_url.clone(),
                    time: entry.event.time.clone(),
                    display_time: format_face_time(&entry.event.time),
                    camera: entry.event.camera.clone(),
                })
                .collect(),
            notices: self.notices.clone(),
        }
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable view of the whole monitor state for dashboard clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Snapshot time (ISO 8601).
    pub timestamp: String,
    pub last_update: Option<String>,
    pub telemetry: Option<TelemetryUpdate>,
    pub environment: EnvironmentSnapshot,
    pub radar: RadarSnapshot,
    pub seismic_level: f64,
    pub vibration_active: bool,
    pub alerts: Vec<Alert>,
    pub access_log: Vec<LogEntry<AccessEvent>>,
    pub face_log: Vec<FaceLogView>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    pub temperature: Vec<SamplePoint>,
    pub humidity: Vec<SamplePoint>,
    pub gas: Vec<SamplePoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarSnapshot {
    /// Scan line rotation in degrees, None before the first tick.
    pub scan_rotation: Option<f64>,
    pub detections: Vec<DetectionView>,
}

/// Face-log entry as rendered, with the capture stamp pre-formatted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceLogView {
    pub id: u64,
    pub name: String,
    pub status: FaceStatus,
    pub image_url: String,
    pub time: String,
    pub display_time: Option<String>,
    pub camera: String,
}
