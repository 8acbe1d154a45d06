// Inbound feed event model
//
// The telemetry feed delivers JSON text frames shaped as
// `{"event": "<kind>", "data": {...}}`. Three kinds exist: the periodic
// sensor/radar update, NFC access events and face-recognition events.

use crate::reducers::dedup_log::DedupKeyed;
use crate::{Result, VigilError};
use serde::{Deserialize, Serialize};

/// Servo angle and ultrasonic distance of one radar sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarReading {
    /// Servo angle in degrees (15..=165 sweep).
    pub angle: f64,
    /// Nearest-object distance in centimeters.
    pub distance: f64,
}

/// Environment sensor block of one telemetry tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReadings {
    pub temp: f64,
    pub hum: f64,
    pub gas: f64,
    /// Vibration flag, 0 or 1.
    pub vib: u8,
}

/// One full telemetry tick from the sensor backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryUpdate {
    pub radar: RadarReading,
    pub sensors: SensorReadings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessStatus {
    Authorized,
    Denied,
}

/// NFC access-control event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessEvent {
    pub status: AccessStatus,
    pub name: String,
    pub uid: String,
    /// Read method, e.g. "NFC".
    pub method: String,
    pub time: String,
}

impl DedupKeyed for AccessEvent {
    fn dedup_key(&self) -> String {
        format!("{}-{}", self.uid, self.time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceStatus {
    Known,
    Unknown,
}

/// Face-recognition event. `image_url` is a server-relative path;
/// `time` is the capture stamp in `YYYYMMDD_HHMMSS[_us]` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceEvent {
    pub name: String,
    pub status: FaceStatus,
    pub image_url: String,
    pub time: String,
    pub camera: String,
}

impl DedupKeyed for FaceEvent {
    fn dedup_key(&self) -> String {
        format!("{}-{}", self.image_url, self.time)
    }
}

/// One parsed feed frame, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Update(TelemetryUpdate),
    Access(AccessEvent),
    Face(FaceEvent),
}

#[derive(Deserialize)]
struct Frame {
    event: String,
    data: serde_json::Value,
}

impl FeedEvent {
    /// Parse a raw text frame. Unknown kinds and malformed payloads are
    /// errors; the orchestrator drops them without touching any reducer.
    pub fn parse(raw: &str) -> Result<Self> {
        let frame: Frame = serde_json::from_str(raw)?;
        match frame.event.as_str() {
            "update" => Ok(FeedEvent::Update(serde_json::from_value(frame.data)?)),
            "nfc_event" => Ok(FeedEvent::Access(serde_json::from_value(frame.data)?)),
            "face_event" => Ok(FeedEvent::Face(serde_json::from_value(frame.data)?)),
            other => Err(VigilError::FeedError(format!(
                "unknown feed event kind: {}",
                other
            ))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FeedEvent::Update(_) => "update",
            FeedEvent::Access(_) => "nfc_event",
            FeedEvent::Face(_) => "face_event",
        }
    }
}

/// Render a face capture stamp (`YYYYMMDD_HHMMSS...`) as
/// `DD/MM/YYYY HH:MM:SS`. Returns None when the stamp is too short.
pub fn format_face_time(ts: &str) -> Option<String> {
    if ts.len() < 15 || !ts.is_char_boundary(15) {
        return None;
    }
    let d = &ts[0..8];
    let t = &ts[9..15];
    Some(format!(
        "{}/{}/{} {}:{}:{}",
        &d[6..8],
        &d[4..6],
        &d[0..4],
        &t[0..2],
        &t[2..4],
        &t[4..6]
    ))
}
