// Timed-decay detection field for the radar sweep
//
// Ingestion is event-driven: a qualifying distance sample becomes a
// detection point, rate-limited to one per delay window. Decay is
// time-driven: a separate periodic sweep drops points past their fade
// time. The two paths stay separate.

use serde::{Deserialize, Serialize};

/// Servo sweep bounds in degrees.
const SERVO_MIN_DEG: f64 = 15.0;
const SERVO_MAX_DEG: f64 = 165.0;

/// Fixed mapping and rate-limit policy of the detection field.
#[derive(Debug, Clone, Copy)]
pub struct SweepConfig {
    /// Minimum interval between detections, ms.
    pub detect_delay_ms: u64,
    /// Point lifetime, ms.
    pub fade_time_ms: u64,
    /// Samples beyond this distance are not detections, cm.
    pub max_detect_cm: f64,
    /// Distance mapped to the outermost arc, cm.
    pub max_distance_cm: f64,
    /// Outermost arc radius in percent of the widget.
    pub max_radius_pct: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            detect_delay_ms: 1000,
            fade_time_ms: 3000,
            max_detect_cm: 200.0,
            max_distance_cm: 220.0,
            max_radius_pct: 50.0,
        }
    }
}

/// Map the servo angle to the visual scan line rotation (-90..=90 degrees).
pub fn scan_rotation(angle: f64) -> f64 {
    ((angle - SERVO_MIN_DEG) / (SERVO_MAX_DEG - SERVO_MIN_DEG)) * 180.0 - 90.0
}

/// One detection in percentage space, origin at the bottom-center of the
/// half-disc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub created_at_ms: u64,
}

/// Detection with its decay-derived opacity, as rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionView {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub opacity: f64,
}

/// Spatial point set with timed decay and a minimum re-detection interval.
#[derive(Debug, Clone)]
pub struct SweepField {
    config: SweepConfig,
    detections: Vec<Detection>,
    last_detect_ms: Option<u64>,
    next_id: u64,
}

impl SweepField {
    pub fn new(config: SweepConfig) -> Self {
        Self {
            config,
            detections: Vec::new(),
            last_detect_ms: None,
            next_id: 0,
        }
    }

    /// Feed one (angle, distance) sample. Returns the id of the detection
    /// it produced, if any.
    pub fn observe(&mut self, angle: f64, distance: f64, now_ms: u64) -> Option<u64> {
        if distance <= 0.0 || distance > self.config.max_detect_cm {
            return None;
        }
        if let Some(last) = self.last_detect_ms {
            if now_ms.saturating_sub(last) < self.config.detect_delay_ms {
                return None;
            }
        }
        self.last_detect_ms = Some(now_ms);

        let clamped = distance.min(self.config.max_distance_cm);
        let radius = (clamped / self.config.max_distance_cm) * self.config.max_radius_pct;
        let angle_rad = angle.to_radians();

        let x = 50.0 + radius * (std::f64::consts::PI - angle_rad).cos();
        let y = 100.0 - radius * angle_rad.sin();

        let id = self.next_id;
        self.next_id += 1;
        self.detections.push(Detection {
            id,
            x,
            y,
            created_at_ms: now_ms,
        });
        Some(id)
    }

    /// Time-driven decay pass: drop every point whose age reached the fade
    /// time.
    pub fn sweep(&mut self, now_ms: u64) {
        let fade = self.config.fade_time_ms;
        self.detections
            .retain(|d| now_ms.saturating_sub(d.created_at_ms) < fade);
    }

    /// Live points with their current opacity (1 at birth, 0 at fade).
    pub fn points(&self, now_ms: u64) -> Vec<DetectionView> {
        let fade = self.config.fade_time_ms as f64;
        self.detections
            .iter()
            .map(|d| {
                let age = now_ms.saturating_sub(d.created_at_ms) as f64;
                DetectionView {
                    id: d.id,
                    x: d.x,
                    y: d.y,
                    opacity: (1.0 - age / fade).clamp(0.0, 1.0),
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }
}

impl Default for SweepField {
    fn default() -> Self {
        Self::new(SweepConfig::default())
    }
}
