// Edge-triggered alert emitter
//
// Converts continuous signals into discrete alerts: a rising-edge rule for
// the binary vibration signal and a threshold rule with hysteresis for the
// gas level. Arm state is independent of the visible list, so clearing the
// panel never re-fires a held alarm.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_ALERT_CAPACITY: usize = 5;
pub const GAS_ALERT_THRESHOLD: f64 = 50.0;
pub const GAS_CLEAR_THRESHOLD: f64 = 45.0;

/// Fires once on each false -> true transition; re-arms when the signal
/// returns to false.
#[derive(Debug, Clone, Copy, Default)]
pub struct RisingEdge {
    held: bool,
}

impl RisingEdge {
    pub fn observe(&mut self, active: bool) -> bool {
        let fired = active && !self.held;
        self.held = active;
        fired
    }
}

/// Fires once when the value crosses the upper threshold; stays suppressed
/// until the value drops below the lower threshold. The dead-band between
/// the two prevents oscillation near the boundary from re-firing.
#[derive(Debug, Clone, Copy)]
pub struct Hysteresis {
    upper: f64,
    lower: f64,
    alerted: bool,
}

impl Hysteresis {
    pub fn new(upper: f64, lower: f64) -> Self {
        Self {
            upper,
            lower,
            alerted: false,
        }
    }

    pub fn observe(&mut self, value: f64) -> bool {
        if value >= self.upper {
            if !self.alerted {
                self.alerted = true;
                return true;
            }
        } else if value < self.lower {
            self.alerted = false;
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Earthquake,
    GasLeak,
}

impl AlertKind {
    pub fn message(&self) -> &'static str {
        match self {
            AlertKind::Earthquake => "Earthquake detected",
            AlertKind::GasLeak => "Gas level critical",
        }
    }
}

/// Discrete alert; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u64,
    pub kind: AlertKind,
    pub message: String,
    pub time: String,
}

/// Bounded newest-first alert list fed by the two trigger rules.
#[derive(Debug, Clone)]
pub struct AlertFeed {
    alerts: VecDeque<Alert>,
    capacity: usize,
    next_id: u64,
    vibration: RisingEdge,
    gas: Hysteresis,
}

impl AlertFeed {
    pub fn new(capacity: usize, gas_upper: f64, gas_lower: f64) -> Self {
        Self {
            alerts: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 0,
            vibration: RisingEdge::default(),
            gas: Hysteresis::new(gas_upper, gas_lower),
        }
    }

    /// Feed one sample of the latched vibration signal.
    pub fn observe_vibration(&mut self, active: bool, time: &str) -> Option<&Alert> {
        if self.vibration.observe(active) {
            Some(self.push(AlertKind::Earthquake, time))
        } else {
            None
        }
    }

    /// Feed one gas-level sample.
    pub fn observe_gas(&mut self, level: f64, time: &str) -> Option<&Alert> {
        if self.gas.observe(level) {
            Some(self.push(AlertKind::GasLeak, time))
        } else {
            None
        }
    }

    fn push(&mut self, kind: AlertKind, time: &str) -> &Alert {
        let id = self.next_id;
        self.next_id += 1;
        self.alerts.push_front(Alert {
            id,
            kind,
            message: kind.message().to_string(),
            time: time.to_string(),
        });
        self.alerts.truncate(self.capacity);
        &self.alerts[0]
    }

    /// Empty the visible list. Arm state is untouched.
    pub fn clear(&mut self) {
        self.alerts.clear();
    }

    /// Alerts newest-first.
    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    pub fn to_vec(&self) -> Vec<Alert> {
        self.alerts.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

impl Default for AlertFeed {
    fn default() -> Self {
        Self::new(
            DEFAULT_ALERT_CAPACITY,
            GAS_ALERT_THRESHOLD,
            GAS_CLEAR_THRESHOLD,
        )
    }
}
