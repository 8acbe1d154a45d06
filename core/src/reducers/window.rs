// Sliding window buffers for the environment chart
//
// One fixed-capacity series per metric. All three series append with the
// same label on each telemetry tick so they stay index-aligned for
// multi-series charting. No suppression: every tick is meaningful.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_WINDOW_CAPACITY: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub label: String,
    pub value: f64,
}

/// Append-only series, oldest evicted past capacity.
#[derive(Debug, Clone)]
pub struct WindowSeries {
    points: VecDeque<SamplePoint>,
    capacity: usize,
}

impl WindowSeries {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, label: &str, value: f64) {
        self.points.push_back(SamplePoint {
            label: label.to_string(),
            value,
        });
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Points in arrival order (oldest first).
    pub fn points(&self) -> impl Iterator<Item = &SamplePoint> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&SamplePoint> {
        self.points.back()
    }

    pub fn to_vec(&self) -> Vec<SamplePoint> {
        self.points.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The three environment series, appended synchronously per tick.
#[derive(Debug, Clone)]
pub struct EnvironmentWindows {
    pub temperature: WindowSeries,
    pub humidity: WindowSeries,
    pub gas: WindowSeries,
}

impl EnvironmentWindows {
    pub fn new(capacity: usize) -> Self {
        Self {
            temperature: WindowSeries::new(capacity),
            humidity: WindowSeries::new(capacity),
            gas: WindowSeries::new(capacity),
        }
    }

    /// Record one telemetry tick across all metrics with a shared label.
    pub fn record(&mut self, label: &str, temp: f64, hum: f64, gas: f64) {
        self.temperature.push(label, temp);
        self.humidity.push(label, hum);
        self.gas.push(label, gas);
    }
}

impl Default for EnvironmentWindows {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}
