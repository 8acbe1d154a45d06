// Stream reducers
//
// Each reducer consumes one logical event stream and keeps a bounded,
// orderable view state. They share no runtime state; the orchestrator owns
// the fan-out.

pub mod alerts;
pub mod dedup_log;
pub mod smoother;
pub mod sweep;
pub mod window;

pub use alerts::{Alert, AlertFeed, AlertKind, Hysteresis, RisingEdge};
pub use dedup_log::{DedupKeyed, DedupLog, LogEntry};
pub use smoother::AsymmetricSmoother;
pub use sweep::{scan_rotation, Detection, DetectionView, SweepConfig, SweepField};
pub use window::{EnvironmentWindows, SamplePoint, WindowSeries};
