use vigil_core::dashboard::DashboardConfig;
use vigil_core::faces::FaceServiceConfig;
use vigil_core::VigilConfig;

/// High-level configuration for the monitor demo
#[derive(Clone, Debug, Default)]
pub struct MonitorConfig {
    pub runtime: VigilConfig,
    pub dashboard: DashboardConfig,
    pub faces: FaceServiceConfig,
}

impl MonitorConfig {
    /// Defaults overridden by VIGIL_* environment variables.
    pub fn load() -> Self {
        Self {
            runtime: VigilConfig::from_env(),
            dashboard: DashboardConfig::from_env(),
            faces: FaceServiceConfig::from_env(),
        }
    }
}
