// Known-face registration client
//
// Fire-and-forget POST to the face backend. Success promotes the local log
// entry; failure only surfaces a transient notice, local state is left
// unchanged.

use crate::Result;
use serde_json::json;
use std::time::Duration;
use tracing::info;

/// Face backend configuration
#[derive(Clone, Debug)]
pub struct FaceServiceConfig {
    /// Base URL of the face backend; also the prefix for capture images.
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for FaceServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl FaceServiceConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("VIGIL_FACE_API_URL").unwrap_or(defaults.base_url),
            request_timeout: std::env::var("VIGIL_FACE_API_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
        }
    }
}

pub struct KnownFaceClient {
    config: FaceServiceConfig,
    http: reqwest::Client,
}

impl KnownFaceClient {
    pub fn new(config: FaceServiceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, http })
    }

    /// Register a capture as a known face.
    pub async fn add_known(&self, name: &str, image_url: &str) -> Result<()> {
        let url = format!("{}/api/add-known", self.config.base_url);
        self.http
            .post(&url)
            .json(&json!({ "name": name, "image_url": image_url }))
            .send()
            .await?
            .error_for_status()?;
        info!(target: "faces", name, image_url, "Registered known face");
        Ok(())
    }

    /// Absolute URL for a server-relative capture image path.
    pub fn image_url(&self, image_path: &str) -> String {
        format!("{}{}", self.config.base_url, image_path)
    }
}
