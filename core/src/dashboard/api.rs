// Dashboard HTTP API server
//
// Provides REST endpoints and SSE streaming for the Dashboard UI

use crate::clock::Clock;
use crate::dashboard::event_stream::{UiBroadcaster, UiEvent};
use crate::dashboard::DashboardConfig;
use crate::faces::KnownFaceClient;
use crate::feed::{FeedStats, FeedStatsSnapshot, FeedStatus};
use crate::state::{NoticeKind, SharedState, StateSnapshot};
use crate::video::{CameraStatus, FrameBuffer};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Sse,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Everything the Dashboard server needs from a running Vigil instance.
pub struct DashboardContext {
    pub state: SharedState,
    pub broadcaster: UiBroadcaster,
    pub frames: Arc<RwLock<FrameBuffer>>,
    pub feed_status: watch::Receiver<FeedStatus>,
    pub camera_status: watch::Receiver<CameraStatus>,
    pub stats: Arc<FeedStats>,
    pub faces: Arc<KnownFaceClient>,
    pub clock: Arc<dyn Clock>,
}

/// Dashboard server state
#[derive(Clone)]
struct ApiState {
    state: SharedState,
    broadcaster: UiBroadcaster,
    frames: Arc<RwLock<FrameBuffer>>,
    feed_status: watch::Receiver<FeedStatus>,
    camera_status: watch::Receiver<CameraStatus>,
    stats: Arc<FeedStats>,
    faces: Arc<KnownFaceClient>,
    clock: Arc<dyn Clock>,
}

/// Dashboard HTTP server
pub struct DashboardServer {
    config: DashboardConfig,
    context: DashboardContext,
}

impl DashboardServer {
    pub fn new(config: DashboardConfig, context: DashboardContext) -> Self {
        Self { config, context }
    }

    /// Start the Dashboard server
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        info!(
            target: "dashboard",
            addr = %addr,
            "Starting Dashboard server"
        );

        let state = ApiState {
            state: self.context.state,
            broadcaster: self.context.broadcaster,
            frames: self.context.frames,
            feed_status: self.context.feed_status,
            camera_status: self.context.camera_status,
            stats: self.context.stats,
            faces: self.context.faces,
            clock: self.context.clock,
        };

        // Build router
        let app = Router::new()
            .route("/api/state", get(state_handler))
            .route("/api/events/stream", get(event_stream_handler))
            .route("/api/video/frame", get(video_frame_handler))
            .route("/api/faces/known", post(add_known_handler))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(state);

        // Start server
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(
            target: "dashboard",
            url = %format!("http://{}", addr),
            "Dashboard server ready"
        );

        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Full snapshot served to Dashboard clients.
#[derive(Serialize)]
struct SnapshotResponse {
    state: StateSnapshot,
    feed_status: FeedStatus,
    camera_status: CameraStatus,
    video: VideoInfo,
    stats: FeedStatsSnapshot,
}

#[derive(Serialize)]
struct VideoInfo {
    dimensions: Option<(u32, u32)>,
    frames_received: u64,
}

/// Get the current monitor state snapshot
async fn state_handler(State(api): State<ApiState>) -> Result<impl IntoResponse, StatusCode> {
    let now_ms = api.clock.now_ms();
    let snapshot = api.state.read().await.snapshot(now_ms);
    let video = {
        let frames = api.frames.read().await;
        VideoInfo {
            dimensions: frames.dimensions(),
            frames_received: frames.frames_received(),
        }
    };

    let response = SnapshotResponse {
        state: snapshot,
        feed_status: *api.feed_status.borrow(),
        camera_status: *api.camera_status.borrow(),
        video,
        stats: api.stats.snapshot(),
    };

    match serde_json::to_string(&response) {
        Ok(json) => Ok((StatusCode::OK, json)),
        Err(e) => {
            warn!(target: "dashboard", error = %e, "Failed to serialize snapshot");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// SSE endpoint for real-time events
async fn event_stream_handler(
    State(api): State<ApiState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    info!(target: "dashboard", "New SSE client connected");

    let rx = api.broadcaster.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(event) => {
            // Convert UiEvent to SSE Event
            match serde_json::to_string(&event) {
                Ok(json) => Some(Ok(Event::default().data(json))),
                Err(e) => {
                    warn!(target: "dashboard", error = %e, "Failed to serialize event");
                    None
                }
            }
        }
        Err(e) => {
            warn!(target: "dashboard", error = %e, "Broadcast error");
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Latest video frame, raw JPEG
async fn video_frame_handler(State(api): State<ApiState>) -> impl IntoResponse {
    let frames = api.frames.read().await;
    match frames.latest() {
        Some(frame) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                header::CONTENT_TYPE,
                header::HeaderValue::from_static("image/jpeg"),
            );
            (StatusCode::OK, headers, frame.to_vec()).into_response()
        }
        None => (StatusCode::NOT_FOUND, HeaderMap::new(), Vec::new()).into_response(),
    }
}

#[derive(Deserialize)]
struct AddKnownRequest {
    name: String,
    image_url: String,
}

#[derive(Serialize)]
struct AddKnownResponse {
    status: &'static str,
    updated: usize,
}

/// Register a capture as a known face and promote the local log entry
async fn add_known_handler(
    State(api): State<ApiState>,
    Json(request): Json<AddKnownRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let now_ms = api.clock.now_ms();
    match api.faces.add_known(name, &request.image_url).await {
        Ok(()) => {
            let (updated, notice) = {
                let mut state = api.state.write().await;
                let updated = state.promote_face(&request.image_url, name);
                let notice =
                    state.push_notice("Face added successfully", NoticeKind::Success, now_ms);
                (updated, notice)
            };
            api.broadcaster
                .broadcast(UiEvent::face_promoted(&request.image_url, name));
            api.broadcaster.broadcast(UiEvent::notice_raised(notice));

            Ok(Json(AddKnownResponse {
                status: "ok",
                updated,
            }))
        }
        Err(e) => {
            warn!(target: "dashboard", error = %e, "Failed to register known face");
            let notice = {
                let mut state = api.state.write().await;
                state.push_notice("Failed to add face", NoticeKind::Error, now_ms)
            };
            api.broadcaster.broadcast(UiEvent::notice_raised(notice));
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}
