//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::document::{DocumentError, RouteDocument};
use crate::domain::{Coordinate, EngineError, Place};
use crate::geocode::{GeocodeError, Geocoder, resolve_route};
use crate::session::AnimationSession;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<G: Geocoder + 'static>(state: AppState<G>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/timeline", post(timeline::<G>))
        .route("/api/frames", post(frames::<G>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Build the schedule for a route.
async fn timeline<G: Geocoder>(
    State(state): State<AppState<G>>,
    body: Bytes,
) -> Result<Json<TimelineResponse>, AppError> {
    let req: TimelineRequest = parse_body(&body)?;
    Ok(Json(build_timeline(&state, req).await?))
}

/// Sample frames of a route's animation.
async fn frames<G: Geocoder>(
    State(state): State<AppState<G>>,
    body: Bytes,
) -> Result<Json<FramesResponse>, AppError> {
    let req: FramesRequest = parse_body(&body)?;
    Ok(Json(sample_frames(&state, req).await?))
}

/// Parse JSON manually so a bad body gets our error format.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "Rejected request body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// Validate a document, resolve its places and build the session.
pub async fn prepare_session<G: Geocoder>(
    state: &AppState<G>,
    document: &RouteDocument,
    coordinates: Option<Vec<CoordinateInput>>,
) -> Result<AnimationSession, AppError> {
    document.validate()?;

    let pacing = document.video.pacing_from((*state.pacing).clone());
    let route = document.route_with_default(pacing.default_transport)?;

    let places = match coordinates {
        Some(coordinates) => {
            if coordinates.len() != route.len() {
                return Err(EngineError::CoordinateCountMismatch {
                    waypoints: route.len(),
                    coordinates: coordinates.len(),
                }
                .into());
            }
            coordinates
                .into_iter()
                .zip(route.waypoints())
                .map(|(input, waypoint)| {
                    let coordinate = Coordinate::new(input.lat, input.lon)?;
                    let display_name = input
                        .display_name
                        .unwrap_or_else(|| format!("{}, {}", waypoint.city, waypoint.country));
                    Ok(Place::new(coordinate, display_name))
                })
                .collect::<Result<Vec<_>, EngineError>>()?
        }
        None => resolve_route(state.geocoder.as_ref(), &route, document.video.language()).await?,
    };

    Ok(AnimationSession::new(
        route,
        places,
        &pacing,
        document.video.duration_sec,
    )?)
}

/// Handler logic for `POST /api/timeline`.
pub async fn build_timeline<G: Geocoder>(
    state: &AppState<G>,
    req: TimelineRequest,
) -> Result<TimelineResponse, AppError> {
    let video = &req.document.video;
    let resolution = video.resolution().map_err(DocumentError::from)?;
    let session = prepare_session(state, &req.document, req.coordinates).await?;
    Ok(TimelineResponse::from_session(&session, video, resolution))
}

/// Handler logic for `POST /api/frames`.
pub async fn sample_frames<G: Geocoder>(
    state: &AppState<G>,
    req: FramesRequest,
) -> Result<FramesResponse, AppError> {
    let session = prepare_session(state, &req.document, req.coordinates).await?;

    let frames: Vec<FrameResult> = match req.times {
        Some(times) => {
            check_frame_limit(times.len(), state.max_frames)?;
            times
                .into_iter()
                .map(|t| FrameResult::from(session.frame_at(t)))
                .collect()
        }
        None => {
            let fps = req.document.video.fps();
            check_frame_limit(session.frame_count(fps), state.max_frames)?;
            session.frames(fps).map(FrameResult::from).collect()
        }
    };

    Ok(FramesResponse {
        total_duration: session.total_duration(),
        frames,
    })
}

fn check_frame_limit(requested: usize, max: usize) -> Result<(), AppError> {
    if requested > max {
        return Err(AppError::BadRequest {
            message: format!("{requested} frames requested, at most {max} allowed"),
        });
    }
    Ok(())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<DocumentError> for AppError {
    fn from(e: DocumentError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<GeocodeError> for AppError {
    fn from(e: GeocodeError) -> Self {
        match e {
            GeocodeError::NotFound { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            warn!(%status, %message, "Request failed");
        } else {
            debug!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::StaticGeocoder;

    fn geocoder() -> StaticGeocoder {
        StaticGeocoder::from_json(
            r#"[
                { "city": "Quito", "country": "Ecuador", "lat": 0.0, "lon": 0.0,
                  "display_name": "Quito" },
                { "city": "Pontianak", "country": "Indonesia", "lat": 0.0, "lon": 90.0,
                  "display_name": "Pontianak" }
            ]"#,
        )
        .unwrap()
    }

    fn state() -> AppState<StaticGeocoder> {
        AppState::new(geocoder())
    }

    fn equator(duration: f64) -> String {
        format!(
            r#"{{
                "video": {{ "duration_sec": {duration}, "fps": 10 }},
                "route": [
                    {{ "city": "Quito", "country": "Ecuador" }},
                    {{ "city": "Pontianak", "country": "Indonesia", "transport": "plane" }}
                ]
            }}"#
        )
    }

    #[tokio::test]
    async fn health_check() {
        assert_eq!(health().await, "ok");
    }

    #[test]
    fn router_builds() {
        let _router = create_router(state());
    }

    #[tokio::test]
    async fn timeline_geocodes_missing_coordinates() {
        let state = state();
        let req: TimelineRequest = parse_body(equator(10.0).as_bytes()).unwrap();
        let response = build_timeline(&state, req).await.unwrap();

        assert_eq!(response.events.len(), 5);
        assert_eq!(response.events[0].kind, "start");
        assert_eq!(response.events[1].transport, Some("plane"));
        assert_eq!(response.leg_durations.len(), 1);
        assert!((response.total_duration - 10.0).abs() < 1e-9);
        assert_eq!(response.fps, 10);
        assert_eq!(response.frame_count, 100);

        assert_eq!(response.waypoints[0].display_name, "Quito");
        assert_eq!(response.waypoints[0].transport, None);
        assert_eq!(response.waypoints[1].lon, 90.0);
        assert_eq!(state.geocoder.calls(), 2);
    }

    #[tokio::test]
    async fn timeline_carries_render_settings() {
        let state = state();
        let req: TimelineRequest = parse_body(equator(10.0).as_bytes()).unwrap();
        let response = build_timeline(&state, req).await.unwrap();
        assert_eq!(
            response.resolution,
            ResolutionResult {
                width: 1920,
                height: 1080
            }
        );
        assert_eq!(response.map_style, "streets");

        let json = r#"{
            "video": { "duration_sec": 10, "resolution": "1080x1920", "map_style": "satellite" },
            "route": [
                { "city": "Quito", "country": "Ecuador" },
                { "city": "Pontianak", "country": "Indonesia" }
            ]
        }"#;
        let req: TimelineRequest = parse_body(json.as_bytes()).unwrap();
        let body = serde_json::to_value(build_timeline(&state, req).await.unwrap()).unwrap();

        assert_eq!(
            body["resolution"],
            serde_json::json!({ "width": 1080, "height": 1920 })
        );
        assert_eq!(body["map_style"], "satellite");
    }

    #[tokio::test]
    async fn timeline_uses_supplied_coordinates() {
        let state = state();
        let json = r#"{
            "video": { "duration_sec": 8 },
            "route": [
                { "city": "Lyon", "country": "France" },
                { "city": "Geneva", "country": "Switzerland", "transport": "car" }
            ],
            "coordinates": [
                { "lat": 45.764, "lon": 4.8357, "display_name": "Lyon, Rhône" },
                { "lat": 46.2044, "lon": 6.1432 }
            ]
        }"#;
        let req: TimelineRequest = parse_body(json.as_bytes()).unwrap();
        let response = build_timeline(&state, req).await.unwrap();

        assert_eq!(response.waypoints[0].display_name, "Lyon, Rhône");
        assert_eq!(response.waypoints[1].display_name, "Geneva, Switzerland");
        assert_eq!(response.waypoints[1].transport, Some("car"));
        assert_eq!(state.geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn timeline_too_short_is_bad_request() {
        let req: TimelineRequest = parse_body(equator(1.0).as_bytes()).unwrap();
        let err = build_timeline(&state(), req).await.unwrap_err();

        match err {
            AppError::BadRequest { message } => assert!(message.contains("hold at most")),
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_place_is_not_found() {
        let json = r#"{
            "video": { "duration_sec": 8 },
            "route": [
                { "city": "Quito", "country": "Ecuador" },
                { "city": "El Dorado", "country": "Nowhere" }
            ]
        }"#;
        let req: TimelineRequest = parse_body(json.as_bytes()).unwrap();
        let err = build_timeline(&state(), req).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn coordinate_problems_are_bad_requests() {
        let base = r#""video": { "duration_sec": 8 },
            "route": [
                { "city": "Quito", "country": "Ecuador" },
                { "city": "Pontianak", "country": "Indonesia" }
            ]"#;

        let short = format!(r#"{{ {base}, "coordinates": [{{ "lat": 0, "lon": 0 }}] }}"#);
        let req: TimelineRequest = parse_body(short.as_bytes()).unwrap();
        assert!(matches!(
            build_timeline(&state(), req).await,
            Err(AppError::BadRequest { .. })
        ));

        let out_of_range = format!(
            r#"{{ {base}, "coordinates": [{{ "lat": 0, "lon": 0 }}, {{ "lat": 100, "lon": 0 }}] }}"#
        );
        let req: TimelineRequest = parse_body(out_of_range.as_bytes()).unwrap();
        assert!(matches!(
            build_timeline(&state(), req).await,
            Err(AppError::BadRequest { .. })
        ));
    }

    #[test]
    fn malformed_body_is_bad_request() {
        let result: Result<TimelineRequest, _> = parse_body(b"{ nope");
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn frames_at_requested_times() {
        let json = equator(10.0).replacen('{', r#"{ "times": [0.0, 5.0, 9.2, 10.0],"#, 1);
        let req: FramesRequest = parse_body(json.as_bytes()).unwrap();
        let response = sample_frames(&state(), req).await.unwrap();

        assert_eq!(response.frames.len(), 4);

        let start = &response.frames[0];
        assert_eq!(start.position, None);
        assert_eq!(start.camera, PointResult { lat: 0.0, lon: 0.0 });

        // Leg runs 0.8..9.2, so 5.0 is the midpoint of the great circle
        let mid = response.frames[1].position.unwrap();
        assert!(mid.lat.abs() < 1e-6);
        assert!((mid.lon - 45.0).abs() < 1e-6);

        let end = &response.frames[3];
        assert_eq!(end.position, None);
        assert_eq!(end.camera, PointResult { lat: 0.0, lon: 90.0 });
        assert_eq!(end.visited_legs, 1);
    }

    #[tokio::test]
    async fn frames_default_to_every_frame() {
        let req: FramesRequest = parse_body(equator(10.0).as_bytes()).unwrap();
        let response = sample_frames(&state(), req).await.unwrap();

        assert_eq!(response.frames.len(), 100);
        assert_eq!(response.frames[10].time, 1.0);
    }

    #[tokio::test]
    async fn frame_limit_enforced() {
        let state = state().with_max_frames(50);
        let req: FramesRequest = parse_body(equator(10.0).as_bytes()).unwrap();

        assert!(matches!(
            sample_frames(&state, req).await,
            Err(AppError::BadRequest { .. })
        ));
    }

    #[test]
    fn error_status_codes() {
        let cases = [
            (
                AppError::BadRequest {
                    message: "bad".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::NotFound {
                    message: "missing".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Internal {
                    message: "boom".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn geocode_errors_map_to_status() {
        let not_found = AppError::from(GeocodeError::NotFound {
            query: "X, Y".into(),
        });
        assert!(matches!(not_found, AppError::NotFound { .. }));

        let api = AppError::from(GeocodeError::Api {
            status: 503,
            message: "down".into(),
        });
        assert!(matches!(api, AppError::Internal { .. }));
    }
}
