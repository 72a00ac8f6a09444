use crate::db::DbActorHandle;
use crate::identity::IdentityVerifier;
use crate::server::routes::{favorites, list};

use axum::{
    Json, Router,
    extract::Request,
    http::{
        HeaderName, HeaderValue, Method, StatusCode, Version,
        header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use base64::Engine as _;
use rand::RngCore;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info, warn};
use trackani_schema::{ErrorBody, HealthStatus};

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

/// Everything a handler may touch, built once at startup.
#[derive(Clone)]
pub struct TrackaniState {
    pub db: DbActorHandle,
    pub identity: Arc<dyn IdentityVerifier>,
}

impl TrackaniState {
    pub fn new(db: DbActorHandle, identity: Arc<dyn IdentityVerifier>) -> Self {
        Self { db, identity }
    }
}

async fn not_found_handler() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not found"))).into_response()
}

async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "Server is running!".to_string(),
    })
}

async fn method_not_allowed_handler() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody::new("Method not allowed")),
    )
        .into_response()
}

/// One structured event per request, tagged `[HTTP]`. Level follows the
/// status class: 5xx error, 4xx warn, everything else info.
async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let protocol = format_http_version(req.version());
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(generate_request_id, str::to_string);

    let start = Instant::now();
    let mut resp = next.run(req).await;

    // Echoed even when the client sent none, so clients can quote it back.
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    macro_rules! access_event {
        ($level:ident) => {
            $level!(
                status = status.as_u16(),
                request_id = %request_id,
                method = %method,
                path = %path,
                protocol,
                latency_ms,
                user_agent = %user_agent,
                "[HTTP] request served"
            )
        };
    }

    if status.is_server_error() {
        access_event!(error);
    } else if status.is_client_error() {
        access_event!(warn);
    } else {
        access_event!(info);
    }

    resp
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}

/// Builds the HTTP application. All record routes live under `/api`.
pub fn trackani_router(state: TrackaniState, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .route("/health", get(health_handler))
        .merge(favorites::router())
        .merge(list::router())
        .method_not_allowed_fallback(method_not_allowed_handler);

    Router::new()
        .nest("/api", api)
        .fallback(not_found_handler)
        .with_state(state)
        .layer(middleware::from_fn(access_log))
        .layer(cors_layer(cors_origins))
}
