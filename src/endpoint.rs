//! HTTP endpoint for the climate API
//!
//! Endpoints (all GET):
//! - / and /api/v1.0/surfs-up                            - route index (plain text)
//! - /api/v1.0/surfs-up/precipitation                    - precipitation since the cutoff
//! - /api/v1.0/surfs-up/stations                         - flattened station codes and names
//! - /api/v1.0/surfs-up/tobs                             - most active station's observations
//! - /api/v1.0/surfs-up/start-date/{start}               - daily temperature stats from start
//! - /api/v1.0/surfs-up/start-date/{start}/end-date/{end} - daily temperature stats in a range
//! - /health                                             - service health check
//!
//! Requests are served by a fixed pool of worker threads. A worker opens
//! its own database connection for each data request and drops it before
//! taking the next one.

use std::net::SocketAddr;
use std::time::Instant;

use serde::Serialize;
use threadpool::ThreadPool;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::climate::{self, QuerySettings};
use crate::db::Connector;
use crate::error::QueryError;
use crate::store::ClimateStore;

/// Common prefix of the data routes.
pub const API_PREFIX: &str = "/api/v1.0/surfs-up";

const ROUTE_INDEX: &[&str] = &[
    "/api/v1.0/surfs-up",
    "/api/v1.0/surfs-up/start-date/<start>",
    "/api/v1.0/surfs-up/start-date/<start>/end-date/<end>",
    "/api/v1.0/surfs-up/precipitation",
    "/api/v1.0/surfs-up/stations",
    "/api/v1.0/surfs-up/tobs",
];

const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Index,
    Health,
    Precipitation,
    Stations,
    Tobs,
    StartDate(String),
    StartEndDate(String, String),
}

impl Route {
    /// Match a request URL against the known routes.
    ///
    /// The query string is ignored, one trailing slash is tolerated, and
    /// path segments are percent-decoded. Date segments are returned as
    /// decoded but untrimmed; the route layer canonicalizes them.
    pub fn parse(url: &str) -> Option<Route> {
        let path = url.split_once('?').map_or(url, |(path, _)| path);
        let path = match path.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => path,
        };

        if path == "/" {
            return Some(Route::Index);
        }
        if path == "/health" {
            return Some(Route::Health);
        }

        let rest = path.strip_prefix(API_PREFIX)?;
        if rest.is_empty() {
            return Some(Route::Index);
        }

        let segments = rest
            .strip_prefix('/')?
            .split('/')
            .map(|segment| urlencoding::decode(segment).map(|s| s.into_owned()))
            .collect::<Result<Vec<String>, _>>()
            .ok()?;

        match segments.as_slice() {
            [name] if name == "precipitation" => Some(Route::Precipitation),
            [name] if name == "stations" => Some(Route::Stations),
            [name] if name == "tobs" => Some(Route::Tobs),
            [key, start] if key == "start-date" => Some(Route::StartDate(start.clone())),
            [key, start, end_key, end] if key == "start-date" && end_key == "end-date" => {
                Some(Route::StartEndDate(start.clone(), end.clone()))
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// A response ready to be written to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status,
                content_type: JSON,
                body,
            },
            Err(e) => Self::error(500, &format!("Failed to serialize response: {}", e)),
        }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            content_type: JSON,
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }

    pub fn text(body: String) -> Self {
        Self {
            status: 200,
            content_type: TEXT,
            body,
        }
    }

    fn not_found() -> Self {
        let body = serde_json::json!({
            "error": "Not found",
            "available_endpoints": ROUTE_INDEX,
        });
        Self {
            status: 404,
            content_type: JSON,
            body: body.to_string(),
        }
    }

    fn from_query<T: Serialize>(result: Result<T, QueryError>) -> Self {
        match result {
            Ok(value) => Self::json(200, &value),
            Err(e) if e.is_not_found() => Self::error(404, &e.to_string()),
            Err(e) => {
                error!(error = %e, "query failed");
                Self::error(500, &e.to_string())
            }
        }
    }
}

/// Plain-text list of the available routes.
pub fn route_index() -> String {
    let mut body = String::from("Welcome to Climate App!\nAvailable Routes:\n");
    for route in ROUTE_INDEX {
        body.push_str(route);
        body.push('\n');
    }
    body
}

fn health() -> ApiResponse {
    ApiResponse::json(
        200,
        &serde_json::json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Answer a data route against an open store.
pub fn dispatch(
    route: &Route,
    store: &mut dyn ClimateStore,
    settings: &QuerySettings,
) -> ApiResponse {
    match route {
        Route::Index => ApiResponse::text(route_index()),
        Route::Health => health(),
        Route::Precipitation => {
            ApiResponse::from_query(climate::precipitation(store, &settings.precipitation_cutoff))
        }
        Route::Stations => ApiResponse::from_query(climate::station_list(store)),
        Route::Tobs => {
            ApiResponse::from_query(climate::most_active_tobs(store, settings.tobs_window_days))
        }
        Route::StartDate(start) => ApiResponse::from_query(climate::temperature_from(store, start)),
        Route::StartEndDate(start, end) => {
            ApiResponse::from_query(climate::temperature_between(store, start, end))
        }
    }
}

/// Handle one request end to end.
///
/// HEAD is answered like GET; tiny_http drops the body when responding.
/// Data routes open a connection through `connector`; it is released when
/// this function returns.
pub fn handle_request(
    method: &str,
    url: &str,
    connector: &Connector,
    settings: &QuerySettings,
) -> ApiResponse {
    if !method.eq_ignore_ascii_case("GET") && !method.eq_ignore_ascii_case("HEAD") {
        return ApiResponse::error(405, "Method not allowed");
    }

    let Some(route) = Route::parse(url) else {
        return ApiResponse::not_found();
    };

    match route {
        Route::Index => ApiResponse::text(route_index()),
        Route::Health => health(),
        route => match connector.open() {
            Ok(mut store) => dispatch(&route, store.as_mut(), settings),
            Err(e) => {
                error!(error = %e, "failed to open database connection");
                ApiResponse::error(500, "Database unavailable")
            }
        },
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("failed to start HTTP server on {addr}: {reason}")]
    Bind { addr: String, reason: String },
}

/// HTTP server answering the climate routes with a pool of workers.
pub struct EndpointServer {
    server: tiny_http::Server,
    connector: Connector,
    settings: QuerySettings,
    workers: usize,
}

impl EndpointServer {
    /// Bind the listening socket. Port 0 picks a free port.
    pub fn bind(
        addr: &str,
        connector: Connector,
        settings: QuerySettings,
        workers: usize,
    ) -> Result<Self, EndpointError> {
        let server = tiny_http::Server::http(addr).map_err(|e| EndpointError::Bind {
            addr: addr.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            server,
            connector,
            settings,
            workers: workers.max(1),
        })
    }

    /// The bound socket address, if listening on TCP.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serve requests until the listener shuts down.
    pub fn run(self) {
        let pool = ThreadPool::with_name("surfsup-worker".to_string(), self.workers);

        match self.local_addr() {
            Some(addr) => info!(%addr, workers = self.workers, "HTTP endpoint listening"),
            None => info!(workers = self.workers, "HTTP endpoint listening"),
        }

        for request in self.server.incoming_requests() {
            let connector = self.connector.clone();
            let settings = self.settings.clone();
            pool.execute(move || serve(request, &connector, &settings));
        }

        pool.join();
    }
}

fn serve(request: tiny_http::Request, connector: &Connector, settings: &QuerySettings) {
    let started = Instant::now();
    let method = request.method().to_string();
    let url = request.url().to_string();

    let response = handle_request(&method, &url, connector, settings);
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match response.status {
        500..=u16::MAX => {
            error!(%method, %url, status = response.status, elapsed_ms, "request failed")
        }
        400..=499 => {
            warn!(%method, %url, status = response.status, elapsed_ms, "request rejected")
        }
        _ => debug!(%method, %url, status = response.status, elapsed_ms, "request served"),
    }

    if let Err(e) = request.respond(to_http_response(response)) {
        error!(error = %e, %url, "failed to send response");
    }
}

/// Create HTTP response with the given body and content type
fn to_http_response(response: ApiResponse) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let http = tiny_http::Response::from_data(response.body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(response.status));

    match tiny_http::Header::from_bytes(&b"Content-Type"[..], response.content_type.as_bytes()) {
        Ok(header) => http.with_header(header),
        Err(()) => http,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
