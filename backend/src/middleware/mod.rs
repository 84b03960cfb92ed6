//! Request instrumentation chain.
//!
//! Every inbound request passes through three stages composed in a fixed
//! order around the handler: correlation-id assignment, audit logging, and
//! metrics emission. Each stage independently skips the configured
//! infrastructure paths, and no stage failure may prevent the handler from
//! running.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderValue;
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;
use rand::Rng;

pub mod capture;
pub mod metrics;
pub mod normalize;

pub use capture::ResponseCapture;
pub use metrics::HttpMetrics;
pub use normalize::normalize_route;

pub const CORRELATION_HEADER: &str = "x-request-id";
const CORRELATION_ID_BYTES: usize = 16;

const DEFAULT_EXCLUDED_PATHS: [&str; 2] = ["/health", "/metrics"];

/// Correlation id assigned to one in-flight request, threaded through the
/// request extensions for the logging stage.
#[derive(Clone, Debug)]
pub struct CorrelationId(pub String);

/// Explicitly constructed instrumentation context: the metrics collectors
/// the chain records into and the set of paths every stage skips.
pub struct Instrumentation {
    metrics: HttpMetrics,
    excluded_paths: Vec<String>,
}

impl Instrumentation {
    /// Builds a context that skips the health and metrics endpoints.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::with_excluded_paths(
            DEFAULT_EXCLUDED_PATHS.iter().map(|p| p.to_string()).collect(),
        )
    }

    pub fn with_excluded_paths(excluded_paths: Vec<String>) -> Result<Self, prometheus::Error> {
        Ok(Instrumentation {
            metrics: HttpMetrics::new()?,
            excluded_paths,
        })
    }

    pub fn metrics(&self) -> &HttpMetrics {
        &self.metrics
    }

    fn is_excluded(&self, path: &str) -> bool {
        self.excluded_paths.iter().any(|excluded| excluded == path)
    }
}

/// Wraps the router in the instrumentation chain.
///
/// The composition order is fixed: correlation-id assignment runs first on
/// the way in, then request logging, then metrics, then the handler.
/// `Router::layer` makes the last layer added the outermost stage, so the
/// stages are listed innermost first.
pub fn instrument(router: Router, ctx: Arc<Instrumentation>) -> Router {
    router
        .layer(from_fn_with_state(ctx.clone(), metrics_stage))
        .layer(from_fn_with_state(ctx.clone(), logging_stage))
        .layer(from_fn_with_state(ctx, correlation_stage))
}

fn generate_correlation_id() -> String {
    let mut bytes = [0u8; CORRELATION_ID_BYTES];
    rand::thread_rng().fill(&mut bytes[..]);
    hex::encode(bytes)
}

/// Assigns a fresh correlation id to the request and installs the response
/// capture handle the later stages read from.
async fn correlation_stage(
    State(ctx): State<Arc<Instrumentation>>,
    mut request: Request,
    next: Next,
) -> Response {
    if ctx.is_excluded(request.uri().path()) {
        return next.run(request).await;
    }

    let id = generate_correlation_id();
    if let Ok(value) = HeaderValue::from_str(&id) {
        request.headers_mut().insert(CORRELATION_HEADER, value);
    }
    request.extensions_mut().insert(CorrelationId(id));
    request.extensions_mut().insert(ResponseCapture::new());

    next.run(request).await
}

/// Logs one `[IN]` line before the handler and one `[OUT]` line after it,
/// both carrying the request's correlation id.
async fn logging_stage(
    State(ctx): State<Arc<Instrumentation>>,
    request: Request,
    next: Next,
) -> Response {
    if ctx.is_excluded(request.uri().path()) {
        return next.run(request).await;
    }

    let correlation_id = request
        .extensions()
        .get::<CorrelationId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    let capture = request.extensions().get::<ResponseCapture>().cloned();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.to_string())
        .unwrap_or_else(|| "-".to_string());

    // Buffer the request body so it can be logged here and still reach the
    // handler unconsumed. A failed read logs as empty instead of failing
    // the request.
    let (parts, body) = request.into_parts();
    let request_body = to_bytes(body, usize::MAX).await.unwrap_or_default();
    tracing::info!(
        "{} [IN] {} {} {} req: {}",
        correlation_id,
        method,
        uri,
        remote,
        String::from_utf8_lossy(&request_body),
    );
    let request = Request::from_parts(parts, Body::from(request_body));

    let started = Instant::now();
    let response = next.run(request).await;

    let response_body = capture.map(|c| c.body_text()).unwrap_or_default();
    tracing::info!(
        "{} [OUT] {}ms {} {} {} resp: {}",
        correlation_id,
        started.elapsed().as_millis(),
        method,
        uri,
        remote,
        response_body,
    );

    response
}

/// Counts the request, and once the handler has returned records the
/// response status and duration against the normalized route label.
async fn metrics_stage(
    State(ctx): State<Arc<Instrumentation>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if ctx.is_excluded(&path) {
        return next.run(request).await;
    }

    let method = request.method().to_string();
    let endpoint = normalize_route(&path);
    ctx.metrics
        .requests
        .with_label_values(&[method.as_str(), endpoint.as_str()])
        .inc();

    let capture = request.extensions().get::<ResponseCapture>().cloned();
    let started = Instant::now();
    let response = next.run(request).await;

    // Without a capture handle the response cannot be introspected; the
    // request counter above is all that gets recorded.
    let Some(capture) = capture else {
        return response;
    };

    let response = capture.absorb(response).await;
    if let Some(status) = capture.status() {
        let status = status.as_u16().to_string();
        ctx.metrics
            .statuses
            .with_label_values(&[method.as_str(), endpoint.as_str(), status.as_str()])
            .inc();
    }
    ctx.metrics
        .durations
        .with_label_values(&[method.as_str(), endpoint.as_str()])
        .observe(started.elapsed().as_secs_f64());

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use tower::ServiceExt;

    async fn echo(body: String) -> String {
        body
    }

    fn test_app() -> (Router, Arc<Instrumentation>) {
        let ctx = Arc::new(Instrumentation::new().unwrap());
        let app = instrument(
            Router::new()
                .route("/echo", post(echo))
                .route("/user/{id}", get(|| async { "profile" }))
                .route("/health", get(|| async { StatusCode::OK })),
            ctx.clone(),
        );
        (app, ctx)
    }

    #[tokio::test]
    async fn chain_counts_and_passes_the_body_through() {
        let (app, ctx) = test_app();

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .body(Body::from("hello"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"hello");

        let metrics = ctx.metrics();
        assert_eq!(
            metrics.requests.with_label_values(&["POST", "/echo"]).get(),
            1
        );
        assert_eq!(
            metrics
                .statuses
                .with_label_values(&["POST", "/echo", "200"])
                .get(),
            1
        );
        assert_eq!(
            metrics
                .durations
                .with_label_values(&["POST", "/echo"])
                .get_sample_count(),
            1
        );
    }

    #[tokio::test]
    async fn numeric_segments_collapse_in_labels() {
        let (app, ctx) = test_app();

        app.oneshot(
            axum::http::Request::builder()
                .uri("/user/42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(
            ctx.metrics()
                .requests
                .with_label_values(&["GET", "/user/*"])
                .get(),
            1
        );
    }

    #[tokio::test]
    async fn excluded_paths_skip_every_stage() {
        let (app, ctx) = test_app();

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            ctx.metrics()
                .requests
                .with_label_values(&["GET", "/health"])
                .get(),
            0
        );
    }

    #[tokio::test]
    async fn correlation_header_reaches_the_handler() {
        let ctx = Arc::new(Instrumentation::new().unwrap());
        let app = instrument(
            Router::new().route(
                "/probe",
                get(|request: Request| async move {
                    request
                        .headers()
                        .get(CORRELATION_HEADER)
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_owned)
                        .unwrap_or_default()
                }),
            ),
            ctx,
        );

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/probe")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let id = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(id.len(), 2 * CORRELATION_ID_BYTES);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn error_statuses_are_labeled() {
        let ctx = Arc::new(Instrumentation::new().unwrap());
        let app = instrument(
            Router::new().route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR })),
            ctx.clone(),
        );

        app.oneshot(
            axum::http::Request::builder()
                .uri("/broken")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(
            ctx.metrics()
                .statuses
                .with_label_values(&["GET", "/broken", "500"])
                .get(),
            1
        );
    }
}
