//! Observational capture of the response flowing back to the client.
//!
//! Axum responses are values rather than writable sinks, so instead of
//! wrapping a writer the correlation stage installs a `ResponseCapture`
//! handle in the request extensions and the innermost stage absorbs the
//! finished response into it: the body bytes are buffered, the status is
//! recorded, and an identical response is rebuilt. Nothing sent to the
//! client is altered.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::body::{Body, Bytes, to_bytes};
use axum::http::StatusCode;
use axum::response::Response;

#[derive(Debug, Default)]
struct CapturedResponse {
    status: Option<StatusCode>,
    body: Vec<u8>,
}

/// Cheaply clonable handle to a per-request captured response.
///
/// The handle is owned by exactly one in-flight request; clones only exist
/// so the chain stages can each hold a reference across the handler call.
#[derive(Clone, Debug, Default)]
pub struct ResponseCapture {
    inner: Arc<Mutex<CapturedResponse>>,
}

impl ResponseCapture {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CapturedResponse> {
        // A capture failure must never take the request down with it.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records the first explicit status write; later writes are ignored.
    pub fn record_status(&self, status: StatusCode) {
        let mut inner = self.lock();
        if inner.status.is_none() {
            inner.status = Some(status);
        }
    }

    /// Appends body bytes. A body write before any status write records
    /// the default success status.
    pub fn record_body(&self, chunk: &[u8]) {
        let mut inner = self.lock();
        if inner.status.is_none() {
            inner.status = Some(StatusCode::OK);
        }
        inner.body.extend_from_slice(chunk);
    }

    /// The recorded status, or `None` when nothing has been written yet.
    pub fn status(&self) -> Option<StatusCode> {
        self.lock().status
    }

    /// The buffered body, whitespace-trimmed.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.lock().body).trim().to_string()
    }

    /// Buffers the response body into the capture and rebuilds an
    /// identical response for the client.
    pub async fn absorb(&self, response: Response) -> Response {
        let (parts, body) = response.into_parts();
        let bytes = match to_bytes(body, usize::MAX).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("response body capture failed: {e}");
                Bytes::new()
            }
        };

        self.record_status(parts.status);
        self.record_body(&bytes);

        Response::from_parts(parts, Body::from(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_capture_has_no_status() {
        let capture = ResponseCapture::new();
        assert_eq!(capture.status(), None);
        assert_eq!(capture.body_text(), "");
    }

    #[test]
    fn body_write_defaults_status_to_ok() {
        let capture = ResponseCapture::new();
        capture.record_body(b"hello");
        assert_eq!(capture.status(), Some(StatusCode::OK));
    }

    #[test]
    fn first_status_write_sticks() {
        let capture = ResponseCapture::new();
        capture.record_status(StatusCode::NOT_FOUND);
        capture.record_status(StatusCode::INTERNAL_SERVER_ERROR);
        capture.record_body(b"{}");
        assert_eq!(capture.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn body_text_is_trimmed() {
        let capture = ResponseCapture::new();
        capture.record_body(b"  {\"id\":1}\n");
        assert_eq!(capture.body_text(), "{\"id\":1}");
    }

    #[tokio::test]
    async fn absorb_preserves_the_response() {
        let capture = ResponseCapture::new();
        let response = Response::builder()
            .status(StatusCode::CREATED)
            .body(Body::from("created"))
            .unwrap();

        let response = capture.absorb(response).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"created");

        assert_eq!(capture.status(), Some(StatusCode::CREATED));
        assert_eq!(capture.body_text(), "created");
    }
}
