//! Response writing with a deferred status line.
//!
//! # Responsibilities
//! - Hold headers until the status is committed
//! - Commit 200 implicitly on the first body write
//! - Honour only the first explicit status
//! - Detect short writes from the underlying sink
//!
//! # Design Decisions
//! - `StatusState` is an explicit two-state machine, not a sentinel code
//! - Headers are frozen at commit; later edits are refused
//! - Transport errors are surfaced, never retried

use std::io;

use axum::body::Body;
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors raised while writing a response.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The sink accepted fewer bytes than were handed to it.
    #[error("short write: expected {expected} bytes, wrote {written}")]
    LengthMismatch { expected: usize, written: usize },
    /// The underlying transport failed.
    #[error("response transport error: {0}")]
    Io(#[from] io::Error),
}

/// Destination of a response: receives the head once, then body chunks.
pub trait ResponseSink: Send {
    /// Send the status line and headers.
    fn send_head(&mut self, status: StatusCode, headers: &HeaderMap) -> io::Result<()>;

    /// Send a body chunk, returning how many bytes were accepted.
    fn send_body(&mut self, chunk: &[u8]) -> io::Result<usize>;
}

/// Whether the status line has been sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusState {
    Unset,
    Committed(StatusCode),
}

/// Deferred-status writer over a [`ResponseSink`].
pub struct ResponseWriter<'a> {
    sink: &'a mut dyn ResponseSink,
    state: StatusState,
    headers: HeaderMap,
    written: usize,
}

impl<'a> ResponseWriter<'a> {
    pub fn new(sink: &'a mut dyn ResponseSink) -> Self {
        Self {
            sink,
            state: StatusState::Unset,
            headers: HeaderMap::new(),
            written: 0,
        }
    }

    pub fn state(&self) -> StatusState {
        self.state
    }

    /// Committed status, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self.state {
            StatusState::Unset => None,
            StatusState::Committed(status) => Some(status),
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self.state, StatusState::Committed(_))
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable headers while the status is still unset.
    pub fn headers_mut(&mut self) -> Option<&mut HeaderMap> {
        match self.state {
            StatusState::Unset => Some(&mut self.headers),
            StatusState::Committed(_) => None,
        }
    }

    /// Set a header; returns `false` if the head was already sent.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) -> bool {
        match self.headers_mut() {
            Some(headers) => {
                headers.insert(name, value);
                true
            }
            None => {
                tracing::debug!(header = %name, "header set after status commit ignored");
                false
            }
        }
    }

    /// Commit `status`. Only the first successful call has any effect.
    ///
    /// If the sink rejects the head the status stays unset.
    pub fn write_header(&mut self, status: StatusCode) -> Result<(), ResponseError> {
        if let StatusState::Committed(existing) = self.state {
            tracing::debug!(
                existing = existing.as_u16(),
                ignored = status.as_u16(),
                "status already committed"
            );
            return Ok(());
        }
        self.sink.send_head(status, &self.headers)?;
        self.state = StatusState::Committed(status);
        Ok(())
    }

    /// Write body bytes, committing 200 first if no status was set.
    ///
    /// An empty slice still commits the status.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize, ResponseError> {
        if !self.is_committed() {
            self.write_header(StatusCode::OK)?;
        }
        let written = self.sink.send_body(bytes)?;
        self.written += written;
        if written != bytes.len() {
            return Err(ResponseError::LengthMismatch {
                expected: bytes.len(),
                written,
            });
        }
        Ok(written)
    }

    pub fn write_str(&mut self, text: &str) -> Result<usize, ResponseError> {
        self.write(text.as_bytes())
    }

    /// Total body bytes accepted by the sink.
    pub fn bytes_written(&self) -> usize {
        self.written
    }
}

/// In-memory sink that collects the response for later conversion.
#[derive(Debug, Default)]
pub struct BufferedSink {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status as sent by the writer; `None` if nothing was committed.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or_default()
    }
}

impl ResponseSink for BufferedSink {
    fn send_head(&mut self, status: StatusCode, headers: &HeaderMap) -> io::Result<()> {
        self.status = Some(status);
        self.headers = headers.clone();
        Ok(())
    }

    fn send_body(&mut self, chunk: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(chunk);
        Ok(chunk.len())
    }
}

impl IntoResponse for BufferedSink {
    /// An uncommitted response goes out as `200 OK` with an empty body.
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::CONTENT_TYPE;

    /// Accepts at most `limit` bytes per call.
    struct ShortSink {
        limit: usize,
    }

    impl ResponseSink for ShortSink {
        fn send_head(&mut self, _: StatusCode, _: &HeaderMap) -> io::Result<()> {
            Ok(())
        }

        fn send_body(&mut self, chunk: &[u8]) -> io::Result<usize> {
            Ok(chunk.len().min(self.limit))
        }
    }

    /// Refuses every head; counts body chunks that slip through.
    struct BrokenSink {
        body_chunks: usize,
    }

    impl ResponseSink for BrokenSink {
        fn send_head(&mut self, _: StatusCode, _: &HeaderMap) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer closed"))
        }

        fn send_body(&mut self, chunk: &[u8]) -> io::Result<usize> {
            self.body_chunks += 1;
            Ok(chunk.len())
        }
    }

    #[test]
    fn test_write_commits_ok() {
        let mut sink = BufferedSink::new();
        {
            let mut writer = ResponseWriter::new(&mut sink);
            assert_eq!(writer.state(), StatusState::Unset);
            writer.write_str("hello").unwrap();
            assert_eq!(writer.state(), StatusState::Committed(StatusCode::OK));
            assert_eq!(writer.bytes_written(), 5);
        }
        assert_eq!(sink.status(), Some(StatusCode::OK));
        assert_eq!(sink.body_str(), "hello");
    }

    #[test]
    fn test_first_status_wins() {
        let mut sink = BufferedSink::new();
        {
            let mut writer = ResponseWriter::new(&mut sink);
            writer.write_header(StatusCode::NOT_FOUND).unwrap();
            writer.write_header(StatusCode::OK).unwrap();
            writer.write_str("gone").unwrap();
            assert_eq!(writer.status(), Some(StatusCode::NOT_FOUND));
        }
        assert_eq!(sink.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_headers_frozen_after_commit() {
        let mut sink = BufferedSink::new();
        {
            let mut writer = ResponseWriter::new(&mut sink);
            assert!(writer.set_header(CONTENT_TYPE, HeaderValue::from_static("text/plain")));
            writer.write(b"").unwrap();
            assert!(writer.headers_mut().is_none());
            assert!(!writer.set_header(CONTENT_TYPE, HeaderValue::from_static("text/html")));
        }
        assert_eq!(sink.headers()[CONTENT_TYPE], "text/plain");
        assert_eq!(sink.status(), Some(StatusCode::OK));
        assert!(sink.body().is_empty());
    }

    #[test]
    fn test_nothing_written_stays_unset() {
        let mut sink = BufferedSink::new();
        {
            let writer = ResponseWriter::new(&mut sink);
            assert!(!writer.is_committed());
        }
        assert_eq!(sink.status(), None);
        let response = sink.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_failed_head_leaves_status_unset() {
        let mut sink = BrokenSink { body_chunks: 0 };
        {
            let mut writer = ResponseWriter::new(&mut sink);
            assert!(matches!(
                writer.write_header(StatusCode::CREATED),
                Err(ResponseError::Io(_))
            ));
            assert_eq!(writer.state(), StatusState::Unset);
            assert!(writer.headers_mut().is_some());
            assert!(writer.write(b"body").is_err());
            assert!(!writer.is_committed());
        }
        assert_eq!(sink.body_chunks, 0);
    }

    #[test]
    fn test_short_write_detected() {
        let mut sink = ShortSink { limit: 3 };
        let mut writer = ResponseWriter::new(&mut sink);
        match writer.write(b"abcdef") {
            Err(ResponseError::LengthMismatch { expected, written }) => {
                assert_eq!(expected, 6);
                assert_eq!(written, 3);
            }
            other => panic!("expected length mismatch, got {:?}", other),
        }
    }
}
