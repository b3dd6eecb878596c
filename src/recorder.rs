//! In-memory response sink.
//!
//! The server drives every handler against a [`Recorder`] and turns the
//! recording into a hyper response once the handler returns. Tests use it
//! the same way to inspect what a handler produced.

use std::io;

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use tracing::warn;

use crate::sink::{Flush, ResponseSink};

/// Records status, headers, body and flushes written by a handler.
///
/// The first non-informational status wins; any status after it, `1xx`
/// included, is ignored with a warning. Body bytes written before any
/// status imply `200 OK`.
#[derive(Debug, Default)]
pub struct Recorder {
    status: Option<StatusCode>,
    informational: Vec<(StatusCode, HeaderMap)>,
    headers: HeaderMap,
    body: BytesMut,
    flushes: usize,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Final status; `200 OK` if the handler never chose one.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Whether a final status has been written.
    pub fn is_committed(&self) -> bool {
        self.status.is_some()
    }

    /// `1xx` responses in the order they were sent, each with a snapshot of
    /// the headers it carried.
    pub fn informational(&self) -> &[(StatusCode, HeaderMap)] {
        &self.informational
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// Converts the recording into a response hyper can send.
    ///
    /// Informational responses cannot be replayed after the fact and are
    /// dropped here.
    pub fn into_response(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body.freeze()));
        *res.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *res.headers_mut() = self.headers;
        res
    }
}

impl ResponseSink for Recorder {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.write_status(StatusCode::OK);
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn write_status(&mut self, status: StatusCode) {
        match self.status {
            Some(first) => warn!(%first, ignored = %status, "superfluous write_status call"),
            None if status.is_informational() => {
                self.informational.push((status, self.headers.clone()));
            }
            None => self.status = Some(status),
        }
    }

    fn as_flusher(&mut self) -> Option<&mut dyn Flush> {
        Some(self)
    }
}

impl Flush for Recorder {
    fn flush(&mut self) -> io::Result<()> {
        if self.status.is_none() {
            self.write_status(StatusCode::OK);
        }
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;
    use http::header::LINK;

    use super::*;
    use crate::sink::write_all;

    #[test]
    fn body_without_status_implies_ok() {
        let mut rec = Recorder::new();
        write_all(&mut rec, b"hello").unwrap();

        assert!(rec.is_committed());
        assert_eq!(rec.status(), StatusCode::OK);
        assert_eq!(rec.body(), b"hello");
    }

    #[test]
    fn first_final_status_wins() {
        let mut rec = Recorder::new();
        rec.write_status(StatusCode::NOT_FOUND);
        rec.write_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(rec.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn informational_after_final_status_is_ignored() {
        let mut rec = Recorder::new();
        rec.write_status(StatusCode::OK);
        rec.write_status(StatusCode::CONTINUE);
        rec.write_status(StatusCode::from_u16(103).unwrap());

        assert!(rec.informational().is_empty());
        assert_eq!(rec.status(), StatusCode::OK);
    }

    #[test]
    fn informational_responses_snapshot_headers() {
        let mut rec = Recorder::new();
        rec.headers_mut().insert(LINK, HeaderValue::from_static("</app.css>"));
        rec.write_status(StatusCode::from_u16(103).unwrap());
        rec.write_status(StatusCode::NO_CONTENT);

        assert_eq!(rec.informational().len(), 1);
        let (status, headers) = &rec.informational()[0];
        assert_eq!(status.as_u16(), 103);
        assert_eq!(headers[LINK], "</app.css>");
        assert_eq!(rec.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn flush_is_an_optional_capability() {
        let mut rec = Recorder::new();
        let sink: &mut dyn ResponseSink = &mut rec;
        assert!(sink.as_hijacker().is_none());
        sink.as_flusher().unwrap().flush().unwrap();

        assert_eq!(rec.flushes(), 1);
        assert_eq!(rec.status(), StatusCode::OK);
    }

    #[test]
    fn into_response_carries_everything() {
        let mut rec = Recorder::new();
        rec.headers_mut().insert("x-app", HeaderValue::from_static("tsu"));
        rec.write_status(StatusCode::CREATED);
        write_all(&mut rec, b"made").unwrap();

        let res = rec.into_response();
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.headers()["x-app"], "tsu");
    }
}
