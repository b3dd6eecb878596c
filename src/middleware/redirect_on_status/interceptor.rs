//! The response sink decorator that does the actual intercepting.
//!
//! ```text
//!            write_status(1xx)            write_status(code ∉ ranges)
//!          ┌──────────────┐  ┌──────────────────────────────────▶ Passthrough
//!          │              ▼  │
//!          └──────────── Fresh
//!                            │
//!                            └──────────────────────────────────▶ Redirected
//!                                 write_status(code ∈ ranges)
//! ```
//!
//! `write` and `flush` emit the pending status (default `200`) first, so a
//! handler that never calls `write_status` still goes through the same gate.
//! Both terminal states ignore further status writes.

use std::io;

use http::{HeaderMap, StatusCode};
use tracing::debug;

use crate::range::RangeSet;
use crate::request::Request;
use crate::response;
use crate::sink::{Connection, Flush, Hijack, HijackError, ResponseSink, copy_headers};

/// Where an [`Interceptor`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No final status yet; headers are buffered.
    Fresh,
    /// The upstream status went out unchanged; everything is forwarded.
    Passthrough,
    /// A redirect went out instead; body bytes are dropped.
    Redirected,
}

/// Wraps the real sink for one request.
///
/// Owned by the task serving that request and dropped with it, so none of
/// its state needs synchronising.
pub struct Interceptor<'a> {
    inner: &'a mut dyn ResponseSink,
    req: &'a Request,
    redirect_uri: &'a str,
    redirect_code: StatusCode,
    ranges: &'a RangeSet,
    buffered: Option<HeaderMap>,
    pending: StatusCode,
    state: State,
}

impl<'a> Interceptor<'a> {
    pub fn new(
        inner: &'a mut dyn ResponseSink,
        req: &'a Request,
        redirect_uri: &'a str,
        redirect_code: StatusCode,
        ranges: &'a RangeSet,
    ) -> Self {
        Self {
            inner,
            req,
            redirect_uri,
            redirect_code,
            ranges,
            buffered: None,
            pending: StatusCode::OK,
            state: State::Fresh,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The status that went out, or will go out on the next write.
    pub fn pending_status(&self) -> StatusCode {
        self.pending
    }

    fn copy_buffered(&mut self) {
        if let Some(buffered) = &self.buffered {
            copy_headers(buffered, self.inner.headers_mut());
        }
    }
}

impl ResponseSink for Interceptor<'_> {
    /// Buffered headers until the final status is out, the real sink's
    /// headers afterwards.
    fn headers_mut(&mut self) -> &mut HeaderMap {
        match self.state {
            State::Fresh => self.buffered.get_or_insert_with(HeaderMap::new),
            State::Passthrough | State::Redirected => self.inner.headers_mut(),
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_status(self.pending);

        match self.state {
            // Report a full write so callers never see a short one.
            State::Redirected => Ok(buf.len()),
            State::Fresh | State::Passthrough => self.inner.write(buf),
        }
    }

    fn write_status(&mut self, status: StatusCode) {
        if self.state != State::Fresh {
            return;
        }

        if status.is_informational() {
            self.copy_buffered();
            self.inner.write_status(status);
            return;
        }

        self.pending = status;

        if self.ranges.contains(status.as_u16()) {
            debug!(
                upstream = status.as_u16(),
                redirect = self.redirect_code.as_u16(),
                uri = self.redirect_uri,
                "replacing upstream response with redirect"
            );
            self.pending = self.redirect_code;
            self.state = State::Redirected;
            response::redirect(&mut *self.inner, self.req, self.redirect_uri, self.redirect_code);
            return;
        }

        self.copy_buffered();
        self.inner.write_status(status);
        self.state = State::Passthrough;
    }

    fn as_hijacker(&mut self) -> Option<&mut dyn Hijack> {
        Some(self)
    }

    fn as_flusher(&mut self) -> Option<&mut dyn Flush> {
        Some(self)
    }
}

impl Hijack for Interceptor<'_> {
    fn hijack(&mut self) -> Result<Box<dyn Connection>, HijackError> {
        let name = self.inner.type_name();
        match self.inner.as_hijacker() {
            Some(hijacker) => hijacker.hijack(),
            None => Err(HijackError::NotSupported(name)),
        }
    }
}

impl Flush for Interceptor<'_> {
    fn flush(&mut self) -> io::Result<()> {
        self.write_status(self.pending);

        // A flush after a redirect would emit stray chunk framing.
        if self.state == State::Redirected {
            return Ok(());
        }
        match self.inner.as_flusher() {
            Some(flusher) => flusher.flush(),
            None => Ok(()),
        }
    }
}
