//! The response sink: where a handler's status line, headers and body go.
//!
//! Every sink takes headers, a status line and body bytes. Two more
//! capabilities are optional and probed at call time:
//!
//! | Capability | Probe | Meaning |
//! |---|---|---|
//! | [`Hijack`] | [`ResponseSink::as_hijacker`] | take over the raw connection |
//! | [`Flush`]  | [`ResponseSink::as_flusher`]  | push buffered bytes to the client now |
//!
//! A sink that lacks a capability simply returns `None`; callers degrade
//! instead of failing to compile against a fat interface.

use std::io::{self, Read, Write};

use http::{HeaderMap, StatusCode};
use thiserror::Error;

/// Destination of one HTTP response.
pub trait ResponseSink: Send {
    /// The header map that will accompany the status line.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Writes body bytes. A write before any status implies `200 OK`.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Sends the status line. `1xx` codes may be sent any number of times
    /// before the final status.
    fn write_status(&mut self, status: StatusCode);

    fn as_hijacker(&mut self) -> Option<&mut dyn Hijack> {
        None
    }

    fn as_flusher(&mut self) -> Option<&mut dyn Flush> {
        None
    }

    /// Concrete type name, used in diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Writes the whole buffer, looping over short writes.
pub fn write_all(sink: &mut dyn ResponseSink, mut buf: &[u8]) -> io::Result<()> {
    while !buf.is_empty() {
        match sink.write(buf)? {
            0 => return Err(io::ErrorKind::WriteZero.into()),
            n => buf = &buf[n..],
        }
    }
    Ok(())
}

/// A raw, bidirectional client connection.
pub trait Connection: Read + Write + Send {}

impl<T: Read + Write + Send> Connection for T {}

/// Connection takeover. After a successful hijack the sink must not be
/// used again for that request.
pub trait Hijack {
    fn hijack(&mut self) -> Result<Box<dyn Connection>, HijackError>;
}

/// Explicit flush of buffered response bytes.
pub trait Flush {
    fn flush(&mut self) -> io::Result<()>;
}

#[derive(Debug, Error)]
pub enum HijackError {
    #[error("{0} does not support connection hijacking")]
    NotSupported(&'static str),
    #[error("hijack failed: {0}")]
    Io(#[from] io::Error),
}

/// Replaces each key of `dst` present in `src` with `src`'s values.
///
/// Keys are overwritten rather than appended to, so copying the same map
/// twice (an informational response, then the final one) never duplicates
/// a value.
pub fn copy_headers(src: &HeaderMap, dst: &mut HeaderMap) {
    for name in src.keys() {
        dst.remove(name);
        for value in src.get_all(name) {
            dst.append(name.clone(), value.clone());
        }
    }
}
