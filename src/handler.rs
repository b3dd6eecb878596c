//! Handler trait and type erasure.
//!
//! # The handler contract
//!
//! A handler receives the request and a response sink and produces its
//! response *through* the sink: it sets headers, writes a status, writes body
//! bytes. It returns nothing. That shape is what lets a middleware hand the
//! next handler a decorated sink and watch everything it does.
//!
//! ```text
//! Server ─▶ RedirectOnStatus::serve(sink, req)
//!                  │ wraps sink in an Interceptor
//!                  ▼
//!           Router::serve(&mut interceptor, req)
//!                  │
//!                  ▼
//!           route handler writes status/headers/body
//! ```
//!
//! # How closures are stored
//!
//! Plain closures are wrapped by [`from_fn`] in a newtype, so the router and
//! middleware can hold any handler behind `Arc<dyn Handler>` and pay one
//! vtable dispatch per request.

use std::sync::Arc;

use crate::request::Request;
use crate::sink::ResponseSink;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Anything that can answer a request by writing to a [`ResponseSink`].
///
/// Handlers are shared by every in-flight request, hence `Send + Sync`.
pub trait Handler: Send + Sync + 'static {
    fn serve(&self, sink: &mut dyn ResponseSink, req: &Request);
}

/// A heap-allocated, type-erased handler shared across concurrent requests.
pub type BoxedHandler = Arc<dyn Handler>;

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn serve(&self, sink: &mut dyn ResponseSink, req: &Request) {
        (**self).serve(sink, req)
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn serve(&self, sink: &mut dyn ResponseSink, req: &Request) {
        (**self).serve(sink, req)
    }
}

// ── Closures ──────────────────────────────────────────────────────────────────

/// Turns a closure into a [`Handler`].
///
/// ```rust
/// use tsu_redirect::{handler, sink};
/// use http::StatusCode;
///
/// let bad_gateway = handler::from_fn(|out, _req| {
///     out.write_status(StatusCode::BAD_GATEWAY);
///     let _ = sink::write_all(out, b"upstream down");
/// });
/// # let _ = bad_gateway;
/// ```
pub fn from_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&mut dyn ResponseSink, &Request) + Send + Sync + 'static,
{
    FnHandler(f)
}

/// Newtype bridging a closure to the [`Handler`] trait. Built by [`from_fn`].
pub struct FnHandler<F>(F);

impl<F> Handler for FnHandler<F>
where
    F: Fn(&mut dyn ResponseSink, &Request) + Send + Sync + 'static,
{
    fn serve(&self, sink: &mut dyn ResponseSink, req: &Request) {
        (self.0)(sink, req)
    }
}

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode, Uri};

    use super::*;
    use crate::recorder::Recorder;

    #[test]
    fn boxed_and_arced_handlers_delegate() {
        let teapot = from_fn(|sink, _req| sink.write_status(StatusCode::IM_A_TEAPOT));
        let shared: BoxedHandler = Arc::new(teapot);
        let boxed: Box<dyn Handler> = Box::new(Arc::clone(&shared));

        let req = Request::new(Method::GET, Uri::from_static("/"));
        let mut rec = Recorder::new();
        boxed.serve(&mut rec, &req);

        assert_eq!(rec.status(), StatusCode::IM_A_TEAPOT);
    }
}
