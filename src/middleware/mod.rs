//! Middleware layer.
//!
//! A middleware is a [`Handler`](crate::Handler) that owns the next handler
//! in the chain. It gets the request and the response sink first, and may
//! hand the next handler a decorated sink instead of the real one. That is
//! the whole mechanism: no layers, no services, no futures to poll.
//!
//! Built-in middleware:
//! - [`redirect_on_status`]: swaps selected upstream statuses for a
//!   temporary redirect

pub mod redirect_on_status;
