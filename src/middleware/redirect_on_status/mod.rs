//! Redirect on upstream status.
//!
//! When the next handler answers with a status in one of the configured
//! ranges, the client gets a temporary redirect instead and the upstream body
//! is thrown away. Everything else passes through untouched.
//!
//! ```rust
//! use http::StatusCode;
//! use tsu_redirect::middleware::redirect_on_status::{Config, RedirectOnStatus};
//! use tsu_redirect::{Handler, Recorder, Request, handler};
//!
//! let upstream = handler::from_fn(|sink, _req| sink.write_status(StatusCode::BAD_GATEWAY));
//! let config = Config {
//!     redirect_uri: "/maintenance".into(),
//!     status: vec!["502-504".into()],
//!     ..Config::default()
//! };
//! let app = RedirectOnStatus::new(upstream, &config, "maintenance").unwrap();
//!
//! let mut rec = Recorder::new();
//! app.serve(&mut rec, &Request::new(http::Method::GET, "/".parse().unwrap()));
//! assert_eq!(rec.status(), StatusCode::TEMPORARY_REDIRECT);
//! assert_eq!(rec.headers()["location"], "/maintenance");
//! ```
//!
//! Only `302`, `303` and `307` are accepted as redirect codes: the condition
//! that triggers the redirect is transient, and a permanent redirect would be
//! cached by clients long after it clears.

mod config;
mod interceptor;

use std::sync::Arc;

use http::{Method, StatusCode};
use tracing::{debug, info};

use crate::handler::{BoxedHandler, Handler};
use crate::range::RangeSet;
use crate::request::Request;
use crate::sink::ResponseSink;

pub use config::{Config, ConfigError};
pub use interceptor::{Interceptor, State};

/// The middleware. Build once, share across every request.
pub struct RedirectOnStatus {
    next: BoxedHandler,
    name: String,
    redirect_uri: String,
    redirect_code: StatusCode,
    ranges: RangeSet,
    methods: Vec<String>,
}

impl RedirectOnStatus {
    /// Validates `config` and wraps `next`.
    ///
    /// Fails, in this order, on an empty redirect URI, a missing or
    /// non-temporary redirect code, an empty status list, or a status range
    /// that does not parse.
    pub fn new(
        next: impl Handler,
        config: &Config,
        name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        if config.redirect_uri.is_empty() {
            return Err(ConfigError::EmptyUri);
        }

        let redirect_code = match config.redirect_code {
            0 => return Err(ConfigError::MissingRedirectCode),
            code @ (302 | 303 | 307) => StatusCode::from_u16(code)
                .map_err(|_| ConfigError::NotTemporary(code))?,
            code => return Err(ConfigError::NotTemporary(code)),
        };

        if config.status.is_empty() {
            return Err(ConfigError::EmptyStatus);
        }
        let ranges = RangeSet::parse(&config.status)?;

        let name = name.into();
        info!(
            middleware = %name,
            redirect_code = redirect_code.as_u16(),
            ranges = ranges.len(),
            methods = ?config.method,
            "redirect-on-status ready"
        );

        Ok(Self {
            next: Arc::new(next),
            name,
            redirect_uri: config.redirect_uri.clone(),
            redirect_code,
            ranges,
            methods: config.method.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether requests with `method` get their response intercepted.
    pub fn intercepts(&self, method: &Method) -> bool {
        self.methods.is_empty() || self.methods.iter().any(|m| m == method.as_str())
    }
}

impl Handler for RedirectOnStatus {
    fn serve(&self, sink: &mut dyn ResponseSink, req: &Request) {
        if !self.intercepts(req.method()) {
            debug!(middleware = %self.name, method = %req.method(), "method not filtered, passing through");
            self.next.serve(sink, req);
            return;
        }

        let mut interceptor =
            Interceptor::new(sink, req, &self.redirect_uri, self.redirect_code, &self.ranges);
        self.next.serve(&mut interceptor, req);
    }
}
