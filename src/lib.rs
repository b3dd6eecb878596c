//! # tsu-redirect
//!
//! Redirect-on-status middleware for HTTP services behind a reverse proxy,
//! and the small tsu host it runs in.
//!
//! ## The contract
//!
//! An upstream handler answers requests by writing to a response sink. The
//! [`RedirectOnStatus`](middleware::redirect_on_status::RedirectOnStatus)
//! middleware hands it a decorated sink instead. If the status the handler
//! emits falls in a configured range, the client receives a temporary
//! redirect and the handler's body is silently dropped. Otherwise every byte
//! passes through unchanged.
//!
//! What the proxy in front already owns is ignored here: TLS, rate limits,
//! body-size limits, retries, connection pooling.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::{Method, StatusCode};
//! use tsu_redirect::middleware::redirect_on_status::{Config, RedirectOnStatus};
//! use tsu_redirect::{Router, Server, handler};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tsu_redirect::Error> {
//!     let app = Router::new().on(Method::GET, "/", handler::from_fn(|sink, _req| {
//!         sink.write_status(StatusCode::BAD_GATEWAY);
//!     }));
//!
//!     let config = Config::from_toml_str(r#"
//!         redirectUri = "/maintenance"
//!         status = ["502-504"]
//!     "#)?;
//!     let app = RedirectOnStatus::new(app, &config, "maintenance")?;
//!
//!     Server::bind("0.0.0.0:3000").await?.serve(app).await
//! }
//! ```

mod error;
mod recorder;
mod request;
mod router;
mod server;

pub mod handler;
pub mod middleware;
pub mod range;
pub mod response;
pub mod sink;

pub use error::Error;
pub use handler::{BoxedHandler, Handler};
pub use range::{CodeRange, RangeSet};
pub use recorder::Recorder;
pub use request::Request;
pub use response::Response;
pub use router::Router;
pub use server::Server;
pub use sink::ResponseSink;
