//! Redirect-on-status demo — a flaky upstream behind the middleware.
//!
//! Run with:
//!   cargo run --example redirect
//!
//! Try:
//!   curl -i http://localhost:3000/orders/7        → 307, location: /maintenance
//!   curl -i -X POST http://localhost:3000/orders  → 503 passes through (GET only)
//!   curl -i http://localhost:3000/maintenance     → 200

use http::{Method, StatusCode};
use tsu_redirect::middleware::redirect_on_status::{Config, RedirectOnStatus};
use tsu_redirect::{Request, Response, ResponseSink, Router, Server, handler};

const CONFIG: &str = r#"
redirectUri  = "/maintenance"
redirectCode = 307
status       = ["502-504"]
method       = ["GET", "HEAD"]
"#;

#[tokio::main]
async fn main() -> Result<(), tsu_redirect::Error> {
    tracing_subscriber::fmt::init();

    let app = Router::new()
        .on(Method::GET,  "/orders/{id}",  handler::from_fn(get_order))
        .on(Method::POST, "/orders",       handler::from_fn(create_order))
        .on(Method::GET,  "/maintenance",  handler::from_fn(maintenance));

    let config = Config::from_toml_str(CONFIG)?;
    let app = RedirectOnStatus::new(app, &config, "maintenance")?;

    Server::bind("0.0.0.0:3000").await?.serve(app).await
}

// GET /orders/{id} — the database is down, the upstream says so.
fn get_order(sink: &mut dyn ResponseSink, req: &Request) {
    let id = req.param("id").unwrap_or("unknown");
    Response::builder()
        .status(StatusCode::SERVICE_UNAVAILABLE)
        .json(format!(r#"{{"error":"order {id} unavailable"}}"#).into_bytes())
        .send(sink);
}

// POST /orders — not in the method filter, so the 503 reaches the client.
fn create_order(sink: &mut dyn ResponseSink, _req: &Request) {
    Response::status(StatusCode::SERVICE_UNAVAILABLE).send(sink);
}

fn maintenance(sink: &mut dyn ResponseSink, _req: &Request) {
    Response::builder()
        .html("<h1>Back soon</h1>")
        .send(sink);
}
