//! Response values and redirects.
//!
//! Handlers may write to their sink call by call, or build a [`Response`]
//! and [`send`](Response::send) it in one go:
//!
//! ```rust
//! use tsu_redirect::{Response, handler};
//! use http::StatusCode;
//!
//! let created = handler::from_fn(|sink, _req| {
//!     Response::builder()
//!         .status(StatusCode::CREATED)
//!         .header("location", "/users/99")
//!         .json(br#"{"id":99}"#.to_vec())
//!         .send(sink);
//! });
//! # let _ = created;
//! ```

use http::header::{CONTENT_TYPE, LOCATION};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use tracing::warn;

use crate::request::Request;
use crate::sink::{ResponseSink, write_all};

const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

// ── Response ─────────────────────────────────────────────────────────────────

/// A complete response, ready to be written to a sink.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    /// `200 OK` — `application/json`.
    pub fn json(body: Vec<u8>) -> Self {
        Self::builder().json(body)
    }

    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().text(body)
    }

    /// Response with no body.
    pub fn status(status: StatusCode) -> Self {
        Self { status, headers: HeaderMap::new(), body: Vec::new() }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { status: StatusCode::OK, headers: HeaderMap::new() }
    }

    /// Writes headers, status and body to `sink`, in that order. Headers
    /// replace any same-named ones already on the sink.
    pub fn send(self, sink: &mut dyn ResponseSink) {
        let headers = sink.headers_mut();
        let mut current: Option<HeaderName> = None;
        for (name, value) in self.headers {
            // Owned iteration yields a name only for the first value of each key.
            if let Some(name) = name {
                headers.remove(&name);
                current = Some(name);
            }
            if let Some(name) = &current {
                headers.append(name.clone(), value);
            }
        }
        sink.write_status(self.status);
        if !self.body.is_empty() {
            if let Err(e) = write_all(sink, &self.body) {
                warn!(status = %self.status, "response body write failed: {e}");
            }
        }
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`]. Defaults to `200 OK`.
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HeaderMap,
}

impl ResponseBuilder {
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Adds a header. Invalid names or values are dropped with a warning.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            _ => warn!(name, "dropping invalid response header"),
        }
        self
    }

    pub fn json(self, body: Vec<u8>) -> Response {
        self.finish(JSON, body)
    }

    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(TEXT, body.into().into_bytes())
    }

    pub fn html(self, body: impl Into<String>) -> Response {
        self.finish(HTML, body.into().into_bytes())
    }

    /// Terminate with a body of any other media type.
    pub fn bytes(self, content_type: &'static str, body: Vec<u8>) -> Response {
        self.finish(content_type, body)
    }

    /// Terminate with no body (e.g. `204 No Content`).
    pub fn no_body(self) -> Response {
        Response { status: self.status, headers: self.headers, body: Vec::new() }
    }

    fn finish(mut self, content_type: &'static str, body: Vec<u8>) -> Response {
        self.headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        Response { status: self.status, headers: self.headers, body }
    }
}

// ── Redirects ─────────────────────────────────────────────────────────────────

/// Writes a redirect to `target` with the given status onto `sink`.
///
/// `Location` is always set. GET and HEAD requests without a content type
/// already on the sink get `text/html`, and GET additionally gets a one-line
/// anchor body for clients that do not follow redirects. A relative target
/// (no scheme, no leading `/`) is resolved against the request path's
/// directory, and any target without a scheme or host is path-cleaned.
pub fn redirect(sink: &mut dyn ResponseSink, req: &Request, target: &str, status: StatusCode) {
    let location = resolve(req.path(), target);

    let headers = sink.headers_mut();
    let had_content_type = headers.contains_key(CONTENT_TYPE);
    match HeaderValue::try_from(location.as_str()) {
        Ok(value) => {
            headers.insert(LOCATION, value);
        }
        Err(_) => warn!(%location, "redirect target is not a valid header value"),
    }

    let method = req.method();
    let is_get = *method == Method::GET;
    if !had_content_type && (is_get || *method == Method::HEAD) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(HTML));
    }

    sink.write_status(status);

    if !had_content_type && is_get {
        let body = format!(
            "<a href=\"{}\">{}</a>.\n",
            escape_html(&location),
            status.canonical_reason().unwrap_or(""),
        );
        if let Err(e) = write_all(sink, body.as_bytes()) {
            warn!(%status, "redirect body write failed: {e}");
        }
    }
}

/// Absolute URLs (with a scheme or host) are returned untouched. Anything
/// else is joined onto the request directory if relative, then has its `.`
/// and `..` segments cleaned. The query string and a trailing `/` survive.
fn resolve(path: &str, target: &str) -> String {
    if target.starts_with("//") || target.contains("://") {
        return target.to_owned();
    }

    let joined = if target.starts_with('/') {
        target.to_owned()
    } else {
        let dir = path.rfind('/').map_or("/", |i| &path[..=i]);
        format!("{dir}{target}")
    };

    let (path, query) = joined.split_at(joined.find('?').unwrap_or(joined.len()));
    let mut cleaned = clean_path(path);
    if path.ends_with('/') && !cleaned.ends_with('/') {
        cleaned.push('/');
    }
    cleaned.push_str(query);
    cleaned
}

/// Lexically normalises an absolute path. `..` never climbs above `/`.
fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    format!("/{}", segments.join("/"))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use http::Uri;

    use super::*;
    use crate::recorder::Recorder;

    fn request(method: Method, path: &'static str) -> Request {
        Request::new(method, Uri::from_static(path))
    }

    #[test]
    fn send_writes_status_headers_and_body() {
        let mut rec = Recorder::new();
        Response::builder()
            .status(StatusCode::CREATED)
            .header("location", "/users/99")
            .header("bad header", "x")
            .json(b"{}".to_vec())
            .send(&mut rec);

        assert_eq!(rec.status(), StatusCode::CREATED);
        assert_eq!(rec.headers()[LOCATION], "/users/99");
        assert_eq!(rec.headers()[CONTENT_TYPE], JSON);
        assert_eq!(rec.headers().len(), 2);
        assert_eq!(rec.body(), b"{}");
    }

    #[test]
    fn redirect_get_has_html_body() {
        let mut rec = Recorder::new();
        redirect(&mut rec, &request(Method::GET, "/"), "/maintenance?a=1&b=2", StatusCode::TEMPORARY_REDIRECT);

        assert_eq!(rec.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(rec.headers()[LOCATION], "/maintenance?a=1&b=2");
        assert_eq!(rec.headers()[CONTENT_TYPE], HTML);
        assert_eq!(
            rec.body(),
            b"<a href=\"/maintenance?a=1&amp;b=2\">Temporary Redirect</a>.\n".as_slice(),
        );
    }

    #[test]
    fn redirect_head_has_no_body() {
        let mut rec = Recorder::new();
        redirect(&mut rec, &request(Method::HEAD, "/"), "/down", StatusCode::FOUND);

        assert_eq!(rec.status(), StatusCode::FOUND);
        assert_eq!(rec.headers()[CONTENT_TYPE], HTML);
        assert!(rec.body().is_empty());
    }

    #[test]
    fn redirect_post_sets_location_only() {
        let mut rec = Recorder::new();
        redirect(&mut rec, &request(Method::POST, "/"), "https://status.example.com/", StatusCode::SEE_OTHER);

        assert_eq!(rec.status(), StatusCode::SEE_OTHER);
        assert_eq!(rec.headers()[LOCATION], "https://status.example.com/");
        assert!(!rec.headers().contains_key(CONTENT_TYPE));
        assert!(rec.body().is_empty());
    }

    #[test]
    fn redirect_keeps_existing_content_type() {
        let mut rec = Recorder::new();
        rec.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        redirect(&mut rec, &request(Method::GET, "/"), "/x", StatusCode::FOUND);

        assert_eq!(rec.headers()[CONTENT_TYPE], JSON);
        assert!(rec.body().is_empty());
    }

    #[test]
    fn relative_targets_resolve_against_request_dir() {
        assert_eq!(resolve("/api/v1/users", "down.html"), "/api/v1/down.html");
        assert_eq!(resolve("/", "down.html"), "/down.html");
        assert_eq!(resolve("/api/", "/abs"), "/abs");
        assert_eq!(resolve("/api/x", "http://other/"), "http://other/");
        assert_eq!(resolve("/api/x", "//cdn.example.com/a/../b"), "//cdn.example.com/a/../b");
    }

    #[test]
    fn resolved_targets_are_cleaned() {
        assert_eq!(resolve("/api/v1/x", "../down"), "/api/down");
        assert_eq!(resolve("/api/v1/x", "./a/./b/../c/"), "/api/v1/a/c/");
        assert_eq!(resolve("/", "../../escape"), "/escape");
        assert_eq!(resolve("/x", "/a//b/../c?next=../d"), "/a/c?next=../d");
        assert_eq!(resolve("/api/v1/x", ".."), "/api");
    }

    #[test]
    fn redirect_location_uses_cleaned_target() {
        let mut rec = Recorder::new();
        redirect(&mut rec, &request(Method::POST, "/api/v1/orders"), "../maintenance", StatusCode::SEE_OTHER);

        assert_eq!(rec.headers()[LOCATION], "/api/maintenance");
    }
}
