//! HTML rewriting that delivers the reload client to every page.
//!
//! The static file handler knows nothing about reloading. This middleware
//! sits in front of it, buffers successful HTML responses, inserts
//! [`RELOAD_SCRIPT`] and fixes up `Content-Length` before anything is
//! written to the socket. Every other response passes through untouched.

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::Request,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use memchr::memmem;
use tracing::{trace, warn};

/// Script tag inserted into HTML pages. It long-polls the wait endpoint and
/// reloads on 204, retrying every second on failure.
pub const RELOAD_SCRIPT: &[u8] = include_bytes!("../../assets/reload-client.html");

const CLOSING_TAG: &[u8] = b"</html>";

/// Insert [`RELOAD_SCRIPT`] before the last `</html>`, or append it.
pub fn inject_reload_script(body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + RELOAD_SCRIPT.len());

    match memmem::rfind(body, CLOSING_TAG) {
        Some(pos) => {
            out.extend_from_slice(&body[..pos]);
            out.extend_from_slice(RELOAD_SCRIPT);
            out.extend_from_slice(&body[pos..]);
        }
        None => {
            warn!("No closing </html> tag found, appending reload script");
            out.extend_from_slice(body);
            out.extend_from_slice(RELOAD_SCRIPT);
        }
    }

    out
}

/// Whether a `Content-Type` value denotes HTML.
pub fn is_html_content_type(value: Option<&HeaderValue>) -> bool {
    value
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("text/html"))
}

/// One response on its way out, before rewriting.
///
/// Built per response, so the length adjustment of one page can never leak
/// into the next.
#[derive(Debug, Clone)]
pub struct PendingResponse {
    body: Bytes,
    is_html: bool,
    length_delta: usize,
}

impl PendingResponse {
    pub fn new(body: Bytes, headers: &HeaderMap) -> Self {
        let is_html = is_html_content_type(headers.get(header::CONTENT_TYPE));
        Self {
            body,
            is_html,
            length_delta: if is_html { RELOAD_SCRIPT.len() } else { 0 },
        }
    }

    pub fn is_html(&self) -> bool {
        self.is_html
    }

    /// Bytes the rewrite adds to the body.
    pub fn length_delta(&self) -> usize {
        self.length_delta
    }

    /// `Content-Length` of the body [`into_body`](Self::into_body) produces.
    pub fn content_length(&self) -> usize {
        self.body.len() + self.length_delta
    }

    pub fn into_body(self) -> Bytes {
        if self.is_html {
            Bytes::from(inject_reload_script(&self.body))
        } else {
            self.body
        }
    }
}

/// Middleware injecting the reload client into HTML responses.
///
/// Only `200 OK` responses without a `Content-Encoding` are rewritten;
/// partial content and compressed bodies can't be spliced safely.
pub async fn inject_reload_middleware(request: Request, next: Next) -> Response {
    let is_head = request.method() == Method::HEAD;
    let response = next.run(request).await;

    if response.status() != StatusCode::OK
        || response.headers().contains_key(header::CONTENT_ENCODING)
        || !is_html_content_type(response.headers().get(header::CONTENT_TYPE))
    {
        return response;
    }

    let (mut parts, body) = response.into_parts();

    // HEAD carries the GET's length but no body to rewrite
    if is_head {
        if let Some(length) = content_length(&parts.headers) {
            parts.headers.insert(
                header::CONTENT_LENGTH,
                HeaderValue::from(length + RELOAD_SCRIPT.len()),
            );
            return Response::from_parts(parts, body);
        }
    }

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read HTML response body: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read response body")
                .into_response();
        }
    };

    let pending = PendingResponse::new(bytes, &parts.headers);
    let length = pending.content_length();
    trace!("Injecting reload script (+{} bytes)", pending.length_delta());

    parts
        .headers
        .insert(header::CONTENT_LENGTH, HeaderValue::from(length));

    let body = if is_head {
        Body::empty()
    } else {
        Body::from(pending.into_body())
    };
    Response::from_parts(parts, body)
}

fn content_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}
