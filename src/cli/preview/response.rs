//! HTTP response handlers.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Request, Response, StatusCode};
use tokio::sync::mpsc;

use crate::actor::messages::HubMsg;
use crate::hub::SseSubscriber;
use crate::page::{self, PreviewTarget};
use crate::utils::mime::types::{HTML, PLAIN};

/// Render the tracked document (`GET /` and `HEAD /`).
pub fn respond_page(request: Request, target: &PreviewTarget) -> Result<()> {
    let page = page::render_page(target);
    if page.status != 200 {
        crate::debug!("preview"; "{} {}", page.status, request.url());
    }

    if is_head_request(&request) {
        return send_head(request, page.status, HTML);
    }
    send_body(request, page.status, HTML, page.body.into_bytes())
}

/// Hand the connection to the hub as an event stream (`GET /events`).
///
/// The response never completes; the hub writes frames until the client
/// goes away or the server shuts down.
pub fn respond_events(request: Request, hub_tx: &mpsc::Sender<HubMsg>) -> Result<()> {
    let writer = request.into_writer();
    let subscriber = SseSubscriber::open(writer).context("failed to open event stream")?;
    hub_tx
        .blocking_send(HubMsg::Subscribe(Box::new(subscriber)))
        .map_err(|_| anyhow::anyhow!("notification hub is not running"))
}

/// Serve a file from the tutorial directory.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = crate::utils::mime::from_path(path);

    if is_head_request(&request) {
        return send_head(request, 200, content_type);
    }

    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    send_body(request, 200, content_type, body)
}

/// Plain 404 for anything that is neither a route nor a file.
pub fn respond_not_found(request: Request) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 404, PLAIN);
    }
    send_body(request, 404, PLAIN, b"404 Not Found".to_vec())
}

/// Respond with 405 for methods other than GET/HEAD.
pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    let response = Response::from_data(b"405 Method Not Allowed".to_vec())
        .with_status_code(StatusCode(405))
        .with_header(make_header("Content-Type", PLAIN))
        .with_header(make_header("Allow", "GET, HEAD"));
    request.respond(response)?;
    Ok(())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

pub fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

pub fn is_get_or_head(request: &Request) -> bool {
    matches!(request.method(), Method::Get | Method::Head)
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<()> {
    let response = Response::empty(StatusCode(status))
        .with_header(make_header("Content-Type", content_type))
        .with_header(make_header("Cache-Control", "no-cache"));
    request.respond(response)?;
    Ok(())
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type))
        .with_header(make_header("Cache-Control", "no-cache"));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    // static ASCII; from_bytes only fails on non-ASCII input
    Header::from_bytes(key, value).unwrap()
}
