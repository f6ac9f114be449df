//! CORS passthrough
//!
//! Requests under the proxy prefix are forwarded to the URL named by their
//! `apiurl` query parameter. The permissive CORS layer around the app adds
//! the CORS headers; this module only relays the request and the reply.

use axum::{
    body,
    extract::{Query, Request},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ApiError;

pub const ALLOWED_METHODS: &str = "GET, HEAD, POST, OPTIONS";

/// Largest request body relayed upstream
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct ProxyQuery {
    apiurl: Option<String>,
}

/// Route a proxy-path request by method
pub async fn dispatch(client: &reqwest::Client, request: Request) -> Response {
    match *request.method() {
        Method::OPTIONS => handle_options(),
        Method::GET | Method::HEAD | Method::POST => match handle_request(client, request).await {
            Ok(response) => response,
            Err(e) => e.into_response(),
        },
        _ => ApiError::MethodNotAllowed {
            allow: ALLOWED_METHODS,
        }
        .into_response(),
    }
}

/// Answer a plain OPTIONS request
pub fn handle_options() -> Response {
    (StatusCode::OK, [(header::ALLOW, ALLOWED_METHODS)]).into_response()
}

/// Forward the request to `apiurl` and relay status, body and content type
pub async fn handle_request(
    client: &reqwest::Client,
    request: Request,
) -> Result<Response, ApiError> {
    let Query(query) = Query::<ProxyQuery>::try_from_uri(request.uri())
        .map_err(|e| ApiError::BadQuery(e.body_text()))?;
    let api_url = query
        .apiurl
        .filter(|url| !url.trim().is_empty())
        .ok_or(ApiError::MissingParameter("apiurl"))?;
    let target = parse_target(&api_url)?;

    let (parts, body) = request.into_parts();
    let body = body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiError::Body(e.to_string()))?;

    info!("Proxying {} {}", parts.method, target);

    let mut upstream_request = client.request(parts.method.clone(), target);
    if let Some(content_type) = parts.headers.get(header::CONTENT_TYPE) {
        upstream_request = upstream_request.header(header::CONTENT_TYPE, content_type.clone());
    }
    if !body.is_empty() {
        upstream_request = upstream_request.body(body);
    }

    let upstream = upstream_request.send().await?;
    let status = upstream.status();
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();
    let bytes = upstream.bytes().await?;
    debug!("Upstream answered {} with {} bytes", status, bytes.len());

    let mut response = (status, bytes).into_response();
    if let Some(content_type) = content_type {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
    }
    Ok(response)
}

fn parse_target(api_url: &str) -> Result<Url, ApiError> {
    let invalid = |reason: String| ApiError::InvalidUrl {
        url: api_url.to_string(),
        reason,
    };
    let url = Url::parse(api_url.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}
