use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, Request, State},
    http::{Method, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;
use wordbridge::{LanguageSet, OutputMap, RawQuery, parse_query};
use wordbridge_mt::ExpansionEngine;

use crate::error::ApiError;
use crate::proxy;

const TRANSLATE_METHODS: &str = "GET, HEAD, POST";

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ExpansionEngine>,
    pub languages: Arc<LanguageSet>,
    pub proxy_endpoint: Arc<str>,
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(engine: ExpansionEngine, languages: LanguageSet, proxy_endpoint: &str) -> Self {
        Self {
            engine: Arc::new(engine),
            languages: Arc::new(languages),
            proxy_endpoint: Arc::from(proxy_endpoint),
            client: reqwest::Client::new(),
        }
    }
}

/// Every path goes through [`dispatch`]; CORS and request tracing wrap the whole app
///
/// The CORS layer answers any OPTIONS request as a preflight, so plain OPTIONS
/// requests are routed around it.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn_with_state(state.clone(), plain_options))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A CORS preflight names the method it wants in `Access-Control-Request-Method`
fn is_preflight(request: &Request) -> bool {
    request.method() == Method::OPTIONS
        && request
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

async fn plain_options(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS && !is_preflight(&request) {
        route(&state, request).await
    } else {
        next.run(request).await
    }
}

async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    route(&state, request).await
}

async fn route(state: &AppState, request: Request) -> Response {
    if request.uri().path().starts_with(&*state.proxy_endpoint) {
        proxy::dispatch(&state.client, request).await
    } else {
        translate(state, request).await.into_response()
    }
}

async fn translate(state: &AppState, request: Request) -> Result<Json<OutputMap>, ApiError> {
    if !matches!(*request.method(), Method::GET | Method::HEAD | Method::POST) {
        return Err(ApiError::MethodNotAllowed {
            allow: TRANSLATE_METHODS,
        });
    }

    let Query(raw) = Query::<RawQuery>::try_from_uri(request.uri())
        .map_err(|e| ApiError::BadQuery(e.body_text()))?;
    let expansion = parse_query(&raw, &state.languages)?;
    debug!(
        "Validated request: {} word(s), source {}, {} target(s), {} synonym(s)",
        expansion.words.len(),
        expansion.source,
        expansion.targets.len(),
        expansion.synonym_count
    );

    let output = state.engine.expand(&expansion).await?;
    Ok(Json(output))
}
