//! HTTP surface of the service.
//!
//! - `GET /health`: liveness probe, always `200`.
//! - `POST /bfhl`: single-key operation dispatch.
//!
//! The `/bfhl` body is taken as raw bytes rather than through axum's `Json`
//! extractor so that malformed JSON is still answered with the standard
//! envelope instead of axum's plain-text rejection. A body the `Bytes`
//! extractor itself rejects (over the 2 MB default limit, unreadable) is
//! answered with the same `Invalid JSON body` envelope.

use axum::{
    Router,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    routing::{get, post},
};
use bfhl_core::{Dispatcher, Error, Reply};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the application router around a shared [`Dispatcher`].
pub fn router(dispatcher: Dispatcher) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/bfhl", post(bfhl))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(dispatcher)
}

async fn health(State(dispatcher): State<Dispatcher>) -> Reply {
    dispatcher.health()
}

#[tracing::instrument(skip_all)]
async fn bfhl(
    State(dispatcher): State<Dispatcher>,
    body: Result<Bytes, BytesRejection>,
) -> Reply {
    let reply = match body {
        Ok(body) => dispatcher.handle(&body).await,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable request body");
            Reply::from_error(dispatcher.official_email(), &Error::MalformedBody)
        }
    };
    tracing::info!(status = reply.status.as_u16(), "handled request");
    reply
}
