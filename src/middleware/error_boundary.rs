use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use std::any::Any;

use crate::error::{ApiError, ErrorEnvelope};
use crate::state::AppState;

/// Outermost layer: logs every failure by correlation id and, in development
/// only, re-renders internal failures with their cause.
pub async fn error_boundary(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    let Some(envelope) = response.extensions().get::<ErrorEnvelope>().cloned() else {
        return response;
    };

    if response.status().is_server_error() {
        tracing::error!(
            error_id = %envelope.id,
            %method,
            %path,
            status = envelope.status,
            cause = envelope.internal_detail.as_deref().unwrap_or("-"),
            "request failed"
        );
    } else {
        tracing::warn!(
            error_id = %envelope.id,
            %method,
            %path,
            status = envelope.status,
            kind = %envelope.kind,
            "request rejected"
        );
    }

    if state.config.is_development() && envelope.internal_detail.is_some() {
        let (mut parts, _) = response.into_parts();
        let detailed = envelope.with_internal_detail();
        parts.headers.remove(axum::http::header::CONTENT_LENGTH);
        let mut rebuilt = (parts.status, parts.headers, Json(&detailed)).into_response();
        rebuilt.extensions_mut().insert(detailed);
        return rebuilt;
    }

    response
}

/// Panic handler for `CatchPanicLayer`; the payload never reaches the client.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let cause = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::internal(format!("handler panicked: {}", cause)).into_response()
}
