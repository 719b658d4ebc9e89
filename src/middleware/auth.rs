use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::session_token;
use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated administrator, resolved from the session cookie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthAdmin {
    pub email: String,
}

/// Resolves the identity carried by the request's session cookie.
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthAdmin, ApiError> {
    let token = session_token(headers).ok_or_else(|| ApiError::unauthorized("Authentication required."))?;
    let email = state.tokens.identity(&token)?;
    Ok(AuthAdmin { email })
}

/// Gate for wholly protected routers; rejects with 401 before the handler runs.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let admin = authenticate(&state, request.headers())?;
    tracing::debug!(admin = %admin.email, "request authenticated");
    request.extensions_mut().insert(admin);
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already resolved by `require_auth`
        if let Some(admin) = parts.extensions.get::<AuthAdmin>() {
            return Ok(admin.clone());
        }

        let state = AppState::from_ref(state);
        authenticate(&state, &parts.headers)
    }
}
