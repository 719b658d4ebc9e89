use axum::http::{header, HeaderMap, HeaderValue};
use chrono::{DateTime, Utc};

use super::token::IssuedToken;

/// Cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "auth_token";

const COOKIE_FLAGS: &str = "HttpOnly; Secure; SameSite=Strict; Path=/";

fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// `Set-Cookie` value handing a freshly issued token to the client.
pub fn session_cookie(issued: &IssuedToken) -> HeaderValue {
    let max_age = (issued.expires_at - Utc::now()).num_seconds().max(0);
    let value = format!(
        "{}={}; {}; Max-Age={}; Expires={}",
        SESSION_COOKIE,
        issued.token,
        COOKIE_FLAGS,
        max_age,
        http_date(issued.expires_at)
    );
    // JWTs are base64url segments joined by dots, always a valid header value.
    HeaderValue::from_str(&value).unwrap_or_else(|_| clear_session_cookie())
}

/// `Set-Cookie` value that makes the client discard the session.
pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static(
        "auth_token=; HttpOnly; Secure; SameSite=Strict; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
    )
}

/// Reads the session token from the `Cookie` header(s).
///
/// `Authorization` is never consulted.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}
