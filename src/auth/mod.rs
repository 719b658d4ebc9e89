//! Credential verification, session tokens and their cookie transport.

pub mod cookie;
pub mod password;
pub mod token;

pub use cookie::{clear_session_cookie, session_cookie, session_token, SESSION_COOKIE};
pub use password::{PasswordError, PasswordHasher};
pub use token::{Claims, IssuedToken, TokenError, TokenService};
