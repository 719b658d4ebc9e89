pub mod auth;
pub mod error_boundary;
pub mod extract;
pub mod rate_limit;

pub use auth::{authenticate, require_auth, AuthAdmin};
pub use error_boundary::{error_boundary, panic_response};
pub use extract::{ApiJson, ApiPath};
pub use rate_limit::{enforce_rate_limit, FixedWindowLimiter};
