// handlers/public/auth/mod.rs - Session acquisition

pub mod login; // POST /auth/login - verify credentials, set session cookie

pub use login::{login_post, LoginRequest};
