// handlers/protected/auth/mod.rs - Session inspection and teardown

pub mod session; // POST /auth/logout - clear the session cookie
pub mod whoami;  // GET /auth/me - identity behind the session

pub use session::logout_post;
pub use whoami::me_get;
