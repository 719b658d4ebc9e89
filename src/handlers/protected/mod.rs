// handlers/protected/mod.rs - Protected handlers (session cookie required)
//
// Routes here are wrapped in `require_auth`; each handler also takes
// `AuthAdmin` so it cannot be mounted without a session check.

pub mod articles;
pub mod auth;
pub mod cv;
pub mod job_history;
pub mod projects;
