// handlers/public/mod.rs - Public handlers (no session required)
//
// Read-only content endpoints sit behind the `public` rate limiter; login sits
// behind the `login` limiter.

pub mod articles;
pub mod auth;
pub mod cv;
pub mod job_history;
pub mod projects;
pub mod system;
