// handlers/public/mod.rs - Public handlers (no session required)
//
// Registration is the only way to obtain a session cookie, so it lives here
// alongside the service endpoints.

pub mod service;
pub mod users;

pub use service::{health, root};
pub use users::register_post;
