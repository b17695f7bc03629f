//! REST API.

pub mod handlers;
mod rest;

pub use handlers::ApiState;
pub use rest::create_router;
