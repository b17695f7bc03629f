//! Server configuration.

mod settings;

pub use settings::{AiConfig, AuthConfig, Config, ServerConfig};
