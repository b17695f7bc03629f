//! Krishi: AI agricultural advisory server.
//!
//! A REST service for Kerala farmers: questions submitted as text, voice
//! transcripts, or image references are answered by an external completion
//! API under a localized advisor prompt, categorized by topic, and stored
//! alongside read-only advisory feed content.

pub mod ai;
pub mod api;
pub mod auth;
pub mod category;
pub mod config;
pub mod error;
pub mod language;
pub mod model;
pub mod pipeline;
pub mod prompt;
pub mod storage;

pub use ai::{AnswerProvider, PerplexityClient};
pub use api::{create_router, ApiState};
pub use auth::{AuthContext, Authenticator, AuthLayer};
pub use config::Config;
pub use error::{AiError, AuthError, ConfigError, KrishiError, Result, StorageError};
pub use model::{
    Advisory, Category, Language, Modality, NewQuery, NewUser, QueryRecord, Rating, User,
    UserProfile,
};
pub use pipeline::{AiQuestion, QueryPipeline};
pub use storage::{MemoryStorage, Storage};
