//! AI gateway: the external completion service boundary.

mod perplexity;

use async_trait::async_trait;

use crate::error::Result;

pub use perplexity::PerplexityClient;

/// An opaque, fallible answer source for farmer questions.
///
/// The pipeline depends on this trait; tests substitute stub providers.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Ask one question under the given system prompt and return the
    /// answer text.
    async fn answer(&self, system_prompt: &str, question: &str) -> Result<String>;
}
