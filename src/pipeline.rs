//! Query processing pipeline.
//!
//! One request/response cycle: detect language, build the advisor prompt,
//! call the AI gateway, categorize, persist. A gateway failure is terminal
//! and persists nothing; there are no retries.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::ai::AnswerProvider;
use crate::category;
use crate::error::{AiError, Result};
use crate::language;
use crate::model::{Modality, NewQuery, QueryRecord, User};
use crate::prompt;
use crate::storage::Storage;

/// A question submitted for AI processing.
#[derive(Debug, Clone)]
pub struct AiQuestion {
    pub question: String,
    pub modality: Modality,
    pub image_url: Option<String>,
}

/// Orchestrates the question/answer cycle over injected collaborators.
pub struct QueryPipeline {
    storage: Arc<dyn Storage>,
    provider: Arc<dyn AnswerProvider>,
    /// Bounds concurrent outbound gateway calls.
    ai_permits: Arc<Semaphore>,
}

impl QueryPipeline {
    /// Create a pipeline. `max_concurrent_requests` bounds simultaneous
    /// gateway calls; requests past the bound wait for a permit.
    pub fn new(
        storage: Arc<dyn Storage>,
        provider: Arc<dyn AnswerProvider>,
        max_concurrent_requests: usize,
    ) -> Self {
        Self {
            storage,
            provider,
            ai_permits: Arc::new(Semaphore::new(max_concurrent_requests)),
        }
    }

    /// Run one question through the full cycle and return the persisted
    /// record.
    pub async fn process(&self, user: &User, request: AiQuestion) -> Result<QueryRecord> {
        let language = language::detect(&request.question);
        debug!(
            user_id = %user.id,
            language = language.as_str(),
            modality = ?request.modality,
            "processing farmer question"
        );

        let system_prompt = prompt::system_prompt(
            language,
            user.location.as_deref(),
            user.crops.as_deref(),
        );

        let answer = {
            let _permit = self
                .ai_permits
                .acquire()
                .await
                .map_err(|_| AiError::Unavailable("gateway limiter closed".to_string()))?;
            self.provider
                .answer(&system_prompt, &request.question)
                .await?
        };

        let category = category::categorize(&request.question);

        let record = self
            .storage
            .create_query(NewQuery {
                user_id: user.id.clone(),
                question: request.question,
                answer: Some(answer),
                language,
                modality: request.modality,
                category: Some(category),
                image_url: request.image_url,
                rating: None,
            })
            .await?;

        info!(
            query_id = %record.id,
            category = category.as_str(),
            "farmer question answered"
        );
        Ok(record)
    }
}
