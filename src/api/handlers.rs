//! REST API request handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::ai::AnswerProvider;
use crate::auth::{AuthContext, Authenticator};
use crate::error::{KrishiError, StorageError};
use crate::model::{
    Category, Language, Modality, NewQuery, NewUser, QueryUpdate, UserProfile, UserUpdate,
};
use crate::pipeline::{AiQuestion, QueryPipeline};
use crate::storage::Storage;

/// Application state shared across handlers.
pub struct ApiState {
    pub storage: Arc<dyn Storage>,
    pub pipeline: QueryPipeline,
    pub authenticator: Arc<Authenticator>,
}

impl ApiState {
    /// Create new API state, wiring the pipeline over the given
    /// collaborators.
    pub fn new(
        storage: Arc<dyn Storage>,
        provider: Arc<dyn AnswerProvider>,
        authenticator: Arc<Authenticator>,
        max_concurrent_ai_requests: usize,
    ) -> Self {
        Self {
            pipeline: QueryPipeline::new(storage.clone(), provider, max_concurrent_ai_requests),
            storage,
            authenticator,
        }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Account registration request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub crops: Option<String>,
    #[serde(default)]
    pub preferred_language: Option<Language>,
}

/// Login request.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Session issued at register/login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Logout response.
#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// AI question submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiQueryRequest {
    pub question: Option<String>,
    #[serde(rename = "type")]
    pub modality: Option<Modality>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Raw query creation (no AI call).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQueryRequest {
    pub question: Option<String>,
    #[serde(rename = "type")]
    pub modality: Option<Modality>,
    pub language: Option<Language>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

fn error_response(status: StatusCode, error: &str, code: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            code: code.to_string(),
        }),
    )
        .into_response()
}

fn unauthenticated() -> Response {
    error_response(
        StatusCode::UNAUTHORIZED,
        "Authentication required",
        "unauthenticated",
    )
}

// ============================================================================
// Account Handlers
// ============================================================================

/// POST /api/register - Create an account and start a session.
pub async fn register_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<RegisterRequest>,
) -> Response {
    let (Some(username), Some(password), Some(name)) =
        (request.username, request.password, request.name)
    else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Username, password and name are required",
            "invalid_request",
        );
    };

    if username.trim().is_empty() || password.is_empty() || name.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Username, password and name are required",
            "invalid_request",
        );
    }

    let new_user = NewUser {
        username,
        password: Authenticator::hash_password(&password),
        name,
        mobile: request.mobile,
        email: request.email,
        location: request.location,
        crops: request.crops,
        preferred_language: request.preferred_language,
    };

    match state.storage.create_user(new_user).await {
        Ok(user) => {
            let token = state.authenticator.issue_token(&user.id);
            tracing::info!(user_id = %user.id, "account registered");
            (
                StatusCode::CREATED,
                Json(AuthResponse {
                    token,
                    user: UserProfile::from(&user),
                }),
            )
                .into_response()
        }
        Err(KrishiError::Storage(StorageError::UsernameTaken(_))) => error_response(
            StatusCode::CONFLICT,
            "Username already taken",
            "username_taken",
        ),
        Err(e) => {
            tracing::error!(error = %e, "Error registering account");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to register",
                "register_failed",
            )
        }
    }
}

/// POST /api/login - Verify credentials and start a session.
pub async fn login_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<LoginRequest>,
) -> Response {
    let (Some(username), Some(password)) = (request.username, request.password) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Username and password are required",
            "invalid_request",
        );
    };

    match state.storage.user_by_username(&username).await {
        Ok(Some(user)) if Authenticator::verify_password(&password, &user.password) => {
            let token = state.authenticator.issue_token(&user.id);
            (
                StatusCode::OK,
                Json(AuthResponse {
                    token,
                    user: UserProfile::from(&user),
                }),
            )
                .into_response()
        }
        Ok(_) => error_response(
            StatusCode::UNAUTHORIZED,
            "Invalid username or password",
            "invalid_credentials",
        ),
        Err(e) => {
            tracing::error!(error = %e, "Error logging in");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to log in",
                "login_failed",
            )
        }
    }
}

/// POST /api/logout - Revoke the presented session token.
pub async fn logout_handler(
    State(state): State<Arc<ApiState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Response {
    if ctx.anonymous {
        return unauthenticated();
    }

    if let Some(token) = ctx.token {
        state.authenticator.revoke(&token);
    }
    (StatusCode::OK, Json(LogoutResponse { success: true })).into_response()
}

/// GET /api/user - Current sanitized profile.
pub async fn current_user_handler(
    State(state): State<Arc<ApiState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Response {
    let Some(user_id) = ctx.user_id else {
        return unauthenticated();
    };

    match state.storage.user(&user_id).await {
        Ok(Some(user)) => (StatusCode::OK, Json(UserProfile::from(&user))).into_response(),
        Ok(None) => unauthenticated(),
        Err(e) => {
            tracing::error!(error = %e, "Error fetching user");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch user",
                "fetch_failed",
            )
        }
    }
}

/// PATCH /api/user/profile - Whitelisted profile update.
pub async fn update_profile_handler(
    State(state): State<Arc<ApiState>>,
    Extension(ctx): Extension<AuthContext>,
    Json(update): Json<UserUpdate>,
) -> Response {
    let Some(user_id) = ctx.user_id else {
        return unauthenticated();
    };

    match state.storage.update_user(&user_id, update).await {
        Ok(Some(user)) => (StatusCode::OK, Json(UserProfile::from(&user))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "User not found", "not_found"),
        Err(e) => {
            tracing::error!(error = %e, "Error updating profile");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update profile",
                "update_failed",
            )
        }
    }
}

// ============================================================================
// Advisory Handlers
// ============================================================================

/// GET /api/advisories - List advisory content, newest first.
pub async fn list_advisories_handler(State(state): State<Arc<ApiState>>) -> Response {
    match state.storage.advisories().await {
        Ok(advisories) => (StatusCode::OK, Json(advisories)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Error fetching advisories");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch advisories",
                "fetch_failed",
            )
        }
    }
}

/// GET /api/advisories/:id - Get one advisory.
pub async fn get_advisory_handler(
    State(state): State<Arc<ApiState>>,
    Path(advisory_id): Path<String>,
) -> Response {
    match state.storage.advisory(&advisory_id).await {
        Ok(Some(advisory)) => (StatusCode::OK, Json(advisory)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Advisory not found", "not_found"),
        Err(e) => {
            tracing::error!(error = %e, "Error fetching advisory");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch advisory",
                "fetch_failed",
            )
        }
    }
}

// ============================================================================
// Query Handlers
// ============================================================================

/// GET /api/queries - The caller's queries, newest first.
pub async fn list_queries_handler(
    State(state): State<Arc<ApiState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Response {
    let Some(user_id) = ctx.user_id else {
        return unauthenticated();
    };

    match state.storage.queries_by_user(&user_id).await {
        Ok(queries) => (StatusCode::OK, Json(queries)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Error fetching queries");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch queries",
                "fetch_failed",
            )
        }
    }
}

/// POST /api/queries - Create a raw query record (no AI call).
pub async fn create_query_handler(
    State(state): State<Arc<ApiState>>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<CreateQueryRequest>,
) -> Response {
    let Some(user_id) = ctx.user_id else {
        return unauthenticated();
    };

    let (Some(question), Some(modality), Some(language)) =
        (request.question, request.modality, request.language)
    else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Invalid query data",
            "invalid_request",
        );
    };

    let new_query = NewQuery {
        user_id,
        question,
        answer: request.answer,
        language,
        modality,
        category: request.category,
        image_url: request.image_url,
        rating: None,
    };

    match state.storage.create_query(new_query).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Error creating query");
            error_response(
                StatusCode::BAD_REQUEST,
                "Invalid query data",
                "invalid_request",
            )
        }
    }
}

/// POST /api/queries/ai - Run the full question/answer pipeline.
pub async fn ai_query_handler(
    State(state): State<Arc<ApiState>>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<AiQueryRequest>,
) -> Response {
    let Some(user_id) = ctx.user_id else {
        return unauthenticated();
    };

    let user = match state.storage.user(&user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return unauthenticated(),
        Err(e) => {
            tracing::error!(error = %e, "Error fetching user");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process query",
                "process_failed",
            );
        }
    };

    let (Some(question), Some(modality)) = (request.question, request.modality) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Question and type are required",
            "invalid_request",
        );
    };

    if question.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Question and type are required",
            "invalid_request",
        );
    }

    let ai_question = AiQuestion {
        question,
        modality,
        image_url: request.image_url,
    };

    match state.pipeline.process(&user, ai_question).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(KrishiError::Ai(e)) => {
            tracing::error!(error = %e, "AI gateway failure");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to get AI response",
                "ai_failed",
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "Error processing AI query");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process query",
                "process_failed",
            )
        }
    }
}

/// PATCH /api/queries/:id - Owner-only rating update.
pub async fn rate_query_handler(
    State(state): State<Arc<ApiState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(query_id): Path<String>,
    Json(update): Json<QueryUpdate>,
) -> Response {
    let Some(user_id) = ctx.user_id else {
        return unauthenticated();
    };

    // Ownership check first; a foreign query is indistinguishable from an
    // absent one.
    match state.storage.query(&query_id).await {
        Ok(Some(query)) if query.user_id == user_id => {}
        Ok(_) => return error_response(StatusCode::NOT_FOUND, "Query not found", "not_found"),
        Err(e) => {
            tracing::error!(error = %e, "Error fetching query");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update query",
                "update_failed",
            );
        }
    }

    match state.storage.update_query(&query_id, update).await {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Query not found", "not_found"),
        Err(e) => {
            tracing::error!(error = %e, "Error updating query");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update query",
                "update_failed",
            )
        }
    }
}
