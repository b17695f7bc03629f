//! Record types for users, queries, and advisory content.
//!
//! Wire names are camelCase to match the client API (`imageUrl`,
//! `preferredLanguage`); the query modality serializes as `type`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported advisory languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Default language for new accounts.
    #[default]
    Malayalam,
    Hindi,
    Tamil,
    English,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Malayalam => "malayalam",
            Language::Hindi => "hindi",
            Language::Tamil => "tamil",
            Language::English => "english",
        }
    }
}

/// Input channel of a query. Voice is transcribed client-side, image is a
/// reference only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Voice,
    Image,
}

/// Topical bucket assigned to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    PestDisease,
    Nutrition,
    Irrigation,
    Weather,
    Seeds,
    Harvest,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::PestDisease => "pest-disease",
            Category::Nutrition => "nutrition",
            Category::Irrigation => "irrigation",
            Category::Weather => "weather",
            Category::Seeds => "seeds",
            Category::Harvest => "harvest",
            Category::General => "general",
        }
    }
}

/// Farmer feedback on an answered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Helpful,
    NotHelpful,
}

/// A registered farmer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    /// SHA-256 hex digest of the password. Never exposed through the API.
    pub password: String,
    pub name: String,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    /// Free-text list of the farmer's main crops.
    pub crops: Option<String>,
    pub preferred_language: Language,
    pub created_at: DateTime<Utc>,
}

/// Client-facing view of a user, without the credential digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub name: String,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub crops: Option<String>,
    pub preferred_language: Language,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
            mobile: user.mobile.clone(),
            email: user.email.clone(),
            location: user.location.clone(),
            crops: user.crops.clone(),
            preferred_language: user.preferred_language,
            created_at: user.created_at,
        }
    }
}

/// Fields for creating a user. The password is already digested by the
/// time it reaches storage.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: String,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub crops: Option<String>,
    pub preferred_language: Option<Language>,
}

/// Profile fields a user may change. Supplied fields overwrite, absent
/// fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub location: Option<String>,
    pub crops: Option<String>,
    pub preferred_language: Option<Language>,
}

/// One question/answer exchange between a farmer and the AI gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRecord {
    pub id: String,
    pub user_id: String,
    pub question: String,
    pub answer: Option<String>,
    pub language: Language,
    #[serde(rename = "type")]
    pub modality: Modality,
    pub category: Option<Category>,
    pub image_url: Option<String>,
    pub rating: Option<Rating>,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a query record.
#[derive(Debug, Clone)]
pub struct NewQuery {
    pub user_id: String,
    pub question: String,
    pub answer: Option<String>,
    pub language: Language,
    pub modality: Modality,
    pub category: Option<Category>,
    pub image_url: Option<String>,
    pub rating: Option<Rating>,
}

/// Mutable fields of a stored query. Rating overwrites idempotently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryUpdate {
    pub rating: Option<Rating>,
}

/// A published farming tip shown in the advisory feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    pub id: String,
    pub title: String,
    pub title_malayalam: Option<String>,
    pub description: String,
    pub content: String,
    pub category: String,
    pub language: Language,
    pub tags: Vec<String>,
    pub views: u64,
    pub trending: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating an advisory.
#[derive(Debug, Clone, Default)]
pub struct NewAdvisory {
    pub title: String,
    pub title_malayalam: Option<String>,
    pub description: String,
    pub content: String,
    pub category: String,
    pub language: Language,
    pub tags: Vec<String>,
    pub views: u64,
    pub trending: bool,
}
