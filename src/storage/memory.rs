//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::Storage;
use crate::error::{Result, StorageError};
use crate::model::{
    Advisory, Language, NewAdvisory, NewQuery, NewUser, QueryRecord, QueryUpdate, User, UserUpdate,
};

/// In-memory storage for single-process deployments and tests.
///
/// Plain map lookups guarded by reader-writer locks; concurrent updates to
/// the same record are last-writer-wins.
pub struct MemoryStorage {
    users: RwLock<HashMap<String, User>>,
    queries: RwLock<HashMap<String, QueryRecord>>,
    advisories: RwLock<HashMap<String, Advisory>>,
}

impl MemoryStorage {
    /// Create a new in-memory store with seeded advisory content.
    pub fn new() -> Self {
        let storage = Self {
            users: RwLock::new(HashMap::new()),
            queries: RwLock::new(HashMap::new()),
            advisories: RwLock::new(HashMap::new()),
        };
        storage.seed_advisories();
        storage
    }

    /// Create an empty store without seed content.
    pub fn empty() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            queries: RwLock::new(HashMap::new()),
            advisories: RwLock::new(HashMap::new()),
        }
    }

    fn seed_advisories(&self) {
        let seeds = vec![
            NewAdvisory {
                title: "Best practices for rice cultivation in monsoon".to_string(),
                title_malayalam: Some("മഴക്കാലത്ത് നെല്ലുകൃഷിയുടെ മികച്ച രീതികൾ".to_string()),
                description: "Essential techniques for successful rice farming during Kerala monsoon season".to_string(),
                content: "During monsoon season, proper water management is crucial for rice cultivation. Ensure proper drainage systems and monitor water levels regularly...".to_string(),
                category: "crops".to_string(),
                language: Language::Malayalam,
                tags: vec!["rice".to_string(), "monsoon".to_string(), "kerala".to_string(), "cultivation".to_string()],
                views: 1250,
                trending: true,
            },
            NewAdvisory {
                title: "Common coconut palm diseases and treatment".to_string(),
                title_malayalam: Some("തെങ്ങിന്റെ സാധാരണ രോഗങ്ങളും ചികിത്സയും".to_string()),
                description: "Identify and treat major coconut palm diseases affecting Kerala farms".to_string(),
                content: "Coconut palm diseases like Root Wilt and Leaf Rot can severely impact yields. Early identification and proper treatment methods...".to_string(),
                category: "pests".to_string(),
                language: Language::Malayalam,
                tags: vec!["coconut".to_string(), "diseases".to_string(), "treatment".to_string(), "kerala".to_string()],
                views: 890,
                trending: true,
            },
            NewAdvisory {
                title: "Organic fertilizer preparation at home".to_string(),
                title_malayalam: Some("വീട്ടിൽ ജൈവ വളം തയ്യാറാക്കുന്ന രീതി".to_string()),
                description: "Step-by-step guide to prepare organic compost using kitchen waste".to_string(),
                content: "Creating organic fertilizer at home is cost-effective and environmentally friendly. Use kitchen scraps, dry leaves, and proper composting techniques...".to_string(),
                category: "fertilizer".to_string(),
                language: Language::Malayalam,
                tags: vec!["organic".to_string(), "fertilizer".to_string(), "compost".to_string(), "homemade".to_string()],
                views: 567,
                trending: false,
            },
        ];

        let mut advisories = self.advisories.write().unwrap();
        for seed in seeds {
            let advisory = Advisory {
                id: Uuid::new_v4().to_string(),
                title: seed.title,
                title_malayalam: seed.title_malayalam,
                description: seed.description,
                content: seed.content,
                category: seed.category,
                language: seed.language,
                tags: seed.tags,
                views: seed.views,
                trending: seed.trending,
                created_at: Utc::now(),
            };
            advisories.insert(advisory.id.clone(), advisory);
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        let mut users = self.users.write().unwrap();

        if users.values().any(|u| u.username == new_user.username) {
            return Err(StorageError::UsernameTaken(new_user.username).into());
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: new_user.username,
            password: new_user.password,
            name: new_user.name,
            mobile: new_user.mobile,
            email: new_user.email,
            location: new_user.location,
            crops: new_user.crops,
            preferred_language: new_user.preferred_language.unwrap_or_default(),
            created_at: Utc::now(),
        };
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn user(&self, id: &str) -> Result<Option<User>> {
        let users = self.users.read().unwrap();
        Ok(users.get(id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn update_user(&self, id: &str, update: UserUpdate) -> Result<Option<User>> {
        let mut users = self.users.write().unwrap();

        let Some(user) = users.get_mut(id) else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = Some(email);
        }
        if let Some(mobile) = update.mobile {
            user.mobile = Some(mobile);
        }
        if let Some(location) = update.location {
            user.location = Some(location);
        }
        if let Some(crops) = update.crops {
            user.crops = Some(crops);
        }
        if let Some(preferred_language) = update.preferred_language {
            user.preferred_language = preferred_language;
        }

        Ok(Some(user.clone()))
    }

    async fn create_query(&self, new_query: NewQuery) -> Result<QueryRecord> {
        let query = QueryRecord {
            id: Uuid::new_v4().to_string(),
            user_id: new_query.user_id,
            question: new_query.question,
            answer: new_query.answer,
            language: new_query.language,
            modality: new_query.modality,
            category: new_query.category,
            image_url: new_query.image_url,
            rating: new_query.rating,
            created_at: Utc::now(),
        };

        let mut queries = self.queries.write().unwrap();
        queries.insert(query.id.clone(), query.clone());
        Ok(query)
    }

    async fn query(&self, id: &str) -> Result<Option<QueryRecord>> {
        let queries = self.queries.read().unwrap();
        Ok(queries.get(id).cloned())
    }

    async fn queries_by_user(&self, user_id: &str) -> Result<Vec<QueryRecord>> {
        let queries = self.queries.read().unwrap();
        let mut owned: Vec<QueryRecord> = queries
            .values()
            .filter(|q| q.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn update_query(&self, id: &str, update: QueryUpdate) -> Result<Option<QueryRecord>> {
        let mut queries = self.queries.write().unwrap();

        let Some(query) = queries.get_mut(id) else {
            return Ok(None);
        };

        if let Some(rating) = update.rating {
            query.rating = Some(rating);
        }

        Ok(Some(query.clone()))
    }

    async fn create_advisory(&self, new_advisory: NewAdvisory) -> Result<Advisory> {
        let advisory = Advisory {
            id: Uuid::new_v4().to_string(),
            title: new_advisory.title,
            title_malayalam: new_advisory.title_malayalam,
            description: new_advisory.description,
            content: new_advisory.content,
            category: new_advisory.category,
            language: new_advisory.language,
            tags: new_advisory.tags,
            views: new_advisory.views,
            trending: new_advisory.trending,
            created_at: Utc::now(),
        };

        let mut advisories = self.advisories.write().unwrap();
        advisories.insert(advisory.id.clone(), advisory.clone());
        Ok(advisory)
    }

    async fn advisory(&self, id: &str) -> Result<Option<Advisory>> {
        let advisories = self.advisories.read().unwrap();
        Ok(advisories.get(id).cloned())
    }

    async fn advisories(&self) -> Result<Vec<Advisory>> {
        let advisories = self.advisories.read().unwrap();
        let mut all: Vec<Advisory> = advisories.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}
