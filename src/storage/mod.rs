//! Record storage.
//!
//! The trait is the contract callers depend on; `MemoryStorage` is the
//! only backend in the current deployment, and a durable engine can be
//! swapped in behind the same operations.

mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{
    Advisory, NewAdvisory, NewQuery, NewUser, QueryRecord, QueryUpdate, User, UserUpdate,
};

pub use memory::MemoryStorage;

/// Trait for record storage backends.
///
/// Create operations assign a fresh identifier and the current timestamp.
/// Lookups of absent ids return `Ok(None)`. List operations are ordered
/// newest first.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Create a user. Fails if the username is already taken.
    async fn create_user(&self, user: NewUser) -> Result<User>;

    /// Get a user by id.
    async fn user(&self, id: &str) -> Result<Option<User>>;

    /// Get a user by login name.
    async fn user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Merge profile updates onto a user.
    async fn update_user(&self, id: &str, update: UserUpdate) -> Result<Option<User>>;

    /// Create a query record.
    async fn create_query(&self, query: NewQuery) -> Result<QueryRecord>;

    /// Get a query by id.
    async fn query(&self, id: &str) -> Result<Option<QueryRecord>>;

    /// All queries owned by a user, newest first.
    async fn queries_by_user(&self, user_id: &str) -> Result<Vec<QueryRecord>>;

    /// Merge updates onto a query.
    async fn update_query(&self, id: &str, update: QueryUpdate) -> Result<Option<QueryRecord>>;

    /// Create an advisory.
    async fn create_advisory(&self, advisory: NewAdvisory) -> Result<Advisory>;

    /// Get an advisory by id.
    async fn advisory(&self, id: &str) -> Result<Option<Advisory>>;

    /// All advisories, newest first.
    async fn advisories(&self) -> Result<Vec<Advisory>>;
}
