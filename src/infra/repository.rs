//! Identity repository abstraction.
//!
//! The system of record is external to this crate; services receive a
//! repository explicitly rather than reaching for ambient state. The store
//! must enforce username/email uniqueness atomically at commit time and
//! surface violations distinguishably, so a concurrent duplicate
//! registration can never yield two successes.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::UserIdentity;
use crate::errors::IdentityError;

/// Field covered by a storage-level unique constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl std::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UniqueField::Username => write!(f, "username"),
            UniqueField::Email => write!(f, "email"),
        }
    }
}

/// Storage layer errors.
///
/// `UniqueViolation` is the commit-time outcome of a lost uniqueness race;
/// callers translate it into the validation taxonomy instead of leaking a
/// storage-specific error.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unique constraint violated on {0}")]
    UniqueViolation(UniqueField),

    #[error("record not found")]
    NotFound,

    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl From<StoreError> for IdentityError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(UniqueField::Username) => IdentityError::DuplicateUsername,
            StoreError::UniqueViolation(UniqueField::Email) => IdentityError::DuplicateEmail,
            StoreError::NotFound => IdentityError::NotFound,
            StoreError::Backend(_) => IdentityError::Store(err),
        }
    }
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Repository contract for identity records.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Find identity by id
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserIdentity>>;

    /// Find identity by exact username
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<UserIdentity>>;

    /// Find identity by exact email
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserIdentity>>;

    /// Persist a new identity.
    ///
    /// Must check-and-insert atomically: a username or email collision is
    /// reported as `UniqueViolation` even under concurrent creates.
    async fn create(&self, identity: UserIdentity) -> StoreResult<UserIdentity>;

    /// Persist changes to an existing identity
    async fn update(&self, identity: UserIdentity) -> StoreResult<UserIdentity>;

    /// List identities ordered by creation time
    async fn list(&self, offset: u64, limit: u64) -> StoreResult<Vec<UserIdentity>>;

    /// Count all identities
    async fn count(&self) -> StoreResult<u64>;
}
