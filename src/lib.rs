//! identity-core - User identity and credential-registration validation.
//!
//! The domain core of a user-account system: the shape of an identity
//! record and the rules for turning a registration request into a valid,
//! persistable identity. Transport, token issuance, template rendering, and
//! the real system of record are external collaborators; this crate exposes
//! the operations they call into.
//!
//! # Architecture Layers
//!
//! - **config**: Policy constants and env-backed settings
//! - **domain**: Identity record, password value object, access policy
//! - **services**: Registration validator and identity use cases
//! - **infra**: Repository contract and the in-memory store
//! - **types**: Shared types (pagination)
//! - **errors**: Centralized error handling
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use identity_core::config::Settings;
//! use identity_core::domain::RegistrationRequest;
//! use identity_core::infra::MemoryIdentityStore;
//! use identity_core::services::{Registrar, RegistrationService};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let registrar = Registrar::new(Arc::new(MemoryIdentityStore::new()), Settings::default());
//!
//! let identity = registrar
//!     .register(RegistrationRequest {
//!         username: "alice".to_string(),
//!         email: "alice@example.com".to_string(),
//!         first_name: "Alice".to_string(),
//!         last_name: String::new(),
//!         password: "correct horse battery".to_string(),
//!         password_confirm: "correct horse battery".to_string(),
//!     })
//!     .await
//!     .unwrap();
//!
//! assert_eq!(identity.full_name(), "Alice");
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use config::Settings;
pub use domain::{IdentityView, Password, RegistrationRequest, UserIdentity, Viewer};
pub use errors::{IdentityError, IdentityResult};
pub use infra::{IdentityRepository, MemoryIdentityStore};
pub use services::{IdentityManager, IdentityService, Registrar, RegistrationService};
