//! Domain layer - Core business entities and logic
//!
//! Contains the identity record, the password value object, and the access
//! policy table, independent of storage and transport concerns.

pub mod identity;
pub mod password;
pub mod policy;

pub use identity::{IdentityView, ProfileUpdate, RegistrationRequest, UserIdentity};
pub use password::Password;
pub use policy::{authorize, Action, Viewer};
