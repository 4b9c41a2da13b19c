//! Service layer - application use cases over the domain.
//!
//! Services receive their repository explicitly; nothing here reaches for
//! ambient state.

pub mod identity_service;
pub mod registration;

pub use identity_service::{serialize_for_display, IdentityManager, IdentityService};
pub use registration::{Registrar, RegistrationService};
