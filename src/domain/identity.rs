//! User identity entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::config::{MAX_NAME_LENGTH, MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH};

/// A registered user's account record.
///
/// Plain data record: role and status flags are explicit fields, not
/// inherited behavior. `username` and `email` are unique population-wide;
/// enforcement lives in the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Set true by an external verification workflow
    pub is_verified: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserIdentity {
    /// Create a new identity with default flags.
    ///
    /// New identities start unverified, active, and unprivileged.
    pub fn new(
        username: String,
        email: String,
        first_name: String,
        last_name: String,
        password_hash: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            first_name,
            last_name,
            password_hash,
            is_verified: false,
            is_staff: false,
            is_superuser: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Derived full name: first and last joined by a single space, trimmed.
    /// Never stored independently.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Whether this identity counts as an administrator for access checks.
    pub fn is_admin(&self) -> bool {
        self.is_staff || self.is_superuser
    }

    /// Update the name fields
    pub fn update_name(&mut self, first_name: String, last_name: String) {
        self.first_name = first_name;
        self.last_name = last_name;
        self.touch();
    }

    /// Mark the identity as verified (called by the verification workflow)
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
        self.touch();
    }

    /// Update role flags (admin-only operation at the service layer)
    pub fn set_role_flags(&mut self, is_staff: bool, is_superuser: bool) {
        self.is_staff = is_staff;
        self.is_superuser = is_superuser;
        self.touch();
    }

    /// Deactivate the account; stands in for deletion, which is never hard.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.touch();
    }

    /// Reactivate a deactivated account
    pub fn reactivate(&mut self) {
        self.is_active = true;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Registration request data transfer object.
///
/// `password_confirm` exists only for the structural match check; it is
/// discarded before persistence and never logged.
#[derive(Clone, Deserialize, Validate)]
pub struct RegistrationRequest {
    #[validate(length(
        min = 1,
        max = MAX_USERNAME_LENGTH,
        message = "Username must be between 1 and 150 characters"
    ))]
    pub username: String,
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = MAX_NAME_LENGTH, message = "First name is too long"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = MAX_NAME_LENGTH, message = "Last name is too long"))]
    pub last_name: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password is too short"))]
    pub password: String,
    pub password_confirm: String,
}

// Don't expose credential material in debug output
impl std::fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &"[REDACTED]")
            .field("password_confirm", &"[REDACTED]")
            .finish()
    }
}

/// Profile update data transfer object
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(max = MAX_NAME_LENGTH, message = "First name is too long"))]
    pub first_name: Option<String>,
    #[validate(length(max = MAX_NAME_LENGTH, message = "Last name is too long"))]
    pub last_name: Option<String>,
}

/// Identity representation safe to return to a caller.
///
/// Never carries `password_hash` or `password_confirm`. The status block
/// (`is_staff`, `is_superuser`, `is_active`, `updated_at`) is present only
/// in the self-or-admin view.
#[derive(Debug, Clone, Serialize)]
pub struct IdentityView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Always computed, never settable
    pub full_name: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_staff: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl IdentityView {
    /// Public view: the fields any authenticated viewer may see.
    pub fn public(identity: &UserIdentity) -> Self {
        Self {
            id: identity.id,
            username: identity.username.clone(),
            email: identity.email.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            full_name: identity.full_name(),
            is_verified: identity.is_verified,
            created_at: identity.created_at,
            is_staff: None,
            is_superuser: None,
            is_active: None,
            updated_at: None,
        }
    }

    /// Privileged view for the identity's owner or an administrator.
    pub fn privileged(identity: &UserIdentity) -> Self {
        Self {
            is_staff: Some(identity.is_staff),
            is_superuser: Some(identity.is_superuser),
            is_active: Some(identity.is_active),
            updated_at: Some(identity.updated_at),
            ..Self::public(identity)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(first: &str, last: &str) -> UserIdentity {
        UserIdentity::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            first.to_string(),
            last.to_string(),
            "argon2-hash".to_string(),
        )
    }

    #[test]
    fn full_name_joins_and_trims() {
        assert_eq!(identity("Ana", "Gomez").full_name(), "Ana Gomez");
        assert_eq!(identity("Ana", "").full_name(), "Ana");
        assert_eq!(identity("", "Gomez").full_name(), "Gomez");
        assert_eq!(identity("", "").full_name(), "");
    }

    #[test]
    fn new_identity_has_default_flags() {
        let id = identity("Ana", "Gomez");
        assert!(!id.is_verified);
        assert!(!id.is_staff);
        assert!(!id.is_superuser);
        assert!(id.is_active);
        assert_eq!(id.created_at, id.updated_at);
    }

    #[test]
    fn mutators_refresh_updated_at() {
        let mut id = identity("Ana", "Gomez");
        let created = id.created_at;
        id.mark_verified();
        assert!(id.is_verified);
        assert!(id.updated_at >= created);
        assert_eq!(id.created_at, created);
    }

    #[test]
    fn admin_is_staff_or_superuser() {
        let mut id = identity("Ana", "Gomez");
        assert!(!id.is_admin());
        id.set_role_flags(true, false);
        assert!(id.is_admin());
        id.set_role_flags(false, true);
        assert!(id.is_admin());
    }

    #[test]
    fn debug_output_redacts_passwords() {
        let req = RegistrationRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            password: "hunter2hunter2".to_string(),
            password_confirm: "hunter2hunter2".to_string(),
        };
        let dump = format!("{:?}", req);
        assert!(!dump.contains("hunter2"));
        assert!(dump.contains("[REDACTED]"));
    }

    #[test]
    fn serialized_identity_never_contains_password_hash() {
        let id = identity("Ana", "Gomez");
        let json = serde_json::to_value(&id).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
