//! Registration service - turns a registration request into a valid,
//! persistable identity.
//!
//! Validation order is part of the contract: the confirmation match runs
//! before anything else, then password length, then structural field checks,
//! then uniqueness. The uniqueness guarantee itself is delegated to the
//! storage layer; a commit-time unique violation (a lost race) is translated
//! into the same duplicate errors as the pre-check.

use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use crate::config::Settings;
use crate::domain::{Password, RegistrationRequest, UserIdentity};
use crate::errors::{IdentityError, IdentityResult};
use crate::infra::IdentityRepository;

/// Registration operations.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Validate a registration request and persist the new identity.
    async fn register(&self, request: RegistrationRequest) -> IdentityResult<UserIdentity>;

    /// Verify a username/password pair against the stored hash.
    ///
    /// Token issuance is the auth layer's concern; this only answers
    /// whether the credentials belong to an active identity.
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> IdentityResult<UserIdentity>;
}

/// Concrete registration validator backed by an explicit repository.
pub struct Registrar {
    repo: Arc<dyn IdentityRepository>,
    settings: Settings,
}

impl Registrar {
    pub fn new(repo: Arc<dyn IdentityRepository>, settings: Settings) -> Self {
        Self { repo, settings }
    }

    /// Map structural validation failures onto the error taxonomy.
    fn check_fields(request: &RegistrationRequest) -> IdentityResult<()> {
        if let Err(errors) = request.validate() {
            if errors.field_errors().contains_key("email") {
                return Err(IdentityError::InvalidEmailFormat);
            }
            return Err(IdentityError::validation(format_validation_errors(
                &errors,
            )));
        }
        Ok(())
    }
}

/// Format validation errors into a user-friendly string
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[async_trait]
impl RegistrationService for Registrar {
    async fn register(&self, request: RegistrationRequest) -> IdentityResult<UserIdentity> {
        // 1. Confirmation match, before any persistence attempt
        if request.password != request.password_confirm {
            return Err(IdentityError::PasswordMismatch);
        }

        // 2. Password length
        if (request.password.chars().count() as u64) < self.settings.min_password_length {
            return Err(IdentityError::PasswordTooShort(
                self.settings.min_password_length,
            ));
        }

        // 3. Structural field checks (email syntax, name lengths)
        Self::check_fields(&request)?;

        // 4. Uniqueness pre-check for deterministic errors. The store
        //    re-enforces this at commit time, so a concurrent duplicate
        //    still fails even if it slips past the pre-check.
        if self.repo.find_by_username(&request.username).await?.is_some() {
            return Err(IdentityError::DuplicateUsername);
        }
        if self.repo.find_by_email(&request.email).await?.is_some() {
            return Err(IdentityError::DuplicateEmail);
        }

        // 5. Hash and construct; password_confirm is dropped here and the
        //    plaintext never leaves this scope.
        let password_hash = Password::new(&request.password)?.into_string();
        let identity = UserIdentity::new(
            request.username,
            request.email,
            request.first_name,
            request.last_name,
            password_hash,
        );

        let created = self.repo.create(identity).await?;
        tracing::info!(username = %created.username, id = %created.id, "identity registered");
        Ok(created)
    }

    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> IdentityResult<UserIdentity> {
        let found = self.repo.find_by_username(username).await?;

        // Verify against a dummy hash when the username is unknown, so the
        // response time does not reveal which usernames exist.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";
        let stored = match &found {
            Some(identity) => Password::from_hash(identity.password_hash.clone()),
            None => Password::from_hash(dummy_hash.to_string()),
        };
        let password_valid = stored.verify(password);

        match found {
            Some(identity) if password_valid && identity.is_active => Ok(identity),
            _ => Err(IdentityError::InvalidCredentials),
        }
    }
}
