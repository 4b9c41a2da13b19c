//! Registration policy settings loaded from environment variables.

use std::env;

use super::constants::MIN_PASSWORD_LENGTH;

/// Tunable registration policy.
///
/// Deployments may raise the password floor above the built-in minimum;
/// lowering it below 8 characters is refused.
#[derive(Debug, Clone)]
pub struct Settings {
    pub min_password_length: u64,
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// `MIN_PASSWORD_LENGTH` may only raise the floor, never lower it.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let min_password_length = env::var("MIN_PASSWORD_LENGTH")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(|n| {
                if n < MIN_PASSWORD_LENGTH {
                    tracing::warn!(
                        "MIN_PASSWORD_LENGTH={} is below the floor of {}, ignoring",
                        n,
                        MIN_PASSWORD_LENGTH
                    );
                    MIN_PASSWORD_LENGTH
                } else {
                    n
                }
            })
            .unwrap_or(MIN_PASSWORD_LENGTH);

        Self {
            min_password_length,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_password_length: MIN_PASSWORD_LENGTH,
        }
    }
}
