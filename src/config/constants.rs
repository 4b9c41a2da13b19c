//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Registration validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Maximum length of a username
pub const MAX_USERNAME_LENGTH: u64 = 150;

/// Maximum length of a first or last name
pub const MAX_NAME_LENGTH: u64 = 30;

// =============================================================================
// Pagination
// =============================================================================

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;
