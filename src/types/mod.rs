//! Shared types used across services.

pub mod pagination;

pub use pagination::{Page, PageMeta, PaginationParams};
