//! # Catalog Error Types
//!
//! Error types for collaborator lookups.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                │
//! │                                                                     │
//! │  Backend failure (owned by the persistence layer)                   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  CatalogError (this module) ← context for logs                      │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Resolution fails OPEN: the affected item keeps its full price      │
//! │  rather than risking an incorrect discount. Usage-recording         │
//! │  failures are logged for out-of-band retry and never abort an       │
//! │  already-charged order.                                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Collaborator lookup errors.
///
/// Implementations of the catalog traits map their backend failures onto
/// these variants; the resolution pipeline only ever logs them and degrades
/// to the safe default.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Entity not found where one was required.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A read or write against the backing store failed.
    #[error("Catalog query failed: {0}")]
    QueryFailed(String),

    /// The backing store is unreachable.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        CatalogError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

// =============================================================================
// Unit Tests
// =============================================================================
