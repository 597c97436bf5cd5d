//! Unified error handling for CondoFlow Core

use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
///
/// Authorization denials are never errors: route guards and the entitlement
/// gate return decision values. These variants cover the collaborator
/// boundaries (identity provider, profile store, billing) failing outright.
#[derive(Error, Debug)]
pub enum AppError {
    /// The profile lookup itself failed. Distinct from "row absent", which
    /// is `Ok(None)` at the store seam.
    #[error("Profile fetch failed: {0}")]
    ProfileFetch(String),

    /// Plan or resource-count lookup failed. Surfaced to the caller; the
    /// entitlement gate never converts this into "unlimited".
    #[error("Billing lookup failed: {0}")]
    Billing(String),

    #[error("Identity provider error: {0}")]
    Identity(String),

    #[error("Realtime channel error: {0}")]
    Realtime(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
