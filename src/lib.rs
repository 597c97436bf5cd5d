//! CondoFlow Core - Access & Session Resolution
//!
//! This crate provides the access-control core for the CondoFlow condominium
//! management platform: resolving the hosted identity provider's session into
//! an application profile, normalizing historical role labels, guarding
//! routes, and gating creation actions on subscription-plan entitlements.

pub mod config;
pub mod domain;
pub mod error;
pub mod guard;
pub mod policy;
pub mod provider;
pub mod realtime;
pub mod resolver;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
