//! Authorization policy evaluation

pub mod entitlement;

pub use entitlement::{can_create, DenialReason, Entitlement, EntitlementService};
