//! Domain models for CondoFlow Core

pub mod plan;
pub mod profile;
pub mod role;
pub mod session;

pub use plan::*;
pub use profile::*;
pub use role::*;
pub use session::*;
