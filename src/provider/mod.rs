//! Collaborator seams for the hosted backend
//!
//! The core never talks to the network itself. It depends on these traits
//! and receives concrete implementations (or test fakes) by injection, so
//! every test case can run against its own isolated provider set.

use crate::domain::{AuthEvent, Plan, Profile, ResourceKind, Session};
use crate::error::Result;
use crate::realtime::{ChangeEvent, Subscription};
use async_trait::async_trait;
use uuid::Uuid;

/// Hosted identity provider (authentication only; authorization lives here
/// in the core).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Session currently held by the browser tab, if any.
    async fn current_session(&self) -> Result<Option<Session>>;

    /// Subscribe to auth-state changes (sign-in, sign-out, token refresh,
    /// user update). Events arrive in emission order.
    fn auth_events(&self) -> Subscription<AuthEvent>;

    async fn sign_out(&self) -> Result<()>;

    async fn update_password(&self, new_password: &str) -> Result<()>;
}

/// Row-level-secured profile table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// `Ok(None)` means the row genuinely does not exist (onboarding in
    /// progress); `Err` means the lookup itself failed. Callers must not
    /// conflate the two.
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>>;

    /// Watch the profile's own row for server-side edits (role or status
    /// changed by an administradora).
    async fn subscribe_profile(&self, user_id: Uuid) -> Result<Subscription<ChangeEvent>>;
}

/// Billing subsystem: plans and resource counts. Read-only from the core's
/// perspective.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BillingStore: Send + Sync {
    /// `Ok(None)` means no plan is configured for the administradora, which
    /// the entitlement gate treats as unlimited.
    async fn fetch_plan(&self, administrator_id: Uuid) -> Result<Option<Plan>>;

    /// Count live resources of `kind` scoped to the administradora. The
    /// entitlement gate calls this fresh before every check.
    async fn count_resources(&self, administrator_id: Uuid, kind: ResourceKind) -> Result<u64>;

    /// Watch the resource table so listing views keep their counts fresh
    /// without a manual refresh.
    async fn subscribe_resources(
        &self,
        administrator_id: Uuid,
        kind: ResourceKind,
    ) -> Result<Subscription<ChangeEvent>>;
}
