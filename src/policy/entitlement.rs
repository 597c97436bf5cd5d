//! Plan entitlement gate
//!
//! Compares current resource usage against the administradora's subscription
//! limits before a creation action. Counts are taken fresh on every check —
//! another device may have created a resource a moment ago — and a billing
//! failure is surfaced to the caller, never treated as unlimited.

use crate::domain::{Plan, ResourceKind};
use crate::error::Result;
use crate::provider::BillingStore;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Outcome of a creation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entitlement {
    Allowed,
    /// The caller must replace the create affordance with an upgrade
    /// affordance — a denial is always actionable, never a dead button.
    Denied { reason: DenialReason },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    LimitReached { kind: ResourceKind, limit: u32 },
}

/// Pure gate. No plan, or no limit on the relevant field, means unlimited.
pub fn can_create(kind: ResourceKind, plan: Option<&Plan>, current_count: u64) -> Entitlement {
    let Some(limit) = plan.and_then(|p| p.limit_for(kind)) else {
        return Entitlement::Allowed;
    };

    if current_count < u64::from(limit) {
        Entitlement::Allowed
    } else {
        Entitlement::Denied {
            reason: DenialReason::LimitReached { kind, limit },
        }
    }
}

/// Entitlement checks backed by the billing store.
pub struct EntitlementService {
    billing: Arc<dyn BillingStore>,
}

impl EntitlementService {
    pub fn new(billing: Arc<dyn BillingStore>) -> Self {
        Self { billing }
    }

    /// May the administradora create another resource of `kind`?
    ///
    /// Recounts immediately before the check; callers must not reuse an
    /// earlier result after the listing changed.
    pub async fn check_create(
        &self,
        administrator_id: Uuid,
        kind: ResourceKind,
    ) -> Result<Entitlement> {
        let plan = self.billing.fetch_plan(administrator_id).await?;
        let count = self.billing.count_resources(administrator_id, kind).await?;
        let outcome = can_create(kind, plan.as_ref(), count);
        debug!(%administrator_id, ?kind, count, ?outcome, "entitlement check");
        Ok(outcome)
    }
}
