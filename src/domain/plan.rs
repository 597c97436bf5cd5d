//! Subscription plan domain models

use serde::{Deserialize, Serialize};

/// Billing period of a subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    Monthly,
    Yearly,
}

/// Resource kinds gated by plan limits, one per limit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Condominium,
    AdminUser,
}

/// Subscription tier of an administradora. Owned by the billing subsystem;
/// read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    /// `None` means unlimited.
    pub max_condos: Option<u32>,
    /// `None` means unlimited.
    pub max_admins: Option<u32>,
    /// Capability labels unlocked by the tier, in display order.
    pub features: Vec<String>,
    pub price_cents: i64,
    pub period: BillingPeriod,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            name: String::new(),
            max_condos: None,
            max_admins: None,
            features: Vec::new(),
            price_cents: 0,
            period: BillingPeriod::Monthly,
        }
    }
}

impl Plan {
    /// Limit for a resource kind; `None` means unlimited.
    pub fn limit_for(&self, kind: ResourceKind) -> Option<u32> {
        match kind {
            ResourceKind::Condominium => self.max_condos,
            ResourceKind::AdminUser => self.max_admins,
        }
    }

    pub fn has_feature(&self, label: &str) -> bool {
        self.features.iter().any(|f| f == label)
    }
}
