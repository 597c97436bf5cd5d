//! Route guarding
//!
//! Pure decision logic: given the resolver's snapshot and a route's declared
//! allowed-role set, decide whether to render, wait, or redirect. Account
//! status is deliberately not checked here — an inactive account still
//! routes normally and is blocked by the independent [`screen_access`] gate,
//! which keeps sign-out reachable.

use crate::domain::{Profile, Role};
use crate::resolver::AuthSnapshot;
use tracing::debug;

/// Per-route guard configuration, fixed at route registration.
#[derive(Debug, Clone, Default)]
pub struct RouteGuardSpec {
    /// Roles allowed on the route. Empty means any authenticated role.
    pub allowed_roles: Vec<Role>,
    /// Escape hatch for onboarding routes that must render before the
    /// profile row exists.
    pub allow_without_profile: bool,
}

impl RouteGuardSpec {
    pub fn allowing(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed_roles: roles.into_iter().collect(),
            allow_without_profile: false,
        }
    }

    /// Open to any authenticated principal.
    pub fn any_authenticated() -> Self {
        Self::default()
    }
}

/// Outcome of a guard evaluation. Exactly one per evaluation; denial is a
/// value here, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The resolver has not settled; show a transient indicator and
    /// re-evaluate on the next snapshot.
    Loading,
    Render,
    /// Carries the attempted path so the login flow can return the user.
    RedirectToLogin { from: String },
    RedirectToHome,
}

/// Evaluate a route guard against the current snapshot.
pub fn decide(snapshot: &AuthSnapshot, spec: &RouteGuardSpec, attempted_path: &str) -> Decision {
    if snapshot.loading || !snapshot.profile_loaded {
        return Decision::Loading;
    }

    let Some(session) = &snapshot.session else {
        return Decision::RedirectToLogin {
            from: attempted_path.to_string(),
        };
    };

    match &snapshot.profile {
        None => {
            // Mid-onboarding: the intended role may already sit in the
            // sign-up metadata even though the profile row does not exist.
            if let Some(label) = session.metadata_role() {
                if spec.allowed_roles.contains(&Role::from_label(Some(label))) {
                    return Decision::Render;
                }
            }
            if spec.allow_without_profile {
                return Decision::Render;
            }
            debug!(attempted_path, "no profile and no onboarding escape; sending home");
            Decision::RedirectToHome
        }
        Some(profile) => {
            if spec.allowed_roles.is_empty() {
                return Decision::Render;
            }
            let role = Role::from_label(Some(&profile.role));
            if spec.allowed_roles.contains(&role) {
                Decision::Render
            } else {
                debug!(attempted_path, ?role, "role not allowed on route; sending home");
                Decision::RedirectToHome
            }
        }
    }
}

/// What the signed-in screen may offer, independent of routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenAccess {
    Full,
    /// Full-screen overlay: every affordance blocked except sign-out.
    SignOutOnly,
}

/// Gate for the inactive-account overlay. Anything other than an active
/// status blocks the screen; a missing profile does not (onboarding flows
/// must stay usable).
pub fn screen_access(profile: Option<&Profile>) -> ScreenAccess {
    match profile {
        Some(profile) if !profile.status.is_active() => ScreenAccess::SignOutOnly,
        _ => ScreenAccess::Full,
    }
}
