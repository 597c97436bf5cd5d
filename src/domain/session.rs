//! Authentication session domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Session issued by the hosted identity provider.
///
/// The application never mints these itself; it only holds a snapshot for
/// the lifetime of the signed-in browser tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    /// Raw metadata attached at sign-up. May carry a fallback `role` label
    /// for accounts whose profile row has not been created yet.
    #[serde(default)]
    pub raw_user_metadata: HashMap<String, Value>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            raw_user_metadata: HashMap::new(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        }
    }

    /// Attach a fallback role label to the sign-up metadata.
    pub fn with_metadata_role(mut self, role: &str) -> Self {
        self.raw_user_metadata
            .insert("role".to_string(), Value::String(role.to_string()));
        self
    }

    /// Fallback role label from the sign-up metadata, if any.
    pub fn metadata_role(&self) -> Option<&str> {
        self.raw_user_metadata.get("role").and_then(Value::as_str)
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Auth-state change emitted by the identity provider.
///
/// Events are delivered in emission order; every variant re-enters the
/// resolver's authenticating state and re-resolves the profile.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    SignedIn(Session),
    TokenRefreshed(Session),
    UserUpdated(Session),
    /// Explicit sign-out and provider-side expiry look identical here.
    SignedOut,
}

impl AuthEvent {
    /// Session carried by the event, if it represents a live principal.
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthEvent::SignedIn(s) | AuthEvent::TokenRefreshed(s) | AuthEvent::UserUpdated(s) => {
                Some(s)
            }
            AuthEvent::SignedOut => None,
        }
    }
}
