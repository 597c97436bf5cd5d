//! Application profile domain model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account status as stored by the backend (historical Portuguese labels).
///
/// Unrecognized labels are preserved, not coerced: anything other than
/// `Ativo` is treated as not active by the screen gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProfileStatus {
    Ativo,
    Inativo,
    Other(String),
}

impl From<String> for ProfileStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Ativo" => ProfileStatus::Ativo,
            "Inativo" => ProfileStatus::Inativo,
            _ => ProfileStatus::Other(value),
        }
    }
}

impl From<ProfileStatus> for String {
    fn from(value: ProfileStatus) -> Self {
        match value {
            ProfileStatus::Ativo => "Ativo".to_string(),
            ProfileStatus::Inativo => "Inativo".to_string(),
            ProfileStatus::Other(label) => label,
        }
    }
}

impl ProfileStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, ProfileStatus::Ativo)
    }
}

/// Application-level user record, keyed by the identity provider's user id.
///
/// Created at onboarding; role and status may later be edited server-side by
/// an administradora, which the resolver picks up through the realtime
/// channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    /// Free-text role label as stored. Normalize before comparing.
    pub role: String,
    pub status: ProfileStatus,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    /// Owning management company, when the account belongs to one.
    pub administrator_id: Option<Uuid>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            role: String::new(),
            status: ProfileStatus::Ativo,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            avatar_url: None,
            administrator_id: None,
        }
    }
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
