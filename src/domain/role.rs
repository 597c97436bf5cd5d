//! Role labels and normalization

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a free-text role label.
///
/// Stored labels are historically inconsistent ("Síndico", "SINDICO",
/// "  síndico  "). Normalization makes them comparable: NFD-decompose and
/// drop combining marks, keep only ASCII letters and whitespace, collapse
/// whitespace runs, trim, lowercase. Total and idempotent; unrecognizable
/// input normalizes to the empty token.
pub fn normalize_role(label: Option<&str>) -> String {
    let stripped: String = label
        .unwrap_or("")
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect();

    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Canonical role of a principal.
///
/// Route specs are expressed in this typed set, so a misspelled label in a
/// route definition is a compile error rather than a silent lockout. Labels
/// outside the known set survive as [`Role::Unknown`] with their normalized
/// token, so two occurrences of the same historical label still compare
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform operator
    Admin,
    /// Management company tenant ("administradora")
    ManagementCompany,
    /// Building manager ("síndico")
    BuildingManager,
    /// Unit resident ("morador")
    Resident,
    Unknown(String),
}

impl Role {
    /// Map a raw label to its canonical role.
    pub fn from_label(label: Option<&str>) -> Role {
        match normalize_role(label).as_str() {
            "admin" | "administrador" => Role::Admin,
            "administradora" => Role::ManagementCompany,
            "sindico" => Role::BuildingManager,
            "morador" | "residente" | "condomino" => Role::Resident,
            other => Role::Unknown(other.to_string()),
        }
    }
}
