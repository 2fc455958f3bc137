use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Whether a snapshot came from the resident roll or the officials roster.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Resident,
    Official,
}

/// Immutable projection of a resident or official at fetch time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct EntitySnapshot {
    pub id: i64,
    pub kind: EntityKind,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub last_name: String,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub civil_status: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    /// Purok / sitio the resident belongs to.
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub residing_since: Option<i32>,
    /// Position held, for officials.
    #[serde(default)]
    pub position: Option<String>,
}

impl EntitySnapshot {
    /// Label used by the selector: `"first last"`.
    pub fn display_label(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Full legal name including middle name and suffix when present.
    pub fn full_name(&self) -> String {
        let mut parts: Vec<&str> = vec![self.first_name.trim()];
        if let Some(middle) = self.middle_name.as_deref().map(str::trim) {
            if !middle.is_empty() {
                parts.push(middle);
            }
        }
        parts.push(self.last_name.trim());
        if let Some(suffix) = self.suffix.as_deref().map(str::trim) {
            if !suffix.is_empty() {
                parts.push(suffix);
            }
        }
        parts.join(" ")
    }
}

/// Organization identity shown in every certificate header.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, ToSchema)]
pub struct OrganizationProfile {
    pub barangay: String,
    pub municipality: String,
    pub province: String,
    /// Where the seal is stored: an http(s) URL or a `data:` URL.
    #[serde(default)]
    pub logo_url: Option<String>,
}
