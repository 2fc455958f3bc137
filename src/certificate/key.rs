//! Closed set of document types the office can issue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentTypeKey {
    Residency,
    Indigency,
    BusinessClearance,
    Marriage,
    BirthRegistration,
    Ownership,
    Unemployment,
    SoloParent,
    GoodMoral,
    BarangayClearance,
}

impl DocumentTypeKey {
    pub const ALL: [DocumentTypeKey; 10] = [
        DocumentTypeKey::Residency,
        DocumentTypeKey::Indigency,
        DocumentTypeKey::BusinessClearance,
        DocumentTypeKey::Marriage,
        DocumentTypeKey::BirthRegistration,
        DocumentTypeKey::Ownership,
        DocumentTypeKey::Unemployment,
        DocumentTypeKey::SoloParent,
        DocumentTypeKey::GoodMoral,
        DocumentTypeKey::BarangayClearance,
    ];

    /// Wire identifier, e.g. `business-clearance`.
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentTypeKey::Residency => "residency",
            DocumentTypeKey::Indigency => "indigency",
            DocumentTypeKey::BusinessClearance => "business-clearance",
            DocumentTypeKey::Marriage => "marriage",
            DocumentTypeKey::BirthRegistration => "birth-registration",
            DocumentTypeKey::Ownership => "ownership",
            DocumentTypeKey::Unemployment => "unemployment",
            DocumentTypeKey::SoloParent => "solo-parent",
            DocumentTypeKey::GoodMoral => "good-moral",
            DocumentTypeKey::BarangayClearance => "barangay-clearance",
        }
    }

    /// Name stored in the `type_` column of an issuance record.
    pub fn record_name(self) -> &'static str {
        match self {
            DocumentTypeKey::Residency => "Residency Certificate",
            DocumentTypeKey::Indigency => "Indigency Certificate",
            DocumentTypeKey::BusinessClearance => "Business Clearance",
            DocumentTypeKey::Marriage => "Marriage Certificate",
            DocumentTypeKey::BirthRegistration => "Birth Registration Certificate",
            DocumentTypeKey::Ownership => "Ownership Certificate",
            DocumentTypeKey::Unemployment => "Unemployment Certificate",
            DocumentTypeKey::SoloParent => "Solo Parent Certificate",
            DocumentTypeKey::GoodMoral => "Good Moral Certificate",
            DocumentTypeKey::BarangayClearance => "Barangay Clearance",
        }
    }
}

impl fmt::Display for DocumentTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a string does not name a registered document type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown document type '{0}'")]
pub struct UnknownDocumentType(pub String);

impl FromStr for DocumentTypeKey {
    type Err = UnknownDocumentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DocumentTypeKey::ALL
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| UnknownDocumentType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_round_trips_every_key() {
        for key in DocumentTypeKey::ALL {
            assert_eq!(key.as_str().parse::<DocumentTypeKey>(), Ok(key));
        }
    }

    #[test]
    fn test_unknown_key() {
        let err = "unknown-key".parse::<DocumentTypeKey>().unwrap_err();
        assert_eq!(err, UnknownDocumentType("unknown-key".to_string()));
    }

    #[test]
    fn test_serde_matches_wire_identifier() {
        let json = serde_json::to_string(&DocumentTypeKey::BusinessClearance).unwrap();
        assert_eq!(json, "\"business-clearance\"");
        let key: DocumentTypeKey = serde_json::from_str("\"solo-parent\"").unwrap();
        assert_eq!(key, DocumentTypeKey::SoloParent);
    }

    #[test]
    fn test_record_name_for_residency() {
        assert_eq!(DocumentTypeKey::Residency.record_name(), "Residency Certificate");
    }
}
