//! Letterhead shared by every certificate.

use std::sync::Arc;

use super::document::{DocumentNode, Inline, TextSize};
use crate::directory::OrganizationProfile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub profile: OrganizationProfile,
    pub seal: Option<Arc<[u8]>>,
}

impl Header {
    pub fn new(profile: OrganizationProfile, seal: Option<Arc<[u8]>>) -> Self {
        Self { profile, seal }
    }

    /// Asset name and bytes of the seal, if it is an image format we can embed.
    pub fn seal_asset(&self) -> Option<(String, Arc<[u8]>)> {
        let bytes = self.seal.as_ref()?;
        match image_extension(bytes) {
            Some(ext) => Some((format!("seal.{ext}"), bytes.clone())),
            None => {
                log::warn!("Seal image format not recognised; rendering without it");
                None
            }
        }
    }

    pub fn nodes(&self, seal_asset: Option<&str>) -> Vec<DocumentNode> {
        let p = &self.profile;
        let lines = vec![
            DocumentNode::centered(
                vec![Inline::text("Republic of the Philippines")],
                TextSize::Normal,
            ),
            DocumentNode::centered(
                vec![Inline::text("Province of "), Inline::value(&p.province)],
                TextSize::Normal,
            ),
            DocumentNode::centered(
                vec![Inline::text("Municipality of "), Inline::value(&p.municipality)],
                TextSize::Normal,
            ),
            DocumentNode::centered(
                vec![
                    Inline::strong("BARANGAY "),
                    Inline::value(p.barangay.to_uppercase()),
                ],
                TextSize::Large,
            ),
        ];

        vec![
            DocumentNode::Letterhead {
                seal: seal_asset.map(str::to_string),
                lines,
            },
            DocumentNode::Spacer(5),
            DocumentNode::centered(
                vec![Inline::strong("OFFICE OF THE PUNONG BARANGAY")],
                TextSize::Normal,
            ),
            DocumentNode::Rule,
        ]
    }
}

/// Sniff the image container from magic bytes.
fn image_extension(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpg")
    } else if bytes.starts_with(b"GIF8") {
        Some("gif")
    } else if bytes.starts_with(b"<svg") || bytes.starts_with(b"<?xml") {
        Some("svg")
    } else {
        None
    }
}
