//! Entity directory - read-only access to residents, officials and the
//! organization profile.
//!
//! - `model` - snapshot types shared with the certificate engine
//! - `postgres` - sqlx-backed directory with a cached organization profile
//! - `memory` - in-process directory for tests and local runs

pub mod memory;
pub mod model;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub use memory::InMemoryDirectory;
pub use model::{EntityKind, EntitySnapshot, OrganizationProfile};
pub use postgres::PgDirectory;

/// Errors raised while reading the directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory query failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("organization profile is not configured")]
    MissingProfile,
    #[error("failed to fetch logo image: {0}")]
    Logo(String),
}

/// Source of entity snapshots and organization settings.
#[async_trait]
pub trait EntityDirectory: Send + Sync {
    async fn fetch_residents(&self) -> Result<Vec<EntitySnapshot>, DirectoryError>;
    async fn fetch_officials(&self) -> Result<Vec<EntitySnapshot>, DirectoryError>;
    async fn fetch_organization_profile(&self) -> Result<OrganizationProfile, DirectoryError>;
    /// Logo referenced by `profile`, if it has one.
    async fn fetch_logo_image(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<Option<Vec<u8>>, DirectoryError>;
}

/// Everything an editing session reads from the directory, fetched once.
#[derive(Debug, Clone)]
pub struct DirectoryContext {
    pub residents: Arc<[EntitySnapshot]>,
    pub officials: Arc<[EntitySnapshot]>,
    pub profile: OrganizationProfile,
    pub logo: Option<Arc<[u8]>>,
}

impl DirectoryContext {
    /// Fetch residents, officials and the profile concurrently, then the
    /// logo the profile points at.
    ///
    /// A failed logo fetch degrades to no logo instead of failing the session.
    pub async fn load(directory: &dyn EntityDirectory) -> Result<Self, DirectoryError> {
        let (residents, officials, profile) = tokio::join!(
            directory.fetch_residents(),
            directory.fetch_officials(),
            directory.fetch_organization_profile(),
        );
        let residents = residents?;
        let officials = officials?;
        let profile = profile?;

        let logo = match directory.fetch_logo_image(&profile).await {
            Ok(bytes) => bytes.map(Arc::from),
            Err(e) => {
                log::warn!("Rendering without logo: {}", e);
                None
            }
        };

        Ok(Self {
            residents: Arc::from(residents),
            officials: Arc::from(officials),
            profile,
            logo,
        })
    }

    /// Name of the official holding `position`, matched case-insensitively.
    pub fn official_named_for(&self, position: &str) -> Option<String> {
        let wanted = position.trim().to_lowercase();
        self.officials
            .iter()
            .find(|o| {
                o.position
                    .as_deref()
                    .map(|p| p.trim().to_lowercase() == wanted)
                    .unwrap_or(false)
            })
            .map(EntitySnapshot::full_name)
    }
}
