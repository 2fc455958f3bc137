//! Postgres-backed entity directory.
//!
//! Residents and officials are read straight from their tables on each call;
//! the organization profile is cached since every session header needs it.

use async_trait::async_trait;
use base64::Engine;
use chrono::NaiveDate;
use moka::future::Cache;
use sqlx::PgPool;
use std::time::Duration;

use super::model::{EntityKind, EntitySnapshot, OrganizationProfile};
use super::{DirectoryError, EntityDirectory};

const PROFILE_CACHE_KEY: &str = "organization_profile";

#[derive(sqlx::FromRow)]
struct PersonRow {
    id: i64,
    first_name: String,
    middle_name: Option<String>,
    last_name: String,
    suffix: Option<String>,
    birth_date: Option<NaiveDate>,
    civil_status: Option<String>,
    gender: Option<String>,
    section: Option<String>,
    residing_since: Option<i32>,
    position: Option<String>,
}

impl PersonRow {
    fn into_snapshot(self, kind: EntityKind) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id,
            kind,
            first_name: self.first_name,
            middle_name: self.middle_name,
            last_name: self.last_name,
            suffix: self.suffix,
            birth_date: self.birth_date,
            civil_status: self.civil_status,
            gender: self.gender,
            section: self.section,
            residing_since: self.residing_since,
            position: self.position,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SettingsRow {
    barangay_name: String,
    municipality: String,
    province: String,
    logo_url: Option<String>,
}

#[derive(Clone)]
pub struct PgDirectory {
    pool: PgPool,
    profile_cache: Cache<String, OrganizationProfile>,
    http_client: reqwest::Client,
}

impl PgDirectory {
    pub fn new(pool: PgPool, http_client: reqwest::Client) -> Self {
        let profile_cache = Cache::builder()
            .time_to_live(Duration::from_secs(10 * 60))
            .max_capacity(1)
            .build();

        Self {
            pool,
            profile_cache,
            http_client,
        }
    }

    async fn load_profile(&self) -> Result<OrganizationProfile, DirectoryError> {
        let row = sqlx::query_as::<_, SettingsRow>(
            "SELECT barangay_name, municipality, province, logo_url FROM settings ORDER BY id LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DirectoryError::MissingProfile)?;

        Ok(OrganizationProfile {
            barangay: row.barangay_name,
            municipality: row.municipality,
            province: row.province,
            logo_url: row.logo_url.filter(|url| !url.trim().is_empty()),
        })
    }
}

#[async_trait]
impl EntityDirectory for PgDirectory {
    async fn fetch_residents(&self) -> Result<Vec<EntitySnapshot>, DirectoryError> {
        let rows = sqlx::query_as::<_, PersonRow>(
            r#"
            SELECT id, first_name, middle_name, last_name, suffix, birth_date, civil_status,
                   gender, purok AS section, residing_since, NULL::text AS position
            FROM residents
            ORDER BY last_name, first_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.into_snapshot(EntityKind::Resident))
            .collect())
    }

    async fn fetch_officials(&self) -> Result<Vec<EntitySnapshot>, DirectoryError> {
        let rows = sqlx::query_as::<_, PersonRow>(
            r#"
            SELECT id, first_name, middle_name, last_name, suffix, NULL::date AS birth_date,
                   NULL::text AS civil_status, NULL::text AS gender, NULL::text AS section,
                   NULL::int4 AS residing_since, position
            FROM officials
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.into_snapshot(EntityKind::Official))
            .collect())
    }

    async fn fetch_organization_profile(&self) -> Result<OrganizationProfile, DirectoryError> {
        if let Some(profile) = self.profile_cache.get(PROFILE_CACHE_KEY).await {
            return Ok(profile);
        }

        let profile = self.load_profile().await?;
        self.profile_cache
            .insert(PROFILE_CACHE_KEY.to_string(), profile.clone())
            .await;
        log::debug!("Organization profile cached for {}", profile.barangay);
        Ok(profile)
    }

    async fn fetch_logo_image(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<Option<Vec<u8>>, DirectoryError> {
        let Some(url) = profile.logo_url.as_deref() else {
            return Ok(None);
        };

        if let Some(encoded) = url.strip_prefix("data:") {
            return decode_data_url(encoded).map(Some);
        }

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| DirectoryError::Logo(e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DirectoryError::Logo(e.to_string()))?;

        Ok(Some(bytes.to_vec()))
    }
}

/// Decode the payload of a `data:<mime>;base64,<payload>` URL (prefix already stripped).
fn decode_data_url(rest: &str) -> Result<Vec<u8>, DirectoryError> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| DirectoryError::Logo("malformed data URL".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(DirectoryError::Logo("data URL is not base64 encoded".to_string()));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| DirectoryError::Logo(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_data_url() {
        let bytes = decode_data_url("image/png;base64,iVBORw0K").unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_decode_data_url_rejects_plain_payload() {
        assert!(decode_data_url("image/svg+xml,<svg/>").is_err());
        assert!(decode_data_url("image/png;base64").is_err());
    }
}
