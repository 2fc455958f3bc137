//! In-process directory backed by plain vectors.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::model::{EntityKind, EntitySnapshot, OrganizationProfile};
use super::{DirectoryError, EntityDirectory};

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    residents: Vec<EntitySnapshot>,
    officials: Vec<EntitySnapshot>,
    profile: Option<OrganizationProfile>,
    logo: Option<Vec<u8>>,
    fail_logo: bool,
    resident_fetches: AtomicUsize,
    profile_fetches: AtomicUsize,
}

impl InMemoryDirectory {
    pub fn new(
        residents: Vec<EntitySnapshot>,
        officials: Vec<EntitySnapshot>,
        profile: OrganizationProfile,
    ) -> Self {
        Self {
            residents,
            officials,
            profile: Some(profile),
            ..Self::default()
        }
    }

    pub fn with_logo(mut self, logo: Vec<u8>) -> Self {
        self.logo = Some(logo);
        self
    }

    /// Simulate a barangay with no settings row.
    pub fn without_profile(mut self) -> Self {
        self.profile = None;
        self
    }

    pub fn with_failing_logo(mut self) -> Self {
        self.fail_logo = true;
        self
    }

    /// How many times the resident roll has been fetched.
    pub fn resident_fetches(&self) -> usize {
        self.resident_fetches.load(Ordering::SeqCst)
    }

    pub fn profile_fetches(&self) -> usize {
        self.profile_fetches.load(Ordering::SeqCst)
    }

    /// A small barangay roll used by tests and the local demo mode.
    pub fn sample() -> Self {
        let residents = vec![
            resident(1, "Juan", None, "Dela Cruz", (1990, 6, 15), "Single", "Male", 2005),
            resident(2, "Maria", Some("Lopez"), "Santos", (1993, 2, 28), "Single", "Female", 2010),
            resident(3, "Pedro", None, "Garcia", (1975, 12, 1), "Married", "Male", 1998),
            resident(4, "Ana", Some("Reyes"), "Mendoza", (1988, 1, 20), "Widowed", "Female", 2015),
        ];
        let officials = vec![
            official(100, "Ramon", Some("Villanueva"), "Bautista", "Punong Barangay"),
            official(101, "Liza", None, "Aquino", "Barangay Secretary"),
        ];
        let profile = OrganizationProfile {
            barangay: "San Isidro".to_string(),
            municipality: "Santa Maria".to_string(),
            province: "Bulacan".to_string(),
            logo_url: None,
        };
        Self::new(residents, officials, profile)
    }
}

#[allow(clippy::too_many_arguments)]
fn resident(
    id: i64,
    first: &str,
    middle: Option<&str>,
    last: &str,
    born: (i32, u32, u32),
    civil_status: &str,
    gender: &str,
    since: i32,
) -> EntitySnapshot {
    EntitySnapshot {
        id,
        kind: EntityKind::Resident,
        first_name: first.to_string(),
        middle_name: middle.map(str::to_string),
        last_name: last.to_string(),
        suffix: None,
        birth_date: NaiveDate::from_ymd_opt(born.0, born.1, born.2),
        civil_status: Some(civil_status.to_string()),
        gender: Some(gender.to_string()),
        section: Some("Purok 3".to_string()),
        residing_since: Some(since),
        position: None,
    }
}

fn official(
    id: i64,
    first: &str,
    middle: Option<&str>,
    last: &str,
    position: &str,
) -> EntitySnapshot {
    EntitySnapshot {
        id,
        kind: EntityKind::Official,
        first_name: first.to_string(),
        middle_name: middle.map(str::to_string),
        last_name: last.to_string(),
        suffix: None,
        birth_date: None,
        civil_status: None,
        gender: None,
        section: None,
        residing_since: None,
        position: Some(position.to_string()),
    }
}

#[async_trait]
impl EntityDirectory for InMemoryDirectory {
    async fn fetch_residents(&self) -> Result<Vec<EntitySnapshot>, DirectoryError> {
        self.resident_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.residents.clone())
    }

    async fn fetch_officials(&self) -> Result<Vec<EntitySnapshot>, DirectoryError> {
        Ok(self.officials.clone())
    }

    async fn fetch_organization_profile(&self) -> Result<OrganizationProfile, DirectoryError> {
        self.profile_fetches.fetch_add(1, Ordering::SeqCst);
        self.profile.clone().ok_or(DirectoryError::MissingProfile)
    }

    async fn fetch_logo_image(
        &self,
        _profile: &OrganizationProfile,
    ) -> Result<Option<Vec<u8>>, DirectoryError> {
        if self.fail_logo {
            return Err(DirectoryError::Logo("logo storage unavailable".to_string()));
        }
        Ok(self.logo.clone())
    }
}
