//! Derived-field arithmetic over an entity snapshot.
//!
//! Every function here is pure: the same snapshot and as-of date always
//! produce the same values.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::directory::EntitySnapshot;

/// Values computed for one selection slot. Absent inputs yield empty values.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, ToSchema)]
pub struct DerivedFields {
    pub age: Option<u32>,
    pub civil_status: String,
    pub residency_since_year: String,
    pub years_of_residency: Option<u32>,
    pub gender: String,
    pub section: String,
}

/// Whole years between `birth_date` and `as_of`.
///
/// One year is subtracted when the birthday has not yet occurred in the
/// year of `as_of`. Negative when `birth_date` lies after `as_of`.
pub fn compute_age(birth_date: NaiveDate, as_of: NaiveDate) -> i32 {
    let mut years = as_of.year() - birth_date.year();
    if (as_of.month(), as_of.day()) < (birth_date.month(), birth_date.day()) {
        years -= 1;
    }
    years
}

pub fn compute_civil_status(entity: &EntitySnapshot) -> String {
    entity
        .civil_status
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

pub fn compute_residency_since_year(entity: &EntitySnapshot) -> String {
    entity
        .residing_since
        .map(|year| year.to_string())
        .unwrap_or_default()
}

pub fn compute_years_of_residency(entity: &EntitySnapshot, as_of: NaiveDate) -> Option<u32> {
    entity
        .residing_since
        .and_then(|since| u32::try_from(as_of.year() - since).ok())
}

/// Compute every derived field for `entity` as of `as_of`.
pub fn derive(entity: &EntitySnapshot, as_of: NaiveDate) -> DerivedFields {
    let age = entity.birth_date.and_then(|born| {
        let age = compute_age(born, as_of);
        if age < 0 {
            log::warn!(
                "Birth date of entity {} lies after {}; leaving age blank",
                entity.id,
                as_of
            );
        }
        u32::try_from(age).ok()
    });

    DerivedFields {
        age,
        civil_status: compute_civil_status(entity),
        residency_since_year: compute_residency_since_year(entity),
        years_of_residency: compute_years_of_residency(entity, as_of),
        gender: entity.gender.as_deref().unwrap_or_default().trim().to_string(),
        section: entity.section.as_deref().unwrap_or_default().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::EntityKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entity() -> EntitySnapshot {
        EntitySnapshot {
            id: 1,
            kind: EntityKind::Resident,
            first_name: "Juan".to_string(),
            middle_name: None,
            last_name: "Dela Cruz".to_string(),
            suffix: None,
            birth_date: Some(date(1990, 6, 15)),
            civil_status: Some(" Single ".to_string()),
            gender: Some("Male".to_string()),
            section: Some("Purok 3".to_string()),
            residing_since: Some(2005),
            position: None,
        }
    }

    #[test]
    fn test_age_day_before_birthday() {
        assert_eq!(compute_age(date(1990, 6, 15), date(2024, 6, 14)), 33);
    }

    #[test]
    fn test_age_on_birthday() {
        assert_eq!(compute_age(date(1990, 6, 15), date(2024, 6, 15)), 34);
    }

    #[test]
    fn test_age_month_boundaries() {
        assert_eq!(compute_age(date(1990, 6, 15), date(2024, 5, 31)), 33);
        assert_eq!(compute_age(date(1990, 6, 15), date(2024, 7, 1)), 34);
        assert_eq!(compute_age(date(1990, 12, 31), date(2025, 1, 1)), 34);
    }

    #[test]
    fn test_age_leap_day_birthday() {
        assert_eq!(compute_age(date(2000, 2, 29), date(2023, 2, 28)), 22);
        assert_eq!(compute_age(date(2000, 2, 29), date(2023, 3, 1)), 23);
        assert_eq!(compute_age(date(2000, 2, 29), date(2024, 2, 29)), 24);
    }

    #[test]
    fn test_age_is_non_negative_from_birth_onwards() {
        let born = date(2001, 9, 9);
        let mut day = born;
        for _ in 0..800 {
            assert!(compute_age(born, day) >= 0);
            day = day.succ_opt().unwrap();
        }
        assert_eq!(compute_age(born, born), 0);
    }

    #[test]
    fn test_derive_projects_fields() {
        let derived = derive(&entity(), date(2024, 6, 14));
        assert_eq!(derived.age, Some(33));
        assert_eq!(derived.civil_status, "Single");
        assert_eq!(derived.residency_since_year, "2005");
        assert_eq!(derived.years_of_residency, Some(19));
        assert_eq!(derived.section, "Purok 3");
    }

    #[test]
    fn test_derive_defaults_when_absent() {
        let mut bare = entity();
        bare.birth_date = None;
        bare.civil_status = None;
        bare.residing_since = None;
        bare.gender = None;
        bare.section = None;

        assert_eq!(derive(&bare, date(2024, 1, 1)), DerivedFields::default());
    }

    #[test]
    fn test_derive_future_birth_leaves_age_blank() {
        let mut unborn = entity();
        unborn.birth_date = Some(date(2030, 1, 1));
        assert_eq!(derive(&unborn, date(2024, 1, 1)).age, None);
    }

    #[test]
    fn test_derive_is_pure() {
        let as_of = date(2026, 10, 17);
        assert_eq!(derive(&entity(), as_of), derive(&entity(), as_of));
    }
}
