//! Incremental entity search with independent selection slots.
//!
//! Every slot filters the same directory snapshot but keeps its own query
//! and selection. Selecting computes the slot's derived fields right away;
//! clearing drops them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

use super::computation::DerivedFields;
use crate::directory::EntitySnapshot;

static EMPTY_DERIVED: DerivedFields = DerivedFields {
    age: None,
    civil_status: String::new(),
    residency_since_year: String::new(),
    years_of_residency: None,
    gender: String::new(),
    section: String::new(),
};

/// A selection slot. Single-person documents use only `Primary`.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum SlotId {
    Primary,
    Secondary,
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotId::Primary => f.write_str("primary"),
            SlotId::Secondary => f.write_str("secondary"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("this document has no {0} slot")]
    UnknownSlot(SlotId),
    #[error("no entity with id {0} in the directory snapshot")]
    UnknownEntity(i64),
}

/// A chosen entity with the derived fields frozen at `selected_at`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Selection {
    pub entity: EntitySnapshot,
    pub derived: DerivedFields,
    pub selected_at: NaiveDate,
}

#[derive(Debug, Clone, Default)]
struct SlotState {
    query: String,
    selection: Option<Selection>,
}

/// Derived-field computation injected by the template in use.
pub type DeriveFn = fn(&EntitySnapshot, NaiveDate) -> DerivedFields;

#[derive(Debug, Clone)]
pub struct EntitySelector {
    snapshot: Arc<[EntitySnapshot]>,
    slots: BTreeMap<SlotId, SlotState>,
    derive: DeriveFn,
}

impl EntitySelector {
    pub fn new(snapshot: Arc<[EntitySnapshot]>, slots: &[SlotId], derive: DeriveFn) -> Self {
        Self {
            snapshot,
            slots: slots.iter().map(|id| (*id, SlotState::default())).collect(),
            derive,
        }
    }

    pub fn slot_ids(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.slots.keys().copied()
    }

    fn slot(&self, slot: SlotId) -> Result<&SlotState, SelectionError> {
        self.slots.get(&slot).ok_or(SelectionError::UnknownSlot(slot))
    }

    fn slot_mut(&mut self, slot: SlotId) -> Result<&mut SlotState, SelectionError> {
        self.slots
            .get_mut(&slot)
            .ok_or(SelectionError::UnknownSlot(slot))
    }

    pub fn set_query(&mut self, slot: SlotId, query: &str) -> Result<(), SelectionError> {
        self.slot_mut(slot)?.query = query.to_string();
        Ok(())
    }

    pub fn query(&self, slot: SlotId) -> Result<&str, SelectionError> {
        Ok(self.slot(slot)?.query.as_str())
    }

    /// Entities whose `"first last"` label contains the slot's query, ignoring case.
    pub fn candidates(&self, slot: SlotId) -> Result<Vec<&EntitySnapshot>, SelectionError> {
        let needle = self.slot(slot)?.query.trim().to_lowercase();
        Ok(self
            .snapshot
            .iter()
            .filter(|e| needle.is_empty() || e.display_label().to_lowercase().contains(&needle))
            .collect())
    }

    /// Select `entity_id` into `slot`, computing derived fields as of `as_of`.
    pub fn select(
        &mut self,
        slot: SlotId,
        entity_id: i64,
        as_of: NaiveDate,
    ) -> Result<&Selection, SelectionError> {
        let entity = self
            .snapshot
            .iter()
            .find(|e| e.id == entity_id)
            .cloned()
            .ok_or(SelectionError::UnknownEntity(entity_id))?;
        let derived = (self.derive)(&entity, as_of);

        let state = self.slot_mut(slot)?;
        state.query = entity.display_label();
        Ok(state.selection.insert(Selection {
            entity,
            derived,
            selected_at: as_of,
        }))
    }

    pub fn clear(&mut self, slot: SlotId) -> Result<(), SelectionError> {
        let state = self.slot_mut(slot)?;
        state.selection = None;
        state.query.clear();
        Ok(())
    }

    pub fn selection(&self, slot: SlotId) -> Option<&Selection> {
        self.slots.get(&slot).and_then(|s| s.selection.as_ref())
    }

    /// Derived fields of `slot`, or defaults when nothing is selected.
    pub fn derived(&self, slot: SlotId) -> &DerivedFields {
        self.selection(slot)
            .map(|s| &s.derived)
            .unwrap_or(&EMPTY_DERIVED)
    }

    pub fn is_populated(&self, slot: SlotId) -> bool {
        self.selection(slot).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::computation::derive;
    use crate::directory::InMemoryDirectory;
    use crate::directory::EntityDirectory;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
    }

    async fn selector(slots: &[SlotId]) -> EntitySelector {
        let residents = InMemoryDirectory::sample().fetch_residents().await.unwrap();
        EntitySelector::new(Arc::from(residents), slots, derive)
    }

    #[tokio::test]
    async fn test_filter_is_case_insensitive_substring() {
        let mut selector = selector(&[SlotId::Primary]).await;
        selector.set_query(SlotId::Primary, "dELA c").unwrap();

        let found = selector.candidates(SlotId::Primary).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].display_label(), "Juan Dela Cruz");
    }

    #[tokio::test]
    async fn test_filter_ignores_middle_name() {
        let mut selector = selector(&[SlotId::Primary]).await;
        selector.set_query(SlotId::Primary, "lopez").unwrap();
        assert!(selector.candidates(SlotId::Primary).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_query_lists_everyone() {
        let selector = selector(&[SlotId::Primary]).await;
        assert_eq!(selector.candidates(SlotId::Primary).unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_select_populates_derived_fields() {
        let mut selector = selector(&[SlotId::Primary]).await;
        let selection = selector.select(SlotId::Primary, 1, as_of()).unwrap();
        assert_eq!(selection.derived.age, Some(33));
        assert_eq!(selection.derived.civil_status, "Single");
        assert_eq!(selector.query(SlotId::Primary).unwrap(), "Juan Dela Cruz");
    }

    #[tokio::test]
    async fn test_clear_resets_derived_fields() {
        let mut selector = selector(&[SlotId::Primary]).await;
        selector.select(SlotId::Primary, 1, as_of()).unwrap();
        selector.clear(SlotId::Primary).unwrap();

        assert!(!selector.is_populated(SlotId::Primary));
        assert_eq!(selector.derived(SlotId::Primary), &DerivedFields::default());
    }

    #[tokio::test]
    async fn test_slots_are_independent() {
        let mut selector = selector(&[SlotId::Primary, SlotId::Secondary]).await;
        selector.select(SlotId::Primary, 1, as_of()).unwrap();
        let before = selector.selection(SlotId::Primary).cloned();

        selector.set_query(SlotId::Secondary, "maria").unwrap();
        selector.select(SlotId::Secondary, 2, as_of()).unwrap();
        selector.select(SlotId::Secondary, 4, as_of()).unwrap();
        selector.clear(SlotId::Secondary).unwrap();

        assert_eq!(selector.selection(SlotId::Primary).cloned(), before);
        assert_eq!(selector.query(SlotId::Primary).unwrap(), "Juan Dela Cruz");
    }

    #[tokio::test]
    async fn test_unknown_slot_and_entity() {
        let mut selector = selector(&[SlotId::Primary]).await;
        assert_eq!(
            selector.select(SlotId::Secondary, 1, as_of()).unwrap_err(),
            SelectionError::UnknownSlot(SlotId::Secondary)
        );
        assert_eq!(
            selector.select(SlotId::Primary, 999, as_of()).unwrap_err(),
            SelectionError::UnknownEntity(999)
        );
    }
}
