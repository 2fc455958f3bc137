//! Template descriptors and the registry that maps document types to them.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;

use super::form::{BodyContext, FormState};
use super::key::DocumentTypeKey;
use super::render::{Body, DocumentNode};
use super::selector::{DeriveFn, SlotId};
use super::templates;
use crate::directory::OrganizationProfile;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    pub id: SlotId,
    pub label: &'static str,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    LongText,
    /// ISO-8601 calendar date (`YYYY-MM-DD`).
    Date,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }
}

/// Values a template carries into its issuance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    /// Primary slot's age at selection.
    Age,
    /// Primary slot's civil status.
    CivilStatus,
    /// `ownership_text` column, taken from the named form field.
    OwnershipText(&'static str),
    /// `purpose` column, taken from the named form field.
    Purpose(&'static str),
}

pub type BodyFn = fn(&BodyContext<'_>) -> Vec<DocumentNode>;

/// Everything that makes one document type distinct.
#[derive(Clone, Copy)]
pub struct Template {
    pub key: DocumentTypeKey,
    /// Heading printed above the body.
    pub title: &'static str,
    pub slots: &'static [SlotSpec],
    pub fields: &'static [FieldSpec],
    pub records: &'static [RecordField],
    pub derive: DeriveFn,
    pub body: BodyFn,
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("slots", &self.slots)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl Template {
    pub fn slot_ids(&self) -> Vec<SlotId> {
        self.slots.iter().map(|s| s.id).collect()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Body nodes for the current form; unset values print as blanks.
    pub fn render_body(
        &self,
        form: &FormState,
        profile: &OrganizationProfile,
        issued_on: NaiveDate,
    ) -> Body {
        let context = BodyContext::new(self, form, profile, issued_on);
        let mut nodes = vec![
            DocumentNode::Spacer(10),
            DocumentNode::title(self.title),
            DocumentNode::Spacer(10),
        ];
        nodes.extend((self.body)(&context));
        Body {
            title: self.key.record_name().to_string(),
            nodes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("document type '{0}' is registered twice")]
    DuplicateKey(DocumentTypeKey),
    #[error("document type '{0}' has no template")]
    MissingKey(DocumentTypeKey),
    #[error("no template registered for '{0}'")]
    NotFound(String),
}

/// Injective, immutable map from document type to template.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: BTreeMap<DocumentTypeKey, Template>,
}

impl TemplateRegistry {
    /// Registry of every compiled-in document type.
    pub fn builtin() -> Self {
        let templates = DocumentTypeKey::ALL
            .into_iter()
            .map(|key| (key, templates::descriptor(key)))
            .collect();
        Self { templates }
    }

    /// Build from an explicit table, rejecting duplicate and missing keys.
    pub fn from_templates(
        table: impl IntoIterator<Item = Template>,
    ) -> Result<Self, RegistryError> {
        let mut templates = BTreeMap::new();
        for template in table {
            if templates.insert(template.key, template).is_some() {
                return Err(RegistryError::DuplicateKey(template.key));
            }
        }
        if let Some(missing) = DocumentTypeKey::ALL
            .into_iter()
            .find(|key| !templates.contains_key(key))
        {
            return Err(RegistryError::MissingKey(missing));
        }
        Ok(Self { templates })
    }

    pub fn resolve(&self, key: DocumentTypeKey) -> Result<&Template, RegistryError> {
        self.templates
            .get(&key)
            .ok_or_else(|| RegistryError::NotFound(key.to_string()))
    }

    /// Resolve a wire identifier such as `"residency"`.
    pub fn resolve_name(&self, name: &str) -> Result<&Template, RegistryError> {
        let key = name.parse::<DocumentTypeKey>().map_err(|_| {
            log::error!("Requested unregistered document type '{}'", name);
            RegistryError::NotFound(name.to_string())
        })?;
        self.resolve(key)
    }

    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_total_over_keys() {
        let registry = TemplateRegistry::builtin();
        assert_eq!(registry.len(), DocumentTypeKey::ALL.len());
        for key in DocumentTypeKey::ALL {
            assert_eq!(registry.resolve(key).unwrap().key, key);
            assert_eq!(registry.resolve_name(key.as_str()).unwrap().key, key);
        }
    }

    #[test]
    fn test_resolve_unknown_name() {
        let registry = TemplateRegistry::builtin();
        assert_eq!(
            registry.resolve_name("unknown-key").unwrap_err(),
            RegistryError::NotFound("unknown-key".to_string())
        );
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut table: Vec<Template> = DocumentTypeKey::ALL
            .into_iter()
            .map(templates::descriptor)
            .collect();
        table.push(templates::descriptor(DocumentTypeKey::Marriage));

        assert_eq!(
            TemplateRegistry::from_templates(table).unwrap_err(),
            RegistryError::DuplicateKey(DocumentTypeKey::Marriage)
        );
    }

    #[test]
    fn test_missing_key_rejected() {
        let table = DocumentTypeKey::ALL
            .into_iter()
            .filter(|k| *k != DocumentTypeKey::Ownership)
            .map(templates::descriptor);

        assert_eq!(
            TemplateRegistry::from_templates(table).unwrap_err(),
            RegistryError::MissingKey(DocumentTypeKey::Ownership)
        );
    }

    #[test]
    fn test_every_template_has_primary_slot_and_unique_fields() {
        for template in TemplateRegistry::builtin().templates() {
            assert_eq!(template.slots[0].id, SlotId::Primary, "{:?}", template.key);
            let mut names: Vec<_> = template.fields.iter().map(|f| f.name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), template.fields.len(), "{:?}", template.key);
        }
    }

    #[test]
    fn test_record_fields_name_declared_form_fields() {
        for template in TemplateRegistry::builtin().templates() {
            for record in template.records {
                if let RecordField::OwnershipText(source) | RecordField::Purpose(source) = record {
                    assert!(template.field(source).is_some(), "{:?} {}", template.key, source);
                }
            }
        }
    }
}
