//! Compiled-in document types. Each module declares its slots, fields,
//! record columns and body prose; everything else is shared.

mod barangay_clearance;
mod birth_registration;
mod business_clearance;
mod good_moral;
mod indigency;
mod marriage;
mod ownership;
mod residency;
mod solo_parent;
mod unemployment;

use super::form::BodyContext;
use super::key::DocumentTypeKey;
use super::registry::{FieldKind, FieldSpec, SlotSpec, Template};
use super::render::{DocumentNode, Inline};
use super::selector::SlotId;

/// Template for `key`. Adding a key without a template fails to compile.
pub fn descriptor(key: DocumentTypeKey) -> Template {
    match key {
        DocumentTypeKey::Residency => residency::TEMPLATE,
        DocumentTypeKey::Indigency => indigency::TEMPLATE,
        DocumentTypeKey::BusinessClearance => business_clearance::TEMPLATE,
        DocumentTypeKey::Marriage => marriage::TEMPLATE,
        DocumentTypeKey::BirthRegistration => birth_registration::TEMPLATE,
        DocumentTypeKey::Ownership => ownership::TEMPLATE,
        DocumentTypeKey::Unemployment => unemployment::TEMPLATE,
        DocumentTypeKey::SoloParent => solo_parent::TEMPLATE,
        DocumentTypeKey::GoodMoral => good_moral::TEMPLATE,
        DocumentTypeKey::BarangayClearance => barangay_clearance::TEMPLATE,
    }
}

pub(crate) const RESIDENT: &[SlotSpec] = &[SlotSpec {
    id: SlotId::Primary,
    label: "Resident",
}];

pub(crate) const PURPOSE: FieldSpec = FieldSpec::optional("purpose", "Purpose", FieldKind::Text);

/// "This is to certify that NAME, AGE years old, STATUS, of SECTION, Barangay ..."
pub(crate) fn certify_resident(ctx: &BodyContext<'_>, slot: SlotId) -> Vec<Inline> {
    let mut spans = vec![
        Inline::text("This is to certify that "),
        ctx.name(slot),
        Inline::text(", "),
        ctx.age(slot),
        Inline::text(" years old, "),
        ctx.civil_status(slot),
        Inline::text(", is a bona fide resident of "),
        ctx.section(slot),
        Inline::text(", "),
    ];
    spans.extend(ctx.locality());
    spans
}

/// "This certification is issued upon the request of ... for PURPOSE."
pub(crate) fn request_paragraph(ctx: &BodyContext<'_>, purpose_field: &str) -> DocumentNode {
    DocumentNode::Paragraph(vec![
        Inline::text(
            "This certification is issued upon the request of the above-named person for ",
        ),
        ctx.field(purpose_field),
        Inline::text(" and for whatever legal purpose it may serve."),
    ])
}

/// "Issued this 17th day of October, 2026 at Barangay ..."
pub(crate) fn issued_paragraph(ctx: &BodyContext<'_>) -> DocumentNode {
    let mut spans = vec![Inline::text("Issued this "), ctx.issued(), Inline::text(" at ")];
    spans.extend(ctx.locality());
    spans.push(Inline::text("."));
    DocumentNode::Paragraph(spans)
}

pub(crate) fn salutation() -> DocumentNode {
    DocumentNode::Line {
        spans: vec![Inline::strong("TO WHOM IT MAY CONCERN:")],
        align: super::render::Align::Left,
        size: super::render::TextSize::Normal,
    }
}
