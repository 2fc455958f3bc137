use super::{certify_resident, issued_paragraph, request_paragraph, salutation, RESIDENT};
use crate::certificate::computation::derive;
use crate::certificate::form::BodyContext;
use crate::certificate::key::DocumentTypeKey;
use crate::certificate::registry::{FieldKind, FieldSpec, RecordField, Template};
use crate::certificate::render::{DocumentNode, Inline};
use crate::certificate::selector::SlotId;

pub const TEMPLATE: Template = Template {
    key: DocumentTypeKey::BarangayClearance,
    title: "BARANGAY CLEARANCE",
    slots: RESIDENT,
    fields: &[FieldSpec::required("purpose", "Purpose", FieldKind::Text)],
    records: &[
        RecordField::Age,
        RecordField::CivilStatus,
        RecordField::Purpose("purpose"),
    ],
    derive,
    body,
};

fn body(ctx: &BodyContext<'_>) -> Vec<DocumentNode> {
    let mut certify = certify_resident(ctx, SlotId::Primary);
    certify.push(Inline::text("."));

    vec![
        salutation(),
        DocumentNode::Paragraph(certify),
        DocumentNode::Paragraph(vec![Inline::text(
            "This further certifies that the above-named person has no pending case or \
             complaint filed before the Lupong Tagapamayapa of this barangay as of this date.",
        )]),
        request_paragraph(ctx, "purpose"),
        issued_paragraph(ctx),
    ]
}
