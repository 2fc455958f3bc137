use super::{certify_resident, issued_paragraph, request_paragraph, salutation, PURPOSE, RESIDENT};
use crate::certificate::computation::derive;
use crate::certificate::form::BodyContext;
use crate::certificate::key::DocumentTypeKey;
use crate::certificate::registry::{RecordField, Template};
use crate::certificate::render::{DocumentNode, Inline};
use crate::certificate::selector::SlotId;

pub const TEMPLATE: Template = Template {
    key: DocumentTypeKey::Residency,
    title: "CERTIFICATE OF RESIDENCY",
    slots: RESIDENT,
    fields: &[PURPOSE],
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
    certify.extend([
        Inline::text(" since "),
        ctx.residing_since(SlotId::Primary),
        Inline::text("."),
    ]);

    vec![
        salutation(),
        DocumentNode::Paragraph(certify),
        request_paragraph(ctx, "purpose"),
        issued_paragraph(ctx),
    ]
}
