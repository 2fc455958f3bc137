use super::{certify_resident, issued_paragraph, request_paragraph, salutation, PURPOSE, RESIDENT};
use crate::certificate::computation::derive;
use crate::certificate::form::BodyContext;
use crate::certificate::key::DocumentTypeKey;
use crate::certificate::registry::{RecordField, Template};
use crate::certificate::render::{DocumentNode, Inline};
use crate::certificate::selector::SlotId;

pub const TEMPLATE: Template = Template {
    key: DocumentTypeKey::GoodMoral,
    title: "CERTIFICATE OF GOOD MORAL CHARACTER",
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
    certify.push(Inline::text("."));

    vec![
        salutation(),
        DocumentNode::Paragraph(certify),
        DocumentNode::Paragraph(vec![Inline::text(
            "This further certifies that the above-named person is known to be of good moral \
             character and a law-abiding citizen, with no derogatory record on file in this office.",
        )]),
        request_paragraph(ctx, "purpose"),
        issued_paragraph(ctx),
    ]
}
