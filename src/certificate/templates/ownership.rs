use super::{certify_resident, issued_paragraph, request_paragraph, salutation, PURPOSE};
use crate::certificate::computation::derive;
use crate::certificate::form::BodyContext;
use crate::certificate::key::DocumentTypeKey;
use crate::certificate::registry::{FieldKind, FieldSpec, RecordField, SlotSpec, Template};
use crate::certificate::render::{DocumentNode, Inline};
use crate::certificate::selector::SlotId;

const OWNER: &[SlotSpec] = &[SlotSpec {
    id: SlotId::Primary,
    label: "Owner",
}];

pub const TEMPLATE: Template = Template {
    key: DocumentTypeKey::Ownership,
    title: "CERTIFICATE OF OWNERSHIP",
    slots: OWNER,
    fields: &[
        FieldSpec::required("ownership_text", "Property owned", FieldKind::LongText),
        PURPOSE,
    ],
    records: &[
        RecordField::Age,
        RecordField::CivilStatus,
        RecordField::OwnershipText("ownership_text"),
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
        DocumentNode::Paragraph(vec![
            Inline::text(
                "This further certifies that the above-named person is the lawful owner of ",
            ),
            ctx.field("ownership_text"),
            Inline::text(", as attested by the records of this office."),
        ]),
        request_paragraph(ctx, "purpose"),
        issued_paragraph(ctx),
    ]
}
