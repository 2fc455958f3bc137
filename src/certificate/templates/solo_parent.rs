use super::{certify_resident, issued_paragraph, request_paragraph, salutation, PURPOSE};
use crate::certificate::computation::derive;
use crate::certificate::form::BodyContext;
use crate::certificate::key::DocumentTypeKey;
use crate::certificate::registry::{FieldKind, FieldSpec, RecordField, SlotSpec, Template};
use crate::certificate::render::{DocumentNode, Inline};
use crate::certificate::selector::SlotId;

const PARENT: &[SlotSpec] = &[SlotSpec {
    id: SlotId::Primary,
    label: "Solo parent",
}];

pub const TEMPLATE: Template = Template {
    key: DocumentTypeKey::SoloParent,
    title: "CERTIFICATION OF SOLO PARENT",
    slots: PARENT,
    fields: &[
        FieldSpec::required("children", "Children in custody", FieldKind::LongText),
        FieldSpec::optional("circumstance", "Circumstance", FieldKind::Text),
        PURPOSE,
    ],
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
        DocumentNode::Paragraph(vec![
            Inline::text(
                "This further certifies that the above-named person is a solo parent \
                 by reason of ",
            ),
            ctx.field("circumstance"),
            Inline::text(", solely providing parental care and support to "),
            ctx.field("children"),
            Inline::text("."),
        ]),
        request_paragraph(ctx, "purpose"),
        issued_paragraph(ctx),
    ]
}
