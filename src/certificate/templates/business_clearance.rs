use super::{issued_paragraph, salutation};
use crate::certificate::computation::derive;
use crate::certificate::form::BodyContext;
use crate::certificate::key::DocumentTypeKey;
use crate::certificate::registry::{FieldKind, FieldSpec, RecordField, SlotSpec, Template};
use crate::certificate::render::{DocumentNode, Inline};
use crate::certificate::selector::SlotId;

const OWNER: &[SlotSpec] = &[SlotSpec {
    id: SlotId::Primary,
    label: "Business owner",
}];

pub const TEMPLATE: Template = Template {
    key: DocumentTypeKey::BusinessClearance,
    title: "BARANGAY BUSINESS CLEARANCE",
    slots: OWNER,
    fields: &[
        FieldSpec::required("business_name", "Business name", FieldKind::Text),
        FieldSpec::required("business_address", "Business address", FieldKind::Text),
        FieldSpec::optional("nature_of_business", "Nature of business", FieldKind::Text),
    ],
    // The record store has no business column; the clearance is filed under its business.
    records: &[RecordField::Purpose("business_name")],
    derive,
    body,
};

fn body(ctx: &BodyContext<'_>) -> Vec<DocumentNode> {
    let mut grant = vec![
        Inline::text("Clearance is hereby granted to "),
        ctx.name(SlotId::Primary),
        Inline::text(", owner/operator of "),
        ctx.field("business_name"),
        Inline::text(", engaged in "),
        ctx.field("nature_of_business"),
        Inline::text(", located at "),
        ctx.field("business_address"),
        Inline::text(", within the territorial jurisdiction of "),
    ];
    grant.extend(ctx.locality());
    grant.push(Inline::text("."));

    vec![
        salutation(),
        DocumentNode::Paragraph(grant),
        DocumentNode::Paragraph(vec![Inline::text(
            "This clearance is issued in compliance with the barangay ordinances on business \
             operations and is valid until the thirty-first day of December of the current year, \
             unless sooner revoked for violation of any law or ordinance.",
        )]),
        issued_paragraph(ctx),
    ]
}
