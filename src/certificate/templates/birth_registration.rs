use super::{issued_paragraph, request_paragraph, salutation, PURPOSE};
use crate::certificate::computation::derive;
use crate::certificate::form::BodyContext;
use crate::certificate::key::DocumentTypeKey;
use crate::certificate::registry::{FieldKind, FieldSpec, RecordField, SlotSpec, Template};
use crate::certificate::render::{DocumentNode, Inline};
use crate::certificate::selector::SlotId;

const PARENT: &[SlotSpec] = &[SlotSpec {
    id: SlotId::Primary,
    label: "Parent",
}];

pub const TEMPLATE: Template = Template {
    key: DocumentTypeKey::BirthRegistration,
    title: "CERTIFICATION FOR LATE REGISTRATION OF BIRTH",
    slots: PARENT,
    fields: &[
        FieldSpec::required("child_name", "Name of child", FieldKind::Text),
        FieldSpec::required("child_birth_date", "Child's date of birth", FieldKind::Date),
        FieldSpec::optional("place_of_birth", "Place of birth", FieldKind::Text),
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
    let mut facts = vec![
        Inline::text("This is to certify that "),
        ctx.field("child_name"),
        Inline::text(", born on "),
        ctx.date_field("child_birth_date"),
        Inline::text(" at "),
        ctx.field("place_of_birth"),
        Inline::text(", is the child of "),
        ctx.name(SlotId::Primary),
        Inline::text(", "),
        ctx.civil_status(SlotId::Primary),
        Inline::text(", a resident of "),
    ];
    facts.extend(ctx.locality());
    facts.push(Inline::text("."));

    vec![
        salutation(),
        DocumentNode::Paragraph(facts),
        DocumentNode::Paragraph(vec![Inline::text(
            "Based on the records of this barangay and the testimony of the parent, the birth \
             of the said child has not been registered with the Local Civil Registrar.",
        )]),
        request_paragraph(ctx, "purpose"),
        issued_paragraph(ctx),
    ]
}
