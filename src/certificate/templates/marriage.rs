use super::{issued_paragraph, salutation};
use crate::certificate::computation::derive;
use crate::certificate::form::BodyContext;
use crate::certificate::key::DocumentTypeKey;
use crate::certificate::registry::{FieldKind, FieldSpec, RecordField, SlotSpec, Template};
use crate::certificate::render::{DocumentNode, Inline};
use crate::certificate::selector::SlotId;

const SPOUSES: &[SlotSpec] = &[
    SlotSpec {
        id: SlotId::Primary,
        label: "Husband",
    },
    SlotSpec {
        id: SlotId::Secondary,
        label: "Wife",
    },
];

pub const TEMPLATE: Template = Template {
    key: DocumentTypeKey::Marriage,
    title: "CERTIFICATE OF MARRIAGE",
    slots: SPOUSES,
    fields: &[
        FieldSpec::required("date_of_marriage", "Date of marriage", FieldKind::Date),
        FieldSpec::optional("place_of_marriage", "Place of marriage", FieldKind::Text),
    ],
    records: &[RecordField::Age, RecordField::CivilStatus],
    derive,
    body,
};

fn spouse(ctx: &BodyContext<'_>, slot: SlotId) -> Vec<Inline> {
    vec![
        ctx.name(slot),
        Inline::text(", "),
        ctx.age(slot),
        Inline::text(" years old"),
    ]
}

fn body(ctx: &BodyContext<'_>) -> Vec<DocumentNode> {
    let mut couple = vec![Inline::text("This is to certify that ")];
    couple.extend(spouse(ctx, SlotId::Primary));
    couple.push(Inline::text(", and "));
    couple.extend(spouse(ctx, SlotId::Secondary));
    couple.push(Inline::text(", both residents of "));
    couple.extend(ctx.locality());
    couple.extend([
        Inline::text(", were joined in marriage on "),
        ctx.date_field("date_of_marriage"),
        Inline::text(" at "),
        ctx.field("place_of_marriage"),
        Inline::text(", and have since lived together as husband and wife in this barangay."),
    ]);

    vec![
        salutation(),
        DocumentNode::Paragraph(couple),
        DocumentNode::Paragraph(vec![Inline::text(
            "This certification is issued upon the request of the above-named spouses \
             for whatever legal purpose it may serve.",
        )]),
        issued_paragraph(ctx),
    ]
}
