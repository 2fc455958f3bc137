//! End-to-end issuance flows against the in-memory directory and store.

mod common;

use chrono::{Duration, TimeZone, Utc};

use barangay_certificates::certificate::{
    CertificateError, DocumentTypeKey, RegistryError, SessionOptions, SessionPhase, SlotId,
    TemplateRegistry,
};
use barangay_certificates::directory::InMemoryDirectory;
use common::{Fixture, PNG_LOGO};

#[tokio::test]
async fn test_residency_for_juan_dela_cruz() {
    let fixture = Fixture::new();
    let mut session = fixture.open(DocumentTypeKey::Residency).await;

    session.set_query(SlotId::Primary, "dela").unwrap();
    let candidates = session.candidates(SlotId::Primary).unwrap();
    assert_eq!(candidates.len(), 1);
    let juan = candidates[0].id;

    session.select(SlotId::Primary, juan).unwrap();
    session.set_field("purpose", "employment").unwrap();
    session.set_amount("10.00");

    let tree = session.render_tree();
    assert_eq!(tree.pages.len(), 1);
    let page = &tree.pages[0];
    assert!(page.header_text().contains("SAN ISIDRO"));
    let body = page.body_text();
    assert!(body.contains("CERTIFICATE OF RESIDENCY"));
    assert!(body.contains("JUAN DELA CRUZ, 36 years old, single"));
    assert!(body.contains("since 2005"));
    assert!(body.contains("for employment"));
    assert!(body.contains("17th day of October, 2026"));
    let footer = page.footer_text();
    assert!(footer.contains("Amount Paid: PHP 10.00"));
    assert!(footer.contains("HON. RAMON VILLANUEVA BAUTISTA"));
    assert!(footer.contains("Date Issued: October 17, 2026"));

    let record = session.issue(&fixture.recorder).await.unwrap();
    assert_eq!(record.resident_name, "Juan Dela Cruz");
    assert_eq!(record.key, DocumentTypeKey::Residency);
    assert_eq!(record.amount, "10.00");
    assert_eq!(record.derived_fields.age, Some(36));

    let payloads = fixture.store.payloads();
    assert_eq!(payloads.len(), 1);
    let payload = &payloads[0];
    assert_eq!(payload.resident_name, "Juan Dela Cruz");
    assert_eq!(payload.type_, "Residency Certificate");
    assert_eq!(payload.issued_date, "2026-10-17T01:30:00.000Z");
    assert_eq!(payload.age, Some(36));
    assert_eq!(payload.civil_status.as_deref(), Some("Single"));
    assert_eq!(payload.purpose.as_deref(), Some("employment"));
    assert_eq!(payload.ownership_text, None);
    assert_eq!(session.phase(), SessionPhase::Committed);
}

#[tokio::test]
async fn test_issue_without_selection_is_rejected_before_the_store() {
    let fixture = Fixture::new();
    let mut session = fixture.open(DocumentTypeKey::Residency).await;
    session.set_amount("10.00");

    let err = session.issue(&fixture.recorder).await.unwrap_err();
    match err {
        CertificateError::Validation(errors) => {
            assert!(errors.contains_field("primary"));
            assert_eq!(errors.errors()[0].message, "no entity selected");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(fixture.store.insert_calls(), 0);
    assert_eq!(session.phase(), SessionPhase::Empty);
}

#[tokio::test]
async fn test_marriage_slots_are_independent() {
    let fixture = Fixture::new();
    let mut session = fixture.open(DocumentTypeKey::Marriage).await;

    session.select(SlotId::Primary, 3).unwrap();
    session.select(SlotId::Secondary, 2).unwrap();
    let husband = session.form().derived(SlotId::Primary).clone();

    session.select(SlotId::Secondary, 4).unwrap();
    assert_eq!(session.form().derived(SlotId::Primary), &husband);
    assert_eq!(session.form().derived(SlotId::Secondary).civil_status, "Widowed");

    session.clear(SlotId::Secondary).unwrap();

    let form = session.form();
    assert_eq!(form.derived(SlotId::Primary).civil_status, "Married");
    assert_eq!(form.derived(SlotId::Primary).age, Some(50));
    assert_eq!(form.derived(SlotId::Secondary).age, None);
    assert_eq!(form.derived(SlotId::Secondary).civil_status, "");

    session.set_field("date_of_marriage", "2001-02-14").unwrap();
    let err = session.issue(&fixture.recorder).await.unwrap_err();
    match err {
        CertificateError::Validation(errors) => {
            assert!(errors.contains_field("secondary"));
            assert!(!errors.contains_field("primary"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    session.select(SlotId::Secondary, 4).unwrap();
    let record = session.issue(&fixture.recorder).await.unwrap();
    assert_eq!(record.resident_name, "Pedro Garcia & Ana Mendoza");
    assert_eq!(record.derived_fields.civil_status.as_deref(), Some("Married"));
}

#[tokio::test]
async fn test_single_slot_document_has_no_secondary() {
    let fixture = Fixture::new();
    let mut session = fixture.open(DocumentTypeKey::Indigency).await;
    assert!(session.select(SlotId::Secondary, 1).is_err());
    assert!(session.set_field("business_name", "Sari-sari").is_err());
}

#[tokio::test]
async fn test_required_fields_and_amount_format() {
    let fixture = Fixture::new();
    let mut session = fixture.open(DocumentTypeKey::Indigency).await;
    session.select(SlotId::Primary, 2).unwrap();
    session.set_amount("ten pesos");

    let err = session.issue(&fixture.recorder).await.unwrap_err();
    match err {
        CertificateError::Validation(errors) => {
            assert!(errors.contains_field("purpose"));
            assert!(errors.contains_field("amount"));
            assert_eq!(errors.len(), 2);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(fixture.store.insert_calls(), 0);

    session.set_field("purpose", "medical assistance").unwrap();
    session.set_amount("0");
    session.issue(&fixture.recorder).await.unwrap();
    assert_eq!(fixture.store.insert_calls(), 1);
}

#[tokio::test]
async fn test_duplicate_issuance_appends_twice() {
    let fixture = Fixture::new();
    let mut session = fixture.open(DocumentTypeKey::GoodMoral).await;
    session.select(SlotId::Primary, 1).unwrap();
    session.set_amount("50");

    let first = session.issue(&fixture.recorder).await.unwrap();
    let second = session.issue(&fixture.recorder).await.unwrap();

    assert_ne!(first.id, second.id);
    let payloads = fixture.store.payloads();
    assert_eq!(payloads.len(), 2);
    assert_eq!(payloads[0], payloads[1]);
}

#[tokio::test]
async fn test_age_is_frozen_at_selection_time() {
    // The day before Juan's 36th birthday, Manila time.
    let fixture = Fixture::at(Utc.with_ymd_and_hms(2026, 6, 14, 2, 0, 0).unwrap());
    let mut session = fixture.open(DocumentTypeKey::Residency).await;
    session.select(SlotId::Primary, 1).unwrap();
    assert_eq!(session.form().derived(SlotId::Primary).age, Some(35));

    fixture.clock.advance(Duration::days(1));
    let record = session.issue(&fixture.recorder).await.unwrap();

    assert_eq!(record.derived_fields.age, Some(35));
    assert_eq!(
        fixture.store.payloads()[0].issued_date,
        "2026-06-15T02:00:00.000Z"
    );
}

#[tokio::test]
async fn test_persistence_failure_keeps_the_form() {
    let fixture = Fixture::new();
    let mut session = fixture.open(DocumentTypeKey::Residency).await;
    session.select(SlotId::Primary, 1).unwrap();
    session.set_amount("10.00");
    let before = session.form().state();

    fixture.store.fail_next_inserts(true);
    let err = session.issue(&fixture.recorder).await.unwrap_err();
    assert!(matches!(err, CertificateError::Persistence(_)));
    assert_eq!(session.form().state(), before);
    assert_eq!(session.phase(), SessionPhase::Populated);

    fixture.store.fail_next_inserts(false);
    session.issue(&fixture.recorder).await.unwrap();
    assert_eq!(session.phase(), SessionPhase::Committed);
}

#[tokio::test]
async fn test_reset_on_commit_empties_the_form() {
    let fixture = Fixture::new();
    let options = SessionOptions {
        reset_on_commit: true,
        ..SessionOptions::default()
    };
    let mut session = fixture.open_with(DocumentTypeKey::Residency, options).await;
    session.select(SlotId::Primary, 1).unwrap();
    session.set_amount("10.00");
    session.issue(&fixture.recorder).await.unwrap();

    assert!(session.form().state().selections.is_empty());
    assert_eq!(session.form().state().amount, "");
    assert!(session.last_record().is_some());
}

#[tokio::test]
async fn test_preview_is_reproducible() {
    let fixture = Fixture::new();
    let mut session = fixture.open(DocumentTypeKey::BarangayClearance).await;
    session.select(SlotId::Primary, 2).unwrap();
    session.set_field("purpose", "travel").unwrap();

    let first = session.preview();
    let second = session.preview();
    assert_eq!(first.to_bytes(), second.to_bytes());
    assert!(first.source.contains("MARIA LOPEZ SANTOS"));
}

#[tokio::test]
async fn test_preview_renders_blanks_for_empty_form() {
    let fixture = Fixture::new();
    let session = fixture.open(DocumentTypeKey::Ownership).await;
    let body = session.render_tree().pages[0].body_text();
    assert!(body.contains(barangay_certificates::certificate::render::BLANK));
}

#[tokio::test]
async fn test_barangay_logo_becomes_seal_and_watermark() {
    let fixture =
        Fixture::new().with_directory(InMemoryDirectory::sample().with_logo(PNG_LOGO.to_vec()));
    let mut session = fixture.open(DocumentTypeKey::Residency).await;
    session.select(SlotId::Primary, 1).unwrap();

    let preview = session.preview();
    assert_eq!(preview.assets.len(), 1);
    assert_eq!(&*preview.assets["seal.png"], PNG_LOGO);
    assert!(preview.source.contains("#image(\"seal.png\""));
    assert!(preview.source.contains("transparentize(10%)"));
    assert!(preview.source.contains("JUAN DELA CRUZ"));
}

#[tokio::test]
async fn test_failing_logo_still_previews() {
    let fixture = Fixture::new().with_directory(InMemoryDirectory::sample().with_failing_logo());
    let mut session = fixture.open(DocumentTypeKey::Residency).await;
    session.select(SlotId::Primary, 1).unwrap();

    let preview = session.preview();
    assert!(preview.assets.is_empty());
    assert!(!preview.source.contains("seal.png"));
    assert!(preview.source.contains("JUAN DELA CRUZ"));
}

#[tokio::test]
async fn test_directory_is_read_once_per_session() {
    let fixture = Fixture::new();
    let mut session = fixture.open(DocumentTypeKey::Residency).await;

    for query in ["j", "ju", "mar", ""] {
        session.set_query(SlotId::Primary, query).unwrap();
        session.candidates(SlotId::Primary).unwrap();
    }
    session.select(SlotId::Primary, 1).unwrap();
    session.preview();

    assert_eq!(fixture.directory.resident_fetches(), 1);
}

#[test]
fn test_unknown_document_type_is_not_found() {
    let registry = TemplateRegistry::builtin();
    assert_eq!(registry.len(), DocumentTypeKey::ALL.len());
    assert!(matches!(
        registry.resolve_name("unknown-key"),
        Err(RegistryError::NotFound(_))
    ));
    assert_eq!(
        registry.resolve_name("solo-parent").unwrap().key,
        DocumentTypeKey::SoloParent
    );
}
