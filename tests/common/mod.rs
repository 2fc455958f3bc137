//! Shared fixtures: the sample barangay, a fixed clock and in-memory stores.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;

use barangay_certificates::certificate::{
    DocumentRenderer, DocumentTypeKey, EditingSession, FixedClock, IssuanceRecorder,
    SessionOptions, TemplateRegistry,
};
use barangay_certificates::directory::{DirectoryContext, InMemoryDirectory};
use barangay_certificates::store::InMemoryCertificateStore;
use barangay_certificates::AppState;

/// Smallest header a PNG decoder sniffs for.
pub const PNG_LOGO: &[u8] = b"\x89PNG\r\n\x1a\n";

/// 2026-10-17 09:30 in Manila.
pub fn office_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 1, 30, 0).unwrap()
}

pub struct Fixture {
    pub directory: Arc<InMemoryDirectory>,
    pub store: Arc<InMemoryCertificateStore>,
    pub clock: Arc<FixedClock>,
    pub recorder: IssuanceRecorder,
}

impl Fixture {
    pub fn new() -> Self {
        Self::at(office_morning())
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        let store = Arc::new(InMemoryCertificateStore::new());
        Self {
            directory: Arc::new(InMemoryDirectory::sample()),
            recorder: IssuanceRecorder::new(store.clone()),
            store,
            clock: Arc::new(FixedClock::new(now)),
        }
    }

    /// Same clock and store, different directory.
    pub fn with_directory(mut self, directory: InMemoryDirectory) -> Self {
        self.directory = Arc::new(directory);
        self
    }

    pub async fn open(&self, key: DocumentTypeKey) -> EditingSession {
        self.open_with(key, SessionOptions::default()).await
    }

    pub async fn open_with(&self, key: DocumentTypeKey, options: SessionOptions) -> EditingSession {
        let template = *TemplateRegistry::builtin().resolve(key).unwrap();
        let context = DirectoryContext::load(self.directory.as_ref())
            .await
            .unwrap();
        EditingSession::open(
            template,
            Arc::new(context),
            Arc::new(DocumentRenderer::default()),
            self.clock.clone(),
            options,
        )
    }

    pub fn app_state(&self) -> AppState {
        self.app_state_with(self.directory.clone())
    }

    pub fn app_state_with(&self, directory: Arc<InMemoryDirectory>) -> AppState {
        AppState::new(
            directory,
            self.store.clone(),
            DocumentRenderer::default(),
            self.clock.clone(),
            SessionOptions::default(),
            Duration::from_secs(600),
        )
    }
}
