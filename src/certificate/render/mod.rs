//! Certificate rendering: letterhead, type-specific body and footer are
//! composed into a page, serialized to Typst, and optionally compiled to PDF.
//!
//! The same `DocumentRenderer` serves the on-screen preview and the exported
//! file, so identical inputs always give identical artifacts.

pub mod document;
pub mod engine;
pub mod footer;
pub mod header;
pub mod typst;

use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;

pub use document::{Align, DocumentNode, DocumentTree, Inline, Page, TextSize, Watermark, BLANK};
pub use engine::TypstRenderEngine;
pub use footer::Footer;
pub use header::Header;
pub use typst::Artifact;

/// Errors that can occur while producing a PDF.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst sources: {0}")]
    WriteSource(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}")]
    TypstExit(i32),
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
}

/// Result of a successful PDF export.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: String,
    pub pdf: Vec<u8>,
    pub issued_on: NaiveDate,
}

/// Page and typography settings handed to the renderer at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub paper: String,
    pub font_family: String,
    pub font_size_pt: u8,
    pub margin_mm: u8,
    pub seal_width_mm: u8,
    pub watermark_width_mm: u16,
    pub watermark_opacity_pct: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            paper: "us-letter".to_string(),
            font_family: "Libertinus Serif".to_string(),
            font_size_pt: 12,
            margin_mm: 25,
            seal_width_mm: 24,
            watermark_width_mm: 120,
            watermark_opacity_pct: 10,
        }
    }
}

/// Type-specific part of a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    pub title: String,
    pub nodes: Vec<DocumentNode>,
}

#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    options: RenderOptions,
    engine: TypstRenderEngine,
}

impl DocumentRenderer {
    pub fn new(options: RenderOptions, engine: TypstRenderEngine) -> Self {
        Self { options, engine }
    }

    /// Compose one certificate page.
    pub fn render(&self, header: &Header, body: &Body, footer: &Footer) -> DocumentTree {
        let mut assets = BTreeMap::new();
        let seal = header.seal_asset().map(|(name, bytes)| {
            assets.insert(name.clone(), bytes);
            name
        });

        let page = Page {
            watermark: seal.as_ref().map(|asset| Watermark {
                asset: asset.clone(),
                opacity_pct: self.options.watermark_opacity_pct,
            }),
            header: header.nodes(seal.as_deref()),
            body: body.nodes.clone(),
            footer: footer.nodes(),
        };

        DocumentTree {
            title: body.title.clone(),
            pages: vec![page],
            assets,
        }
    }

    /// Serialize a tree to the printable artifact.
    pub fn artifact(&self, tree: &DocumentTree) -> Artifact {
        typst::to_artifact(tree, &self.options)
    }

    /// Compile a tree's artifact to PDF.
    pub fn export_pdf(
        &self,
        tree: &DocumentTree,
        kind: &str,
        holder: &str,
        issued_on: NaiveDate,
    ) -> Result<GeneratedDocument, RenderError> {
        self.engine
            .compile(&self.artifact(tree), kind, holder, issued_on)
    }
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default(), TypstRenderEngine::new("typst"))
    }
}
