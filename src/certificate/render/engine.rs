//! Typst compilation engine.
//!
//! Handles the low-level details of writing an artifact to a temporary
//! directory, invoking the compiler, and collecting the output PDF.

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::{tempdir, TempDir};

use super::typst::{Artifact, MAIN_FILE};
use super::{GeneratedDocument, RenderError};
use crate::common::sanitize_filename;

const OUTPUT_FILE: &str = "certificate.pdf";

/// Compiles artifacts with the Typst CLI.
#[derive(Debug, Clone)]
pub struct TypstRenderEngine {
    binary: PathBuf,
}

impl TypstRenderEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Compile `artifact` to PDF.
    ///
    /// # Arguments
    /// * `artifact` - Typst source and the assets it references.
    /// * `kind` - Document kind used as the filename prefix (e.g. "residency").
    /// * `holder` - Name of the certificate holder, used in the filename.
    /// * `issued_on` - Issuance date reported back with the document.
    pub fn compile(
        &self,
        artifact: &Artifact,
        kind: &str,
        holder: &str,
        issued_on: NaiveDate,
    ) -> Result<GeneratedDocument, RenderError> {
        let temp_dir = tempdir().map_err(RenderError::TempDir)?;
        write_sources(&temp_dir, artifact)?;

        let pdf = self.compile_to_pdf(&temp_dir)?;

        let filename = format!(
            "{}-{}.pdf",
            sanitize_filename(kind, "certificate"),
            sanitize_filename(holder, "unnamed")
        );

        log::info!("Compiled {} ({} bytes)", filename, pdf.len());

        Ok(GeneratedDocument {
            filename,
            pdf,
            issued_on,
        })
    }

    fn compile_to_pdf(&self, temp_dir: &TempDir) -> Result<Vec<u8>, RenderError> {
        let output_path = temp_dir.path().join(OUTPUT_FILE);

        // Fixed epoch keeps the PDF metadata stable across runs.
        let status = Command::new(&self.binary)
            .arg("compile")
            .arg(MAIN_FILE)
            .arg(OUTPUT_FILE)
            .env("SOURCE_DATE_EPOCH", "0")
            .current_dir(temp_dir.path())
            .status()
            .map_err(RenderError::TypstIo)?;

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            return Err(RenderError::TypstExit(code));
        }

        fs::read(&output_path).map_err(RenderError::ReadPdf)
    }
}

fn write_sources(temp_dir: &TempDir, artifact: &Artifact) -> Result<(), RenderError> {
    fs::write(temp_dir.path().join(MAIN_FILE), &artifact.source)
        .map_err(RenderError::WriteSource)?;
    for (name, bytes) in &artifact.assets {
        fs::write(temp_dir.path().join(name), bytes).map_err(RenderError::WriteSource)?;
    }
    Ok(())
}
