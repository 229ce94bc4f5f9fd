//! Plain-text extraction from resume files.
//!
//! Dispatch is strictly by lowercase file extension. PDF and DOCX support sit
//! behind the `pdf` and `docx` Cargo features; when compiled out they report
//! [`Error::MissingDependency`] instead of a parse failure.

mod docx;
mod pdf;
mod text;

use std::path::Path;

use tracing::debug;

use crate::{Error, Result};

pub use docx::extract_docx_text;
pub use pdf::extract_pdf_text;
pub use text::extract_plain_text;

/// Input formats accepted for resume extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    /// Resolve the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" | "md" | "rst" => Ok(Self::PlainText),
            _ => Err(Error::UnsupportedFormat {
                extension: if extension.is_empty() {
                    String::new()
                } else {
                    format!(".{extension}")
                },
            }),
        }
    }
}

/// Extract the full text of a resume file (PDF, DOCX, TXT, MD or RST)
pub fn extract_resume_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let format = DocumentFormat::from_path(path)?;
    debug!("Extracting {:?} text from {}", format, path.display());

    match format {
        DocumentFormat::Pdf => extract_pdf_text(path),
        DocumentFormat::Docx => extract_docx_text(path),
        DocumentFormat::PlainText => extract_plain_text(path),
    }
}
