use std::path::Path;

use crate::Result;

/// Extract text from every page of a PDF, joining non-empty pages with a blank line
#[cfg(feature = "pdf")]
pub fn extract_pdf_text(path: &Path) -> Result<String> {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use crate::Error;

    const CONTEXT: &str = "Failed to extract text from PDF";

    let bytes = std::fs::read(path).map_err(|e| Error::extraction(CONTEXT, e))?;

    // pdf-extract panics on some malformed documents instead of returning an error
    let pages = catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&bytes)
    }))
    .map_err(|_| Error::extraction(CONTEXT, "the PDF parser aborted on malformed input"))?
    .map_err(|e| Error::extraction(CONTEXT, e.to_string()))?;

    tracing::debug!("Extracted {} pages from {}", pages.len(), path.display());

    Ok(join_pages(pages))
}

#[cfg(not(feature = "pdf"))]
pub fn extract_pdf_text(_path: &Path) -> Result<String> {
    Err(crate::Error::MissingDependency(
        "PDF support is not available. Rebuild with: cargo install cvwright-cli --features pdf"
            .to_string(),
    ))
}

#[cfg_attr(not(feature = "pdf"), allow(dead_code))]
fn join_pages(pages: Vec<String>) -> String {
    pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_pages_skips_blank_pages() {
        let pages = vec![
            "Jane Doe\nEngineer".to_string(),
            "\n  \n".to_string(),
            "Experience".to_string(),
        ];
        assert_eq!(join_pages(pages), "Jane Doe\nEngineer\n\nExperience");
    }

    #[test]
    fn test_join_pages_all_blank() {
        assert_eq!(join_pages(vec![String::new(), "\n".to_string()]), "");
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_garbage_pdf_is_wrapped_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = extract_pdf_text(&path).unwrap_err();
        assert!(matches!(err, crate::Error::Extraction { .. }));
        assert!(err.to_string().starts_with("Failed to extract text from PDF"));
    }
}
