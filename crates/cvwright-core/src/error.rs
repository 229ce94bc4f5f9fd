use std::path::PathBuf;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    MissingDependency(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to load YAML file: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unsupported file format: {extension}. Supported formats: PDF, DOCX, TXT, MD")]
    UnsupportedFormat { extension: String },

    #[error("{context}: {source}")]
    Extraction {
        context: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    InvalidResponse(String),
}

impl Error {
    /// Wrap an underlying library failure with a short description of what was attempted.
    pub fn extraction(context: &'static str, source: impl Into<BoxError>) -> Self {
        Error::Extraction {
            context,
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_extraction_keeps_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad xref table");
        let err = Error::extraction("Failed to extract text from PDF", io);

        assert_eq!(err.to_string(), "Failed to extract text from PDF: bad xref table");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_unsupported_format_names_allowed_set() {
        let err = Error::UnsupportedFormat {
            extension: ".xyz".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported file format: .xyz. Supported formats: PDF, DOCX, TXT, MD"
        );
    }
}
