use std::path::Path;

use crate::{Error, Result};

/// Read a plain text file as UTF-8, falling back to Latin-1 when it is not valid UTF-8.
/// `\r\n` and lone `\r` line endings become `\n`.
pub fn extract_plain_text(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).map_err(|e| Error::extraction("Failed to read text file", e))?;

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => decode_latin1(e.as_bytes()),
    };
    Ok(normalize_newlines(text))
}

fn normalize_newlines(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    // Latin-1 maps every byte to the code point of the same value
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.md");
        std::fs::write(&path, "# Zoë Müller\nBackend engineer").unwrap();

        assert_eq!(extract_plain_text(&path).unwrap(), "# Zoë Müller\nBackend engineer");
    }

    #[test]
    fn test_latin1_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.txt");
        // "Café" encoded as Latin-1
        std::fs::write(&path, [0x43, 0x61, 0x66, 0xE9]).unwrap();

        assert_eq!(extract_plain_text(&path).unwrap(), "Café");
    }

    #[test]
    fn test_line_endings_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.txt");
        std::fs::write(&path, "Jane Doe\r\nEngineer\rBerlin\n").unwrap();

        assert_eq!(extract_plain_text(&path).unwrap(), "Jane Doe\nEngineer\nBerlin\n");
    }

    #[test]
    fn test_empty_file_is_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.rst");
        std::fs::write(&path, "").unwrap();

        assert_eq!(extract_plain_text(&path).unwrap(), "");
    }

    #[test]
    fn test_directory_read_failure_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_plain_text(dir.path()).unwrap_err();

        assert!(err.to_string().starts_with("Failed to read text file"));
    }
}
