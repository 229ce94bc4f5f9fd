use std::path::Path;

use tracing::{debug, warn};

use super::document::ResumeDocument;
use super::yaml::{from_yaml_str, to_yaml_string};
use crate::{Error, Result};

/// Write `doc` as YAML to `path`, overwriting it. `design` and `locale`
/// blocks are injected from `theme` and `locale` when the document has none.
pub fn save_resume(doc: &ResumeDocument, path: &Path, theme: &str, locale: &str) -> Result<()> {
    let mut doc = doc.clone();
    doc.ensure_metadata(theme, locale);

    let yaml = to_yaml_string(&doc)?;
    std::fs::write(path, yaml)?;

    debug!("Saved resume to {}", path.display());
    Ok(())
}

/// Read a resume YAML file. The root must be a mapping.
pub fn load_resume(path: &Path) -> Result<ResumeDocument> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path)?;
    from_yaml_str(&text, &path.display().to_string())
}

/// Job description from a file when `source` names a readable file,
/// otherwise `source` itself is the description.
pub fn read_job_description(source: &str) -> String {
    let path = Path::new(source);
    if path.is_file() {
        match std::fs::read_to_string(path) {
            Ok(text) => return text,
            Err(e) => warn!("Could not read {}: {}; using it as literal text", source, e),
        }
    }
    source.to_string()
}
