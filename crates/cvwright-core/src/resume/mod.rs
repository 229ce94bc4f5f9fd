mod document;
mod io;
mod yaml;

pub use document::{ResumeDocument, CARRIED_KEYS, CV_KEY, DESIGN_KEY, LOCALE_KEY, SETTINGS_KEY};
pub use io::{load_resume, read_job_description, save_resume};
pub use yaml::{from_yaml_str, to_yaml_string};
