pub mod ai;
pub mod config;
pub mod error;
pub mod extract;
pub mod resume;

pub use ai::{ProviderSelection, ResumeService};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use extract::extract_resume_text;
pub use resume::{load_resume, read_job_description, save_resume, ResumeDocument};
