use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use super::factory::{get_ai_provider, ProviderSelection};
use super::prompts::{
    fill, GENERATE_SYSTEM_PROMPT, GENERATE_USER_TEMPLATE, PARSE_SYSTEM_PROMPT,
    PARSE_USER_TEMPLATE, POLISH_SYSTEM_PROMPT, POLISH_USER_TEMPLATE, TAILOR_SYSTEM_PROMPT,
    TAILOR_USER_TEMPLATE,
};
use super::providers::{AiProvider, GenerationParams};
use crate::config::AppConfig;
use crate::extract::extract_resume_text;
use crate::resume::ResumeDocument;
use crate::{Error, Result};

const PARSE_TEMPERATURE: f32 = 0.2;
const POLISH_TEMPERATURE: f32 = 0.5;
const TAILOR_TEMPERATURE: f32 = 0.4;
const GENERATE_TEMPERATURE: f32 = 0.6;

/// Resume operations backed by one AI provider
pub struct ResumeService {
    provider: Arc<dyn AiProvider>,
}

impl ResumeService {
    pub fn new(provider: Arc<dyn AiProvider>) -> Self {
        Self { provider }
    }

    /// Resolve provider and credential, then build the backend client.
    /// Config-file provider and model apply where `selection` leaves them unset.
    pub fn from_selection(selection: &ProviderSelection, config: &AppConfig) -> Result<Self> {
        let selection = selection.clone().with_defaults(&config.ai);
        let provider = get_ai_provider(&selection, &config.ai)?;
        Ok(Self::new(provider))
    }

    pub fn provider(&self) -> &dyn AiProvider {
        self.provider.as_ref()
    }

    /// Extract text from a PDF, DOCX or plain-text resume and structure it
    pub async fn parse_resume(&self, path: &Path) -> Result<ResumeDocument> {
        let resume_text = extract_resume_text(path)?;

        if resume_text.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "Could not extract any text from {}. The file may be image-based or corrupted.",
                path.display()
            )));
        }

        info!(
            "Parsing {} ({} characters extracted)",
            path.display(),
            resume_text.len()
        );

        let prompt = fill(PARSE_USER_TEMPLATE, &[("resume_text", resume_text.as_str())]);
        let reply = self
            .request(&prompt, PARSE_SYSTEM_PROMPT, PARSE_TEMPERATURE)
            .await?;

        require_cv(reply, "resume structure")
    }

    /// Improve wording; `focus_areas` are appended to the request when given
    pub async fn polish_resume(
        &self,
        resume: &ResumeDocument,
        focus_areas: &[String],
    ) -> Result<ResumeDocument> {
        let resume_json = resume.to_pretty_json()?;
        let mut prompt = fill(POLISH_USER_TEMPLATE, &[("resume_json", resume_json.as_str())]);
        if !focus_areas.is_empty() {
            prompt.push_str("\n\nPlease focus especially on improving: ");
            prompt.push_str(&focus_areas.join(", "));
        }

        info!("Polishing resume");
        let reply = self
            .request(&prompt, POLISH_SYSTEM_PROMPT, POLISH_TEMPERATURE)
            .await?;

        require_cv(reply, "polished resume")
    }

    /// Adapt a resume to a job posting
    pub async fn tailor_resume(
        &self,
        resume: &ResumeDocument,
        job_description: &str,
    ) -> Result<ResumeDocument> {
        if job_description.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Job description cannot be empty.".to_string(),
            ));
        }

        let resume_json = resume.to_pretty_json()?;
        let prompt = fill(
            TAILOR_USER_TEMPLATE,
            &[
                ("job_description", job_description),
                ("resume_json", resume_json.as_str()),
            ],
        );

        info!("Tailoring resume to job description");
        let reply = self
            .request(&prompt, TAILOR_SYSTEM_PROMPT, TAILOR_TEMPERATURE)
            .await?;

        // Replies sometimes wrap the resume next to an analysis block
        match ResumeDocument::from_reply(reply) {
            Some(doc) if doc.has_cv() => Ok(doc),
            Some(doc) => match doc.nested_resume() {
                Some(inner) => {
                    warn!("Tailored resume was nested under \"resume\"; unwrapping");
                    Ok(inner)
                }
                None => Err(invalid_reply("tailored resume")),
            },
            None => Err(invalid_reply("tailored resume")),
        }
    }

    /// Write a new resume from free-form notes
    pub async fn generate_resume(&self, user_info: &str) -> Result<ResumeDocument> {
        if user_info.trim().is_empty() {
            return Err(Error::InvalidInput(
                "User information cannot be empty.".to_string(),
            ));
        }

        let prompt = fill(GENERATE_USER_TEMPLATE, &[("user_info", user_info)]);

        info!("Generating resume");
        let reply = self
            .request(&prompt, GENERATE_SYSTEM_PROMPT, GENERATE_TEMPERATURE)
            .await?;

        require_cv(reply, "resume")
    }

    async fn request(
        &self,
        prompt: &str,
        system_prompt: &str,
        temperature: f32,
    ) -> Result<serde_json::Value> {
        let params = GenerationParams::json().with_temperature(temperature);
        self.provider
            .generate_json(prompt, Some(system_prompt), params)
            .await
    }
}

fn require_cv(reply: serde_json::Value, what: &str) -> Result<ResumeDocument> {
    ResumeDocument::from_reply(reply)
        .filter(ResumeDocument::has_cv)
        .ok_or_else(|| invalid_reply(what))
}

fn invalid_reply(what: &str) -> Error {
    Error::InvalidResponse(format!(
        "AI failed to generate valid {what}. Please try again."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::providers::mock::MockProvider;
    use serde_json::json;
    use tempfile::tempdir;

    fn service(mock: &Arc<MockProvider>) -> ResumeService {
        ResumeService::new(mock.clone())
    }

    fn sample_resume() -> ResumeDocument {
        ResumeDocument::from_reply(json!({
            "cv": {"name": "Jane Doe", "sections": {"skills": [{"label": "Languages", "details": "Rust"}]}},
            "design": {"theme": "classic"}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_parse_sends_text_at_low_temperature() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "Jane Doe\nSoftware Engineer at Acme").unwrap();

        let mock = Arc::new(MockProvider::with_reply(json!({"cv": {"name": "Jane Doe"}})));
        let doc = service(&mock).parse_resume(&path).await.unwrap();

        assert_eq!(doc.cv(), Some(&json!({"name": "Jane Doe"})));
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].prompt.contains("Software Engineer at Acme"));
        assert_eq!(calls[0].system_prompt.as_deref(), Some(PARSE_SYSTEM_PROMPT));
        assert_eq!(calls[0].params.temperature, 0.2);
    }

    #[tokio::test]
    async fn test_parse_blank_text_fails_before_any_call() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blank.md");
        std::fs::write(&path, "  \n\t\n").unwrap();

        let mock = Arc::new(MockProvider::new(vec![]));
        let err = service(&mock).parse_resume(&path).await.unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("Could not extract any text from"));
        assert!(message.contains("image-based or corrupted"));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_parse_reply_without_cv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "Jane Doe").unwrap();

        let mock = Arc::new(MockProvider::with_reply(json!({"name": "Jane Doe"})));
        let err = service(&mock).parse_resume(&path).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "AI failed to generate valid resume structure. Please try again."
        );
    }

    #[tokio::test]
    async fn test_polish_embeds_resume_and_focus_areas() {
        let mock = Arc::new(MockProvider::with_reply(json!({"cv": {"name": "Jane Doe"}})));
        let focus = vec!["action verbs".to_string(), "metrics".to_string()];

        service(&mock)
            .polish_resume(&sample_resume(), &focus)
            .await
            .unwrap();

        let call = &mock.calls()[0];
        assert!(call.prompt.contains("\"name\": \"Jane Doe\""));
        assert!(call
            .prompt
            .ends_with("\n\nPlease focus especially on improving: action verbs, metrics"));
        assert_eq!(call.params.temperature, 0.5);
    }

    #[tokio::test]
    async fn test_polish_without_focus_areas() {
        let mock = Arc::new(MockProvider::with_reply(json!({"cv": {}})));
        service(&mock).polish_resume(&sample_resume(), &[]).await.unwrap();

        assert!(!mock.calls()[0].prompt.contains("Please focus especially"));
    }

    #[tokio::test]
    async fn test_polish_reply_must_have_cv() {
        let mock = Arc::new(MockProvider::with_reply(json!(["not", "an", "object"])));
        let err = service(&mock)
            .polish_resume(&sample_resume(), &[])
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "AI failed to generate valid polished resume. Please try again."
        );
    }

    #[tokio::test]
    async fn test_tailor_accepts_bare_and_nested_replies() {
        let cv = json!({"name": "Jane Doe", "headline": "Rust Engineer"});
        let mock = Arc::new(MockProvider::new(vec![
            Ok(json!({"cv": cv.clone()})),
            Ok(json!({"resume": {"cv": cv.clone()}, "analysis": "Moved Rust first"})),
        ]));
        let svc = service(&mock);

        let bare = svc
            .tailor_resume(&sample_resume(), "Rust engineer wanted")
            .await
            .unwrap();
        let nested = svc
            .tailor_resume(&sample_resume(), "Rust engineer wanted")
            .await
            .unwrap();

        assert_eq!(bare, nested);
        assert_eq!(mock.calls()[0].params.temperature, 0.4);
        assert!(mock.calls()[0].prompt.contains("Rust engineer wanted"));
    }

    #[tokio::test]
    async fn test_tailor_rejects_reply_without_cv_anywhere() {
        let mock = Arc::new(MockProvider::with_reply(json!({"resume": {"name": "Jane"}})));
        let err = service(&mock)
            .tailor_resume(&sample_resume(), "job")
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "AI failed to generate valid tailored resume. Please try again."
        );
    }

    #[tokio::test]
    async fn test_tailor_blank_job_description() {
        let mock = Arc::new(MockProvider::new(vec![]));
        let err = service(&mock)
            .tailor_resume(&sample_resume(), " \n ")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Job description cannot be empty.");
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_generate_from_user_info() {
        let mock = Arc::new(MockProvider::with_reply(json!({"cv": {"name": "John Smith"}})));
        let doc = service(&mock)
            .generate_resume("Name: John Smith\n\nTen years of backend work")
            .await
            .unwrap();

        assert!(doc.has_cv());
        let call = &mock.calls()[0];
        assert!(call.prompt.contains("Ten years of backend work"));
        assert_eq!(call.params.temperature, 0.6);
        assert_eq!(call.params.max_tokens, 8192);
    }

    #[tokio::test]
    async fn test_generate_blank_info_and_bad_reply() {
        let mock = Arc::new(MockProvider::with_reply(json!({"resume": {}})));
        let svc = service(&mock);

        let err = svc.generate_resume("\t").await.unwrap_err();
        assert_eq!(err.to_string(), "User information cannot be empty.");
        assert!(mock.calls().is_empty());

        let err = svc.generate_resume("Name: Jane").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "AI failed to generate valid resume. Please try again."
        );
    }

    #[tokio::test]
    async fn test_provider_errors_propagate() {
        let mock = Arc::new(MockProvider::new(vec![Err(Error::AiProvider(
            "rate limited".to_string(),
        ))]));
        let err = service(&mock)
            .generate_resume("Name: Jane")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::AiProvider(_)));
    }
}
