use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;

pub const CV_KEY: &str = "cv";
pub const DESIGN_KEY: &str = "design";
pub const LOCALE_KEY: &str = "locale";
pub const SETTINGS_KEY: &str = "settings";

/// Metadata blocks a regenerated document inherits from its predecessor
pub const CARRIED_KEYS: [&str; 3] = [DESIGN_KEY, LOCALE_KEY, SETTINGS_KEY];

const NESTED_RESUME_KEY: &str = "resume";

/// A structured resume: an insertion-ordered mapping whose `cv` entry holds
/// the person, contact fields and sections. `design`, `locale` and
/// `settings` are optional metadata blocks passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeDocument(Map<String, Value>);

impl ResumeDocument {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Wrap a model reply. Anything other than a JSON object yields `None`.
    pub fn from_reply(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn has_cv(&self) -> bool {
        self.0.contains_key(CV_KEY)
    }

    pub fn cv(&self) -> Option<&Value> {
        self.0.get(CV_KEY)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// The document under a `resume` wrapper, when the top level has no `cv`
    /// but the wrapper does. Otherwise `None`.
    pub fn nested_resume(&self) -> Option<Self> {
        if self.has_cv() {
            return None;
        }
        match self.0.get(NESTED_RESUME_KEY) {
            Some(Value::Object(inner)) if inner.contains_key(CV_KEY) => Some(Self(inner.clone())),
            _ => None,
        }
    }

    /// Copy `design`, `locale` and `settings` from `previous` wherever this
    /// document lacks them. Keys already present here are never overwritten.
    pub fn carry_over_from(&mut self, previous: &ResumeDocument) {
        for key in CARRIED_KEYS {
            if self.0.contains_key(key) {
                continue;
            }
            if let Some(value) = previous.0.get(key) {
                self.0.insert(key.to_string(), value.clone());
            }
        }
    }

    /// Inject `design: {theme}` and `locale: {language}` when absent
    pub fn ensure_metadata(&mut self, theme: &str, locale: &str) {
        if !self.0.contains_key(DESIGN_KEY) {
            let mut design = Map::new();
            design.insert("theme".to_string(), Value::String(theme.to_string()));
            self.0.insert(DESIGN_KEY.to_string(), Value::Object(design));
        }
        if !self.0.contains_key(LOCALE_KEY) {
            let mut locale_block = Map::new();
            locale_block.insert("language".to_string(), Value::String(locale.to_string()));
            self.0.insert(LOCALE_KEY.to_string(), Value::Object(locale_block));
        }
    }

    /// Two-space indented JSON, the form embedded in prompts
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }
}

impl From<Map<String, Value>> for ResumeDocument {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<ResumeDocument> for Value {
    fn from(doc: ResumeDocument) -> Self {
        Value::Object(doc.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> ResumeDocument {
        ResumeDocument::from_reply(value).unwrap()
    }

    #[test]
    fn test_from_reply_rejects_non_objects() {
        assert!(ResumeDocument::from_reply(json!([1, 2])).is_none());
        assert!(ResumeDocument::from_reply(json!("cv")).is_none());
        assert!(ResumeDocument::from_reply(json!({})).is_some());
    }

    #[test]
    fn test_nested_resume_unwrapped_one_level() {
        let wrapped = doc(json!({"resume": {"cv": {"name": "Jane"}}, "analysis": "..."}));
        let inner = wrapped.nested_resume().unwrap();
        assert_eq!(inner, doc(json!({"cv": {"name": "Jane"}})));

        let bare = doc(json!({"cv": {"name": "Jane"}, "resume": {"cv": {}}}));
        assert!(bare.nested_resume().is_none());

        let empty_wrapper = doc(json!({"resume": {"name": "Jane"}}));
        assert!(empty_wrapper.nested_resume().is_none());
    }

    #[test]
    fn test_carry_over_fills_only_missing_keys() {
        let old = doc(json!({
            "cv": {"name": "Old"},
            "design": {"theme": "sb2nov"},
            "locale": {"language": "german"},
            "settings": {"render_command": {"pdf_path": "out.pdf"}}
        }));
        let mut new = doc(json!({
            "cv": {"name": "New"},
            "locale": {"language": "french"}
        }));

        new.carry_over_from(&old);

        assert_eq!(new.cv(), Some(&json!({"name": "New"})));
        assert_eq!(new.get(DESIGN_KEY), Some(&json!({"theme": "sb2nov"})));
        assert_eq!(new.get(LOCALE_KEY), Some(&json!({"language": "french"})));
        assert_eq!(
            new.get(SETTINGS_KEY),
            Some(&json!({"render_command": {"pdf_path": "out.pdf"}}))
        );
    }

    #[test]
    fn test_ensure_metadata_respects_existing_blocks() {
        let mut fresh = doc(json!({"cv": {}}));
        fresh.ensure_metadata("classic", "english");
        assert_eq!(fresh.get(DESIGN_KEY), Some(&json!({"theme": "classic"})));
        assert_eq!(fresh.get(LOCALE_KEY), Some(&json!({"language": "english"})));

        let mut styled = doc(json!({"cv": {}, "design": {"theme": "moderncv"}}));
        styled.ensure_metadata("classic", "english");
        assert_eq!(styled.get(DESIGN_KEY), Some(&json!({"theme": "moderncv"})));
    }

    #[test]
    fn test_key_order_is_preserved() {
        let d = doc(json!({"cv": {}, "design": {}, "locale": {}}));
        let keys: Vec<&str> = d.keys().map(String::as_str).collect();
        assert_eq!(keys, ["cv", "design", "locale"]);
    }

    #[test]
    fn test_pretty_json_uses_two_spaces() {
        let d = doc(json!({"cv": {"name": "Jane"}}));
        assert_eq!(d.to_pretty_json().unwrap(), "{\n  \"cv\": {\n    \"name\": \"Jane\"\n  }\n}");
    }
}
