use std::path::PathBuf;

use crate::models::AdminScope;

pub const DEFAULT_DATASET_PATH: &str = "data/students.json";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Environment-driven settings. An empty API key disables LLM refinement.
#[derive(Debug, Clone)]
pub struct Settings {
    pub dataset_path: PathBuf,
    pub openai_api_key: String,
    pub openai_model: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Settings {
            dataset_path: std::env::var("DATASET_PATH")
                .unwrap_or_else(|_| DEFAULT_DATASET_PATH.to_string())
                .into(),
            openai_api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
        }
    }

    pub fn llm_enabled(&self) -> bool {
        !self.openai_api_key.is_empty()
    }
}

/// Configured admin roles. The roster is trusted as supplied; nothing here
/// authenticates the caller.
pub fn admin_roster() -> Vec<AdminScope> {
    vec![
        AdminScope {
            name: "Amit".to_string(),
            allowed_grades: vec!["Grade 8".to_string()],
            allowed_classes: vec!["8A".to_string(), "8B".to_string()],
            region: "East".to_string(),
        },
        AdminScope {
            name: "Riya".to_string(),
            allowed_grades: vec!["Grade 7".to_string()],
            allowed_classes: vec!["7A".to_string()],
            region: "West".to_string(),
        },
        AdminScope {
            name: "Kabir".to_string(),
            allowed_grades: vec!["Grade 9".to_string()],
            allowed_classes: vec!["9A".to_string(), "9B".to_string()],
            region: "North".to_string(),
        },
    ]
}

pub fn find_admin(name: &str) -> Option<AdminScope> {
    admin_roster().into_iter().find(|admin| admin.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_configured_admin() {
        let admin = find_admin("Riya").unwrap();
        assert_eq!(admin.region, "West");
        assert_eq!(admin.allowed_classes, vec!["7A".to_string()]);
    }

    #[test]
    fn unknown_admin_is_none() {
        assert!(find_admin("Zoya").is_none());
    }
}
