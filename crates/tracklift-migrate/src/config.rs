//! Migration configuration.
//!
//! Loaded once at startup from a JSON file and passed by reference to
//! whatever needs it. The key names follow the legacy `config.json` layout:
//!
//! ```json
//! {
//!   "GitlabURL": "https://gitlab.example.com",
//!   "GitlabAPIKey": "...",
//!   "GogsURL": "https://gogs.example.com",
//!   "GogsAPIKey": "...",
//!   "UserMap": [{ "From": "jdoe", "To": "john" }]
//! }
//! ```

use crate::error::{MigrationError, Result};
use crate::types::MigrationOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// One source-to-destination username pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMapEntry {
    /// Username on the source service.
    #[serde(rename = "From")]
    pub from: String,

    /// Username on the destination service.
    #[serde(rename = "To")]
    pub to: String,
}

/// Connection details and user mapping for a migration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitLab instance URL.
    #[serde(rename = "GitlabURL")]
    pub gitlab_url: String,

    /// GitLab personal access token.
    #[serde(rename = "GitlabAPIKey")]
    pub gitlab_api_key: String,

    /// Gogs instance URL.
    #[serde(rename = "GogsURL")]
    pub gogs_url: String,

    /// Gogs access token.
    #[serde(rename = "GogsAPIKey")]
    pub gogs_api_key: String,

    /// Source to destination usernames, in file order.
    #[serde(rename = "UserMap", default)]
    pub user_map: Vec<UserMapEntry>,

    /// Fail on unmapped milestones instead of passing the source ID through.
    #[serde(rename = "StrictMilestones", default)]
    pub strict_milestones: bool,
}

impl Config {
    /// Reads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), users = config.user_map.len(), "Loaded configuration");
        Ok(config)
    }

    /// Checks URLs parse and tokens are present.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("GitlabURL", &self.gitlab_url), ("GogsURL", &self.gogs_url)] {
            Url::parse(value)
                .map_err(|e| MigrationError::InvalidConfig(format!("{name} '{value}': {e}")))?;
        }
        for (name, value) in [
            ("GitlabAPIKey", &self.gitlab_api_key),
            ("GogsAPIKey", &self.gogs_api_key),
        ] {
            if value.trim().is_empty() {
                return Err(MigrationError::InvalidConfig(format!("{name} is empty")));
            }
        }
        Ok(())
    }

    /// Migration options derived from this configuration.
    pub fn options(&self) -> MigrationOptions {
        MigrationOptions::default().with_strict_milestones(self.strict_milestones)
    }

    /// Prints the loaded settings with tokens masked.
    pub fn print_summary(&self) {
        println!("GitlabURL: {}", self.gitlab_url);
        println!("GitlabAPIKey: {}", mask(&self.gitlab_api_key));
        println!("GogsURL: {}", self.gogs_url);
        println!("GogsAPIKey: {}", mask(&self.gogs_api_key));
        println!("UserMap: [");
        for entry in &self.user_map {
            println!("\t{} to {}", entry.from, entry.to);
        }
        println!("]");
    }
}

/// Hides all but the last four characters of a secret.
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{visible}", "*".repeat(chars.len() - 4))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "GitlabURL": "https://gitlab.example.com",
        "GitlabAPIKey": "glpat-abcdef",
        "GogsURL": "https://gogs.example.com",
        "GogsAPIKey": "0123456789",
        "UserMap": [
            { "From": "jdoe", "To": "john" },
            { "From": "asmith", "To": "anna" }
        ]
    }"#;

    #[test]
    fn test_parse_legacy_keys() {
        let config: Config = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(config.gitlab_url, "https://gitlab.example.com");
        assert_eq!(config.gogs_api_key, "0123456789");
        assert_eq!(config.user_map.len(), 2);
        assert_eq!(config.user_map[1].from, "asmith");
        assert_eq!(config.user_map[1].to, "anna");
        assert!(!config.strict_milestones);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.gogs_url, "https://gogs.example.com");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("config.json")).unwrap_err();
        assert!(matches!(err, MigrationError::IoError(_)));
    }

    #[test]
    fn test_rejects_bad_url() {
        let mut config: Config = serde_json::from_str(SAMPLE).unwrap();
        config.gogs_url = "not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(MigrationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_empty_token() {
        let mut config: Config = serde_json::from_str(SAMPLE).unwrap();
        config.gitlab_api_key = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(MigrationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_strict_flag_reaches_options() {
        let mut config: Config = serde_json::from_str(SAMPLE).unwrap();
        config.strict_milestones = true;
        assert!(config.options().strict_milestones);
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("0123456789"), "******6789");
        assert_eq!(mask("abc"), "***");
    }
}
