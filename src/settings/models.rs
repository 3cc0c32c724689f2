use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A dealer inventory page the dashboard tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUrl {
    pub id: String,
    pub url: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorEntry {
    pub id: String,
    pub name: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// A user-defined advisor persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomChatConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomChatInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: String,
}

/// Validation for user-entered settings.
pub mod validation {
    use anyhow::{bail, Context, Result};
    use url::Url;

    const MAX_NAME_CHARS: usize = 50;
    const MAX_INSTRUCTIONS_CHARS: usize = 2_000;

    /// Accepts absolute http(s) URLs and returns them normalised.
    pub fn validate_url(raw: &str) -> Result<String> {
        let parsed = Url::parse(raw.trim()).with_context(|| format!("Invalid URL: {raw}"))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => bail!("Unsupported URL scheme '{other}'. Use http or https"),
        }
        if parsed.host_str().is_none() {
            bail!("URL must include a host");
        }
        Ok(parsed.to_string())
    }

    pub fn validate_name(name: &str) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            bail!("Name is required");
        }
        if trimmed.chars().count() > MAX_NAME_CHARS {
            bail!("Name must be at most {MAX_NAME_CHARS} characters");
        }
        Ok(trimmed.to_string())
    }

    pub fn validate_instructions(instructions: &str) -> Result<String> {
        let trimmed = instructions.trim();
        if trimmed.chars().count() > MAX_INSTRUCTIONS_CHARS {
            bail!("Instructions must be at most {MAX_INSTRUCTIONS_CHARS} characters");
        }
        Ok(trimmed.to_string())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn accepts_and_normalises_http_urls() {
            assert_eq!(
                validate_url(" https://Example.com/stock ").unwrap(),
                "https://example.com/stock"
            );
            assert_eq!(validate_url("http://example.com").unwrap(), "http://example.com/");
        }

        #[test]
        fn rejects_bad_urls() {
            assert!(validate_url("example.com").is_err());
            assert!(validate_url("ftp://example.com").is_err());
            assert!(validate_url("").is_err());
        }

        #[test]
        fn names_are_trimmed_and_bounded() {
            assert_eq!(validate_name("  カープラザ  ").unwrap(), "カープラザ");
            assert!(validate_name("   ").is_err());
            assert!(validate_name(&"あ".repeat(51)).is_err());
        }
    }
}
