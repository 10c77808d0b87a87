use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::discord::DISCORD_API_BASE;
use crate::feedback::chunker::DEFAULT_MAX_CHUNK_CHARS;
use crate::llm_client::OPENAI_API_BASE;

/// Application configuration loaded from environment variables.
/// Startup aborts if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub openai_api_key: String,
    /// Hex-encoded Ed25519 key for interaction signatures. When unset the
    /// application's own `verify_key` is fetched at startup.
    pub discord_public_key: Option<String>,
    pub discord_api_base: String,
    pub openai_base_url: String,
    pub port: u16,
    pub scratch_dir: PathBuf,
    pub chunk_chars: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        Ok(Config {
            discord_token: require("DISCORD_TOKEN")?,
            openai_api_key: require("OPENAI_API_KEY")?,
            discord_public_key: lookup("DISCORD_PUBLIC_KEY").filter(|v| !v.trim().is_empty()),
            discord_api_base: lookup("DISCORD_API_BASE")
                .unwrap_or_else(|| DISCORD_API_BASE.to_string()),
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| OPENAI_API_BASE.to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            scratch_dir: lookup("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            chunk_chars: match lookup("FEEDBACK_CHUNK_CHARS") {
                Some(raw) => raw
                    .parse::<usize>()
                    .ok()
                    .filter(|&n| n > 0)
                    .with_context(|| {
                        format!("FEEDBACK_CHUNK_CHARS must be a positive integer, got '{raw}'")
                    })?,
                None => DEFAULT_MAX_CHUNK_CHARS,
            },
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_apply_when_only_secrets_are_set() {
        let config = load(&[("DISCORD_TOKEN", "bot-token"), ("OPENAI_API_KEY", "sk-test")]).unwrap();
        assert_eq!(config.discord_token, "bot-token");
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.port, 8080);
        assert_eq!(config.chunk_chars, 1990);
        assert_eq!(config.scratch_dir, PathBuf::from("."));
        assert_eq!(config.discord_api_base, DISCORD_API_BASE);
        assert_eq!(config.openai_base_url, OPENAI_API_BASE);
        assert!(config.discord_public_key.is_none());
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_missing_discord_token_is_an_error() {
        let err = load(&[("OPENAI_API_KEY", "sk-test")]).unwrap_err();
        assert!(err.to_string().contains("DISCORD_TOKEN"));
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let err = load(&[("DISCORD_TOKEN", "bot-token"), ("OPENAI_API_KEY", "  ")]).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = load(&[
            ("DISCORD_TOKEN", "bot-token"),
            ("OPENAI_API_KEY", "sk-test"),
            ("PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_overrides_are_read() {
        let config = load(&[
            ("DISCORD_TOKEN", "bot-token"),
            ("OPENAI_API_KEY", "sk-test"),
            ("DISCORD_PUBLIC_KEY", "abcd"),
            ("PORT", "3000"),
            ("SCRATCH_DIR", "/tmp/reword"),
            ("FEEDBACK_CHUNK_CHARS", "500"),
        ])
        .unwrap();
        assert_eq!(config.discord_public_key.as_deref(), Some("abcd"));
        assert_eq!(config.port, 3000);
        assert_eq!(config.scratch_dir, PathBuf::from("/tmp/reword"));
        assert_eq!(config.chunk_chars, 500);
    }

    #[test]
    fn test_zero_or_garbage_chunk_size_is_rejected() {
        for raw in ["0", "-5", "lots"] {
            let err = load(&[
                ("DISCORD_TOKEN", "bot-token"),
                ("OPENAI_API_KEY", "sk-test"),
                ("FEEDBACK_CHUNK_CHARS", raw),
            ])
            .unwrap_err();
            assert!(err.to_string().contains("FEEDBACK_CHUNK_CHARS"), "{raw}");
        }
    }
}
