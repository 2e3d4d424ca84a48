use anyhow::{Context, Result};

/// Default generation endpoint base. The model name is appended at startup.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Application configuration loaded once from environment variables and
/// passed into the pipeline at construction time. No module-level globals.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_url: String,
    pub gemini_model: String,
    /// Deliver the credential as a `?key=` query parameter instead of the
    /// `x-goog-api-key` header. Both delivery modes are supported.
    pub api_key_in_query: bool,
    /// Testing switch: bypass all network calls and serve the fixed dataset.
    pub force_fallback: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_api_url: std::env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            api_key_in_query: env_flag("API_KEY_IN_QUERY"),
            force_fallback: env_flag("FORCE_FALLBACK"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Full `generateContent` URL for the configured model.
    pub fn generate_endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.gemini_api_url.trim_end_matches('/'),
            self.gemini_model
        )
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_flag(key: &str) -> bool {
    matches!(
        std::env::var(key).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            gemini_api_key: "test-key".into(),
            gemini_api_url: DEFAULT_API_URL.into(),
            gemini_model: DEFAULT_MODEL.into(),
            api_key_in_query: false,
            force_fallback: false,
            port: 8080,
            rust_log: "info".into(),
        }
    }

    #[test]
    fn test_generate_endpoint_joins_base_and_model() {
        let config = test_config();
        assert_eq!(
            config.generate_endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_generate_endpoint_tolerates_trailing_slash() {
        let mut config = test_config();
        config.gemini_api_url = "https://example.test/v1beta/models/".into();
        assert_eq!(
            config.generate_endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
