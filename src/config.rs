use std::env;
use std::str::FromStr;

use crate::error::StudioError;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TITAN_MODEL: &str = "amazon.titan-image-generator-v1";

/// An unset, empty or whitespace-only credential counts as missing.
pub(crate) fn credential(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    Gemini,
    Bedrock,
    Placeholder,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Bedrock => "bedrock",
            Provider::Placeholder => "placeholder",
        }
    }
}

impl FromStr for Provider {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "bedrock" | "titan" | "aws" => Ok(Provider::Bedrock),
            "placeholder" | "offline" => Ok(Provider::Placeholder),
            other => Err(StudioError::ConfigError(format!(
                "Unknown image provider '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        let base_url =
            env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string());

        GeminiConfig {
            api_key,
            model,
            base_url,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub model_id: String,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        BedrockConfig {
            region: None,
            access_key: None,
            secret_key: None,
            model_id: DEFAULT_TITAN_MODEL.to_string(),
        }
    }
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let region = env::var("AWS_REGION")
            .or_else(|_| env::var("AWS_DEFAULT_REGION"))
            .ok();
        let access_key = env::var("AWS_ACCESS_KEY_ID")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let secret_key = env::var("AWS_SECRET_ACCESS_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let model_id =
            env::var("BEDROCK_IMAGE_MODEL").unwrap_or_else(|_| DEFAULT_TITAN_MODEL.to_string());

        BedrockConfig {
            region,
            access_key,
            secret_key,
            model_id,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct StudioConfig {
    pub provider: Provider,
    pub gemini: GeminiConfig,
    pub bedrock: BedrockConfig,
}

impl StudioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every section from the environment. An unparseable
    /// `BRANDKIT_PROVIDER` falls back to Gemini with a warning.
    pub fn from_env() -> Self {
        let provider = match env::var("BRANDKIT_PROVIDER") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                log::warn!("{}, falling back to gemini", e);
                Provider::Gemini
            }),
            Err(_) => Provider::Gemini,
        };

        StudioConfig {
            provider,
            gemini: GeminiConfig::from_env(),
            bedrock: BedrockConfig::from_env(),
        }
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self.provider = Provider::Gemini;
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = config;
        self.provider = Provider::Bedrock;
        self
    }

    /// Whether the selected provider has the credential it needs.
    pub fn has_credentials(&self) -> bool {
        match self.provider {
            Provider::Gemini => credential(&self.gemini.api_key).is_some(),
            Provider::Bedrock => {
                credential(&self.bedrock.access_key).is_some()
                    && credential(&self.bedrock.secret_key).is_some()
            }
            Provider::Placeholder => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parsing() {
        assert_eq!("Gemini".parse::<Provider>().unwrap(), Provider::Gemini);
        assert_eq!(" titan ".parse::<Provider>().unwrap(), Provider::Bedrock);
        assert_eq!("offline".parse::<Provider>().unwrap(), Provider::Placeholder);
        assert!("dalle".parse::<Provider>().unwrap_err().is_config());
    }

    #[test]
    fn test_builders_select_provider() {
        let config = StudioConfig::new().with_gemini(GeminiConfig::new().with_api_key("k"));
        assert_eq!(config.provider, Provider::Gemini);
        assert!(config.has_credentials());
        assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);

        let config = StudioConfig::new().with_bedrock(BedrockConfig::new().with_region("eu-west-1"));
        assert_eq!(config.provider, Provider::Bedrock);
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_blank_credentials_count_as_missing() {
        let config = StudioConfig::new().with_gemini(GeminiConfig::new().with_api_key("   "));
        assert!(!config.has_credentials());

        let config =
            StudioConfig::new().with_bedrock(BedrockConfig::new().with_credentials("", "secret"));
        assert!(!config.has_credentials());

        assert_eq!(credential(&Some(" key ".to_string())), Some(" key "));
        assert_eq!(credential(&Some("\t".to_string())), None);
    }

    #[test]
    fn test_placeholder_needs_no_credentials() {
        let config = StudioConfig::new().with_provider(Provider::Placeholder);
        assert!(config.has_credentials());
    }
}
