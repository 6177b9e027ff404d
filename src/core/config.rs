//! Application settings loaded from YAML

use crate::oracle::SearchDepth;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

/// Environment variable overriding `llm.api_key`
pub const LLM_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding `search.api_key`
pub const SEARCH_API_KEY_ENV: &str = "TAVILY_API_KEY";

/// Default spacing between search-step timestamps
pub const DEFAULT_STEP_UNIT_MS: NonZeroU32 = match NonZeroU32::new(1000) {
    Some(unit) => unit,
    None => NonZeroU32::MIN,
};

/// Top-level settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Language oracle connection
    pub llm: LlmSettings,

    /// Search oracle connection
    pub search: SearchSettings,

    /// Tuning for the generation run
    pub generation: GenerationSettings,

    /// Catalog file; the bundled catalog is used when absent
    pub catalog_path: Option<PathBuf>,
}

/// OpenAI-compatible chat completion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub endpoint: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

/// Web search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub endpoint: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub depth: SearchDepth,
    pub max_results: u32,
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.tavily.com/search".to_string(),
            api_key: None,
            depth: SearchDepth::Basic,
            max_results: 5,
            timeout_secs: 30,
        }
    }
}

/// Knobs for a single generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub planning_temperature: f32,
    pub planning_max_tokens: u32,
    pub selection_temperature: f32,
    pub selection_max_tokens: u32,
    pub clarification_temperature: f32,
    pub clarification_max_tokens: u32,

    /// Snippets folded into the prompt from each successful search
    pub snippets_per_search: usize,

    /// Spacing between consecutive search-step timestamps
    ///
    /// Zero is unrepresentable so step timestamps always strictly increase.
    pub step_unit_ms: NonZeroU32,

    /// Prompt characters echoed into the pipeline name
    pub name_max_chars: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            planning_temperature: 0.3,
            planning_max_tokens: 200,
            selection_temperature: 0.7,
            selection_max_tokens: 1000,
            clarification_temperature: 0.7,
            clarification_max_tokens: 1000,
            snippets_per_search: 3,
            step_unit_ms: DEFAULT_STEP_UNIT_MS,
            name_max_chars: 50,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Resolve settings for the binary
    ///
    /// An explicit path must exist. Otherwise the user config file is used when
    /// present, falling back to defaults. API keys from the environment win.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut settings = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(path)?,
                None => Self::default(),
            },
        };
        settings.apply_env(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// `<config dir>/pipeline-generator/settings.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pipeline-generator").join("settings.yaml"))
    }

    /// Apply API key overrides from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(LLM_API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.llm.api_key = Some(key);
        }
        if let Some(key) = lookup(SEARCH_API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.search.api_key = Some(key);
        }
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.llm.endpoint.trim().is_empty() {
            anyhow::bail!("llm.endpoint must not be empty");
        }
        if self.llm.model.trim().is_empty() {
            anyhow::bail!("llm.model must not be empty");
        }
        if self.search.endpoint.trim().is_empty() {
            anyhow::bail!("search.endpoint must not be empty");
        }
        if self.search.max_results == 0 {
            anyhow::bail!("search.max_results must be greater than zero");
        }

        self.generation.validate()
    }
}

impl GenerationSettings {
    /// Validate the generation knobs
    pub fn validate(&self) -> Result<()> {
        if self.snippets_per_search == 0 {
            anyhow::bail!("generation.snippets_per_search must be greater than zero");
        }
        if self.name_max_chars == 0 {
            anyhow::bail!("generation.name_max_chars must be greater than zero");
        }
        for (field, value) in [
            ("planning_temperature", self.planning_temperature),
            ("selection_temperature", self.selection_temperature),
            ("clarification_temperature", self.clarification_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                anyhow::bail!("generation.{} must be between 0.0 and 2.0, got {}", field, value);
            }
        }

        Ok(())
    }
}
