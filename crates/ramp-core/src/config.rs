use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an HR onboarding assistant. You help HR coordinators manage new hire \
onboarding efficiently.

You have access to these tools:
- search_onboarding_knowledge: search HR policies, compliance rules, and checklists
- generate_onboarding_checklist: create a task checklist for a new hire
- get_employee_onboarding_status: look up an employee's profile and start date
- evaluate_day1_readiness: assess if an employee is ready for Day 1
- calculate_onboarding_risk: calculate risk of onboarding delay

Reason step by step and use tools to ground your answers in real data. If asked \
about compliance or policy, always search the knowledge base first.";

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(skip)]
    pub secrets: ResolvedSecrets,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,
    #[serde(default = "default_max_tool_hops")]
    pub max_tool_hops: usize,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: u64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MemoryConfig {
    #[serde(default = "default_qdrant_url")]
    pub qdrant_url: String,
    #[serde(default = "default_collection")]
    pub collection: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IngestConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    #[serde(default = "default_min_chunk_chars")]
    pub min_chunk_chars: usize,
    #[serde(default = "default_embed_batch_size")]
    pub embed_batch_size: usize,
}

#[derive(Debug, Default)]
pub struct ResolvedSecrets {
    pub openai_api_key: Option<String>,
}

fn default_agent_name() -> String {
    "Ramp".into()
}

fn default_max_tool_hops() -> usize {
    8
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.into()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}

fn default_embedding_dimension() -> u64 {
    1536
}

fn default_qdrant_url() -> String {
    "http://localhost:6334".into()
}

fn default_collection() -> String {
    "hr_onboarding_kb".into()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_chunk_size() -> usize {
    600
}

fn default_chunk_overlap() -> usize {
    80
}

fn default_min_chunk_chars() -> usize {
    50
}

fn default_embed_batch_size() -> usize {
    50
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            max_tool_hops: default_max_tool_hops(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            embedding_model: default_embedding_model(),
            embedding_dimension: default_embedding_dimension(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            qdrant_url: default_qdrant_url(),
            collection: default_collection(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            min_chunk_chars: default_min_chunk_chars(),
            embed_batch_size: default_embed_batch_size(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            llm: LlmConfig::default(),
            memory: MemoryConfig::default(),
            ingest: IngestConfig::default(),
            secrets: ResolvedSecrets::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("RAMP_QDRANT_URL") {
            self.memory.qdrant_url = url;
        }
        if let Ok(collection) = std::env::var("RAMP_COLLECTION") {
            self.memory.collection = collection;
        }
        if let Ok(dir) = std::env::var("RAMP_DATA_DIR") {
            self.ingest.data_dir = PathBuf::from(dir);
        }
    }

    /// Resolve the LLM credential from the environment.
    pub fn resolve_secrets(&mut self) {
        self.secrets.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
    }

    /// The required API key, or an error that halts startup.
    ///
    /// # Errors
    ///
    /// Returns an error when `OPENAI_API_KEY` is not set.
    pub fn require_api_key(&self) -> anyhow::Result<&str> {
        self.secrets
            .openai_api_key
            .as_deref()
            .context("OPENAI_API_KEY not set; export it before running")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let config = Config::load(Path::new("/nonexistent/ramp.toml")).unwrap();
        assert_eq!(config.agent.name, "Ramp");
        assert_eq!(config.agent.max_tool_hops, 8);
        assert_eq!(config.memory.collection, "hr_onboarding_kb");
        assert_eq!(config.ingest.chunk_size, 600);
        assert_eq!(config.ingest.chunk_overlap, 80);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ramp.toml");
        std::fs::write(
            &path,
            "[agent]\nmax_tool_hops = 3\n\n[llm]\nmodel = \"gpt-4o\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.agent.max_tool_hops, 3);
        assert_eq!(config.llm.model, "gpt-4o");
        // Untouched sections keep defaults.
        assert_eq!(config.llm.embedding_model, "text-embedding-3-small");
        assert_eq!(config.memory.qdrant_url, "http://localhost:6334");
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ramp.toml");
        std::fs::write(&path, "not valid toml [[[").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn require_api_key_without_key_errors() {
        let config = Config::default();
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn require_api_key_with_key() {
        let mut config = Config::default();
        config.secrets.openai_api_key = Some("sk-test".into());
        assert_eq!(config.require_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn system_prompt_mentions_all_tools() {
        let config = Config::default();
        for tool in [
            "search_onboarding_knowledge",
            "generate_onboarding_checklist",
            "get_employee_onboarding_status",
            "evaluate_day1_readiness",
            "calculate_onboarding_risk",
        ] {
            assert!(config.agent.system_prompt.contains(tool), "missing {tool}");
        }
    }
}
