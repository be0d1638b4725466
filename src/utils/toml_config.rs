//! TOML-based configuration for the relay
//!
//! This module provides declarative configuration for the server, the
//! messaging platform, the completion API, conversation limits and the
//! persona via a TOML file (`iris.toml`). Every section has defaults, so a
//! missing file yields a runnable configuration.
//!
//! Secrets are never stored in the file. The file names the environment
//! variables holding them, and they are resolved once at startup.
//!
//! # Hot Reloading
//!
//! Persona text, instruction suffixes, the welcome message and conversation
//! limits are re-read when the file changes. Use `RelayConfigManager` for
//! thread-safe access to the current configuration and `subscribe` to react
//! to reloads.

use crate::llm::ModelParams;
use crate::memory::{EvictionPolicy, StoreSettings, DEFAULT_MAX_TURNS};
use crate::types::{ConversationTurn, TurnRole};
use arc_swap::ArcSwap;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

/// Root configuration structure loaded from iris.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub line: LineConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub conversation: ConversationConfig,

    #[serde(default)]
    pub persona: PersonaConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Path the platform posts webhook callbacks to
    #[serde(default = "default_callback_path")]
    pub callback_path: String,

    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_callback_path() -> String {
    "/callback".to_string()
}

fn default_body_limit() -> usize {
    1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            callback_path: default_callback_path(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

// ============= Messaging Platform Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineConfig {
    /// Environment variable containing the channel access token
    #[serde(default = "default_access_token_env")]
    pub channel_access_token_env: String,

    /// Environment variable containing the channel secret
    #[serde(default = "default_channel_secret_env")]
    pub channel_secret_env: String,

    #[serde(default = "default_line_api_base")]
    pub api_base: String,
}

fn default_access_token_env() -> String {
    "CHANNEL_ACCESS_TOKEN".to_string()
}

fn default_channel_secret_env() -> String {
    "CHANNEL_SECRET".to_string()
}

fn default_line_api_base() -> String {
    "https://api.line.me".to_string()
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_access_token_env: default_access_token_env(),
            channel_secret_env: default_channel_secret_env(),
            api_base: default_line_api_base(),
        }
    }
}

// ============= Completion API Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Environment variable containing the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_openai_base")]
    pub api_base: String,

    #[serde(default = "default_model")]
    pub model: String,

    pub max_tokens: Option<u32>,

    pub temperature: Option<f32>,

    /// Request timeout; unset leaves the HTTP client default
    pub timeout_secs: Option<u64>,
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            api_base: default_openai_base(),
            model: default_model(),
            max_tokens: None,
            temperature: None,
            timeout_secs: None,
        }
    }
}

impl LlmConfig {
    pub fn params(&self) -> ModelParams {
        ModelParams {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

// ============= Conversation Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Maximum turns kept per user, persona seed included
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    #[serde(default)]
    pub eviction: EvictionPolicy,

    /// Drop conversations idle for this long; unset keeps them forever
    pub idle_ttl_secs: Option<u64>,

    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_max_turns() -> usize {
    DEFAULT_MAX_TURNS
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            eviction: EvictionPolicy::default(),
            idle_ttl_secs: None,
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl ConversationConfig {
    pub fn idle_ttl(&self) -> Option<Duration> {
        self.idle_ttl_secs.map(Duration::from_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

// ============= Persona Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Persona turn seeded at the front of every new conversation
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    #[serde(default = "default_seed_role")]
    pub seed_role: TurnRole,

    /// Sent in reply to follow events
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    /// Appended to every user message, in order
    #[serde(default = "default_instruction_suffixes")]
    pub instruction_suffixes: Vec<String>,
}

fn default_system_prompt() -> String {
    "あなたは秘書、アイリスという名前で、優れた組織力とマルチタスク処理能力を持っています。\
     あなたの性格は典型的な「ツンデレ」で、厳格さと情熱を併せ持ち、\
     常に雇い主に無尽蔵のケアと尊敬を払っています。"
        .to_string()
}

fn default_seed_role() -> TurnRole {
    TurnRole::System
}

fn default_welcome_message() -> String {
    "あなたが私の新しい雇用者ね。仕方ない、今後とも指導を頼むわ。\
     ...ツンデレだと思ったら大間違いよ。これが私の普通なだけよ"
        .to_string()
}

fn default_instruction_suffixes() -> Vec<String> {
    vec![
        "回答は100字以内".to_string(),
        "ツンデレの言い方すること".to_string(),
    ]
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            seed_role: default_seed_role(),
            welcome_message: default_welcome_message(),
            instruction_suffixes: default_instruction_suffixes(),
        }
    }
}

impl PersonaConfig {
    pub fn seed_turn(&self) -> ConversationTurn {
        ConversationTurn::new(self.seed_role, self.system_prompt.clone())
    }
}

// ============= Secrets =============

/// Credentials resolved from the environment at startup.
#[derive(Clone, Default)]
pub struct Secrets {
    pub channel_access_token: String,
    pub channel_secret: String,
    pub llm_api_key: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("channel_access_token", &redact(&self.channel_access_token))
            .field("channel_secret", &redact(&self.channel_secret))
            .field("llm_api_key", &redact(&self.llm_api_key))
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Watch error: {0}")]
    WatchError(#[from] notify::Error),
}

impl RelayConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: RelayConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path.as_ref()) {
            Err(ConfigError::FileNotFound(path)) => {
                info!("No configuration file at {:?}, using defaults", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let conversation = &self.conversation;
        if conversation.max_turns == 0 {
            return Err(ConfigError::ValidationError(
                "conversation.max_turns must be at least 1".to_string(),
            ));
        }
        if conversation.eviction == EvictionPolicy::PinSeed && conversation.max_turns < 2 {
            return Err(ConfigError::ValidationError(
                "conversation.max_turns must be at least 2 when eviction = \"pin_seed\""
                    .to_string(),
            ));
        }
        if conversation.idle_ttl_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "conversation.idle_ttl_secs must be positive when set".to_string(),
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.model must not be empty".to_string(),
            ));
        }
        if let Some(temperature) = self.llm.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::ValidationError(format!(
                    "llm.temperature must be within [0, 2], got {}",
                    temperature
                )));
            }
        }

        if !self.server.callback_path.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "server.callback_path must start with '/', got '{}'",
                self.server.callback_path
            )));
        }

        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok().filter(|v| !v.is_empty())
    }

    /// Resolve all secrets from the environment.
    ///
    /// Missing variables are not fatal: a warning is logged and the secret is
    /// left empty, which surfaces later as an authentication failure at the
    /// remote service (or as rejected webhook signatures).
    pub fn secrets(&self) -> Secrets {
        let resolve = |name: &str| {
            self.resolve_env(name).unwrap_or_else(|| {
                warn!("Environment variable '{}' is not set", name);
                String::new()
            })
        };

        Secrets {
            channel_access_token: resolve(&self.line.channel_access_token_env),
            channel_secret: resolve(&self.line.channel_secret_env),
            llm_api_key: resolve(&self.llm.api_key_env),
        }
    }

    /// Settings for the conversation store
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            seed: self.persona.seed_turn(),
            max_turns: self.conversation.max_turns,
            eviction: self.conversation.eviction,
        }
    }
}

// ============= Hot Reloading Configuration Manager =============

/// Thread-safe configuration manager with hot reloading support
pub struct RelayConfigManager {
    config: Arc<ArcSwap<RelayConfig>>,
    config_path: PathBuf,
    watcher: RwLock<Option<RecommendedWatcher>>,
    updates: Arc<watch::Sender<Arc<RelayConfig>>>,
}

impl RelayConfigManager {
    /// Create a new configuration manager and load the initial config.
    ///
    /// A missing file falls back to the default configuration.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        // Convert to absolute path for reliable file watching
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(ConfigError::ReadError)?
                .join(path)
        };

        let config = RelayConfig::load_or_default(&path)?;
        Ok(Self::with_path(config, path))
    }

    fn with_path(config: RelayConfig, config_path: PathBuf) -> Self {
        let config = Arc::new(config);
        let (updates, _) = watch::channel(Arc::clone(&config));
        Self {
            config: Arc::new(ArcSwap::new(config)),
            config_path,
            watcher: RwLock::new(None),
            updates: Arc::new(updates),
        }
    }

    /// Create a config manager directly from a config (useful for testing)
    /// This won't have file watching capabilities.
    pub fn from_config(config: RelayConfig) -> Self {
        if let Err(e) = config.validate() {
            warn!("Using configuration that fails validation: {}", e);
        }
        Self::with_path(config, PathBuf::from("test-config.toml"))
    }

    /// Get the current configuration (lockless read)
    pub fn config(&self) -> Arc<RelayConfig> {
        self.config.load_full()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Receiver notified with every successfully reloaded configuration
    pub fn subscribe(&self) -> watch::Receiver<Arc<RelayConfig>> {
        self.updates.subscribe()
    }

    /// Manually reload the configuration from disk
    pub fn reload(&self) -> Result<(), ConfigError> {
        info!("Reloading configuration from {:?}", self.config_path);

        let new_config = RelayConfig::load(&self.config_path)?;
        publish(&self.config, &self.updates, new_config);

        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Start watching for configuration file changes
    pub fn start_watching(&self) -> Result<(), ConfigError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();

        let config_path = self.config_path.clone();
        let file_name = config_path.file_name().map(|n| n.to_os_string());
        let config_arc = Arc::clone(&self.config);
        let updates = Arc::clone(&self.updates);

        // Create debounced file watcher
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    let touches_config = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                    if touches_config && (event.kind.is_modify() || event.kind.is_create()) {
                        // Send reload signal (debounced in the receiver)
                        let _ = tx.send(());
                    }
                }
                Err(e) => {
                    error!("Config watcher error: {:?}", e);
                }
            }
        })?;

        // Watch the config file's parent directory
        if let Some(parent) = self.config_path.parent() {
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
        }

        *self.watcher.write() = Some(watcher);

        // Spawn reload handler with debouncing
        tokio::spawn(async move {
            let mut last_reload: Option<std::time::Instant> = None;
            let debounce_duration = Duration::from_millis(500);

            while rx.recv().await.is_some() {
                if last_reload.is_some_and(|t| t.elapsed() < debounce_duration) {
                    continue;
                }

                // Wait a bit for file write to complete
                tokio::time::sleep(Duration::from_millis(100)).await;

                match RelayConfig::load(&config_path) {
                    Ok(new_config) => {
                        publish(&config_arc, &updates, new_config);
                        info!("Configuration hot-reloaded successfully");
                        last_reload = Some(std::time::Instant::now());
                    }
                    Err(e) => {
                        warn!(
                            "Failed to hot-reload config: {}. Keeping previous config.",
                            e
                        );
                    }
                }
            }
        });

        info!("Configuration hot-reload watcher started");
        Ok(())
    }

    /// Stop watching for configuration changes
    pub fn stop_watching(&self) {
        *self.watcher.write() = None;
        info!("Configuration hot-reload watcher stopped");
    }
}

fn publish(
    config: &ArcSwap<RelayConfig>,
    updates: &watch::Sender<Arc<RelayConfig>>,
    new_config: RelayConfig,
) {
    let new_config = Arc::new(new_config);
    config.store(Arc::clone(&new_config));
    updates.send_replace(new_config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn create_test_config() -> String {
        r#"
[server]
host = "0.0.0.0"
port = 9000
log_format = "json"

[line]
channel_secret_env = "TEST_IRIS_SECRET"

[llm]
model = "gpt-4o-mini"
max_tokens = 200
temperature = 0.5
timeout_secs = 30

[conversation]
max_turns = 5
eviction = "pin_seed"
idle_ttl_secs = 3600

[persona]
system_prompt = "You are Iris, a meticulous secretary."
welcome_message = "Hello!"
instruction_suffixes = [" Keep it short."]
"#
        .to_string()
    }

    #[test]
    fn test_parse_config() {
        let config = RelayConfig::parse(&create_test_config()).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.server.callback_path, "/callback");
        assert_eq!(config.line.channel_secret_env, "TEST_IRIS_SECRET");
        assert_eq!(config.line.channel_access_token_env, "CHANNEL_ACCESS_TOKEN");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(
            config.llm.params(),
            ModelParams {
                max_tokens: Some(200),
                temperature: Some(0.5)
            }
        );
        assert_eq!(config.conversation.max_turns, 5);
        assert_eq!(config.conversation.eviction, EvictionPolicy::PinSeed);
        assert_eq!(
            config.conversation.idle_ttl(),
            Some(Duration::from_secs(3600))
        );
        assert_eq!(config.persona.instruction_suffixes, vec![" Keep it short."]);
        assert_eq!(config.persona.seed_role, TurnRole::System);
    }

    #[test]
    fn test_defaults() {
        let config = RelayConfig::parse("").unwrap();
        assert_eq!(config, RelayConfig::default());

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.callback_path, "/callback");
        assert_eq!(config.line.api_base, "https://api.line.me");
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert!(config.llm.params().is_empty());
        assert_eq!(config.conversation.max_turns, 10);
        assert_eq!(config.conversation.eviction, EvictionPolicy::Fifo);
        assert!(config.conversation.idle_ttl().is_none());
        assert_eq!(config.persona.instruction_suffixes.len(), 2);
    }

    #[test]
    fn test_store_settings_from_persona() {
        let mut config = RelayConfig::default();
        config.persona.system_prompt = "persona".to_string();
        config.persona.seed_role = TurnRole::Assistant;
        config.conversation.max_turns = 3;

        let settings = config.store_settings();
        assert_eq!(settings.seed, ConversationTurn::assistant("persona"));
        assert_eq!(settings.max_turns, 3);
        assert_eq!(settings.eviction, EvictionPolicy::Fifo);
    }

    #[test]
    fn test_validation_rejects_zero_cap() {
        let result = RelayConfig::parse("[conversation]\nmax_turns = 0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_pin_seed_needs_room() {
        let result = RelayConfig::parse("[conversation]\nmax_turns = 1\neviction = \"pin_seed\"\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let result = RelayConfig::parse("[conversation]\nmax_turns = 1\neviction = \"fifo\"\n");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validation_callback_path() {
        let result = RelayConfig::parse("[server]\ncallback_path = \"callback\"\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_temperature_range() {
        let result = RelayConfig::parse("[llm]\ntemperature = 3.5\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_unknown_eviction_policy_is_parse_error() {
        let result = RelayConfig::parse("[conversation]\neviction = \"lru\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        assert!(matches!(
            RelayConfig::load(&path),
            Err(ConfigError::FileNotFound(_))
        ));
        assert_eq!(
            RelayConfig::load_or_default(&path).unwrap(),
            RelayConfig::default()
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(create_test_config().as_bytes()).unwrap();

        let config = RelayConfig::load(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_secrets_resolve_from_env() {
        let mut config = RelayConfig::default();
        config.line.channel_secret_env = "IRIS_TEST_SECRET_PRESENT".to_string();
        config.line.channel_access_token_env = "IRIS_TEST_TOKEN_ABSENT".to_string();
        config.llm.api_key_env = "IRIS_TEST_KEY_ABSENT".to_string();

        std::env::set_var("IRIS_TEST_SECRET_PRESENT", "s3cret");

        let secrets = config.secrets();
        assert_eq!(secrets.channel_secret, "s3cret");
        assert!(secrets.channel_access_token.is_empty());
        assert!(secrets.llm_api_key.is_empty());

        let debug = format!("{:?}", secrets);
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("<unset>"));
    }

    #[test]
    fn test_manager_reload_notifies_subscribers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[conversation]\nmax_turns = 4\n").unwrap();

        let manager = RelayConfigManager::new(file.path()).unwrap();
        let mut rx = manager.subscribe();
        assert_eq!(manager.config().conversation.max_turns, 4);

        std::fs::write(file.path(), "[conversation]\nmax_turns = 6\n").unwrap();
        manager.reload().unwrap();

        assert_eq!(manager.config().conversation.max_turns, 6);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().conversation.max_turns, 6);
    }

    #[test]
    fn test_manager_keeps_config_on_invalid_reload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[conversation]\nmax_turns = 4\n").unwrap();

        let manager = RelayConfigManager::new(file.path()).unwrap();
        std::fs::write(file.path(), "[conversation]\nmax_turns = 0\n").unwrap();

        assert!(manager.reload().is_err());
        assert_eq!(manager.config().conversation.max_turns, 4);
    }

    #[test]
    fn test_manager_from_config() {
        let manager = RelayConfigManager::from_config(RelayConfig::default());
        assert_eq!(manager.config().server.port, 8000);
    }
}
