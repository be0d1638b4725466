//! CLI module for iris-relay
//!
//! Provides command-line interface parsing and handling for the iris-relay binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use crate::utils::toml_config::RelayConfig;
use clap::{Parser, Subcommand};
use output::Output;
use std::path::PathBuf;

/// iris-relay - LINE webhook relay for chat-completion APIs
///
/// Keeps a short rolling conversation per user and answers through an
/// OpenAI-compatible completion API.
#[derive(Parser, Debug)]
#[command(
    name = "iris-relay",
    version,
    about = "LINE webhook relay for chat-completion APIs",
    long_about = "Receives LINE Messaging API webhooks, keeps a short rolling conversation\n\
                  history per user and replies through an OpenAI-compatible completion API.\n\n\
                  Run without arguments to start the server.",
    after_help = "EXAMPLES:\n    \
                  iris-relay                        # Start the server (iris.toml optional)\n    \
                  iris-relay --config my.toml       # Use a custom config file\n    \
                  iris-relay config --validate      # Check the configuration and exit"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "iris.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the webhook server (default)
    Serve,

    /// Show configuration information
    Config {
        /// Only validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn output(&self) -> Output {
        if self.no_color {
            Output::no_color()
        } else {
            Output::new()
        }
    }
}

/// Print a summary of `config`. Secret values are never printed, only
/// whether their environment variables are set.
pub fn print_config(output: &Output, config: &RelayConfig) {
    output.header("Server");
    output.kv(
        "listen",
        &format!("{}:{}", config.server.host, config.server.port),
    );
    output.kv("callback path", &config.server.callback_path);
    output.kv("log level", &config.server.log_level);

    output.header("Completion API");
    output.kv("api base", &config.llm.api_base);
    output.kv("model", &config.llm.model);
    if let Some(max_tokens) = config.llm.max_tokens {
        output.kv("max tokens", &max_tokens.to_string());
    }
    if let Some(temperature) = config.llm.temperature {
        output.kv("temperature", &temperature.to_string());
    }

    output.header("Conversation");
    output.kv("max turns", &config.conversation.max_turns.to_string());
    output.kv("eviction", &format!("{:?}", config.conversation.eviction));
    output.kv(
        "idle ttl",
        &config
            .conversation
            .idle_ttl_secs
            .map(|s| format!("{}s", s))
            .unwrap_or_else(|| "never".to_string()),
    );
    output.kv("seed role", config.persona.seed_role.as_str());
    output.kv(
        "instruction suffixes",
        &config.persona.instruction_suffixes.len().to_string(),
    );

    output.header("Secrets");
    for name in [
        &config.line.channel_access_token_env,
        &config.line.channel_secret_env,
        &config.llm.api_key_env,
    ] {
        if config.resolve_env(name).is_some() {
            output.success(&format!("{} is set", name));
        } else {
            output.warning(&format!("{} is not set", name));
        }
    }
}
