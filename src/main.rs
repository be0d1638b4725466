use anyhow::Context;
use iris::{
    AppState, ConversationStore, RelayConfig, RelayConfigManager,
    api::routes::create_router,
    cli::{self, Cli, Commands, output::Output},
    utils::toml_config::LogFormat,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = cli.output();

    match cli.command.clone().unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&cli, &output).await,
        Commands::Config { validate } => show_config(&cli, &output, validate),
    }
}

fn init_tracing(config: &RelayConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let level = &config.server.log_level;
            EnvFilter::new(format!("iris={level},iris_relay={level},tower_http={level}"))
        })
    };

    let registry = tracing_subscriber::registry().with(filter);
    match config.server.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn serve(cli: &Cli, output: &Output) -> anyhow::Result<()> {
    let config_manager = Arc::new(
        RelayConfigManager::new(&cli.config)
            .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?,
    );
    let config = config_manager.config();

    output.banner();
    init_tracing(&config, cli.verbose);

    if config_manager.config_path().exists() {
        config_manager.start_watching()?;
    } else {
        warn!(
            "No configuration file at {:?}, running with defaults",
            config_manager.config_path()
        );
    }

    let secrets = config.secrets();
    let state = AppState::new(Arc::clone(&config_manager), &secrets)?;

    // Persona and limits follow hot reloads
    let mut updates = config_manager.subscribe();
    let store = Arc::clone(&state.store);
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let settings = updates.borrow_and_update().store_settings();
            info!(
                max_turns = settings.max_turns,
                eviction = ?settings.eviction,
                "Applied conversation settings"
            );
            store.set_settings(settings);
        }
    });

    if let Some(ttl) = config.conversation.idle_ttl() {
        info!(ttl_secs = ttl.as_secs(), "Idle conversation expiry enabled");
        ConversationStore::spawn_idle_sweeper(
            Arc::clone(&state.store),
            ttl,
            config.conversation.sweep_interval(),
        );
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        "Listening on http://{} (callback: {}, model: {})",
        addr, config.server.callback_path, config.llm.model
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn show_config(cli: &Cli, output: &Output, validate: bool) -> anyhow::Result<()> {
    let config = match RelayConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            output.error(&format!("Invalid configuration: {}", e));
            return Err(e.into());
        }
    };

    if !cli.config.exists() {
        output.info(&format!(
            "{} not found, showing built-in defaults",
            cli.config.display()
        ));
    }

    if validate {
        output.success("Configuration is valid");
        return Ok(());
    }

    cli::print_config(output, &config);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
