//! NDA approval server.
//!
//! Loads configuration, wires the adapters into the handlers, starts the
//! background cleanup tasks and serves the HTTP API until Ctrl-C.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use nda_approval::adapters::http::{app_router, ApprovalAppState};
use nda_approval::adapters::telegram::TelegramClientConfig;
use nda_approval::adapters::{
    CompositeTextExtractor, InMemoryApplicationRegistry, LocalArtifactStorage, ShortIdPurger,
    SweeperConfig, TelegramBotClient, UploadSweeper, WebhookAnalysisConfig,
    WebhookAnalysisService,
};
use nda_approval::application::{
    AnalyzeDocumentHandler, DecisionCallbackHandler, IntakeDocumentHandler, RouteVerdictHandler,
};
use nda_approval::config::AppConfig;
use nda_approval::ports::{ApplicationRegistry, ArtifactStorage, ChatMessenger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    for key in config.missing_collaborators() {
        tracing::warn!(setting = %key, "Collaborator not configured");
    }

    let storage: Arc<dyn ArtifactStorage> = Arc::new(
        LocalArtifactStorage::new(config.storage.upload_dir.clone())
            .with_public_base_url(config.storage.public_base_url.clone()),
    );
    let registry: Arc<dyn ApplicationRegistry> = Arc::new(InMemoryApplicationRegistry::new(
        config.registry.callback_retention(),
    ));

    let bot = Arc::new(TelegramBotClient::new(
        TelegramClientConfig::new(config.telegram.bot_token.clone())
            .with_chat_id(config.telegram.chat_id.clone())
            .with_channel_id(config.telegram.channel_id.clone())
            .with_api_base_url(config.telegram.api_base_url.clone())
            .with_timeout(config.telegram.timeout()),
    ));
    let messenger: Arc<dyn ChatMessenger> = bot.clone();

    let analysis = Arc::new(WebhookAnalysisService::new(
        WebhookAnalysisConfig::new(config.analysis.webhook_url.clone())
            .with_timeout(config.analysis.timeout()),
    ));

    let analyzer = Arc::new(AnalyzeDocumentHandler::new(
        Arc::new(CompositeTextExtractor::default()),
        analysis,
    ));
    let router = Arc::new(RouteVerdictHandler::new(registry.clone(), messenger.clone()));
    let intake = Arc::new(IntakeDocumentHandler::new(
        storage.clone(),
        analyzer,
        router.clone(),
    ));
    let callbacks = Arc::new(DecisionCallbackHandler::new(
        registry.clone(),
        messenger.clone(),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweeper = UploadSweeper::new(
        storage.clone(),
        SweeperConfig::default()
            .with_interval(config.storage.sweep_interval())
            .with_retention(config.storage.retention()),
    );
    let sweeper_rx = shutdown_rx.clone();
    let sweeper_task = tokio::spawn(async move { sweeper.run(sweeper_rx).await });

    let purger = ShortIdPurger::new(registry.clone(), config.registry.purge_interval());
    let purger_rx = shutdown_rx.clone();
    let purger_task = tokio::spawn(async move { purger.run(purger_rx).await });

    if config.features.register_webhook_on_startup {
        if let Some(url) = config.telegram.webhook_url.as_deref() {
            if let Err(e) = bot
                .register_webhook(url, config.telegram.webhook_secret())
                .await
            {
                tracing::error!(error = %e, "Telegram webhook registration failed");
            }
        }
    }

    let state = ApprovalAppState {
        intake,
        router,
        callbacks,
        storage,
        messenger,
        webhook_secret: config.telegram.webhook_secret().cloned(),
        expose_error_details: config.expose_error_details(),
        max_upload_bytes: config.storage.max_upload_bytes,
    };
    let app = app_router(
        state,
        &config.server.cors_origins_list(),
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        address = %addr,
        environment = ?config.server.environment,
        "NDA approval server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown signal received");
        })
        .await?;

    let _ = shutdown_tx.send(true);
    let _ = tokio::join!(sweeper_task, purger_task);
    tracing::info!("Server stopped");

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
