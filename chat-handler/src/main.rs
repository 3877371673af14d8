use chat_handler::config::HandlerConfig;
use chat_handler::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = HandlerConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        "chat-handler",
        &config.log.level,
        config.log.otlp_endpoint.as_deref(),
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start chat handler: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    app.run_until_stopped().await
}
