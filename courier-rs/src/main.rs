use courier_rs::api::ApiServer;
use courier_rs::config::{Config, LoggingConfig};
use courier_rs::dispatch::Dispatcher;
use courier_rs::template::{HandlebarsRenderer, HttpTemplateFetcher, TemplateResolver};
use courier_rs::transport::SmtpTransport;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Configuration could not be loaded
const EXIT_CONFIG: u8 = 23;
/// Mail transport could not be created
const EXIT_TRANSPORT: u8 = 24;
/// API listener could not bind or serve
const EXIT_SERVER: u8 = 25;

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            init_logging(&LoggingConfig::default());
            error!("Failed to load configuration: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    init_logging(&config.logging);

    info!("Starting courier-rs");
    info!("Configuration loaded");
    info!("  API listening on: {}", config.server.listen_addr);
    info!("  SMTP relay: {}:{}", config.smtp.host, config.smtp.port);
    info!("  Sender: {}", config.smtp.from);

    let allowed = config.allowed_kinds();
    info!("  Allowed types: {}", allowed);

    let schedule = config.drain_schedule();
    info!("  Drain schedule: {}", schedule.expression());

    let transport = match SmtpTransport::from_config(&config.smtp) {
        Ok(transport) => Arc::new(transport),
        Err(e) => {
            error!("Failed to create mail transport: {}", e);
            return ExitCode::from(EXIT_TRANSPORT);
        }
    };

    let fetcher = match HttpTemplateFetcher::new(config.fetch_timeout()) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(e) => {
            error!("Failed to create template fetcher: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let resolver = TemplateResolver::new(fetcher, Arc::new(HandlebarsRenderer::new()), allowed);
    let dispatcher = Arc::new(Dispatcher::new(
        config.smtp.from.clone(),
        resolver,
        transport,
    ));

    dispatcher.start_periodic(schedule);

    let server = ApiServer::new(Arc::clone(&dispatcher), &config.server);
    if let Err(e) = server.run().await {
        error!("API server error: {}", e);
        error!("Server failed to start");
        return ExitCode::from(EXIT_SERVER);
    }

    ExitCode::SUCCESS
}

fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "compact" => builder.compact().try_init(),
        _ => builder.pretty().try_init(),
    };

    if let Err(e) = result {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}
