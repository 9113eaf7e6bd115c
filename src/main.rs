//! smart-search - interactive search suggestions in the terminal.

use std::sync::Arc;

use smart_search::backend::{HttpBackend, MockBackend, SuggestionBackend};
use smart_search::cli::Cli;
use smart_search::config::Config;
use smart_search::controller::SuggestionController;
use smart_search::error::Result;
use smart_search::{logging, tui};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();

    if cli.is_headless() {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    match run(cli).await {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;

    let (backend, api_label): (Arc<dyn SuggestionBackend>, String) = if cli.mock_api {
        info!("Using in-memory suggestion API");
        (Arc::new(MockBackend::with_sample_terms()), "mock".to_string())
    } else {
        let base_url = config.resolve_base_url(cli.api_url())?;
        info!("Suggestion API: {}", base_url);
        (
            Arc::new(HttpBackend::from_config(&config.api)?),
            base_url.to_string(),
        )
    };

    let controller = SuggestionController::new(backend, config.suggest.clone());

    if cli.is_headless() {
        tui::headless::run_headless(&cli, controller, api_label).await
    } else {
        tui::run(controller, api_label).await?;
        Ok(0)
    }
}
