#![deny(unused)]
//! Mealroute - meal search routing service
//!
//! Classifies chat messages, resolves nutrition constraints and restaurant
//! mentions, and answers with ranked menu items or a short text reply.

use std::sync::Arc;

use mealroute_core::config::AppConfig;
use mealroute_core::traits::{IntentClassifier, LlmClient};
use mealroute_gateway::{GatewayConfig, GatewayServer, InMemoryCatalog, LlmIntentClassifier, MealRouter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // Initialize tracing
    mealroute_governance::configure_tracing(config.logging.json)?;

    tracing::info!("Starting Mealroute v{}", env!("CARGO_PKG_VERSION"));

    // =========================================================================
    // Initialize the menu catalog
    // =========================================================================
    let catalog = match config.catalog.data_dir.as_deref() {
        Some(dir) => match InMemoryCatalog::load_dir(dir) {
            Ok(catalog) => {
                tracing::info!(
                    dir = %dir,
                    restaurants = catalog.restaurant_count(),
                    items = catalog.item_count(),
                    "Menu catalog loaded"
                );
                catalog
            }
            Err(e) => {
                tracing::error!(dir = %dir, "Failed to load menu catalog: {}. Searches will fail.", e);
                InMemoryCatalog::unavailable()
            }
        },
        None => {
            tracing::warn!("No catalog.data_dir configured. Searches will fail.");
            InMemoryCatalog::unavailable()
        }
    };
    let catalog = Arc::new(catalog);

    // =========================================================================
    // Initialize the intent classifier
    // =========================================================================
    let classifier: Option<Arc<dyn IntentClassifier>> = if config.router.classifier_enabled {
        let llm_client: Option<Arc<dyn LlmClient>> =
            match mealroute_model_gateway::create_client(&config.router.provider, &config.router.model) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    tracing::warn!("Failed to create configured LLM client: {}. Fallback to env vars.", e);
                    match mealroute_model_gateway::create_default_client() {
                        Ok(client) => Some(Arc::new(client)),
                        Err(e) => {
                            tracing::warn!("No LLM client available: {}. Unresolved messages get a clarification.", e);
                            None
                        }
                    }
                }
            };

        match llm_client.map(LlmIntentClassifier::new).transpose() {
            Ok(classifier) => classifier.map(|c| Arc::new(c) as Arc<dyn IntentClassifier>),
            Err(e) => {
                tracing::error!("Failed to initialize intent classifier: {}", e);
                None
            }
        }
    } else {
        tracing::info!("Intent classifier disabled by configuration");
        None
    };

    let mut router = MealRouter::new(catalog.clone(), catalog)
        .with_page_size(config.search.page_size)
        .with_max_history(config.router.max_history);
    if let Some(classifier) = classifier {
        router = router.with_classifier(classifier);
    }

    // =========================================================================
    // Start the server
    // =========================================================================
    let gateway_config = GatewayConfig::from(&config.server);
    let metrics_handle = mealroute_governance::setup_metrics_recorder()?;

    tracing::info!(
        host = %gateway_config.host,
        port = gateway_config.port,
        "Gateway initialized"
    );

    GatewayServer::new(gateway_config, Arc::new(router))
        .with_metrics(metrics_handle)
        .run()
        .await?;

    Ok(())
}
