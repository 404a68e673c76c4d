use std::sync::Arc;

use axum::http::StatusCode;
use mealroute_core::mocks::{MockClassifier, MockLlm};
use mealroute_core::types::Intent;
use mealroute_gateway::{GatewayConfig, GatewayServer, InMemoryCatalog, LlmIntentClassifier, MealRouter};
use serde_json::json;

const MENUS_DIR: &str = "data/menus";

// =============================================================================
// System Tests
// =============================================================================

#[tokio::test]
async fn test_system_meal_search_happy_path() -> anyhow::Result<()> {
    let (addr, _handle) = start_test_server(router()?).await?;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://{}/v1/chat", addr))
        .json(&json!({"message": "Find me a salad under 500 calories"}))
        .send()
        .await?;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-mealroute-router-mode"], "meals");
    assert_eq!(resp.headers()["x-mealroute-model-used"], "false");
    assert_eq!(resp.headers()["x-mealroute-heuristic-mode"], "food_intent");

    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["mode"], "meals");
    let meals = body["meals"].as_array().unwrap();
    assert!(!meals.is_empty());
    for meal in meals {
        assert!(meal["macros"]["calories"].as_f64().unwrap() <= 500.0);
    }
    assert!(body["searchKey"].as_str().unwrap().len() == 64);

    Ok(())
}

#[tokio::test]
async fn test_system_restaurant_scoped_search() -> anyhow::Result<()> {
    let (addr, _handle) = start_test_server(router()?).await?;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://{}/v1/chat", addr))
        .json(&json!({"message": "what can I eat at Sweetgreen"}))
        .send()
        .await?;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["restaurant"], "Sweetgreen");
    for meal in body["meals"].as_array().unwrap() {
        assert_eq!(meal["restaurant"], "Sweetgreen");
    }

    Ok(())
}

#[tokio::test]
async fn test_system_unknown_restaurant() -> anyhow::Result<()> {
    let (addr, _handle) = start_test_server(router()?).await?;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://{}/v1/chat", addr))
        .json(&json!({"message": "lunch from Quantum Diner"}))
        .send()
        .await?;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-mealroute-router-mode"], "restaurant_not_found");
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["mode"], "text");
    assert_eq!(body["error"], false);
    assert!(body["answer"].as_str().unwrap().contains("Quantum Diner"));

    Ok(())
}

#[tokio::test]
async fn test_system_malformed_body() -> anyhow::Result<()> {
    let (addr, _handle) = start_test_server(router()?).await?;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://{}/v1/chat", addr))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers()["x-mealroute-router-mode"], "error");
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["mode"], "text");
    assert_eq!(body["error"], true);

    Ok(())
}

#[tokio::test]
async fn test_system_classifier_routes_nutrition_question() -> anyhow::Result<()> {
    let reply = r#"{"type": "nutrition_text", "payload": {"answer": "It can help some people manage intake."}}"#;
    let classifier = LlmIntentClassifier::new(Arc::new(MockLlm::constant(reply)))?;
    let router = router()?.with_classifier(Arc::new(classifier));
    let (addr, _handle) = start_test_server(router).await?;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://{}/v1/chat", addr))
        .json(&json!({
            "message": "is intermittent fasting worth trying?",
            "userContext": {"goal": "cut"},
            "history": [{"role": "user", "content": "hi"}]
        }))
        .send()
        .await?;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-mealroute-model-used"], "true");
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["answer"], "It can help some people manage intake.");

    Ok(())
}

#[tokio::test]
async fn test_system_classifier_clarifies() -> anyhow::Result<()> {
    let classifier = Arc::new(MockClassifier::new(Intent::clarify("Which meal are you planning?")));
    let (addr, _handle) = start_test_server(router()?.with_classifier(classifier)).await?;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://{}/v1/chat", addr))
        .json(&json!({"message": "hmm"}))
        .send()
        .await?;

    assert_eq!(resp.headers()["x-mealroute-router-mode"], "clarify");
    let body: serde_json::Value = resp.json().await?;
    assert_eq!(body["answer"], "Which meal are you planning?");

    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

fn router() -> anyhow::Result<MealRouter> {
    let catalog = Arc::new(InMemoryCatalog::load_dir(MENUS_DIR)?);
    Ok(MealRouter::new(catalog.clone(), catalog))
}

async fn start_test_server(
    router: MealRouter,
) -> anyhow::Result<(std::net::SocketAddr, tokio::task::JoinHandle<()>)> {
    let config = GatewayConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..Default::default()
    };

    let server = GatewayServer::new(config, Arc::new(router));

    let axum_router = server.build_router();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, axum_router).await.unwrap();
    });

    Ok((addr, handle))
}
