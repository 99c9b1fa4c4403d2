use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

use crate::chat::OpenAiClient;
use crate::storage::Store;

/// Health check endpoint
///
/// Probes the storage location and reports whether a chat provider
/// credential is configured. Storage failures are classified here but not
/// remediated.
#[get("/health")]
pub async fn health(store: web::Data<Store>, client: web::Data<OpenAiClient>) -> impl Responder {
    let storage = match store.probe() {
        Ok(()) => "accessible",
        Err(e) => {
            log::warn!("Storage probe failed: {}", e);
            "unavailable"
        }
    };
    let openai = if client.is_configured() {
        "connected"
    } else {
        "degraded"
    };
    let status = if storage == "accessible" {
        "healthy"
    } else {
        "degraded"
    };

    HttpResponse::Ok().json(json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "storage": storage,
        "openai": openai,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::MemoryStore;
    use actix_web::test;

    fn test_config(api_key: &str) -> Config {
        Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            database_path: "data/tasks.json".into(),
            jwt_secret: "test-secret".to_string(),
            allowed_origins: vec![],
            openai_api_key: api_key.to_string(),
            openai_api_base: "https://api.openai.com/v1".to_string(),
            chat_timeout_secs: 5,
        }
    }

    #[actix_web::test]
    async fn test_health_endpoint() {
        let config = test_config("sk-test");
        let store = web::Data::new(Store::new(MemoryStore::new()));
        let client = web::Data::new(OpenAiClient::from_config(&config).unwrap());

        let app = test::init_service(
            actix_web::App::new()
                .app_data(store)
                .app_data(client)
                .service(health),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["status"], "healthy");
        assert_eq!(json["storage"], "accessible");
        assert_eq!(json["openai"], "connected");
        assert!(json["version"].is_string());
    }

    #[actix_web::test]
    async fn test_health_reports_missing_credential() {
        let config = test_config("");
        let store = web::Data::new(Store::new(MemoryStore::new()));
        let client = web::Data::new(OpenAiClient::from_config(&config).unwrap());

        let app = test::init_service(
            actix_web::App::new()
                .app_data(store)
                .app_data(client)
                .service(health),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        let json: serde_json::Value = test::read_body_json(resp).await;

        // A missing credential degrades the chat relay but not the service.
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["openai"], "degraded");
    }
}
