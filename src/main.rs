use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use pookie_todo::auth::AuthMiddleware;
use pookie_todo::chat::OpenAiClient;
use pookie_todo::config::Config;
use pookie_todo::routes;
use pookie_todo::storage::{JsonFileStore, Store};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let store = web::Data::new(Store::new(JsonFileStore::new(&config.database_path)));
    let chat_client =
        web::Data::new(OpenAiClient::from_config(&config).expect("Failed to build chat client"));
    let bind_addr = (config.server_host.clone(), config.server_port);

    log::info!("Starting server at {}", config.server_url());
    let config = web::Data::new(config);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .app_data(store.clone())
            .app_data(chat_client.clone())
            .app_data(config.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(config.jwt_secret.clone()))
                    .configure(routes::config),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
