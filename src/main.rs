use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use taskboard::auth::{AuthMiddleware, TokenService};
use taskboard::config::Config;
use taskboard::routes;
use taskboard::store::{CredentialStore, InMemoryCredentialStore, InMemoryTaskStore, TaskStore};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    if config.uses_dev_secrets() {
        log::warn!("using built-in development signing secrets; set ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET");
    }

    let users: Arc<dyn CredentialStore> = Arc::new(
        InMemoryCredentialStore::seeded(config.bcrypt_cost)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?,
    );
    let tasks: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::seeded());
    let tokens = web::Data::new(TokenService::new(config.token_settings(), Arc::clone(&users)));
    let users = web::Data::from(users);
    let tasks = web::Data::from(tasks);
    let origins = config.cors_origins.clone();

    log::info!("Starting taskboard server at {}", config.server_url());
    HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        // Last wrap runs first: Logger, then CORS (answers preflights), then auth.
        App::new()
            .app_data(tokens.clone())
            .app_data(users.clone())
            .app_data(tasks.clone())
            .wrap(AuthMiddleware)
            .wrap(cors)
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
