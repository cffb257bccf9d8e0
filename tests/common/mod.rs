#![allow(dead_code)]

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{http::header, test, web, App};
use chrono::Duration;
use serde_json::json;

use taskboard::auth::{AuthMiddleware, TokenPairResponse, TokenService, TokenSettings};
use taskboard::routes;
use taskboard::store::{CredentialStore, InMemoryCredentialStore, InMemoryTaskStore, TaskStore};

/// Shared state for one test app: seeded users (bcrypt cost 4) and tasks.
pub struct TestContext {
    pub tokens: web::Data<TokenService>,
    pub users: web::Data<dyn CredentialStore>,
    pub tasks: web::Data<dyn TaskStore>,
}

pub fn token_settings() -> TokenSettings {
    TokenSettings {
        access_secret: "integration-access-secret".into(),
        refresh_secret: "integration-refresh-secret".into(),
        access_ttl: Duration::minutes(30),
        refresh_ttl: Duration::days(7),
    }
}

impl TestContext {
    pub fn new() -> Self {
        let users: Arc<dyn CredentialStore> =
            Arc::new(InMemoryCredentialStore::seeded(4).expect("failed to seed users"));
        let tasks: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::seeded());
        Self {
            tokens: web::Data::new(TokenService::new(token_settings(), Arc::clone(&users))),
            users: web::Data::from(users),
            tasks: web::Data::from(tasks),
        }
    }

    /// Builds the app the same way `main` does.
    pub async fn init_app(
        &self,
    ) -> impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    > {
        test::init_service(
            App::new()
                .app_data(self.tokens.clone())
                .app_data(self.users.clone())
                .app_data(self.tasks.clone())
                .wrap(AuthMiddleware)
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header()
                        .max_age(3600),
                )
                .wrap(Logger::default())
                .configure(routes::config),
        )
        .await
    }
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub async fn login<S, B>(app: &S, username: &str, password: &str) -> TokenPairResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK, "login failed");
    test::read_body_json(resp).await
}
