pub mod auth;
pub mod tasks;

use actix_web::web;

use crate::error::AppError;

/// Registers every route plus a JSON extractor config that renders body
/// errors as `AppError::BadRequest`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(auth::login)
    .service(auth::renew)
    .service(auth::me)
    .service(
        web::scope("/tasks")
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::execute_task),
    );
}
