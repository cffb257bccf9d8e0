use crate::{auth::CurrentUser, error::AppError, models::TaskInput, store::TaskStore};
use actix_web::{get, post, web, HttpResponse, Responder};
use validator::Validate;

/// Lists every task.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects in creation order.
/// - `401 Unauthorized`: missing or invalid access token.
#[get("")]
pub async fn get_tasks(
    tasks: web::Data<dyn TaskStore>,
    _user: CurrentUser,
) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(tasks.list()?))
}

/// Creates a new task.
///
/// ## Request Body:
/// A JSON object matching `TaskInput`:
/// - `title`: required, 1 to 200 characters.
/// - `done` (optional): defaults to `false`.
/// - `priority` (optional): `"low"`, `"medium"` or `"high"`; defaults to `"medium"`.
/// - `lat`, `lng`, `address` (optional): location of the task.
///
/// ## Responses:
/// - `200 OK`: the created `Task`, including its server-assigned `id`.
/// - `400 Bad Request`: the body does not deserialize (e.g. unknown priority).
/// - `401 Unauthorized`: missing or invalid access token.
/// - `422 Unprocessable Entity`: validation failed.
#[post("")]
pub async fn create_task(
    tasks: web::Data<dyn TaskStore>,
    task_data: web::Json<TaskInput>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks.create(task_data.into_inner())?;
    log::info!("{} created task {}", user.0.username, task.id);

    Ok(HttpResponse::Ok().json(task))
}

/// Marks a task as done.
///
/// ## Responses:
/// - `200 OK`: `{"id": <id>, "done": true}`.
/// - `401 Unauthorized`: missing or invalid access token.
/// - `404 Not Found`: no task with that id.
#[post("/{id}/execute")]
pub async fn execute_task(
    tasks: web::Data<dyn TaskStore>,
    task_id: web::Path<i64>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let response = tasks.execute(task_id.into_inner())?;
    log::info!("{} executed task {}", user.0.username, response.id);

    Ok(HttpResponse::Ok().json(response))
}
