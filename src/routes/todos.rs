use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{Task, TaskCreate, TaskPatch},
    storage::Store,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Retrieves the authenticated user's tasks in stored (insertion) order.
///
/// ## Responses:
/// - `200 OK`: `{"tasks": [...]}`, an empty list for a user with no tasks yet.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
#[get("")]
pub async fn list_todos(
    store: web::Data<Store>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let doc = store.read()?;
    Ok(HttpResponse::Ok().json(json!({ "tasks": doc.tasks_for(&user.0) })))
}

/// Creates a new task for the authenticated user.
///
/// The task id comes from the user's monotonic counter; `completed` starts
/// false and `created_at` is stamped server-side.
///
/// ## Request Body:
/// - `description`: 1–500 characters (required).
/// - `priority` (optional): defaults to `"normal"`.
/// - `tags` (optional): defaults to an empty list.
/// - `due_date` (optional).
///
/// ## Responses:
/// - `201 Created`: Returns the newly created `Task` as JSON.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `422 Unprocessable Entity`: If input validation fails.
#[post("")]
pub async fn create_todo(
    store: web::Data<Store>,
    user: AuthenticatedUserId,
    task_data: web::Json<TaskCreate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let input = task_data.into_inner();

    let task = store.update(|doc| {
        let id = doc.allocate_task_id(&user.0);
        let task = Task::new(id, input);
        doc.user_tasks_mut(&user.0).push(task.clone());
        Ok(task)
    })?;

    Ok(HttpResponse::Created().json(task))
}

/// Applies a partial update to one of the authenticated user's tasks.
///
/// Only fields present in the request body change; for `due_date` an explicit
/// `null` clears the date while an absent field leaves it untouched.
///
/// ## Responses:
/// - `200 OK`: Returns the updated `Task` as JSON.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `404 Not Found`: If the task id does not exist under the caller.
/// - `422 Unprocessable Entity`: If input validation fails.
#[patch("/{id}")]
pub async fn update_todo(
    store: web::Data<Store>,
    user: AuthenticatedUserId,
    task_id: web::Path<u32>,
    patch_data: web::Json<TaskPatch>,
) -> Result<impl Responder, AppError> {
    patch_data.validate()?;
    let task_id = task_id.into_inner();
    let patch_data = patch_data.into_inner();

    let task = store.update(|doc| {
        let task = doc
            .tasks
            .get_mut(&user.0)
            .and_then(|tasks| tasks.iter_mut().find(|task| task.id == task_id))
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
        task.apply(patch_data);
        Ok(task.clone())
    })?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes one of the authenticated user's tasks.
///
/// The remaining tasks keep their order; the deleted id is never reused.
///
/// ## Responses:
/// - `200 OK`: `{"success": true}`.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `404 Not Found`: If the task id does not exist under the caller.
#[delete("/{id}")]
pub async fn delete_todo(
    store: web::Data<Store>,
    user: AuthenticatedUserId,
    task_id: web::Path<u32>,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();

    store.update(|doc| {
        let tasks = doc
            .tasks
            .get_mut(&user.0)
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
        let index = tasks
            .iter()
            .position(|task| task.id == task_id)
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
        tasks.remove(index);
        Ok(())
    })?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
