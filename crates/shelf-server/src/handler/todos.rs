use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use shelf_types::{Record, Task, TaskStats};

use crate::auth::CurrentUser;
use crate::envelope::Envelope;
use crate::error::{ApiError, ApiResult};
use crate::handler::RecordIdPath;
use crate::state::AppState;
use crate::validation;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TodoQuery {
    /// Only tasks whose completion matches.
    pub completed: Option<bool>,
}

/// Body of `GET /todos/stats`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoStatsReport {
    #[serde(flatten)]
    pub stats: TaskStats,
    /// Percentage of completed tasks, 0..=100.
    pub completion_rate: u32,
}

/// The list is filtered; `meta` always describes the caller's whole collection.
pub async fn list_todos(
    State(state): State<AppState>,
    user: CurrentUser,
    query: Result<Query<TodoQuery>, QueryRejection>,
) -> ApiResult<Envelope<Vec<Task>, TaskStats>> {
    let Query(query) = query.map_err(|e| ApiError::InvalidQuery(e.body_text()))?;
    let todos: Vec<Task> = state
        .todos
        .list_all(user.owner())
        .into_iter()
        .filter(|t| query.completed.map_or(true, |c| t.completed == c))
        .collect();
    let meta = state.todos.stats(user.owner());
    Ok(Envelope::ok(todos).with_meta(meta))
}

pub async fn create_todo(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<(StatusCode, Envelope<Task>)> {
    let obj = validation::parse_object(&body?)?;
    let draft = validation::new_task(&obj)?;
    let task = state.todos.create(user.owner(), draft);
    tracing::info!(id = %task.id, owner = %user.owner(), "task created");
    Ok((StatusCode::CREATED, Envelope::ok(task)))
}

pub async fn get_todo(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordIdPath(id): RecordIdPath,
) -> ApiResult<Envelope<Task>> {
    state
        .todos
        .get_by_id(user.owner(), id)
        .map(Envelope::ok)
        .ok_or(ApiError::not_found(Task::KIND))
}

pub async fn update_todo(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordIdPath(id): RecordIdPath,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Envelope<Task>> {
    if state.todos.get_by_id(user.owner(), id).is_none() {
        return Err(ApiError::not_found(Task::KIND));
    }
    let obj = validation::parse_object(&body?)?;
    let patch = validation::task_patch(&obj)?;
    let task = state
        .todos
        .update(user.owner(), id, patch)
        .ok_or(ApiError::not_found(Task::KIND))?;
    tracing::info!(%id, owner = %user.owner(), completed = task.completed, "task updated");
    Ok(Envelope::ok(task))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordIdPath(id): RecordIdPath,
) -> ApiResult<Envelope<()>> {
    if !state.todos.delete(user.owner(), id) {
        return Err(ApiError::not_found(Task::KIND));
    }
    tracing::info!(%id, owner = %user.owner(), "task deleted");
    Ok(Envelope::message_only("Task deleted successfully"))
}

pub async fn todo_stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Envelope<TodoStatsReport>> {
    let stats = state.todos.stats(user.owner());
    Ok(Envelope::ok(TodoStatsReport {
        stats,
        completion_rate: stats.completion_rate(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::testing::{seeded_app, send, send_as, send_raw, token_app, unseeded_app};

    #[tokio::test]
    async fn create_minimal_task() {
        let (status, body) = send(
            &unseeded_app(),
            Method::POST,
            "/todos",
            Some(json!({ "title": "Buy milk" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["title"], "Buy milk");
        assert_eq!(body["data"]["completed"], false);
        assert_eq!(body["data"]["description"], "");
        assert_eq!(body["data"]["id"], 1);
    }

    #[tokio::test]
    async fn create_empty_title_is_400() {
        let (status, body) =
            send(&unseeded_app(), Method::POST, "/todos", Some(json!({ "title": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("title is required"));
    }

    #[tokio::test]
    async fn create_long_title_is_400() {
        let title = "x".repeat(201);
        let (status, body) =
            send(&unseeded_app(), Method::POST, "/todos", Some(json!({ "title": title }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "title must not exceed 200 characters");
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let (status, body) = send_raw(&unseeded_app(), Method::POST, "/todos", "{\"title\":").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("invalid JSON format"));
    }

    #[tokio::test]
    async fn non_numeric_id_is_400() {
        let app = seeded_app();
        for method in [Method::GET, Method::DELETE] {
            let (status, body) = send(&app, method, "/todos/abc", None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "id must be a number");
        }
        let (status, _) = send(
            &app,
            Method::PUT,
            "/todos/1x",
            Some(json!({ "completed": true })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stats_after_two_creates_and_one_completion() {
        let app = unseeded_app();
        for title in ["a", "b"] {
            send(&app, Method::POST, "/todos", Some(json!({ "title": title }))).await;
        }
        let (status, _) =
            send(&app, Method::PUT, "/todos/1", Some(json!({ "completed": true }))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::GET, "/todos/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"],
            json!({ "total": 2, "completed": 1, "pending": 1, "completionRate": 50 })
        );
    }

    #[tokio::test]
    async fn list_with_filter_and_meta() {
        let app = seeded_app();
        let (status, body) = send(&app, Method::GET, "/todos?completed=false", None).await;
        assert_eq!(status, StatusCode::OK);
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["completed"], false);
        assert_eq!(body["meta"], json!({ "total": 2, "completed": 1, "pending": 1 }));

        let (status, body) = send(&app, Method::GET, "/todos?completed=maybe", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn update_validation() {
        let app = seeded_app();
        let (status, body) =
            send(&app, Method::PUT, "/todos/2", Some(json!({ "completed": "yes" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "completed must be a boolean");

        let desc = "d".repeat(1001);
        let (status, _) =
            send(&app, Method::PUT, "/todos/2", Some(json!({ "description": desc }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, Method::GET, "/todos/2", None).await;
        assert_eq!(body["data"]["completed"], false);
    }

    #[tokio::test]
    async fn empty_update_only_touches_updated_at() {
        let app = seeded_app();
        let (_, before) = send(&app, Method::GET, "/todos/2", None).await;
        let (status, after) = send(&app, Method::PUT, "/todos/2", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_ne!(after["data"]["updatedAt"], before["data"]["updatedAt"]);
        for key in ["id", "title", "description", "completed", "createdAt"] {
            assert_eq!(after["data"][key], before["data"][key], "{key} changed");
        }
    }

    #[tokio::test]
    async fn delete_and_missing() {
        let app = seeded_app();
        let (status, body) = send(&app, Method::DELETE, "/todos/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Task deleted successfully");

        let (status, body) = send(&app, Method::GET, "/todos/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "task not found");

        let (status, _) =
            send(&app, Method::PUT, "/todos/1", Some(json!({ "completed": true }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn per_user_stats() {
        let app = token_app();
        for title in ["a", "b"] {
            send_as(&app, Some("alice-token"), Method::POST, "/todos", Some(json!({ "title": title })))
                .await;
        }
        send_as(&app, Some("bob-token"), Method::POST, "/todos", Some(json!({ "title": "c" })))
            .await;

        let (_, body) = send_as(&app, Some("alice-token"), Method::GET, "/todos/stats", None).await;
        assert_eq!(body["data"]["total"], 2);
        let (_, body) = send_as(&app, Some("bob-token"), Method::GET, "/todos", None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["id"], 3);

        let (status, body) =
            send_as(&app, Some("wrong"), Method::GET, "/todos", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized: invalid token");
    }
}
