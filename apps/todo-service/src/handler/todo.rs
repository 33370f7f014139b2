//! # Todo ハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /todo/` - 全件取得
//! - `POST /todo/` - 作成
//! - `PUT /todo/{id}` - `title` と `completed` の更新
//! - `DELETE /todo/{id}` - 削除
//!
//! `PUT /todo/` と `DELETE /todo/`（識別子なし）は [`missing_todo_id`] が 400 を返す。

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{
        Path,
        State,
        rejection::{BytesRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use todoflow_domain::todo::Todo;
use todoflow_shared::{ApiResponse, MessageResponse};

use crate::{
    error::TodoError,
    usecase::{CreateTodoInput, TodoUseCaseImpl, UpdateTodoInput},
};

const TODO_ID_REQUIRED_MESSAGE: &str = "The todo ID is required";

/// Todo API の共有状態
pub struct TodoState {
    pub usecase: TodoUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// 作成リクエスト
///
/// `title` が欠落・`null` の場合は空文字列として扱う。
/// `completed` などその他のフィールドは無視する。
#[derive(Debug, Default, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
}

/// 更新リクエスト
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub title:     Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Todo DTO（外部表現）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoDto {
    pub id:         String,
    pub title:      String,
    pub completed:  bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<&Todo> for TodoDto {
    fn from(todo: &Todo) -> Self {
        Self {
            id:         todo.id().to_string(),
            title:      todo.title().as_str().to_string(),
            completed:  todo.completed(),
            created_at: todo
                .created_at()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// 作成レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodoResponse {
    pub message: String,
    pub todo_id: String,
}

// --- ハンドラ ---

/// GET /todo/
///
/// 全件をストレージの自然順序で返す。空の場合は `{"data": []}`。
#[tracing::instrument(skip_all)]
pub async fn list_todos(
    State(state): State<Arc<TodoState>>,
) -> Result<impl IntoResponse, TodoError> {
    let todos = state.usecase.list_todos().await?;

    let items: Vec<TodoDto> = todos.iter().map(TodoDto::from).collect();

    Ok((StatusCode::OK, Json(ApiResponse::new(items))))
}

/// POST /todo/
///
/// ## レスポンス
///
/// - `201 Created`: `{ "message", "todo_id" }`
/// - `400 Bad Request`: JSON として不正、またはタイトルが空
/// - `500 Internal Server Error`: 保存に失敗
///
/// `Content-Type` ヘッダは検査しない。
#[tracing::instrument(skip_all)]
pub async fn create_todo(
    State(state): State<Arc<TodoState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, TodoError> {
    let req: CreateTodoRequest = parse_json_body(body)?;

    let todo = state
        .usecase
        .create_todo(CreateTodoInput {
            title: req.title.unwrap_or_default(),
        })
        .await?;

    tracing::info!(todo_id = %todo.id(), "Todo を作成しました");

    Ok((
        StatusCode::CREATED,
        Json(CreateTodoResponse {
            message: "Todo created successfully".to_string(),
            todo_id: todo.id().to_string(),
        }),
    ))
}

/// PUT /todo/{id}
///
/// 識別子に一致する Todo がなくても成功を返す。
#[tracing::instrument(skip_all, fields(todo_id))]
pub async fn update_todo(
    State(state): State<Arc<TodoState>>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, TodoError> {
    let id = require_todo_id(path)?;
    let req: UpdateTodoRequest = parse_json_body(body)?;

    state
        .usecase
        .update_todo(UpdateTodoInput {
            id,
            title: req.title.unwrap_or_default(),
            completed: req.completed,
        })
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Todo successfully updated")),
    ))
}

/// DELETE /todo/{id}
///
/// 識別子に一致する Todo がなくても成功を返す。
#[tracing::instrument(skip_all, fields(todo_id))]
pub async fn delete_todo(
    State(state): State<Arc<TodoState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, TodoError> {
    let id = require_todo_id(path)?;

    state.usecase.delete_todo(&id).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Todo deleted successfully")),
    ))
}

/// PUT /todo/, DELETE /todo/
pub async fn missing_todo_id() -> TodoError {
    TodoError::BadRequest(TODO_ID_REQUIRED_MESSAGE.to_string())
}

/// パスから識別子を取り出し、現在のスパンに記録する
fn require_todo_id(path: Result<Path<String>, PathRejection>) -> Result<String, TodoError> {
    let Path(id) = path?;
    if id.is_empty() {
        return Err(TodoError::BadRequest(TODO_ID_REQUIRED_MESSAGE.to_string()));
    }
    tracing::Span::current().record("todo_id", id.as_str());
    Ok(id)
}

fn parse_json_body<T: DeserializeOwned>(
    body: Result<Bytes, BytesRejection>,
) -> Result<T, TodoError> {
    let bytes = body?;
    Ok(serde_json::from_slice(&bytes)?)
}
