//! # Todo サービスのエラー定義
//!
//! ハンドラ・ユースケースで発生するエラーと、HTTP レスポンスへの変換を定義する。
//!
//! | エラー種別 | HTTP ステータス | ボディ |
//! |-----------|----------------|--------|
//! | `BadRequest` | 400 | `{ "message" }` |
//! | `InvalidBody` | 400 | `{ "message", "error" }` |
//! | `Storage` | 500 | `{ "message", "error" }` |

use axum::{
    Json,
    extract::rejection::{BytesRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use todoflow_domain::DomainError;
use todoflow_infra::InfraError;
use todoflow_shared::ErrorResponse;

/// JSON ボディのパース失敗時のメッセージ
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Todo サービスで発生するエラー
#[derive(Debug, Error)]
pub enum TodoError {
    /// 入力値の検証失敗（メッセージはそのままクライアントに返す）
    #[error("{0}")]
    BadRequest(String),

    /// リクエストボディを JSON としてパースできない
    #[error("{message}: {detail}")]
    InvalidBody { message: String, detail: String },

    /// ストレージ操作の失敗
    #[error("{message}: {source}")]
    Storage {
        message: &'static str,
        #[source]
        source:  InfraError,
    },
}

impl TodoError {
    /// `map_err` 用に操作ごとのメッセージを束縛したストレージエラー変換を返す
    ///
    /// ```ignore
    /// repository.find_all().await.map_err(TodoError::storage("Failed to fetch todos"))?;
    /// ```
    pub fn storage(message: &'static str) -> impl FnOnce(InfraError) -> Self {
        move |source| Self::Storage { message, source }
    }
}

impl From<DomainError> for TodoError {
    fn from(err: DomainError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

/// Content-Type は見ずにボディを JSON として解釈するため、
/// 失敗はすべて serde_json のエラーとして届く。
impl From<serde_json::Error> for TodoError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidBody {
            message: INVALID_BODY_MESSAGE.to_string(),
            detail:  err.to_string(),
        }
    }
}

impl From<BytesRejection> for TodoError {
    fn from(rejection: BytesRejection) -> Self {
        Self::InvalidBody {
            message: INVALID_BODY_MESSAGE.to_string(),
            detail:  rejection.body_text(),
        }
    }
}

/// パスパラメータを取り出せない（不正な UTF-8 など）場合は不正な識別子として扱う
impl From<PathRejection> for TodoError {
    fn from(rejection: PathRejection) -> Self {
        Self::from(DomainError::InvalidId {
            value: rejection.body_text(),
        })
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            TodoError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(message))
            }
            TodoError::InvalidBody { message, detail } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_detail(message, detail),
            ),
            TodoError::Storage { message, source } => {
                tracing::error!(
                    error = %source,
                    span_trace = %source.span_trace(),
                    "{message}"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_detail(message, source.to_string()),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use pretty_assertions::assert_eq;

    use super::*;

    async fn response_json(error: TodoError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bad_requestはmessageのみの400() {
        let (status, json) =
            response_json(TodoError::BadRequest("Invalid todo ID".to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, serde_json::json!({ "message": "Invalid todo ID" }));
    }

    #[tokio::test]
    async fn test_ストレージエラーはmessageとerrorを持つ500() {
        let error = TodoError::storage("Failed to save todo")(InfraError::unexpected("down"));

        let (status, json) = response_json(error).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json,
            serde_json::json!({
                "message": "Failed to save todo",
                "error": "予期しないエラー: down"
            })
        );
    }

    #[test]
    fn test_ドメインエラーのメッセージがそのまま使われる() {
        let error = TodoError::from(DomainError::InvalidId {
            value: "xyz".to_string(),
        });

        assert!(matches!(error, TodoError::BadRequest(ref msg) if msg == "Invalid todo ID"));
    }

    #[tokio::test]
    async fn test_jsonパースエラーはerrorに詳細を載せる() {
        let parse_error = serde_json::from_slice::<serde_json::Value>(b"{\"title\":").unwrap_err();
        let expected_detail = parse_error.to_string();

        let (status, json) = response_json(TodoError::from(parse_error)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json,
            serde_json::json!({
                "message": "Invalid request body",
                "error": expected_detail
            })
        );
    }
}
