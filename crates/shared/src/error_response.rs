//! # エラーレスポンス
//!
//! 全エンドポイントで共通のエラーレスポンス構造体を提供する。
//!
//! ## 形式
//!
//! ```json
//! { "message": "Failed to fetch todos", "error": "<詳細>" }
//! ```
//!
//! `error` は詳細がある場合のみ出力する。入力エラーでは `message` のみ。

use serde::{Deserialize, Serialize};

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error:   Option<String>,
}

impl ErrorResponse {
    /// メッセージのみのエラー
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error:   None,
        }
    }

    /// 詳細付きのエラー
    pub fn with_detail(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error:   Some(error.into()),
        }
    }

    /// 500 Internal Server Error（パニック時）
    ///
    /// 詳細は出力しない。
    pub fn internal_error() -> Self {
        Self::new("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_詳細なしではerrorフィールドを出力しない() {
        let json = serde_json::to_value(ErrorResponse::new("The title is required")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "message": "The title is required" })
        );
    }

    #[test]
    fn test_詳細付きではmessageとerrorを出力する() {
        let json =
            serde_json::to_value(ErrorResponse::with_detail("Failed to fetch todos", "timeout"))
                .unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "message": "Failed to fetch todos", "error": "timeout" })
        );
    }

    #[test]
    fn test_internal_errorは固定メッセージ() {
        let error = ErrorResponse::internal_error();

        assert_eq!(error.message, "Internal server error");
        assert_eq!(error.error, None);
    }

    #[test]
    fn test_errorフィールドなしのjsonをデシリアライズできる() {
        let error: ErrorResponse = serde_json::from_str(r#"{"message":"Invalid todo ID"}"#).unwrap();

        assert_eq!(error, ErrorResponse::new("Invalid todo ID"));
    }
}
