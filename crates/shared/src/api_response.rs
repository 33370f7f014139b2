//! # API レスポンス
//!
//! 一覧系エンドポイントの `{ "data": T }` エンベロープと、
//! 更新系エンドポイントの `{ "message": "..." }` 形式を提供する。

use serde::{Deserialize, Serialize};

/// 一覧系 API のレスポンス型
///
/// ## 使用例
///
/// ```
/// use todoflow_shared::ApiResponse;
///
/// let response = ApiResponse::new(vec![1, 2, 3]);
/// assert_eq!(response.data.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// 新しい `ApiResponse` を作成する
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// メッセージのみを返すレスポンス型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
