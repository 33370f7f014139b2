//! # ドメイン層エラー定義
//!
//! ビジネスルール違反を表現するエラー型。
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗（空のタイトルなど） |
//! | `InvalidId` | 400 Bad Request | 識別子の形式が不正 |
//!
//! ## 使用例
//!
//! ```rust
//! use todoflow_domain::DomainError;
//!
//! fn validate_title(title: &str) -> Result<(), DomainError> {
//!     if title.is_empty() {
//!         return Err(DomainError::Validation("The title is required".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// API 層でこのエラーを受け取り、HTTP レスポンスに変換する。
/// `Display` の文字列はそのままクライアント向けの `message` として使う。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 必須フィールドが未入力など、入力値がルールに違反している場合に使用する。
    #[error("{0}")]
    Validation(String),

    /// 識別子の形式エラー
    ///
    /// ObjectId として解釈できない文字列が渡された場合に使用する。
    /// `value` には受け取った文字列をそのまま保持する（ログ用）。
    #[error("Invalid todo ID")]
    InvalidId {
        /// 受け取った文字列
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_validationはメッセージをそのまま表示する() {
        let err = DomainError::Validation("The title is required".to_string());
        assert_eq!(err.to_string(), "The title is required");
    }

    #[test]
    fn test_invalid_idは固定メッセージを表示する() {
        let err = DomainError::InvalidId {
            value: "xyz".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid todo ID");
    }
}
