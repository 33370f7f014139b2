//! # Todo
//!
//! Todo アイテムを表現するドメインモデル。
//!
//! ## ライフサイクル
//!
//! - 作成: [`Todo::new`] で識別子と `created_at` が確定する（`completed` は常に `false`）
//! - 更新: [`Todo::apply`] で `title` と `completed` のみを書き換える
//! - 削除: 識別子の一致で削除する（リポジトリの責務）
//!
//! 識別子と `created_at` は作成後に変更されない。
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use todoflow_domain::todo::{Todo, TodoId, TodoTitle, TodoUpdate};
//!
//! let mut todo = Todo::new(TodoId::new(), TodoTitle::new("掃除")?, chrono::Utc::now());
//! todo.apply(TodoUpdate {
//!     title:     TodoTitle::new("部屋の掃除")?,
//!     completed: true,
//! });
//!
//! assert_eq!(todo.title().as_str(), "部屋の掃除");
//! assert!(todo.completed());
//! # Ok(())
//! # }
//! ```

use std::str::FromStr;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use derive_more::Display;

use crate::DomainError;

/// タイトル未入力時のメッセージ
pub const TITLE_REQUIRED_MESSAGE: &str = "The title is required";

// =========================================================================
// TodoId（識別子）
// =========================================================================

/// Todo の一意識別子
///
/// ストレージのネイティブ識別子（ObjectId）をラップする。
/// 外部表現は 24 文字の 16 進文字列（`Display` で出力）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct TodoId(ObjectId);

impl TodoId {
    /// 新しい識別子を生成する
    ///
    /// クライアントから受け取った値は使わず、作成時に必ずここで採番する。
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// 既存の ObjectId から識別子を作成する
    pub fn from_object_id(oid: ObjectId) -> Self {
        Self(oid)
    }

    /// 16 進文字列から識別子を復元する
    ///
    /// ObjectId の形式（24 文字の 16 進数）でなければ
    /// [`DomainError::InvalidId`] を返す。
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        ObjectId::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::InvalidId {
                value: value.to_string(),
            })
    }

    /// 内部の ObjectId 参照を取得する
    pub fn as_object_id(&self) -> &ObjectId {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for TodoId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =========================================================================
// TodoTitle（タイトル）
// =========================================================================

/// Todo のタイトル（値オブジェクト）
///
/// # 不変条件
///
/// - 空文字列ではない
///
/// 前後の空白は保持する（受け取った値をそのまま保存する）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoTitle(String);

impl TodoTitle {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::Validation(TITLE_REQUIRED_MESSAGE.to_string()));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 所有権を持つ文字列に変換する
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for TodoTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =========================================================================
// TodoUpdate（更新内容）
// =========================================================================

/// 更新で書き換えるフィールドの組
///
/// 更新対象は `title` と `completed` のみ。識別子と作成日時は含まない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    pub title:     TodoTitle,
    pub completed: bool,
}

// =========================================================================
// Todo（エンティティ）
// =========================================================================

/// Todo エンティティ
///
/// # 不変条件
///
/// - `title` は空ではない（[`TodoTitle`] が保証）
/// - `id` と `created_at` は作成後に変わらない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id:         TodoId,
    title:      TodoTitle,
    completed:  bool,
    created_at: DateTime<Utc>,
}

impl Todo {
    /// 新しい Todo を作成する
    ///
    /// `completed` は入力に関わらず `false` で開始する。
    pub fn new(id: TodoId, title: TodoTitle, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            completed: false,
            created_at: now,
        }
    }

    /// データベースから Todo を復元する
    pub fn from_db(
        id: TodoId,
        title: TodoTitle,
        completed: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            completed,
            created_at,
        }
    }

    /// 更新内容を反映する
    ///
    /// `title` と `completed` のみを置き換える。
    pub fn apply(&mut self, update: TodoUpdate) {
        self.title = update.title;
        self.completed = update.completed;
    }

    pub fn id(&self) -> &TodoId {
        &self.id
    }

    pub fn title(&self) -> &TodoTitle {
        &self.title
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    // ===== TodoId =====

    #[test]
    fn test_todo_id_newは毎回異なる値を生成する() {
        assert_ne!(TodoId::new(), TodoId::new());
    }

    #[test]
    fn test_todo_idの表示は24文字の16進数() {
        let id = TodoId::new();
        let hex = id.to_string();

        assert_eq!(hex.len(), 24);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_todo_idは表示文字列から復元できる() {
        let id = TodoId::new();
        let restored = TodoId::parse(&id.to_string()).unwrap();

        assert_eq!(restored, id);
    }

    #[rstest]
    #[case::空文字("")]
    #[case::短すぎる("65a1b2c3d4e5f6a7b8c9d0e")]
    #[case::長すぎる("65a1b2c3d4e5f6a7b8c9d0e1f")]
    #[case::非16進数("zza1b2c3d4e5f6a7b8c9d0e1")]
    #[case::任意の文字列("not-an-id")]
    fn test_todo_idの不正な形式はinvalid_idになる(#[case] input: &str) {
        let result = TodoId::parse(input);

        assert_eq!(
            result,
            Err(DomainError::InvalidId {
                value: input.to_string(),
            })
        );
    }

    #[test]
    fn test_todo_idはfrom_strでもパースできる() {
        let id: TodoId = "65a1b2c3d4e5f6a7b8c9d0e1".parse().unwrap();
        assert_eq!(id.to_string(), "65a1b2c3d4e5f6a7b8c9d0e1");
    }

    // ===== TodoTitle =====

    #[test]
    fn test_空のタイトルはバリデーションエラー() {
        assert_eq!(
            TodoTitle::new(""),
            Err(DomainError::Validation(TITLE_REQUIRED_MESSAGE.to_string()))
        );
    }

    #[rstest]
    #[case("牛乳を買う")]
    #[case(" 前後に空白 ")]
    #[case("a")]
    fn test_空でないタイトルはそのまま保持される(#[case] input: &str) {
        let title = TodoTitle::new(input).unwrap();
        assert_eq!(title.as_str(), input);
    }

    // ===== Todo =====

    #[test]
    fn test_新規作成時はcompletedがfalse() {
        let todo = Todo::new(TodoId::new(), TodoTitle::new("掃除").unwrap(), fixed_now());

        assert!(!todo.completed());
        assert_eq!(todo.created_at(), fixed_now());
    }

    #[test]
    fn test_applyはtitleとcompletedのみを書き換える() {
        let id = TodoId::new();
        let mut todo = Todo::new(id, TodoTitle::new("before").unwrap(), fixed_now());

        todo.apply(TodoUpdate {
            title:     TodoTitle::new("after").unwrap(),
            completed: true,
        });

        assert_eq!(todo.id(), &id);
        assert_eq!(todo.created_at(), fixed_now());
        assert_eq!(todo.title().as_str(), "after");
        assert!(todo.completed());
    }

    #[test]
    fn test_from_dbは全フィールドを復元する() {
        let id = TodoId::new();
        let todo = Todo::from_db(id, TodoTitle::new("復元").unwrap(), true, fixed_now());

        assert_eq!(todo.id(), &id);
        assert_eq!(todo.title().as_str(), "復元");
        assert!(todo.completed());
        assert_eq!(todo.created_at(), fixed_now());
    }
}
