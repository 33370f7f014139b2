//! # TodoFlow ドメイン層
//!
//! Todo アイテムのドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つ [`todo::Todo`]
//! - **値オブジェクト**: 識別子 [`todo::TodoId`] とタイトル [`todo::TodoTitle`]
//! - **ドメインエラー**: 入力がビジネスルールに違反した場合の [`DomainError`]
//!
//! ## 依存関係の方向
//!
//! ```text
//! todo-service → infra → domain
//!            ↘           ↗
//!              shared
//! ```
//!
//! ドメイン層は DB ドライバや HTTP フレームワークに依存しない。
//! 識別子の表現として `bson` の ObjectId のみを利用する
//! （UUID クレートに依存するのと同じ位置付け）。
//!
//! ## 使用例
//!
//! ```rust
//! use todoflow_domain::todo::{Todo, TodoId, TodoTitle};
//!
//! let title = TodoTitle::new("牛乳を買う").unwrap();
//! let todo = Todo::new(TodoId::new(), title, chrono::Utc::now());
//!
//! assert!(!todo.completed());
//! ```

pub mod clock;
pub mod error;
pub mod todo;

pub use error::DomainError;
