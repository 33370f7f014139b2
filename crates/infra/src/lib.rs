//! # TodoFlow インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! リポジトリトレイトとその MongoDB 実装を提供する。ドライバの詳細をカプセル化し、
//! アプリケーション層をストレージの変更から保護する。
//!
//! ## 依存関係
//!
//! ```text
//! todo-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - MongoDB 接続管理と疎通確認
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//! - `mock` - テスト用インメモリ実装（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use todoflow_infra::{db, repository::MongoTodoRepository};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let database = db::connect("mongodb://localhost:27017", "my_todo").await?;
//!     let repository = MongoTodoRepository::new(&database, "todo");
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use db::{HealthChecker, MongoHealthChecker};
pub use error::{InfraError, InfraErrorKind};
