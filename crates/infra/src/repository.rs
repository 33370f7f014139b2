//! # リポジトリ実装
//!
//! Todo の永続化を担当するリポジトリを提供する。
//!
//! - **依存性逆転**: ユースケース層はトレイト（[`TodoRepository`]）にのみ依存する
//! - **テスタビリティ**: インメモリのモック実装に差し替え可能

pub mod todo_repository;

pub use todo_repository::{MongoTodoRepository, TodoDocument, TodoRepository};
