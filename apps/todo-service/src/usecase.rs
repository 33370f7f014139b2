//! # ユースケース層
//!
//! 入力検証とリポジトリ呼び出しを担当する。ハンドラは HTTP との変換のみを行う。

pub mod todo;

pub use todo::{CreateTodoInput, TodoUseCaseImpl, UpdateTodoInput};
