//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! - 各ハンドラはサブモジュールに配置し、ここで re-export する
//! - ハンドラは薄く保ち、検証と永続化はユースケース層に委譲する

pub mod health;
pub mod home;
pub mod todo;

pub use health::{ReadinessState, health_check, readiness_check};
pub use home::home;
pub use todo::{TodoState, create_todo, delete_todo, list_todos, missing_todo_id, update_todo};
