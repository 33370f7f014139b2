//! # Todo サービスライブラリ
//!
//! ルーター構築・ハンドラ・ユースケースを公開する。
//! バイナリ（`main.rs`）と統合テストの両方から使用する。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod server;
pub mod usecase;
