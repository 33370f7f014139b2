//! テスト共通フィクスチャ
//!
//! MongoDB を使用する統合テストで共通利用する接続ヘルパー・エンティティ生成ヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use mongodb::Database;
use todoflow_domain::todo::{Todo, TodoId, TodoTitle};
use todoflow_infra::db;

/// テスト用の MONGODB_URI
pub fn mongodb_uri() -> String {
    dotenvy::dotenv().ok();
    std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

/// テストごとに独立したデータベースへ接続する
///
/// データベース名に ObjectId を含めて衝突を避ける。
pub async fn connect_isolated() -> Database {
    let name = format!("todoflow_test_{}", bson::oid::ObjectId::new());
    db::connect(&mongodb_uri(), &name).await.unwrap()
}

/// ミリ秒精度の固定時刻
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_700_000_000_123).unwrap()
}

/// テスト用の Todo を生成する
pub fn new_todo(title: &str) -> Todo {
    Todo::new(TodoId::new(), TodoTitle::new(title).unwrap(), fixed_now())
}
