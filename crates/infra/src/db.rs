//! # MongoDB 接続管理
//!
//! MongoDB クライアントの作成と疎通確認を行う。
//!
//! ## 設計方針
//!
//! - **クライアントの共有**: `mongodb::Client` は内部に接続プールを持ち、`Clone` が安価。
//!   起動時に一度だけ作成し、プロセスの終了まで再利用する（作り直さない）
//! - **起動時の疎通確認**: `ping` コマンドで接続を確認し、失敗した場合は起動を中止する
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use todoflow_infra::db;
//!
//! async fn example() -> Result<(), todoflow_infra::InfraError> {
//!     let database = db::connect("mongodb://localhost:27017", "my_todo").await?;
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use bson::doc;
use mongodb::{Client, Database};

use crate::error::InfraError;

/// MongoDB に接続し、疎通を確認したデータベースハンドルを返す
///
/// # 引数
///
/// * `uri` - 接続 URI（例: `mongodb://localhost:27017`）
/// * `database_name` - 使用するデータベース名
///
/// # エラー
///
/// - URI のパースに失敗した場合
/// - サーバー選択のタイムアウトなどで `ping` が失敗した場合
#[tracing::instrument(skip_all, fields(database = %database_name))]
pub async fn connect(uri: &str, database_name: &str) -> Result<Database, InfraError> {
    let client = Client::with_uri_str(uri).await?;
    let database = client.database(database_name);

    ping(&database).await?;

    Ok(database)
}

/// `ping` コマンドで疎通を確認する
async fn ping(database: &Database) -> Result<(), InfraError> {
    database.run_command(doc! { "ping": 1 }).await?;
    Ok(())
}

/// データベースの稼働確認
///
/// Readiness Check から使用する。テストではモック実装に差し替える。
#[async_trait]
pub trait HealthChecker: Send + Sync {
    /// データベースへの疎通を確認する
    async fn ping(&self) -> Result<(), InfraError>;
}

/// MongoDB 実装の HealthChecker
#[derive(Debug, Clone)]
pub struct MongoHealthChecker {
    database: Database,
}

impl MongoHealthChecker {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl HealthChecker for MongoHealthChecker {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn ping(&self) -> Result<(), InfraError> {
        ping(&self.database).await
    }
}
