//! # Todo サービス
//!
//! MongoDB に保存した Todo を CRUD 操作する HTTP サーバー。
//!
//! ## エンドポイント
//!
//! | メソッド | パス | 説明 |
//! |---------|------|------|
//! | GET | `/` | 静的トップページ |
//! | GET | `/todo/` | 全件取得 |
//! | POST | `/todo/` | 作成 |
//! | PUT | `/todo/{id}` | 更新 |
//! | DELETE | `/todo/{id}` | 削除 |
//! | GET | `/health` | Liveness Check |
//! | GET | `/health/ready` | Readiness Check |
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `TODO_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `TODO_PORT` | No | ポート番号（デフォルト: `9000`） |
//! | `MONGODB_URI` | No | MongoDB 接続 URI（デフォルト: `mongodb://localhost:27017`） |
//! | `MONGODB_DATABASE` | No | データベース名（デフォルト: `my_todo`） |
//! | `MONGODB_COLLECTION` | No | コレクション名（デフォルト: `todo`） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログレベル（デフォルト: `info,todoflow=debug`） |
//!
//! ## 起動方法
//!
//! ```bash
//! docker run -d -p 27017:27017 mongo:7
//! cargo run -p todoflow-todo-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use tokio::net::TcpListener;
use todoflow_domain::clock::{Clock, SystemClock};
use todoflow_infra::{
    HealthChecker,
    MongoHealthChecker,
    db,
    repository::{MongoTodoRepository, TodoRepository},
};
use todoflow_shared::observability::{TracingConfig, init_tracing};
use todoflow_todo_service::{
    app_builder::build_app,
    config::TodoConfig,
    handler::{ReadinessState, TodoState},
    server::{self, SHUTDOWN_GRACE_PERIOD},
    usecase::TodoUseCaseImpl,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("todo-service");
    init_tracing(&tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "todo-service").entered();

    let config = TodoConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!("Todo サービスを起動します: {}:{}", config.host, config.port);

    // 接続と ping に失敗した場合は起動しない
    let database = db::connect(&config.mongodb_uri, &config.mongodb_database)
        .await
        .context("MongoDB への接続に失敗しました")?;
    tracing::info!(
        database = %config.mongodb_database,
        collection = %config.mongodb_collection,
        "MongoDB に接続しました"
    );

    // 依存関係の初期化
    let todo_repository: Arc<dyn TodoRepository> = Arc::new(MongoTodoRepository::new(
        &database,
        &config.mongodb_collection,
    ));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let health_checker: Arc<dyn HealthChecker> = Arc::new(MongoHealthChecker::new(database));

    let todo_state = Arc::new(TodoState {
        usecase: TodoUseCaseImpl::new(todo_repository, clock),
    });
    let readiness_state = Arc::new(ReadinessState { health_checker });

    let app = build_app(todo_state, readiness_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("バインドアドレスが不正です")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("{addr} へのバインドに失敗しました"))?;
    tracing::info!("Todo サービスが起動しました: {}", addr);

    server::serve(listener, app, server::shutdown_signal(), SHUTDOWN_GRACE_PERIOD).await?;

    tracing::info!("サーバーを停止しました");
    Ok(())
}
