//! # アプリケーション構築
//!
//! ルーターとミドルウェアの構築を担当する。
//! `main.rs` は依存関係の初期化とサーバー起動に集中する。

use std::{any::Any, sync::Arc, time::Duration};

use axum::{
    BoxError,
    Json,
    Router,
    error_handling::HandleErrorLayer,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use todoflow_shared::{
    ErrorResponse,
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};
use tower::{ServiceBuilder, timeout::error::Elapsed};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::handler::{
    ReadinessState,
    TodoState,
    create_todo,
    delete_todo,
    health_check,
    home,
    list_todos,
    missing_todo_id,
    readiness_check,
    update_todo,
};

/// リクエスト全体のタイムアウト
///
/// ボディの読み取りもハンドラの中で行われるため、この時間に含まれる。
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const REQUEST_TIMEOUT_MESSAGE: &str = "Request timed out";

/// ルーターを構築する
///
/// レイヤー順序（下に書いたものが外側）:
/// 1. SetRequestIdLayer（最外）: UUID v7 を生成（またはクライアント提供値を使用）
/// 2. TraceLayer: request_id を含むスパンを作成
/// 3. CanonicalLogLineLayer: リクエスト完了時に 1 行サマリログを出力
/// 4. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
/// 5. HandleErrorLayer + Timeout: 60 秒で 408 `{ "message" }` を返す
/// 6. CatchPanicLayer（最内）: ハンドラのパニックを 500 に変換
pub fn build_app(todo_state: Arc<TodoState>, readiness_state: Arc<ReadinessState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .merge(todo_routes(todo_state))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(REQUEST_TIMEOUT),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}

/// `/todo` 配下のルート
///
/// 末尾スラッシュの有無どちらでも一覧・作成を受け付ける。
fn todo_routes(state: Arc<TodoState>) -> Router {
    let collection = || {
        get(list_todos)
            .post(create_todo)
            .put(missing_todo_id)
            .delete(missing_todo_id)
    };

    Router::new()
        .route("/todo", collection())
        .route("/todo/", collection())
        .route("/todo/{id}", put(update_todo).delete(delete_todo))
        .with_state(state)
}

/// ミドルウェアのエラーを JSON レスポンスに変換する
async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<Elapsed>() {
        tracing::warn!(
            timeout_secs = REQUEST_TIMEOUT.as_secs(),
            "リクエストがタイムアウトしました"
        );
        return (
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorResponse::new(REQUEST_TIMEOUT_MESSAGE)),
        )
            .into_response();
    }

    tracing::error!(error = %err, "ミドルウェアで予期しないエラーが発生しました");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal_error()),
    )
        .into_response()
}

/// パニックを 500 レスポンスに変換する
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic.message = %detail, "ハンドラがパニックしました");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal_error()),
    )
        .into_response()
}
