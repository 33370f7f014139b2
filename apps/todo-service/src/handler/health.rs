//! # ヘルスチェックハンドラ
//!
//! - `/health` — Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready` — Readiness Check（MongoDB への `ping` を確認）
//!
//! レスポンス型は [`todoflow_shared::HealthResponse`] / [`todoflow_shared::ReadinessResponse`] を参照。

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use todoflow_infra::HealthChecker;
use todoflow_shared::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// ヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness Check 用の State
pub struct ReadinessState {
    pub health_checker: Arc<dyn HealthChecker>,
}

/// Readiness Check エンドポイント
///
/// 全チェック OK → 200、1 つでも失敗 → 503。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let mongodb = check_mongodb(state.health_checker.as_ref()).await;

    let response = ReadinessResponse::from_checks(HashMap::from([("mongodb".to_string(), mongodb)]));
    let http_status = match response.status {
        ReadinessStatus::Ready => StatusCode::OK,
        ReadinessStatus::NotReady => StatusCode::SERVICE_UNAVAILABLE,
    };

    (http_status, Json(response))
}

/// MongoDB への疎通を `ping` で確認する（タイムアウト: 5 秒）
async fn check_mongodb(checker: &dyn HealthChecker) -> CheckStatus {
    match tokio::time::timeout(CHECK_TIMEOUT, checker.ping()).await {
        Ok(Ok(())) => CheckStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "readiness check: mongodb ping failed");
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!("readiness check: mongodb check timed out");
            CheckStatus::Error
        }
    }
}
