//! # サーバー起動と Graceful Shutdown
//!
//! シグナル受信後は新規接続の受け付けを止め、処理中のリクエストに猶予時間を与える。
//! 猶予時間を過ぎても終わらないリクエストは打ち切る。

use std::{future::Future, io, time::Duration};

use axum::Router;
use tokio::{net::TcpListener, sync::oneshot};

/// シャットダウン時の猶予時間
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// サーバーを起動し、`shutdown` が完了するまでリクエストを処理する
///
/// `shutdown` 完了後、処理中のリクエストを最大 `grace` だけ待つ。
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    grace: Duration,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        stop_rx.await.ok();
    });
    let mut server = tokio::spawn(async move { server.await });

    tokio::select! {
        result = &mut server => return flatten(result),
        () = shutdown => {}
    }

    tracing::info!("シャットダウンを開始します");
    stop_tx.send(()).ok();

    match tokio::time::timeout(grace, &mut server).await {
        Ok(result) => flatten(result),
        Err(_) => {
            tracing::warn!(
                grace_ms = grace.as_millis() as u64,
                "猶予時間内に完了しなかったリクエストを打ち切ります"
            );
            server.abort();
            Ok(())
        }
    }
}

fn flatten(result: Result<io::Result<()>, tokio::task::JoinError>) -> io::Result<()> {
    result.map_err(io::Error::other)?
}

/// SIGINT（Ctrl+C）または SIGTERM（Unix のみ）を待つ
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+C ハンドラの登録に失敗しました");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM ハンドラの登録に失敗しました");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("SIGINT を受信しました"),
        () = terminate => tracing::info!("SIGTERM を受信しました"),
    }
}
