//! # Canonical Log Line ミドルウェア
//!
//! 1 リクエストにつき 1 行、method・path・status・latency をまとめた INFO ログを出す。
//! ログ検索では `log.type = "canonical"` で絞り込む。
//!
//! TraceLayer が作るリクエストスパンの内側に置くと、`request_id` はスパン経由で付与される。
//! `/health` 配下はポーリングでログが埋まるため出力しない。

use std::{
    fmt::Display,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use http::{Method, Request, Response};
use tower::{Layer, Service};

/// リクエスト完了サマリを出力する Layer
#[derive(Clone, Debug)]
pub struct CanonicalLogLineLayer;

impl<S> Layer<S> for CanonicalLogLineLayer {
    type Service = CanonicalLogLineService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CanonicalLogLineService { inner }
    }
}

/// [`CanonicalLogLineLayer`] が包む Service
#[derive(Clone, Debug)]
pub struct CanonicalLogLineService<S> {
    inner: S,
}

/// 計測中のリクエスト
struct InFlight {
    method:  Method,
    path:    String,
    started: Instant,
}

impl InFlight {
    fn begin<B>(req: &Request<B>) -> Option<Self> {
        let path = req.uri().path();
        if path.starts_with("/health") {
            return None;
        }
        Some(Self {
            method:  req.method().clone(),
            path:    path.to_owned(),
            started: Instant::now(),
        })
    }

    fn finish<B, E: Display>(self, result: &Result<Response<B>, E>) {
        let latency_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match result {
            Ok(response) => tracing::info!(
                log.r#type = "canonical",
                http.method = %self.method,
                http.path = %self.path,
                http.status_code = response.status().as_u16(),
                http.latency_ms = latency_ms,
                "リクエスト完了"
            ),
            Err(err) => tracing::error!(
                log.r#type = "canonical",
                http.method = %self.method,
                http.path = %self.path,
                http.latency_ms = latency_ms,
                error.message = %err,
                "リクエスト処理エラー"
            ),
        }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CanonicalLogLineService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Display + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // poll_ready 済みのインスタンスで呼び出す
        let ready = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, ready);
        let in_flight = InFlight::begin(&req);

        Box::pin(async move {
            let result = inner.call(req).await;
            if let Some(in_flight) = in_flight {
                in_flight.finish(&result);
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        convert::Infallible,
        io::{self, Write},
        sync::{Arc, Mutex},
    };

    use http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use tower::{ServiceExt, service_fn};
    use tracing_subscriber::layer::SubscriberExt;

    use super::*;

    /// JSON フォーマッタの出力先
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn lines(&self) -> Vec<Value> {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }

    fn capture_json_logs() -> (tracing::subscriber::DefaultGuard, LogBuffer) {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .without_time()
                .with_writer(move || writer.clone()),
        );
        (tracing::subscriber::set_default(subscriber), buffer)
    }

    fn request(method: Method, path: &str) -> Request<()> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(())
            .unwrap()
    }

    fn respond_with(
        status: StatusCode,
    ) -> impl Service<Request<()>, Response = Response<()>, Error = Infallible, Future: Send + 'static>
    + Clone
    + Send
    + 'static {
        service_fn(move |_req: Request<()>| async move {
            Ok::<_, Infallible>(Response::builder().status(status).body(()).unwrap())
        })
    }

    #[tokio::test]
    async fn test_完了時にmethod_path_statusを1行で出力する() {
        let (_guard, logs) = capture_json_logs();
        let sut = CanonicalLogLineLayer.layer(respond_with(StatusCode::CREATED));

        let response = sut.oneshot(request(Method::POST, "/todo/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let lines = logs.lines();
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line["level"], "INFO");
        assert_eq!(line["message"], "リクエスト完了");
        assert_eq!(line["log.type"], "canonical");
        assert_eq!(line["http.method"], "POST");
        assert_eq!(line["http.path"], "/todo/");
        assert_eq!(line["http.status_code"], 201);
        assert!(line["http.latency_ms"].is_u64());
    }

    #[tokio::test]
    async fn test_health配下は出力しない() {
        let (_guard, logs) = capture_json_logs();
        let sut = CanonicalLogLineLayer.layer(respond_with(StatusCode::OK));

        for path in ["/health", "/health/ready"] {
            sut.clone().oneshot(request(Method::GET, path)).await.unwrap();
        }

        assert!(logs.lines().is_empty());
    }

    #[tokio::test]
    async fn test_内側のエラーはerrorレベルで出力する() {
        let (_guard, logs) = capture_json_logs();
        let failing = service_fn(|_req: Request<()>| async {
            Err::<Response<()>, _>("internal service error".to_string())
        });
        let sut = CanonicalLogLineLayer.layer(failing);

        let result = sut.oneshot(request(Method::DELETE, "/todo/abc")).await;

        assert!(result.is_err());
        let lines = logs.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], "ERROR");
        assert_eq!(lines[0]["error.message"], "internal service error");
    }
}
