//! # トップページ
//!
//! `GET /` で Todo 操作用の静的 HTML を返す。

use axum::response::Html;

const HOME_PAGE: &str = include_str!("../../static/home.html");

pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}
