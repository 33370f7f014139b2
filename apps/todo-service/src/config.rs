//! # Todo サービス設定
//!
//! 環境変数から Todo サービスの設定を読み込む。
//!
//! | 変数名 | デフォルト |
//! |--------|-----------|
//! | `TODO_HOST` | `0.0.0.0` |
//! | `TODO_PORT` | `9000` |
//! | `MONGODB_URI` | `mongodb://localhost:27017` |
//! | `MONGODB_DATABASE` | `my_todo` |
//! | `MONGODB_COLLECTION` | `todo` |

use std::env;

use anyhow::Context as _;

/// Todo サービスの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    /// バインドアドレス
    pub host:               String,
    /// ポート番号
    pub port:               u16,
    /// MongoDB 接続 URI
    pub mongodb_uri:        String,
    /// データベース名
    pub mongodb_database:   String,
    /// コレクション名
    pub mongodb_collection: String,
}

impl TodoConfig {
    /// 環境変数から設定を読み込む
    ///
    /// `TODO_PORT` がポート番号として解釈できない場合はエラー。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let raw_port = var("TODO_PORT", "9000");
        let port = raw_port
            .parse()
            .with_context(|| format!("TODO_PORT は有効なポート番号である必要があります: {raw_port:?}"))?;

        Ok(Self {
            host: var("TODO_HOST", "0.0.0.0"),
            port,
            mongodb_uri: var("MONGODB_URI", "mongodb://localhost:27017"),
            mongodb_database: var("MONGODB_DATABASE", "my_todo"),
            mongodb_collection: var("MONGODB_COLLECTION", "todo"),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_未設定ならデフォルト値を使う() {
        let config = TodoConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(
            config,
            TodoConfig {
                host:               "0.0.0.0".to_string(),
                port:               9000,
                mongodb_uri:        "mongodb://localhost:27017".to_string(),
                mongodb_database:   "my_todo".to_string(),
                mongodb_collection: "todo".to_string(),
            }
        );
    }

    #[test]
    fn test_環境変数の値で上書きできる() {
        let config = TodoConfig::from_lookup(lookup_from(&[
            ("TODO_HOST", "127.0.0.1"),
            ("TODO_PORT", "18080"),
            ("MONGODB_URI", "mongodb://mongo:27017"),
            ("MONGODB_DATABASE", "todo_test"),
            ("MONGODB_COLLECTION", "items"),
        ]))
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 18080);
        assert_eq!(config.mongodb_uri, "mongodb://mongo:27017");
        assert_eq!(config.mongodb_database, "todo_test");
        assert_eq!(config.mongodb_collection, "items");
    }

    #[rstest::rstest]
    #[case("abc")]
    #[case("70000")]
    #[case("")]
    fn test_不正なポート番号はエラー(#[case] port: &str) {
        let result = TodoConfig::from_lookup(lookup_from(&[("TODO_PORT", port)]));

        assert!(result.is_err());
    }
}
