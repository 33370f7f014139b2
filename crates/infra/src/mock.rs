//! # テスト用モックリポジトリ
//!
//! ハンドラ・ユースケーステストで使用するインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! todoflow-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use todoflow_domain::todo::{Todo, TodoId, TodoUpdate};

use crate::{db::HealthChecker, error::InfraError, repository::TodoRepository};

// ===== MockTodoRepository =====

/// インメモリの TodoRepository
///
/// 挿入順を保持する（MongoDB の自然順序を模す）。
#[derive(Clone, Default)]
pub struct MockTodoRepository {
    todos: Arc<Mutex<Vec<Todo>>>,
}

impl MockTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// テストデータを事前に投入する
    pub fn add_todo(&self, todo: Todo) {
        self.todos.lock().unwrap().push(todo);
    }

    /// 保存済みの Todo を取得する（スナップショット）
    pub fn todos(&self) -> Vec<Todo> {
        self.todos.lock().unwrap().clone()
    }
}

#[async_trait]
impl TodoRepository for MockTodoRepository {
    async fn find_all(&self) -> Result<Vec<Todo>, InfraError> {
        Ok(self.todos.lock().unwrap().clone())
    }

    async fn insert(&self, todo: &Todo) -> Result<(), InfraError> {
        self.todos.lock().unwrap().push(todo.clone());
        Ok(())
    }

    async fn update(&self, id: &TodoId, update: &TodoUpdate) -> Result<u64, InfraError> {
        let mut todos = self.todos.lock().unwrap();
        match todos.iter_mut().find(|t| t.id() == id) {
            Some(todo) => {
                todo.apply(update.clone());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: &TodoId) -> Result<u64, InfraError> {
        let mut todos = self.todos.lock().unwrap();
        match todos.iter().position(|t| t.id() == id) {
            Some(index) => {
                todos.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

// ===== FailingTodoRepository =====

/// 全操作が失敗する TodoRepository
///
/// ストレージ障害時のレスポンスを検証するために使う。
#[derive(Clone, Debug)]
pub struct FailingTodoRepository {
    message: String,
}

impl FailingTodoRepository {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl TodoRepository for FailingTodoRepository {
    async fn find_all(&self) -> Result<Vec<Todo>, InfraError> {
        Err(InfraError::unexpected(self.message.clone()))
    }

    async fn insert(&self, _todo: &Todo) -> Result<(), InfraError> {
        Err(InfraError::unexpected(self.message.clone()))
    }

    async fn update(&self, _id: &TodoId, _update: &TodoUpdate) -> Result<u64, InfraError> {
        Err(InfraError::unexpected(self.message.clone()))
    }

    async fn delete(&self, _id: &TodoId) -> Result<u64, InfraError> {
        Err(InfraError::unexpected(self.message.clone()))
    }
}

// ===== MockHealthChecker =====

/// 結果を固定できる HealthChecker
#[derive(Clone, Debug)]
pub struct MockHealthChecker {
    healthy: bool,
}

impl MockHealthChecker {
    pub fn healthy() -> Self {
        Self { healthy: true }
    }

    pub fn unhealthy() -> Self {
        Self { healthy: false }
    }
}

#[async_trait]
impl HealthChecker for MockHealthChecker {
    async fn ping(&self) -> Result<(), InfraError> {
        if self.healthy {
            Ok(())
        } else {
            Err(InfraError::unexpected("ping failed"))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use pretty_assertions::assert_eq;
    use todoflow_domain::todo::TodoTitle;

    use super::*;

    fn todo(title: &str) -> Todo {
        Todo::new(
            TodoId::new(),
            TodoTitle::new(title).unwrap(),
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_モックは挿入順で返す() {
        let repo = MockTodoRepository::new();
        let first = todo("1");
        let second = todo("2");

        repo.insert(&first).await.unwrap();
        repo.insert(&second).await.unwrap();

        assert_eq!(repo.find_all().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_存在しないidの更新と削除は0件() {
        let repo = MockTodoRepository::new();
        repo.add_todo(todo("残る"));
        let update = TodoUpdate {
            title:     TodoTitle::new("x").unwrap(),
            completed: true,
        };

        assert_eq!(repo.update(&TodoId::new(), &update).await.unwrap(), 0);
        assert_eq!(repo.delete(&TodoId::new()).await.unwrap(), 0);
        assert_eq!(repo.todos().len(), 1);
    }

    #[tokio::test]
    async fn test_失敗するリポジトリは全操作でエラーを返す() {
        let repo = FailingTodoRepository::new("down");

        assert!(repo.find_all().await.is_err());
        assert!(repo.delete(&TodoId::new()).await.is_err());
    }
}
