//! Todo ユースケース

use std::sync::Arc;

use todoflow_domain::{
    clock::Clock,
    todo::{Todo, TodoId, TodoTitle, TodoUpdate},
};
use todoflow_infra::repository::TodoRepository;

use crate::error::TodoError;

const FETCH_FAILED: &str = "Failed to fetch todos";
const SAVE_FAILED: &str = "Failed to save todo";
const UPDATE_FAILED: &str = "Failed to update todo";
const DELETE_FAILED: &str = "Failed to delete todo";

/// Todo 作成の入力
///
/// `completed` は受け取らない（作成時は常に未完了）。
pub struct CreateTodoInput {
    pub title: String,
}

/// Todo 更新の入力
pub struct UpdateTodoInput {
    pub id:        String,
    pub title:     String,
    pub completed: bool,
}

/// Todo ユースケース
pub struct TodoUseCaseImpl {
    todo_repository: Arc<dyn TodoRepository>,
    clock:           Arc<dyn Clock>,
}

impl TodoUseCaseImpl {
    pub fn new(todo_repository: Arc<dyn TodoRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            todo_repository,
            clock,
        }
    }

    /// 全件を取得する（ストレージの自然順序）
    pub async fn list_todos(&self) -> Result<Vec<Todo>, TodoError> {
        self.todo_repository
            .find_all()
            .await
            .map_err(TodoError::storage(FETCH_FAILED))
    }

    /// Todo を作成する
    ///
    /// 識別子は常にここで採番し、`created_at` は現在時刻で確定する。
    pub async fn create_todo(&self, input: CreateTodoInput) -> Result<Todo, TodoError> {
        let title = TodoTitle::new(input.title)?;
        let todo = Todo::new(TodoId::new(), title, self.clock.now());

        self.todo_repository
            .insert(&todo)
            .await
            .map_err(TodoError::storage(SAVE_FAILED))?;

        Ok(todo)
    }

    /// Todo の `title` と `completed` を更新する
    ///
    /// 1. タイトルの検証
    /// 2. 識別子の形式検証
    /// 3. 部分更新
    ///
    /// 一致するドキュメントがなくても成功として扱う。
    pub async fn update_todo(&self, input: UpdateTodoInput) -> Result<(), TodoError> {
        let title = TodoTitle::new(input.title)?;
        let id = TodoId::parse(&input.id)?;
        let update = TodoUpdate {
            title,
            completed: input.completed,
        };

        let matched = self
            .todo_repository
            .update(&id, &update)
            .await
            .map_err(TodoError::storage(UPDATE_FAILED))?;

        if matched == 0 {
            tracing::debug!(todo_id = %id, "更新対象の Todo が存在しません");
        }

        Ok(())
    }

    /// Todo を削除する
    ///
    /// 存在しない識別子でも成功として扱う。
    pub async fn delete_todo(&self, id: &str) -> Result<(), TodoError> {
        let id = TodoId::parse(id)?;

        let deleted = self
            .todo_repository
            .delete(&id)
            .await
            .map_err(TodoError::storage(DELETE_FAILED))?;

        if deleted == 0 {
            tracing::debug!(todo_id = %id, "削除対象の Todo が存在しません");
        }

        Ok(())
    }
}
