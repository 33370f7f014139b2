//! # TodoRepository
//!
//! Todo の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **単一コレクション**: 起動時に指定されたコレクションのみを操作する
//! - **部分更新**: 更新は `$set` で `title` と `completed` のみを書き換える。
//!   `_id` と `createdAt` には触れない
//! - **一致件数を返す**: 更新・削除は一致件数を返し、0 件をエラーとして扱うかは呼び出し側が決める
//!
//! ## ドキュメント形状
//!
//! ```text
//! { "_id": ObjectId, "title": String, "completed": Bool, "createdAt": DateTime }
//! ```

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use todoflow_domain::todo::{Todo, TodoId, TodoTitle, TodoUpdate};

use crate::error::InfraError;

/// 保存時のドキュメント形状
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoDocument {
    #[serde(rename = "_id")]
    pub id:         ObjectId,
    pub title:      String,
    pub completed:  bool,
    #[serde(
        rename = "createdAt",
        with = "bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub created_at: DateTime<Utc>,
}

impl From<&Todo> for TodoDocument {
    fn from(todo: &Todo) -> Self {
        Self {
            id:         *todo.id().as_object_id(),
            title:      todo.title().as_str().to_string(),
            completed:  todo.completed(),
            created_at: todo.created_at(),
        }
    }
}

impl TryFrom<TodoDocument> for Todo {
    type Error = InfraError;

    fn try_from(document: TodoDocument) -> Result<Self, Self::Error> {
        let title = TodoTitle::new(document.title).map_err(|_| {
            InfraError::corrupt_document(format!("title が空です: _id={}", document.id))
        })?;

        Ok(Todo::from_db(
            TodoId::from_object_id(document.id),
            title,
            document.completed,
            document.created_at,
        ))
    }
}

/// Todo リポジトリトレイト
///
/// インフラ層の実装を抽象化し、テスト時にモックを使用可能にする。
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// 全件を取得する
    ///
    /// 並び順はストレージの自然順序（ソートしない）。
    async fn find_all(&self) -> Result<Vec<Todo>, InfraError>;

    /// 1 件挿入する
    async fn insert(&self, todo: &Todo) -> Result<(), InfraError>;

    /// `title` と `completed` を更新する
    ///
    /// # 戻り値
    ///
    /// 識別子に一致したドキュメントの件数（0 または 1）
    async fn update(&self, id: &TodoId, update: &TodoUpdate) -> Result<u64, InfraError>;

    /// 1 件削除する
    ///
    /// # 戻り値
    ///
    /// 削除したドキュメントの件数（0 または 1）
    async fn delete(&self, id: &TodoId) -> Result<u64, InfraError>;
}

/// MongoDB 実装の TodoRepository
#[derive(Debug, Clone)]
pub struct MongoTodoRepository {
    collection: Collection<TodoDocument>,
}

impl MongoTodoRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(database: &Database, collection_name: &str) -> Self {
        Self {
            collection: database.collection(collection_name),
        }
    }
}

#[async_trait]
impl TodoRepository for MongoTodoRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Todo>, InfraError> {
        let documents: Vec<TodoDocument> = self.collection.find(doc! {}).await?.try_collect().await?;

        documents.into_iter().map(Todo::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(todo_id = %todo.id()))]
    async fn insert(&self, todo: &Todo) -> Result<(), InfraError> {
        self.collection.insert_one(TodoDocument::from(todo)).await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(todo_id = %id))]
    async fn update(&self, id: &TodoId, update: &TodoUpdate) -> Result<u64, InfraError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": *id.as_object_id() },
                doc! {
                    "$set": {
                        "title": update.title.as_str(),
                        "completed": update.completed,
                    }
                },
            )
            .await?;

        Ok(result.matched_count)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(todo_id = %id))]
    async fn delete(&self, id: &TodoId) -> Result<u64, InfraError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": *id.as_object_id() })
            .await?;

        Ok(result.deleted_count)
    }
}
