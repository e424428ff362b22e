//! Question and choice storage.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Choice, Question, QuestionRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read and write access to polls data.
///
/// Listing methods return rows in creation order.
#[async_trait]
pub trait PollStore: Send + Sync {
    async fn question_records(&self) -> StoreResult<Vec<QuestionRecord>>;

    async fn question_record(&self, id: i32) -> StoreResult<Option<QuestionRecord>>;

    async fn choices(&self, question_id: i32) -> StoreResult<Vec<Choice>>;

    async fn find_question_by_text(&self, text: &str) -> StoreResult<Option<Question>>;

    async fn create_question(
        &self,
        text: &str,
        publication_time: DateTime<Utc>,
    ) -> StoreResult<Question>;

    /// Stores a question and all of its choices as one unit.
    async fn create_question_with_choices(
        &self,
        text: &str,
        publication_time: DateTime<Utc>,
        choices: &[String],
    ) -> StoreResult<Question>;

    /// Returns `None` when the question does not exist.
    async fn add_choice(&self, question_id: i32, text: &str) -> StoreResult<Option<Choice>>;

    /// Deletes the question and every choice it owns.
    async fn delete_question(&self, id: i32) -> StoreResult<bool>;

    /// Adds one vote to `choice_id`, but only if that choice belongs to
    /// `question_id`. Returns whether a vote was counted.
    async fn record_vote(&self, question_id: i32, choice_id: i32) -> StoreResult<bool>;

    async fn ping(&self) -> StoreResult<()>;
}
