use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, postgres::PgPoolOptions};

use super::{PollStore, StoreResult};
use crate::models::{Choice, Question, QuestionRecord};

#[derive(sqlx::FromRow)]
struct QuestionRow {
    id: i32,
    text: String,
    publication_time: DateTime<Utc>,
    choice_count: i64,
}

impl From<QuestionRow> for QuestionRecord {
    fn from(row: QuestionRow) -> Self {
        QuestionRecord {
            question: Question {
                id: row.id,
                text: row.text,
                publication_time: row.publication_time,
            },
            choice_count: row.choice_count,
        }
    }
}

const QUESTION_RECORDS: &str = "
    SELECT
        q.id,
        q.question_text AS text,
        q.pub_date AS publication_time,
        COUNT(c.id) AS choice_count
    FROM questions q
    LEFT JOIN choices c ON c.question_id = q.id";

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        PgStore { db }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(PgStore::new(db))
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.db).await?;
        Ok(())
    }
}

#[async_trait]
impl PollStore for PgStore {
    async fn question_records(&self) -> StoreResult<Vec<QuestionRecord>> {
        let rows: Vec<QuestionRow> =
            sqlx::query_as(&format!("{QUESTION_RECORDS} GROUP BY q.id ORDER BY q.id"))
                .fetch_all(&self.db)
                .await?;
        Ok(rows.into_iter().map(QuestionRecord::from).collect())
    }

    async fn question_record(&self, id: i32) -> StoreResult<Option<QuestionRecord>> {
        let row: Option<QuestionRow> =
            sqlx::query_as(&format!("{QUESTION_RECORDS} WHERE q.id = $1 GROUP BY q.id"))
                .bind(id)
                .fetch_optional(&self.db)
                .await?;
        Ok(row.map(QuestionRecord::from))
    }

    async fn choices(&self, question_id: i32) -> StoreResult<Vec<Choice>> {
        let choices = sqlx::query_as(
            "SELECT id, question_id, choice_text AS text, votes AS vote_count
             FROM choices
             WHERE question_id = $1
             ORDER BY id",
        )
        .bind(question_id)
        .fetch_all(&self.db)
        .await?;
        Ok(choices)
    }

    async fn find_question_by_text(&self, text: &str) -> StoreResult<Option<Question>> {
        let question = sqlx::query_as(
            "SELECT id, question_text AS text, pub_date AS publication_time
             FROM questions
             WHERE question_text = $1
             ORDER BY id
             LIMIT 1",
        )
        .bind(text)
        .fetch_optional(&self.db)
        .await?;
        Ok(question)
    }

    async fn create_question(
        &self,
        text: &str,
        publication_time: DateTime<Utc>,
    ) -> StoreResult<Question> {
        let question = sqlx::query_as(
            "INSERT INTO questions (question_text, pub_date)
             VALUES ($1, $2)
             RETURNING id, question_text AS text, pub_date AS publication_time",
        )
        .bind(text)
        .bind(publication_time)
        .fetch_one(&self.db)
        .await?;
        Ok(question)
    }

    async fn create_question_with_choices(
        &self,
        text: &str,
        publication_time: DateTime<Utc>,
        choices: &[String],
    ) -> StoreResult<Question> {
        let mut tx = self.db.begin().await?;

        let question: Question = sqlx::query_as(
            "INSERT INTO questions (question_text, pub_date)
             VALUES ($1, $2)
             RETURNING id, question_text AS text, pub_date AS publication_time",
        )
        .bind(text)
        .bind(publication_time)
        .fetch_one(&mut *tx)
        .await?;

        for choice in choices {
            sqlx::query("INSERT INTO choices (question_id, choice_text) VALUES ($1, $2)")
                .bind(question.id)
                .bind(choice)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(question)
    }

    async fn add_choice(&self, question_id: i32, text: &str) -> StoreResult<Option<Choice>> {
        // Inserting through a SELECT yields no row when the question is gone,
        // instead of a foreign key violation.
        let choice = sqlx::query_as(
            "INSERT INTO choices (question_id, choice_text)
             SELECT id, $2 FROM questions WHERE id = $1
             RETURNING id, question_id, choice_text AS text, votes AS vote_count",
        )
        .bind(question_id)
        .bind(text)
        .fetch_optional(&self.db)
        .await?;
        Ok(choice)
    }

    async fn delete_question(&self, id: i32) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn record_vote(&self, question_id: i32, choice_id: i32) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE choices SET votes = votes + 1
             WHERE id = $1 AND question_id = $2",
        )
        .bind(choice_id)
        .bind(question_id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}
