use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{PollStore, StoreResult};
use crate::models::{Choice, Question, QuestionRecord};

#[derive(Default)]
struct Tables {
    questions: Vec<Question>,
    choices: Vec<Choice>,
    next_question_id: i32,
    next_choice_id: i32,
}

impl Tables {
    fn record(&self, question: &Question) -> QuestionRecord {
        let choice_count = self
            .choices
            .iter()
            .filter(|c| c.question_id == question.id)
            .count() as i64;
        QuestionRecord {
            question: question.clone(),
            choice_count,
        }
    }
}

/// Process-local store. Rows live in insertion order, ids start at 1.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // No update can leave the tables half-written, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PollStore for MemoryStore {
    async fn question_records(&self) -> StoreResult<Vec<QuestionRecord>> {
        let tables = self.read();
        Ok(tables.questions.iter().map(|q| tables.record(q)).collect())
    }

    async fn question_record(&self, id: i32) -> StoreResult<Option<QuestionRecord>> {
        let tables = self.read();
        Ok(tables
            .questions
            .iter()
            .find(|q| q.id == id)
            .map(|q| tables.record(q)))
    }

    async fn choices(&self, question_id: i32) -> StoreResult<Vec<Choice>> {
        Ok(self
            .read()
            .choices
            .iter()
            .filter(|c| c.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn find_question_by_text(&self, text: &str) -> StoreResult<Option<Question>> {
        Ok(self.read().questions.iter().find(|q| q.text == text).cloned())
    }

    async fn create_question(
        &self,
        text: &str,
        publication_time: DateTime<Utc>,
    ) -> StoreResult<Question> {
        let mut tables = self.write();
        tables.next_question_id += 1;
        let question = Question {
            id: tables.next_question_id,
            text: text.to_string(),
            publication_time,
        };
        tables.questions.push(question.clone());
        Ok(question)
    }

    async fn create_question_with_choices(
        &self,
        text: &str,
        publication_time: DateTime<Utc>,
        choices: &[String],
    ) -> StoreResult<Question> {
        let mut tables = self.write();
        tables.next_question_id += 1;
        let question = Question {
            id: tables.next_question_id,
            text: text.to_string(),
            publication_time,
        };
        tables.questions.push(question.clone());
        for choice in choices {
            tables.next_choice_id += 1;
            let id = tables.next_choice_id;
            tables.choices.push(Choice {
                id,
                question_id: question.id,
                text: choice.clone(),
                vote_count: 0,
            });
        }
        Ok(question)
    }

    async fn add_choice(&self, question_id: i32, text: &str) -> StoreResult<Option<Choice>> {
        let mut tables = self.write();
        if !tables.questions.iter().any(|q| q.id == question_id) {
            return Ok(None);
        }
        tables.next_choice_id += 1;
        let choice = Choice {
            id: tables.next_choice_id,
            question_id,
            text: text.to_string(),
            vote_count: 0,
        };
        tables.choices.push(choice.clone());
        Ok(Some(choice))
    }

    async fn delete_question(&self, id: i32) -> StoreResult<bool> {
        let mut tables = self.write();
        let before = tables.questions.len();
        tables.questions.retain(|q| q.id != id);
        if tables.questions.len() == before {
            return Ok(false);
        }
        tables.choices.retain(|c| c.question_id != id);
        Ok(true)
    }

    async fn record_vote(&self, question_id: i32, choice_id: i32) -> StoreResult<bool> {
        let mut tables = self.write();
        match tables
            .choices
            .iter_mut()
            .find(|c| c.id == choice_id && c.question_id == question_id)
        {
            Some(choice) => {
                choice.vote_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn records_count_choices_per_question() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let with_choices = store.create_question("Two choices", now).await.unwrap();
        let without = store.create_question("No choices", now).await.unwrap();
        store.add_choice(with_choices.id, "A").await.unwrap();
        store.add_choice(with_choices.id, "B").await.unwrap();

        let records = store.question_records().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question, with_choices);
        assert_eq!(records[0].choice_count, 2);
        assert_eq!(records[1].question, without);
        assert_eq!(records[1].choice_count, 0);
    }

    #[tokio::test]
    async fn question_and_choices_are_created_together() {
        let store = MemoryStore::new();
        let choices = vec!["Red".to_string(), "Blue".to_string()];

        let question = store
            .create_question_with_choices("Favourite colour?", Utc::now(), &choices)
            .await
            .unwrap();

        let record = store.question_record(question.id).await.unwrap().unwrap();
        assert_eq!(record.choice_count, 2);
        let texts: Vec<String> = store
            .choices(question.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, choices);
    }

    #[tokio::test]
    async fn add_choice_to_missing_question_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.add_choice(42, "orphan").await.unwrap(), None);
    }

    #[tokio::test]
    async fn deleting_a_question_removes_its_choices() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let doomed = store.create_question("Doomed", now).await.unwrap();
        let kept = store.create_question("Kept", now - Duration::days(1)).await.unwrap();
        store.add_choice(doomed.id, "gone").await.unwrap();
        let survivor = store.add_choice(kept.id, "stays").await.unwrap().unwrap();

        assert!(store.delete_question(doomed.id).await.unwrap());
        assert!(!store.delete_question(doomed.id).await.unwrap());

        assert!(store.question_record(doomed.id).await.unwrap().is_none());
        assert!(store.choices(doomed.id).await.unwrap().is_empty());
        assert_eq!(store.choices(kept.id).await.unwrap(), vec![survivor]);
    }

    #[tokio::test]
    async fn votes_only_count_for_the_owning_question() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let first = store.create_question("First", now).await.unwrap();
        let second = store.create_question("Second", now).await.unwrap();
        let choice = store.add_choice(first.id, "Yes").await.unwrap().unwrap();

        assert!(store.record_vote(first.id, choice.id).await.unwrap());
        assert!(store.record_vote(first.id, choice.id).await.unwrap());
        assert!(!store.record_vote(second.id, choice.id).await.unwrap());
        assert!(!store.record_vote(first.id, choice.id + 100).await.unwrap());

        let choices = store.choices(first.id).await.unwrap();
        assert_eq!(choices[0].vote_count, 2);
    }

    #[tokio::test]
    async fn finds_questions_by_exact_text() {
        let store = MemoryStore::new();
        let question = store.create_question("What's up?", Utc::now()).await.unwrap();

        assert_eq!(
            store.find_question_by_text("What's up?").await.unwrap(),
            Some(question)
        );
        assert_eq!(store.find_question_by_text("what's up?").await.unwrap(), None);
    }
}
