use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i32,
    pub text: String,
    pub publication_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Choice {
    pub id: i32,
    pub question_id: i32,
    pub text: String,
    pub vote_count: i32,
}

/// A question as read from storage, together with how many choices it owned
/// at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub question: Question,
    pub choice_count: i64,
}

// ===== API payloads =====

#[derive(Debug, Serialize)]
pub struct QuestionSummary {
    pub id: i32,
    pub text: String,
    pub publication_time: DateTime<Utc>,
    pub was_published_recently: bool,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub latest_question_list: Vec<QuestionSummary>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChoiceOption {
    pub id: i32,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub question: Question,
    pub choices: Vec<ChoiceOption>,
}

#[derive(Debug, Serialize)]
pub struct ChoiceTally {
    pub id: i32,
    pub text: String,
    pub votes: i32,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub question: Question,
    pub choices: Vec<ChoiceTally>,
    pub total_votes: i64,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub choice_id: Option<i32>,
}

impl From<Choice> for ChoiceOption {
    fn from(choice: Choice) -> Self {
        ChoiceOption {
            id: choice.id,
            text: choice.text,
        }
    }
}

impl From<Choice> for ChoiceTally {
    fn from(choice: Choice) -> Self {
        ChoiceTally {
            id: choice.id,
            text: choice.text,
            votes: choice.vote_count,
        }
    }
}
