use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Question {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionSummary {
    pub id: i32,
    pub text: String,
    pub publication_time: DateTime<Utc>,
    pub was_published_recently: bool,
}

#[derive(Debug, Deserialize)]
pub struct IndexResponse {
    pub latest_question_list: Vec<QuestionSummary>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceOption {
    pub id: i32,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct DetailResponse {
    pub question: Question,
    pub choices: Vec<ChoiceOption>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceTally {
    pub text: String,
    pub votes: i32,
}

#[derive(Debug, Deserialize)]
pub struct ResultsResponse {
    pub question: Question,
    pub choices: Vec<ChoiceTally>,
    pub total_votes: i64,
}

#[derive(Debug, Serialize)]
pub struct VoteRequest {
    pub choice_id: Option<i32>,
}
