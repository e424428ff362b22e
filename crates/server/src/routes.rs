use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::DEFAULT_INDEX_LIMIT,
    error::{AppError, NO_CHOICE_SELECTED},
    models::*,
    store::PollStore,
    visibility::{is_listable, list_visible_questions, was_published_recently},
};

pub const NO_POLLS_MESSAGE: &str = "No polls available.";

// ===== App State =====

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PollStore>,
    pub clock: Arc<dyn Clock + Send + Sync>,
    pub index_limit: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn PollStore>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        AppState {
            store,
            clock,
            index_limit: DEFAULT_INDEX_LIMIT,
        }
    }

    pub fn with_index_limit(mut self, index_limit: usize) -> Self {
        self.index_limit = index_limit;
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/polls", get(index))
        .route("/polls/:id", get(detail))
        .route("/polls/:id/results", get(results))
        .route("/polls/:id/vote", post(vote))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ===== Handlers =====

async fn root() -> &'static str {
    "Polls Backend - Use /polls to list questions, /health to check status"
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => Json(serde_json::json!({
            "status": "ok",
            "database": "connected"
        })),
        Err(err) => {
            tracing::warn!("Health check failed: {}", err);
            Json(serde_json::json!({
                "status": "error",
                "database": "disconnected"
            }))
        }
    }
}

async fn index(State(state): State<AppState>) -> Result<Json<IndexResponse>, AppError> {
    let now = state.clock.utc();
    let records = state.store.question_records().await?;

    let latest_question_list: Vec<QuestionSummary> = list_visible_questions(&records, now)
        .into_iter()
        .take(state.index_limit)
        .map(|question| QuestionSummary {
            was_published_recently: was_published_recently(&question, now),
            id: question.id,
            text: question.text,
            publication_time: question.publication_time,
        })
        .collect();

    let message = latest_question_list
        .is_empty()
        .then(|| NO_POLLS_MESSAGE.to_string());

    Ok(Json(IndexResponse {
        latest_question_list,
        message,
    }))
}

async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DetailResponse>, AppError> {
    let question = listable_question(&state, id, state.clock.utc()).await?;
    let choices = state.store.choices(id).await?;

    Ok(Json(DetailResponse {
        question,
        choices: choices.into_iter().map(ChoiceOption::from).collect(),
    }))
}

async fn results(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ResultsResponse>, AppError> {
    let question = listable_question(&state, id, state.clock.utc()).await?;
    let choices = state.store.choices(id).await?;
    let total_votes = choices.iter().map(|c| i64::from(c.vote_count)).sum();

    Ok(Json(ResultsResponse {
        question,
        choices: choices.into_iter().map(ChoiceTally::from).collect(),
        total_votes,
    }))
}

async fn vote(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(vote_req): Json<VoteRequest>,
) -> Result<Redirect, AppError> {
    listable_question(&state, id, state.clock.utc()).await?;

    let choice_id = vote_req
        .choice_id
        .ok_or_else(|| AppError::BadRequest(NO_CHOICE_SELECTED.into()))?;

    if !state.store.record_vote(id, choice_id).await? {
        return Err(AppError::BadRequest(NO_CHOICE_SELECTED.into()));
    }

    tracing::debug!(question_id = id, choice_id, "Vote recorded");
    Ok(Redirect::to(&format!("/polls/{id}/results")))
}

// ===== Helpers =====

/// Resolves a question the public is allowed to see, or `NotFound`.
async fn listable_question(
    state: &AppState,
    id: i32,
    now: DateTime<Utc>,
) -> Result<Question, AppError> {
    let record = state
        .store
        .question_record(id)
        .await?
        .ok_or(AppError::NotFound)?;

    if is_listable(&record.question, record.choice_count, now) {
        Ok(record.question)
    } else {
        Err(AppError::NotFound)
    }
}
