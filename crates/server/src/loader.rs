//! Seeding questions from a plain-text file.
//!
//! ```text
//! # comments and blank lines are ignored
//! [-30] What's new?
//! - Not much
//! - The sky
//! ```
//!
//! A question line starts with its publication offset in days relative to
//! load time (negative is the past), and the `- ` lines after it are its
//! choices.

use chrono::{DateTime, Duration, Utc};

use crate::store::{PollStore, StoreResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSeed {
    pub day_offset: i64,
    pub text: String,
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: Vec<String>,
    pub skipped: Vec<String>,
    /// Seeds whose publication time falls outside the representable range.
    pub out_of_range: Vec<String>,
}

pub fn parse_questions(content: &str) -> (Vec<QuestionSeed>, Vec<ParseIssue>) {
    let mut seeds: Vec<QuestionSeed> = Vec::new();
    let mut issues = Vec::new();
    // Whether choice lines currently attach to the last seed.
    let mut open = false;

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let issue = |reason: &str| ParseIssue {
            line: index + 1,
            reason: reason.to_string(),
        };

        if let Some(choice) = line.strip_prefix('-') {
            let choice = choice.trim();
            match seeds.last_mut() {
                Some(seed) if open && !choice.is_empty() => seed.choices.push(choice.to_string()),
                _ if choice.is_empty() => issues.push(issue("empty choice")),
                _ => issues.push(issue("choice without a question")),
            }
            continue;
        }

        match parse_question_line(line) {
            Ok(seed) => {
                seeds.push(seed);
                open = true;
            }
            Err(reason) => {
                issues.push(issue(reason));
                open = false;
            }
        }
    }

    (seeds, issues)
}

fn parse_question_line(line: &str) -> Result<QuestionSeed, &'static str> {
    let rest = line
        .strip_prefix('[')
        .ok_or("expected `[days] question` or `- choice`")?;
    let (offset, text) = rest.split_once(']').ok_or("missing `]` after day offset")?;
    let day_offset = offset
        .trim()
        .parse::<i64>()
        .map_err(|_| "day offset is not a whole number")?;
    Duration::try_days(day_offset).ok_or("day offset is out of range")?;
    let text = text.trim();
    if text.is_empty() {
        return Err("question text is empty");
    }

    Ok(QuestionSeed {
        day_offset,
        text: text.to_string(),
        choices: Vec::new(),
    })
}

/// Inserts every seed whose text is not stored yet, with its choices.
///
/// Each question is stored together with its choices or not at all.
pub async fn load_questions(
    store: &dyn PollStore,
    seeds: &[QuestionSeed],
    now: DateTime<Utc>,
) -> StoreResult<LoadSummary> {
    let mut summary = LoadSummary::default();

    for seed in seeds {
        if store.find_question_by_text(&seed.text).await?.is_some() {
            tracing::debug!("Skipping duplicate question {:?}", seed.text);
            summary.skipped.push(seed.text.clone());
            continue;
        }

        let Some(publication_time) = Duration::try_days(seed.day_offset)
            .and_then(|offset| now.checked_add_signed(offset))
        else {
            tracing::warn!("Publication time of {:?} is out of range", seed.text);
            summary.out_of_range.push(seed.text.clone());
            continue;
        };

        store
            .create_question_with_choices(&seed.text, publication_time, &seed.choices)
            .await?;
        summary.loaded.push(seed.text.clone());
    }

    Ok(summary)
}
