mod models;

use colored::*;
use models::*;
use std::env;
use std::io::{self, Write};

const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

// ===== Main =====

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let backend_url = env::var("POLLS_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
    let api = Api::new(backend_url);

    println!("{}", "=".repeat(60).bright_cyan());
    println!("{}", "    🗳️  POLLS 🗳️".bright_yellow().bold());
    println!("{}", "=".repeat(60).bright_cyan());
    println!();

    polls_loop(&api).await
}

// ===== Input =====

#[derive(Debug, PartialEq, Eq)]
enum Selection {
    Pick(usize),
    Refresh,
    Quit,
    Invalid,
}

/// Maps a typed line onto a 0-based index into a list of `count` entries.
fn parse_selection(input: &str, count: usize) -> Selection {
    match input.trim().to_lowercase().as_str() {
        "q" | "quit" => Selection::Quit,
        "r" | "refresh" => Selection::Refresh,
        other => match other.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => Selection::Pick(n - 1),
            _ => Selection::Invalid,
        },
    }
}

fn prompt(hint: &str) -> anyhow::Result<String> {
    println!("{}", hint.bright_black());
    print!("{}", "> ".bright_green().bold());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input)
}

// ===== Polls Loop =====

async fn polls_loop(api: &Api) -> anyhow::Result<()> {
    loop {
        println!("Fetching polls...");
        let index = api.fetch_index().await?;

        println!("{}", "━".repeat(60).bright_black());
        println!();
        if index.latest_question_list.is_empty() {
            let message = index.message.as_deref().unwrap_or("No polls available.");
            println!("{}", message.yellow());
        }
        for (i, question) in index.latest_question_list.iter().enumerate() {
            let fresh = if question.was_published_recently {
                " new".green().to_string()
            } else {
                String::new()
            };
            println!(
                "{}. {} {}{}",
                (i + 1).to_string().bright_cyan(),
                question.text.bright_white().bold(),
                question
                    .publication_time
                    .format("(%Y-%m-%d)")
                    .to_string()
                    .bright_black(),
                fresh
            );
        }
        println!();

        let input = prompt("Pick a poll by number, [R]efresh or [Q]uit")?;
        match parse_selection(&input, index.latest_question_list.len()) {
            Selection::Pick(i) => {
                let question = &index.latest_question_list[i];
                vote_on(api, question.id).await?;
            }
            Selection::Refresh => continue,
            Selection::Quit => {
                println!();
                println!("{}", "Thanks for voting! 👋".bright_cyan().bold());
                return Ok(());
            }
            Selection::Invalid => {
                println!("{}", "Invalid choice. Please try again.".red());
            }
        }
    }
}

async fn vote_on(api: &Api, question_id: i32) -> anyhow::Result<()> {
    let Some(detail) = api.fetch_detail(question_id).await? else {
        println!("{}", "That poll is no longer available.".yellow());
        return Ok(());
    };

    loop {
        println!();
        println!("{}", "QUESTION:".bright_yellow().bold());
        println!("{}", detail.question.text.bright_white().bold());
        println!();
        for (i, choice) in detail.choices.iter().enumerate() {
            println!("  {}. {}", (i + 1).to_string().bright_cyan(), choice.text);
        }
        println!();

        let input = prompt("Vote by number, or [Q] to go back")?;
        match parse_selection(&input, detail.choices.len()) {
            Selection::Pick(i) => {
                let results = api.submit_vote(question_id, detail.choices[i].id).await?;
                println!("{}", "✓ Vote recorded".green());
                show_results(&results);
                return Ok(());
            }
            Selection::Quit => return Ok(()),
            Selection::Refresh | Selection::Invalid => {
                println!("{}", "Invalid choice. Please try again.".red());
            }
        }
    }
}

fn show_results(results: &ResultsResponse) {
    println!();
    println!("{}", "=".repeat(60).bright_cyan());
    println!("{}", "    📊 RESULTS".bright_yellow().bold());
    println!("{}", "=".repeat(60).bright_cyan());
    println!("{}", results.question.text.bright_white().bold());
    println!();

    for choice in &results.choices {
        let votes = if choice.votes == 1 { "vote" } else { "votes" };
        println!(
            "  {} -- {} {}",
            choice.text.bright_white(),
            choice.votes.to_string().yellow(),
            votes
        );
    }

    println!();
    println!(
        "{} {}",
        "Total:".bright_black(),
        results.total_votes.to_string().bright_cyan()
    );
    println!();
}

// ===== API Calls =====

struct Api {
    client: reqwest::Client,
    base_url: String,
}

impl Api {
    fn new(base_url: String) -> Self {
        Api {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_index(&self) -> anyhow::Result<IndexResponse> {
        let response = self
            .client
            .get(format!("{}/polls", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            anyhow::bail!("API error ({}): {}", status, text);
        }

        Ok(response.json().await?)
    }

    async fn fetch_detail(&self, question_id: i32) -> anyhow::Result<Option<DetailResponse>> {
        let response = self
            .client
            .get(format!("{}/polls/{}", self.base_url, question_id))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            anyhow::bail!("API error ({}): {}", status, text);
        }

        Ok(Some(response.json().await?))
    }

    /// Votes, then follows the server's redirect to the results.
    async fn submit_vote(&self, question_id: i32, choice_id: i32) -> anyhow::Result<ResultsResponse> {
        let vote_req = VoteRequest {
            choice_id: Some(choice_id),
        };

        let response = self
            .client
            .post(format!("{}/polls/{}/vote", self.base_url, question_id))
            .json(&vote_req)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            anyhow::bail!("Vote failed ({}): {}", status, text);
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_pick_one_based_entries() {
        assert_eq!(parse_selection("1\n", 3), Selection::Pick(0));
        assert_eq!(parse_selection(" 3 ", 3), Selection::Pick(2));
    }

    #[test]
    fn out_of_range_and_garbage_are_invalid() {
        assert_eq!(parse_selection("0", 3), Selection::Invalid);
        assert_eq!(parse_selection("4", 3), Selection::Invalid);
        assert_eq!(parse_selection("1", 0), Selection::Invalid);
        assert_eq!(parse_selection("yes", 3), Selection::Invalid);
    }

    #[test]
    fn letters_are_commands() {
        assert_eq!(parse_selection("Q", 3), Selection::Quit);
        assert_eq!(parse_selection("quit", 3), Selection::Quit);
        assert_eq!(parse_selection("r", 3), Selection::Refresh);
    }

    #[test]
    fn trailing_slash_is_dropped_from_backend_url() {
        let api = Api::new("http://polls.local/".to_string());
        assert_eq!(api.base_url, "http://polls.local");
    }
}
