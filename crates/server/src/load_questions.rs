use std::env;

use anyhow::Context;
use chrono::Utc;
use polls::{
    config::Config,
    loader::{load_questions, parse_questions},
    store::PgStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let path = env::args().nth(1).unwrap_or_else(|| "questions.txt".to_string());

    let store = PgStore::connect(&config.database_url, config.max_connections)
        .await
        .context("connecting to database")?;
    store.migrate().await.context("running migrations")?;

    println!("Connected to database!");

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {path} - make sure it exists!"))?;

    let (seeds, issues) = parse_questions(&content);
    for issue in &issues {
        println!("✗ {path}:{}: {}", issue.line, issue.reason);
    }

    let summary = load_questions(&store, &seeds, Utc::now()).await?;

    for text in &summary.skipped {
        println!("⊘ Skipped (duplicate): {}", text);
    }
    for text in &summary.out_of_range {
        println!("✗ Skipped (publication time out of range): {}", text);
    }
    for text in &summary.loaded {
        println!("✓ Loaded: {}", text);
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ Successfully loaded {} new questions!", summary.loaded.len());
    if !summary.skipped.is_empty() {
        println!("⊘ Skipped {} duplicate questions", summary.skipped.len());
    }
    if !issues.is_empty() {
        println!("✗ Ignored {} malformed lines", issues.len());
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    Ok(())
}
