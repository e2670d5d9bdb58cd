//! `askdesk ask` — Answer one question from the terminal.

use std::path::Path;
use std::sync::Arc;

use askdesk_agent::Responder;
use askdesk_history::InMemoryHistory;

pub async fn run(
    config_path: Option<&Path>,
    question: &str,
    no_record: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;

    let responder = if no_record {
        Responder::from_config_with_history(&config, Arc::new(InMemoryHistory::new()))?
    } else {
        Responder::from_config(&config)?
    };

    let record = responder.respond(question).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);

    Ok(())
}
