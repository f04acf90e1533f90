//! Suggest command implementation

use anyhow::{Context, Result};
use sift_text_search::{AutoComplete, Suggestion, Tokenizer};

use crate::utils::read_documents;

pub fn run(files: Vec<String>, limit: Option<usize>, input: String) -> Result<()> {
    let suggestions = suggest_from_files(&files, limit, &input)?;
    println!("{}", serde_json::to_string_pretty(&suggestions)?);
    Ok(())
}

pub fn suggest_from_files(
    files: &[String],
    limit: Option<usize>,
    input: &str,
) -> Result<Vec<Suggestion>> {
    let documents = read_documents(files)?;
    let text = documents
        .iter()
        .map(|document| document.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let stream = Tokenizer::new().collect_stream(&text);
    let autocomplete = AutoComplete::from_token_stream(&stream);
    autocomplete
        .suggest(input, limit)
        .with_context(|| format!("Failed to complete '{input}'"))
}
