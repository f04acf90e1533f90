//! Spellcheck command implementation

use anyhow::Result;
use serde::Serialize;
use sift_text_search::{SearchConfig, Tokenizer};

use crate::utils::read_documents;

#[derive(Debug, Serialize)]
pub struct SpellCheckSummary {
    pub input: String,
    pub correction: Option<String>,
    pub alternatives: Vec<String>,
}

pub fn run(config: &SearchConfig, files: Vec<String>, count: usize, input: String) -> Result<()> {
    let summary = spell_check_files(config, &files, count, &input)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

pub fn spell_check_files(
    config: &SearchConfig,
    files: &[String],
    count: usize,
    input: &str,
) -> Result<SpellCheckSummary> {
    let tokenizer = Tokenizer::new();
    let mut checker = config.spell_checker();
    for document in read_documents(files)? {
        checker.train(&tokenizer.collect_stream(&document.text));
    }
    log::info!("trained spell checker on {} terms", checker.len());
    Ok(SpellCheckSummary {
        input: input.to_string(),
        correction: checker.spell_check(input),
        alternatives: checker.suggestions(input, count),
    })
}
