//! Highlight command implementation

use anyhow::Result;
use sift_text_search::SearchConfig;

use crate::commands::parse::parse_query;
use crate::utils::read_documents;

pub fn run(config: &SearchConfig, files: Vec<String>, query: String) -> Result<()> {
    for (path, text) in highlight_files(config, &files, &query)? {
        println!("{path}:");
        println!("{text}");
    }
    Ok(())
}

/// Returns the path and marked-up text of every matching file.
pub fn highlight_files(
    config: &SearchConfig,
    files: &[String],
    query: &str,
) -> Result<Vec<(String, String)>> {
    let tree = parse_query(config, query)?;
    let mut highlighter = config.highlighter(tree);
    let mut highlighted = Vec::new();
    for document in read_documents(files)? {
        let (text, matched) = highlighter.highlight(&document.text)?;
        if matched {
            highlighted.push((document.path, text));
        }
    }
    Ok(highlighted)
}
