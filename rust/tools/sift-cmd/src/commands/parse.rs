//! Parse command implementation

use anyhow::{Context, Result};
use sift_text_search::{QueryTerm, SearchConfig};

pub fn run(config: &SearchConfig, query: String) -> Result<()> {
    let tree = parse_query(config, &query)?;
    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}

pub fn parse_query(config: &SearchConfig, query: &str) -> Result<QueryTerm> {
    let parser = config.query_parser()?;
    parser
        .parse(query)
        .with_context(|| format!("Failed to parse query: {query}"))
}
