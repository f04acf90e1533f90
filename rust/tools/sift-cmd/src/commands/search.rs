//! Search command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use sift_text_search::{SearchConfig, TextIndex};
use std::collections::BTreeMap;

use crate::commands::parse::parse_query;
use crate::utils::read_documents;

#[derive(Debug, Serialize)]
pub struct SearchSummary {
    pub query: String,
    pub document_count: usize,
    pub matched: Vec<DocumentHits>,
}

#[derive(Debug, Serialize)]
pub struct DocumentHits {
    pub path: String,
    pub doc_id: u32,
    pub hit_count: usize,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub terms: BTreeMap<String, usize>,
}

pub fn run(config: &SearchConfig, files: Vec<String>, query: String) -> Result<()> {
    let summary = search_files(config, &files, &query)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Evaluates the query against every file on its own, so exclusions apply
/// per document.
pub fn search_files(config: &SearchConfig, files: &[String], query: &str) -> Result<SearchSummary> {
    let tree = parse_query(config, query)?;
    let documents = read_documents(files)?;
    let mut index = TextIndex::with_distance(config.distance);
    let mut matched = Vec::new();

    for (doc_id, document) in (1u32..).zip(&documents) {
        index.reset();
        index.append_string(&document.text, Some(doc_id))?;
        let hits = index
            .evaluate(&tree)
            .with_context(|| format!("Failed to evaluate query on {}", document.path))?;
        let Some(hits) = hits else {
            log::info!("{}: no match", document.path);
            continue;
        };
        matched.push(DocumentHits {
            path: document.path.clone(),
            doc_id,
            hit_count: hits.total(),
            terms: hits
                .term_frequency()
                .iter()
                .map(|(term, count)| (term.clone(), *count))
                .collect(),
        });
    }

    Ok(SearchSummary {
        query: query.to_string(),
        document_count: documents.len(),
        matched,
    })
}
