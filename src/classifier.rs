use crate::taxonomy::{Taxonomy, TechId};
use scraper::Html;
use std::collections::BTreeSet;

/// Technologies from `taxonomy` mentioned in `text`.
///
/// Each technology is checked independently; the first synonym that matches
/// as a whole word is enough and its remaining synonyms are skipped.
pub fn classify(text: Option<&str>, taxonomy: &Taxonomy) -> BTreeSet<TechId> {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return BTreeSet::new();
    };
    let text = text.to_lowercase();

    taxonomy
        .entries()
        .iter()
        .filter(|entry| entry.patterns().iter().any(|p| p.is_match(&text)))
        .map(|entry| entry.id().clone())
        .collect()
}

/// Plain text of an HTML vacancy description. Text nodes are joined with
/// spaces so `<li>python</li><li>sql</li>` does not become one word.
pub fn description_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
