//! Relevance matcher
//!
//! Two read-only lookups over the catalog:
//! - `find_exact`: first product named (or tagged) in the message, catalog order.
//! - `shortlist`: products ranked by how many query words hit their name and tags.

use std::cmp::Ordering;

use super::product::Product;
use super::store::Catalog;

/// Shortest query word that takes part in ranking
const MIN_WORD_CHARS: usize = 2;

/// First product whose lowercased name is a substring of the message, or
/// whose tag appears verbatim in it.
pub fn find_exact<'a>(catalog: &'a Catalog, message: &str) -> Option<&'a Product> {
    let message = message.to_lowercase();
    catalog.iter().find(|product| {
        message.contains(&product.name.to_lowercase())
            || product.tag_list().any(|tag| message.contains(&tag))
    })
}

/// Top `limit` products scored against the query words.
///
/// Ties go to the lexicographically smaller name so the result is stable.
pub fn shortlist<'a>(catalog: &'a Catalog, query: &str, limit: usize) -> Vec<&'a Product> {
    let words = query_words(query);
    if words.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, &Product)> = catalog
        .iter()
        .map(|product| (score(product, &words), product))
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| match score_b.cmp(score_a) {
        Ordering::Equal => a.name.cmp(&b.name),
        other => other,
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(_, product)| product)
        .collect()
}

/// Lowercase words of at least two characters
pub fn query_words(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() >= MIN_WORD_CHARS)
        .map(str::to_string)
        .collect()
}

/// Substring containment per word, not whole-word match
fn score(product: &Product, words: &[String]) -> usize {
    let haystack = format!("{} {}", product.name, product.tags).to_lowercase();
    words
        .iter()
        .filter(|word| haystack.contains(word.as_str()))
        .count()
}
