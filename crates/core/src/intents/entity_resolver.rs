//! Target lookup over plan entities.
//!
//! Matching is two-tier and deterministic: an exact match on the normalized
//! display field wins; otherwise the first entity, in list order, whose
//! display field contains the normalized target. Normalization is whitespace
//! collapsing plus lowercase folding only. No Unicode normalization is done.

use crate::plan::PlanEntity;

/// Leading determiners dropped from a derived display name.
const ARTICLES: &[&str] = &["a", "an", "the", "my", "our", "another"];

/// Words that introduce the actual name ("a fund called X").
const NAME_MARKERS: &[&str] = &["called", "named", "titled"];

/// Literal entity-type words stripped around a derived name.
const ENTITY_WORDS: &[&str] = &[
    "asset",
    "assets",
    "liability",
    "liabilities",
    "income",
    "incomes",
    "expense",
    "expenses",
];

/// Lowercases and collapses internal whitespace.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Returns the position of the entity matching `target`, if any.
pub fn resolve_index<T: PlanEntity>(items: &[T], target: &str) -> Option<usize> {
    let needle = normalize(target);
    if needle.is_empty() || items.is_empty() {
        return None;
    }

    let names: Vec<String> = items.iter().map(|item| normalize(item.display_name())).collect();

    names
        .iter()
        .position(|name| *name == needle)
        .or_else(|| names.iter().position(|name| name.contains(&needle)))
}

/// Returns the entity matching `target`, if any.
pub fn resolve<'a, T: PlanEntity>(items: &'a [T], target: &str) -> Option<&'a T> {
    resolve_index(items, target).map(|idx| &items[idx])
}

/// Derives a display name for a new entity from a raw target phrase.
///
/// "a new asset called emergency fund" becomes "Emergency Fund". Falls back
/// to `fallback` when nothing usable remains.
pub fn derive_entity_name(target: &str, fallback: &str) -> String {
    let mut words: Vec<&str> = target
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| {
                matches!(c, '"' | '\'' | '`' | '“' | '”' | ',' | '.' | ':' | ';' | '!' | '?')
            })
        })
        .filter(|w| !w.is_empty())
        .collect();

    if let Some(marker) = words
        .iter()
        .rposition(|w| NAME_MARKERS.contains(&w.to_lowercase().as_str()))
    {
        words.drain(..=marker);
    }

    let lower = |w: &str| w.to_lowercase();
    let mut after_article = false;
    while let Some(first) = words.first().map(|w| lower(w)) {
        let next_is_entity_word = words
            .get(1)
            .map_or(true, |w| ENTITY_WORDS.contains(&lower(w).as_str()));
        if ARTICLES.contains(&first.as_str()) {
            after_article = true;
        } else if first == "new" && (after_article || next_is_entity_word) {
            // "a new car", "new asset"; "New York" is kept
        } else if !ENTITY_WORDS.contains(&first.as_str()) {
            break;
        }
        words.remove(0);
    }
    while words
        .last()
        .is_some_and(|w| ENTITY_WORDS.contains(&lower(w).as_str()))
    {
        words.pop();
    }

    if words.is_empty() {
        return fallback.to_string();
    }

    words
        .into_iter()
        .map(capitalize_lowercase_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalizes words typed in lowercase; mixed-case words ("iPhone", "IRA") are kept.
fn capitalize_lowercase_word(word: &str) -> String {
    if word.chars().any(|c| c.is_uppercase()) {
        return word.to_string();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
