//! "Did you mean" suggestions for resolution errors.

use std::cmp::Ordering;

use strsim::jaro_winkler;

const THRESHOLD: f64 = 0.72;
const LIMIT: usize = 3;

/// Ranks `candidates` by similarity to `input` and keeps the closest few.
pub(crate) fn suggestions<'a, I>(input: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<(f64, &str)> = candidates
        .into_iter()
        .map(|candidate| (jaro_winkler(input, candidate), candidate))
        .filter(|(score, _)| *score >= THRESHOLD)
        .collect();
    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.cmp(b.1))
    });
    scored.truncate(LIMIT);
    scored
        .into_iter()
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

/// Renders a suggestion list as an error-message suffix, or nothing.
pub(crate) fn render(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    let quoted: Vec<String> = suggestions.iter().map(|s| format!("'{s}'")).collect();
    format!(" (did you mean {}?)", quoted.join(" or "))
}
