//! Error types for path-addressed edits

use thiserror::Error;

/// Errors from resolving an element path against a document
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("empty element path")]
    Empty,

    /// No element with this id at that level of the tree
    #[error("element '{id}' not found{}", format_suggestions(.suggestions))]
    NotFound { id: String, suggestions: Vec<String> },

    /// The path tries to descend into a node that has no children
    #[error("element '{id}' is not a layout box and has no children")]
    NotAContainer { id: String },
}

impl PathError {
    /// A not-found error with suggestions drawn from the ids that were
    /// available at that level
    pub fn not_found<'a>(id: &str, candidates: impl IntoIterator<Item = &'a str>) -> Self {
        Self::NotFound {
            id: id.to_string(),
            suggestions: find_similar(candidates, id, 2),
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean {}?)", suggestions.join(", "))
    }
}

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut row = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            row[j + 1] = (prev[j + 1] + 1).min(row[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

/// Up to three candidates within `max_distance` edits of `target`, closest
/// first
fn find_similar<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
    target: &str,
    max_distance: usize,
) -> Vec<String> {
    let mut matches: Vec<(&str, usize)> = candidates
        .into_iter()
        .filter_map(|name| {
            let dist = levenshtein_distance(name, target);
            (dist > 0 && dist <= max_distance).then_some((name, dist))
        })
        .collect();
    matches.sort_by_key(|(_, d)| *d);
    matches.into_iter().map(|(name, _)| name.to_string()).take(3).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("hero", "hero"), 0);
        assert_eq!(levenshtein_distance("hero", "her"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
    }

    #[test]
    fn test_suggestions_closest_first() {
        let err = PathError::not_found("titel", ["title", "subtitle", "footer", "tite"]);
        assert_eq!(
            err,
            PathError::NotFound {
                id: "titel".into(),
                suggestions: vec!["tite".into(), "title".into()],
            }
        );
        assert_eq!(err.to_string(), "element 'titel' not found (did you mean tite, title?)");
    }

    #[test]
    fn test_message_without_suggestions() {
        let err = PathError::not_found("zzz", ["title"]);
        assert_eq!(err.to_string(), "element 'zzz' not found");
    }
}
