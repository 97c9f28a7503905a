/// Fuzzy "did you mean" suggestions for unknown command names.
use nucleo_matcher::{
    Matcher, Utf32Str,
    pattern::{CaseMatching, Normalization, Pattern},
};

/// Maximum number of suggestions offered.
const MAX_SUGGESTIONS: usize = 3;

/// Rank `names` against a mistyped command and return the closest few.
///
/// Results are sorted by score descending; ties keep registry order.
#[must_use]
pub fn suggest(names: &[&str], typed: &str) -> Vec<String> {
    if typed.is_empty() {
        return Vec::new();
    }

    let pattern = Pattern::parse(typed, CaseMatching::Smart, Normalization::Smart);
    let mut matcher = Matcher::new(nucleo_matcher::Config::DEFAULT);

    let mut scored: Vec<(&str, u32)> = names
        .iter()
        .filter_map(|name| {
            let mut buf = Vec::new();
            let haystack = Utf32Str::new(name, &mut buf);
            pattern
                .score(haystack, &mut matcher)
                .map(|score| (*name, score))
        })
        .collect();

    // Stable sort keeps registry order among equal scores.
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(name, _)| name.to_owned())
        .collect()
}
