use super::normalize::normalize;
use std::collections::BTreeSet;

/// Lookup strings tried for one token: the token itself plus its normalized
/// spelling when that differs. Matches on any of them are unioned.
pub fn expand(token: &str) -> BTreeSet<String> {
    let mut variants = BTreeSet::new();
    variants.insert(token.to_string());

    let normalized = normalize(token);
    if !normalized.is_empty() && normalized != token {
        variants.insert(normalized);
    }

    variants
}
