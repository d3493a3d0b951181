//! Taxon name canonicalization
//!
//! Profiling tools emit names like `g__Bacteroides` or `Escherichia_coli`;
//! lookups want `Bacteroides` and `Escherichia coli`.

use once_cell::sync::Lazy;
use regex::Regex;

static RANK_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[kpcofgs]__").expect("valid rank prefix regex"));

/// Strip one leading rank prefix (`k__` .. `s__`), turn underscores into
/// spaces, trim surrounding whitespace.
///
/// The prefix is matched before trimming, so `" g__X"` keeps its prefix.
pub fn normalize(raw: &str) -> String {
    let stripped = RANK_PREFIX_RE.replace(raw, "");
    stripped.replace('_', " ").trim().to_string()
}

/// Key used for cache identity and colour hashing
pub fn identity_key(raw: &str) -> String {
    normalize(raw).to_lowercase()
}

/// First whitespace-delimited token, taken as the genus of a binomial
pub fn genus_token(normalized: &str) -> Option<&str> {
    normalized.split_whitespace().next()
}
