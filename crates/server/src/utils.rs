/// Escape LIKE wildcards (% and _) in a search string
pub fn escape_like_wildcards(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Generate a prefixed cuid2 id, e.g. `rep_k1w2...`.
pub fn prefixed_id(prefix: &str) -> String { format!("{}_{}", prefix, cuid2::create_id()) }
