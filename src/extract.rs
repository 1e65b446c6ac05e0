use once_cell::sync::Lazy;
use regex::Regex;

/// Resource-shaped path segments: an uppercase letter followed by word
/// characters, so `/Users/Orders/42` yields `Users` and `Orders`.
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]\w+").unwrap());

/// Result of deriving a resource name from a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceMatch {
    /// Canonical resource name, the permission lookup key.
    Name(String),
    /// The base prefix consumed every token; nothing left to look up.
    Exhausted,
    /// The path carries no resource-shaped segments at all (static assets
    /// and the like). Not subject to policy, let the request through.
    PassThrough,
}

/// Derive the resource name from a request path, skipping as many leading
/// tokens as the optional base path contributes.
pub fn extract_resource(path: &str, base_path: Option<&str>) -> ResourceMatch {
    let skip = base_path
        .map(|base| TOKEN.find_iter(base).count())
        .unwrap_or(0);

    let tokens: Vec<&str> = TOKEN.find_iter(path).map(|m| m.as_str()).collect();
    if tokens.is_empty() {
        return ResourceMatch::PassThrough;
    }

    match tokens.get(skip) {
        Some(name) => ResourceMatch::Name((*name).to_string()),
        None => ResourceMatch::Exhausted,
    }
}
