/// Parse a boolean value from a string, supporting multiple formats
///
/// Accepts: "true", "false", "1", "0", "yes", "no" (case insensitive)
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Parse a comma-separated list, trimming each entry.
///
/// Empty entries are kept so that `",/about"` yields the site root and `/about`.
pub fn parse_list(s: &str) -> Vec<String> {
    s.split(',').map(|item| item.trim().to_string()).collect()
}

/// Parse an OAuth2 scope list separated by spaces and/or commas.
pub fn parse_scope_list(s: &str) -> Vec<String> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
