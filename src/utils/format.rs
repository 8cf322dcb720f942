/// Partially mask an API key for display: "sk-p***wxyz"
pub(crate) fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return key.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}***{tail}")
}

/// Cache age for verbose output: "42s"
pub(crate) fn format_age(seconds: i64) -> String {
    format!("{seconds}s")
}
