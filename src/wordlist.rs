use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Split wordlist text into candidate labels: one per line, trimmed, blanks skipped.
///
/// Source order and duplicates are preserved.
pub fn parse_wordlist(s: &str) -> Vec<String> {
    s.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load candidate labels from a wordlist file.
pub fn load_wordlist(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("failed to read wordlist: {}", path.as_ref().display()))?;
    Ok(parse_wordlist(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_skips_blank_lines() {
        let labels = parse_wordlist("www\n  mail  \n\n\r\napi\r\n");
        assert_eq!(labels, vec!["www", "mail", "api"]);
    }

    #[test]
    fn keeps_duplicates_in_order() {
        let labels = parse_wordlist("b\na\nb\n");
        assert_eq!(labels, vec!["b", "a", "b"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_wordlist("/nonexistent/subdomains.dat").unwrap_err();
        assert!(err.to_string().contains("failed to read wordlist"));
    }
}
