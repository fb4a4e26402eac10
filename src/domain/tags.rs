//! Tag list parsing for post submissions.

/// Split a comma-separated tag list into trimmed, non-empty labels.
///
/// Order is preserved and duplicates are kept; every surviving entry
/// becomes one tag association.
pub fn parse_tag_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims_entries() {
        assert_eq!(parse_tag_list(Some(" rust, web ,db")), ["rust", "web", "db"]);
    }

    #[test]
    fn drops_empty_entries() {
        assert_eq!(parse_tag_list(Some(",, a , ,b,")), ["a", "b"]);
        assert!(parse_tag_list(Some("  ")).is_empty());
    }

    #[test]
    fn keeps_duplicates_after_trim() {
        assert_eq!(parse_tag_list(Some("a, a ,b")), ["a", "a", "b"]);
    }

    #[test]
    fn absent_list_yields_no_tags() {
        assert!(parse_tag_list(None).is_empty());
    }
}
