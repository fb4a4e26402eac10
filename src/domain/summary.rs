//! Summary derivation for post listings.
//!
//! Long posts are cut down to their leading lines. A cut that lands inside a
//! fenced code block would leave the preview with an unterminated fence, so
//! the truncation tracks fence markers and closes a dangling block.

/// Number of leading lines kept when content is truncated.
pub const SUMMARY_LINE_LIMIT: usize = 10;

/// Marker opening or closing a fenced code block.
pub const FENCE_MARKER: &str = "```";

/// Derive the listing summary for `content`.
///
/// Content with at most [`SUMMARY_LINE_LIMIT`] lines is returned verbatim.
/// Longer content keeps its first lines, each terminated by `\n`, followed
/// by a closing fence when an odd number of fence markers was seen.
pub fn truncate_content(content: Option<&str>) -> String {
    let Some(content) = content else {
        return String::new();
    };

    let normalized = content.replace('\r', "");
    let lines: Vec<&str> = normalized.split('\n').collect();

    if lines.len() <= SUMMARY_LINE_LIMIT {
        return content.to_string();
    }

    let mut summary = String::new();
    let mut inside_fence = false;
    for line in &lines[..SUMMARY_LINE_LIMIT] {
        if line.starts_with(FENCE_MARKER) {
            inside_fence = !inside_fence;
        }
        summary.push_str(line);
        summary.push('\n');
    }

    if inside_fence {
        summary.push_str(FENCE_MARKER);
        summary.push('\n');
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_lines(count: usize) -> Vec<String> {
        (1..=count).map(|n| format!("line {n}")).collect()
    }

    #[test]
    fn short_content_is_returned_verbatim() {
        let content = numbered_lines(10).join("\n");
        assert_eq!(truncate_content(Some(&content)), content);

        let single = "just one line";
        assert_eq!(truncate_content(Some(single)), single);
    }

    #[test]
    fn short_content_keeps_carriage_returns() {
        let content = "first\r\nsecond\r\n";
        assert_eq!(truncate_content(Some(content)), content);
    }

    #[test]
    fn long_content_without_fences_keeps_first_ten_lines() {
        let lines = numbered_lines(15);
        let summary = truncate_content(Some(&lines.join("\n")));

        let kept: Vec<&str> = summary.lines().collect();
        assert_eq!(kept.len(), 10);
        for (kept, original) in kept.iter().zip(&lines) {
            assert_eq!(kept, original);
        }
        assert!(summary.ends_with("line 10\n"));
    }

    #[test]
    fn open_fence_in_first_ten_lines_is_closed() {
        let mut lines = numbered_lines(11);
        lines[2] = "```python".to_string();
        let summary = truncate_content(Some(&lines.join("\n")));

        let expected = format!("{}\n```\n", lines[..10].join("\n"));
        assert_eq!(summary, expected);
        assert_eq!(summary.lines().count(), 11);
    }

    #[test]
    fn balanced_fences_are_left_alone() {
        let mut lines = numbered_lines(11);
        lines[1] = "```rust".to_string();
        lines[4] = "```".to_string();
        let summary = truncate_content(Some(&lines.join("\n")));

        let expected = format!("{}\n", lines[..10].join("\n"));
        assert_eq!(summary, expected);
    }

    #[test]
    fn fence_after_the_cut_is_ignored() {
        let mut lines = numbered_lines(12);
        lines[10] = "```".to_string();
        let summary = truncate_content(Some(&lines.join("\n")));

        assert!(!summary.contains(FENCE_MARKER));
    }

    #[test]
    fn crlf_content_is_normalized_when_truncated() {
        let content = numbered_lines(12).join("\r\n");
        let summary = truncate_content(Some(&content));

        assert!(!summary.contains('\r'));
        assert_eq!(summary.lines().count(), 10);
    }

    #[test]
    fn empty_or_absent_content_yields_empty_summary() {
        assert_eq!(truncate_content(None), "");
        assert_eq!(truncate_content(Some("")), "");
    }
}
