use regex::Regex;

/// Return every fenced block tagged `language`, in order of appearance.
///
/// The fence opens with "```<language>" followed by a newline and closes at the
/// nearest following "```". Inner text comes back untouched, including
/// surrounding whitespace and blank lines.
///
/// The language is matched literally, so the pattern only fails to build
/// when it exceeds the regex size limit.
pub fn extract_code_blocks<'a>(
    content: &'a str,
    language: &str,
) -> Result<Vec<&'a str>, regex::Error> {
    let pattern = format!(r"(?s)```{}\n(.*?)```", regex::escape(language));
    let re = Regex::new(&pattern)?;
    Ok(re
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_only_requested_language() {
        let md = "Intro\n\n```python\nprint('hi')\n```\n\n```sql\nSELECT 1;\n```\n";
        assert_eq!(extract_code_blocks(md, "python").unwrap(), vec!["print('hi')\n"]);
        assert_eq!(extract_code_blocks(md, "sql").unwrap(), vec!["SELECT 1;\n"]);
        assert!(extract_code_blocks(md, "rust").unwrap().is_empty());
    }

    #[test]
    fn adjacent_blocks_close_at_nearest_fence() {
        let md = "```sql\nSELECT 1;\n```\n```sql\nSELECT 2;\n```";
        assert_eq!(extract_code_blocks(md, "sql").unwrap(), vec!["SELECT 1;\n", "SELECT 2;\n"]);
    }

    #[test]
    fn inner_whitespace_preserved() {
        let md = "```python\n\n  x = 1\n\n  y = 2\n\n```";
        assert_eq!(extract_code_blocks(md, "python").unwrap(), vec!["\n  x = 1\n\n  y = 2\n\n"]);
    }

    #[test]
    fn tag_must_end_the_fence_line() {
        // "```python3" is a different language tag
        let md = "```python3\nprint(1)\n```\n```bash\nls\n```";
        assert!(extract_code_blocks(md, "python").unwrap().is_empty());
    }

    #[test]
    fn language_is_matched_literally() {
        let md = "```c++\nint x;\n```\n```cxx\nint y;\n```";
        assert_eq!(extract_code_blocks(md, "c++").unwrap(), vec!["int x;\n"]);
    }

    #[test]
    fn fixture_post_blocks() {
        let md = std::fs::read_to_string("tests/fixtures/content/blog/select-columns/index.md")
            .unwrap();
        assert_eq!(extract_code_blocks(&md, "python").unwrap().len(), 1);
        assert_eq!(extract_code_blocks(&md, "sql").unwrap().len(), 3);
    }

    #[test]
    fn oversized_language_tag_is_an_error() {
        let tag = "x".repeat(2_000_000);
        assert!(extract_code_blocks("```x\nbody\n```", &tag).is_err());
    }
}
