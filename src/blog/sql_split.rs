const COMMENT_PREFIX: &str = "--";

/// Split one SQL code block into independently runnable statements.
///
/// Comment lines act as separators once statement text has accumulated;
/// a comment before any text is dropped. Blank lines and comments never
/// reach the output. A `WITH` query is returned whole because its comments
/// annotate the CTE rather than separate statements.
pub fn split_sql_by_comments(block: &str) -> Vec<String> {
    let trimmed = block.trim();
    if is_cte(trimmed) {
        return vec![trimmed.to_string()];
    }

    let mut statements = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in trimmed.lines() {
        let stripped = line.trim();
        if stripped.starts_with(COMMENT_PREFIX) {
            if !current.is_empty() {
                flush(&mut current, &mut statements);
            }
        } else if !stripped.is_empty() {
            current.push(line);
        }
    }
    flush(&mut current, &mut statements);

    statements
}

fn flush(current: &mut Vec<&str>, statements: &mut Vec<String>) {
    let text = current.join("\n");
    let text = text.trim();
    if !text.is_empty() {
        statements.push(text.to_string());
    }
    current.clear();
}

/// True when the first keyword of `sql` is `WITH`, ignoring case.
fn is_cte(sql: &str) -> bool {
    let first: String = sql
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    first.eq_ignore_ascii_case("with")
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_separates_statements() {
        assert_eq!(
            split_sql_by_comments("SELECT 1\n-- note\nSELECT 2\n"),
            vec!["SELECT 1", "SELECT 2"]
        );
    }

    #[test]
    fn cte_never_split() {
        let block = "WITH t AS (SELECT 1) -- comment\nSELECT * FROM t";
        assert_eq!(split_sql_by_comments(block), vec![block]);
    }

    #[test]
    fn cte_with_comment_lines_kept_verbatim() {
        let block = concat!(
            "\n  with premium AS (\n",
            "    -- only paying customers\n",
            "    SELECT * FROM customers WHERE is_premium\n",
            "  )\n",
            "  -- then count them\n",
            "  SELECT COUNT(*) FROM premium;\n\n",
        );
        let out = split_sql_by_comments(block);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0], block.trim());
        assert!(out[0].contains("-- only paying customers"));
    }

    #[test]
    fn with_prefix_of_longer_word_is_not_cte() {
        let out = split_sql_by_comments("WITHOUT_ROWID_CHECK\n-- x\nSELECT 2");
        assert_eq!(out, vec!["WITHOUT_ROWID_CHECK", "SELECT 2"]);
    }

    #[test]
    fn leading_comment_is_dropped_not_a_boundary() {
        let out = split_sql_by_comments("-- Get every name\nSELECT name\nFROM customers;");
        assert_eq!(out, vec!["SELECT name\nFROM customers;"]);
    }

    #[test]
    fn n_groups_yield_n_statements() {
        let block = "\
SELECT name, email
FROM customers;

-- Just the cities
SELECT city FROM customers;
-- Everything
-- (yes, everything)
SELECT *
FROM customers;
";
        let out = split_sql_by_comments(block);
        assert_eq!(
            out,
            vec![
                "SELECT name, email\nFROM customers;",
                "SELECT city FROM customers;",
                "SELECT *\nFROM customers;",
            ]
        );
        assert!(out.iter().all(|s| !s.contains("--")));
    }

    #[test]
    fn indented_lines_keep_inner_indentation() {
        let out = split_sql_by_comments("SELECT\n    name\n  FROM customers");
        assert_eq!(out, vec!["SELECT\n    name\n  FROM customers"]);
    }

    #[test]
    fn comment_only_block_is_empty() {
        assert!(split_sql_by_comments("-- one\n  -- two\n\n").is_empty());
        assert!(split_sql_by_comments("").is_empty());
        assert!(split_sql_by_comments("   \n\n").is_empty());
    }
}
