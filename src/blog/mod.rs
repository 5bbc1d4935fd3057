pub mod codeblocks;
pub mod frontmatter;
pub mod series;
pub mod slug;
pub mod sql_split;
pub mod writer;

use std::path::Path;

use anyhow::Result;

pub use writer::{extract_series_exercises, ExtractOptions, ExtractReport};

/// What extraction would produce for one post, without writing anything.
#[derive(Debug, Clone)]
pub struct PostSummary {
    pub ordinal: usize,
    pub title: String,
    pub slug: String,
    pub weight: i64,
    pub python_blocks: usize,
    pub sql_blocks: usize,
    pub sql_statements: usize,
}

/// Resolve → extract → split for every post in the series, counting only.
pub fn summarize_series(blog_root: &Path, series: &str) -> Result<Vec<PostSummary>> {
    let posts = series::get_series_posts(blog_root, series)?;
    let mut rows = Vec::with_capacity(posts.len());
    for (idx, p) in posts.iter().enumerate() {
        let ordinal = idx + 1;
        let title = p
            .post
            .title
            .clone()
            .unwrap_or_else(|| format!("Exercise {}", ordinal));
        let python = codeblocks::extract_code_blocks(&p.post.content, "python")?;
        let sql = codeblocks::extract_code_blocks(&p.post.content, "sql")?;
        rows.push(PostSummary {
            ordinal,
            slug: slug::slugify(&title),
            title,
            weight: p.weight,
            python_blocks: python.len(),
            sql_blocks: sql.len(),
            sql_statements: sql
                .iter()
                .map(|b| sql_split::split_sql_by_comments(b).len())
                .sum(),
        });
    }
    Ok(rows)
}

// ── Tests ──
