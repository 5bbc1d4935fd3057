use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::codeblocks::extract_code_blocks;
use super::series::get_series_posts;
use super::slug::slugify;
use super::sql_split::split_sql_by_comments;

/// Everything one extraction run needs; nothing is read from globals.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub blog_root: PathBuf,
    pub series: String,
    pub output_dir: PathBuf,
    pub sql_dir: PathBuf,
    /// Which python block of each post becomes its exercise (0 = first).
    pub code_block_index: usize,
}

impl ExtractOptions {
    pub fn new(
        blog_root: impl Into<PathBuf>,
        series: &str,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        let output_dir = output_dir.into();
        ExtractOptions {
            blog_root: blog_root.into(),
            series: series.to_string(),
            sql_dir: sibling_sql_dir(&output_dir),
            output_dir,
            code_block_index: 0,
        }
    }
}

/// `sql/` next to the python output directory.
pub fn sibling_sql_dir(output_dir: &Path) -> PathBuf {
    output_dir.parent().unwrap_or(output_dir).join("sql")
}

#[derive(Debug, Default)]
pub struct ExtractReport {
    pub posts: usize,
    pub python_files: Vec<PathBuf>,
    pub sql_files: Vec<PathBuf>,
    /// Titles of posts with no python block at the requested index.
    pub skipped: Vec<String>,
}

impl ExtractReport {
    pub fn print(&self) {
        println!(
            "Extracted {} python and {} sql files from {} posts ({} skipped).",
            self.python_files.len(),
            self.sql_files.len(),
            self.posts,
            self.skipped.len(),
        );
    }
}

/// File name for statement `stmt` (1-based) of block `block` (1-based).
///
/// Suffixes appear only when needed: one block with one statement gets none,
/// one block with several statements gets `_{stmt}`, several blocks get
/// `_{block}_{stmt}`.
pub fn sql_file_name(
    ordinal: usize,
    slug: &str,
    block_count: usize,
    stmt_count: usize,
    block: usize,
    stmt: usize,
) -> String {
    if block_count == 1 && stmt_count == 1 {
        format!("{:02}_{}.sql", ordinal, slug)
    } else if block_count == 1 {
        format!("{:02}_{}_{}.sql", ordinal, slug, stmt)
    } else {
        format!("{:02}_{}_{}_{}.sql", ordinal, slug, block, stmt)
    }
}

pub fn python_file_name(ordinal: usize, slug: &str) -> String {
    format!("{:02}_{}.py", ordinal, slug)
}

/// Extract python and SQL exercises from every post in the series.
///
/// Previously generated `*.py` (output dir) and `*.sql` (SQL dir) files are
/// deleted first, so the directories always hold exactly one generation.
/// When the series has no posts nothing on disk is touched.
pub fn extract_series_exercises(opts: &ExtractOptions) -> Result<ExtractReport> {
    let posts = get_series_posts(&opts.blog_root, &opts.series)?;
    let mut report = ExtractReport::default();

    if posts.is_empty() {
        warn!("No posts found in series '{}'", opts.series);
        return Ok(report);
    }
    report.posts = posts.len();

    for dir in [&opts.output_dir, &opts.sql_dir] {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }
    let removed =
        clear_generated(&opts.output_dir, "py")? + clear_generated(&opts.sql_dir, "sql")?;
    debug!("Removed {} previously extracted files", removed);

    for (idx, series_post) in posts.iter().enumerate() {
        let ordinal = idx + 1;
        let post = &series_post.post;
        let title = post
            .title
            .clone()
            .unwrap_or_else(|| format!("Exercise {}", ordinal));
        let slug = slugify(&title);

        let py_blocks = extract_code_blocks(&post.content, "python")
            .with_context(|| format!("Failed to scan python blocks in {:?}", series_post.path))?;
        match py_blocks.get(opts.code_block_index) {
            Some(code) => {
                let path = opts.output_dir.join(python_file_name(ordinal, &slug));
                write_file(&path, code)?;
                info!("Extracted Python: {}", display_name(&path));
                report.python_files.push(path);
            }
            None => {
                if py_blocks.is_empty() {
                    warn!("No Python code blocks found in: {}", title);
                } else {
                    warn!(
                        "No Python code block #{} in: {} (has {})",
                        opts.code_block_index,
                        title,
                        py_blocks.len()
                    );
                }
                report.skipped.push(title.clone());
            }
        }

        let sql_blocks = extract_code_blocks(&post.content, "sql")
            .with_context(|| format!("Failed to scan sql blocks in {:?}", series_post.path))?;
        for (block_idx, block) in sql_blocks.iter().enumerate() {
            let statements = split_sql_by_comments(block);
            for (stmt_idx, statement) in statements.iter().enumerate() {
                let name = sql_file_name(
                    ordinal,
                    &slug,
                    sql_blocks.len(),
                    statements.len(),
                    block_idx + 1,
                    stmt_idx + 1,
                );
                let path = opts.sql_dir.join(name);
                write_file(&path, statement)?;
                info!("Extracted SQL: {}", display_name(&path));
                report.sql_files.push(path);
            }
        }
    }

    info!(
        "Extracted exercises to {:?} and {:?}",
        opts.output_dir, opts.sql_dir
    );
    Ok(report)
}

/// Remove files with extension `ext` directly inside `dir`.
fn clear_generated(dir: &Path, ext: &str) -> Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {:?}", dir))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == ext) {
            fs::remove_file(&path).with_context(|| format!("Failed to remove {:?}", path))?;
            removed += 1;
        }
    }
    Ok(removed)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ── Tests ──
