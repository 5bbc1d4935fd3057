use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::frontmatter::Post;

/// A post that belongs to the requested series.
#[derive(Debug, Clone)]
pub struct SeriesPost {
    pub path: PathBuf,
    pub weight: i64,
    pub post: Post,
}

/// Where Hugo keeps blog posts, relative to the site root.
pub fn blog_content_dir(blog_root: &Path) -> PathBuf {
    blog_root.join("content").join("blog")
}

/// Find every post tagged with `series`, sorted by ascending weight.
///
/// Post directories are visited in name order and the sort is stable, so
/// equal weights keep that order. A missing `content/blog` directory logs a
/// warning and yields no posts.
pub fn get_series_posts(blog_root: &Path, series: &str) -> Result<Vec<SeriesPost>> {
    let content_dir = blog_content_dir(blog_root);
    if !content_dir.is_dir() {
        warn!("Blog content directory not found at {:?}", content_dir);
        return Ok(Vec::new());
    }

    let mut post_dirs: Vec<PathBuf> = std::fs::read_dir(&content_dir)
        .with_context(|| format!("Failed to list {:?}", content_dir))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read an entry of {:?}", content_dir))?;
    post_dirs.retain(|p| p.is_dir());
    post_dirs.sort();

    let mut posts = Vec::new();
    for dir in post_dirs {
        let index_md = dir.join("index.md");
        if !index_md.is_file() {
            debug!("Skipping {:?}: no index.md", dir);
            continue;
        }

        let post = Post::load(&index_md)?;
        if post.in_series(series) {
            posts.push(SeriesPost {
                weight: post.weight(),
                path: index_md,
                post,
            });
        }
    }

    posts.sort_by_key(|p| p.weight);
    Ok(posts)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_post(root: &Path, dir: &str, header: &str) {
        let post_dir = blog_content_dir(root).join(dir);
        fs::create_dir_all(&post_dir).unwrap();
        let text = format!("---\n{}\n---\nbody\n", header);
        fs::write(post_dir.join("index.md"), text).unwrap();
    }

    #[test]
    fn fixture_series_order() {
        let posts =
            get_series_posts(Path::new("tests/fixtures"), "SQL for Python Developers").unwrap();
        let titles: Vec<_> = posts
            .iter()
            .map(|p| p.post.title.clone().unwrap_or_default())
            .collect();
        assert_eq!(
            titles,
            vec![
                "Zero Setup SQL: Run Your First SQL Query in Under 5 Minutes with DuckDB",
                "SELECT: Choosing Your Columns",
                "FROM: Where Your Data Lives",
                "WITH: Naming Your Subqueries",
            ]
        );
        let weights: Vec<_> = posts.iter().map(|p| p.weight).collect();
        assert_eq!(weights, vec![2, 6, 7, 999]);
    }

    #[test]
    fn missing_content_dir_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let posts = get_series_posts(tmp.path(), "SQL for Python Developers").unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn equal_weights_keep_directory_order() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(tmp.path(), "c-post", "title: C\nseries: [S]\nweight: 1");
        write_post(tmp.path(), "a-post", "title: A\nseries: [S]\nweight: 1");
        write_post(tmp.path(), "b-post", "title: B\nseries: [S]\nweight: 0");
        write_post(tmp.path(), "d-post", "title: D\nseries: [Other]\nweight: 0");

        let posts = get_series_posts(tmp.path(), "s").unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.post.title.clone().unwrap()).collect();
        assert_eq!(titles, vec!["B", "A", "C"]);
    }

    #[test]
    fn dirs_without_index_and_loose_files_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(tmp.path(), "real", "title: Real\nseries: S");
        fs::create_dir_all(blog_content_dir(tmp.path()).join("empty")).unwrap();
        let section = blog_content_dir(tmp.path()).join("_index.md");
        fs::write(section, "---\nseries: S\n---\n").unwrap();

        let posts = get_series_posts(tmp.path(), "S").unwrap();
        assert_eq!(posts.len(), 1);
        assert!(posts[0].path.ends_with("real/index.md"));
    }

    #[test]
    fn content_path_that_is_a_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("content")).unwrap();
        fs::write(blog_content_dir(tmp.path()), "not a directory").unwrap();
        assert!(get_series_posts(tmp.path(), "S").unwrap().is_empty());
    }

    #[test]
    fn every_listed_post_dir_is_visited() {
        let tmp = tempfile::tempdir().unwrap();
        for i in 0..12 {
            let header = format!("series: S\nweight: {}", i);
            write_post(tmp.path(), &format!("post-{:02}", i), &header);
        }
        let posts = get_series_posts(tmp.path(), "S").unwrap();
        let weights: Vec<_> = posts.iter().map(|p| p.weight).collect();
        assert_eq!(weights, (0..12).collect::<Vec<i64>>());
    }
}
