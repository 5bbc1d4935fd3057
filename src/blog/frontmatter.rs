use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// Weight given to posts that don't declare one, so they sort last.
pub const DEFAULT_WEIGHT: i64 = 999;

static YAML_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A-{3,}[ \t]*\r?\n(?:(.*?)\r?\n)?-{3,}[ \t]*(?:\r?\n|\z)(.*)\z").unwrap()
});
static TOML_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A\+{3,}[ \t]*\r?\n(?:(.*?)\r?\n)?\+{3,}[ \t]*(?:\r?\n|\z)(.*)\z").unwrap()
});

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("invalid YAML front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML front matter: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A blog post: front-matter fields plus the raw markdown body.
#[derive(Debug, Clone, Default)]
pub struct Post {
    pub title: Option<String>,
    /// Series tags, one entry per list element (a scalar field becomes one entry).
    pub series: Vec<String>,
    pub weight: Option<i64>,
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Integer view of a weight. Floats truncate toward zero, numeric strings
    /// parse, anything else has no weight.
    fn as_weight(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            Scalar::Float(x) if x.is_finite() => Some(x.trunc() as i64),
            Scalar::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SeriesField {
    Many(Vec<Scalar>),
    One(Scalar),
}

#[derive(Debug, Default, Deserialize)]
struct Header {
    title: Option<Scalar>,
    series: Option<SeriesField>,
    weight: Option<Scalar>,
}

impl Post {
    /// Parse a markdown document with an optional `---` (YAML) or `+++` (TOML)
    /// header. Delimiter lines may be longer than three characters. A document
    /// without a header is all body.
    pub fn parse(text: &str) -> Result<Post, FrontMatterError> {
        let text = text.trim_start_matches('\u{feff}');

        let (header, body) = if let Some(caps) = YAML_RE.captures(text) {
            let raw = caps.get(1).map_or("", |m| m.as_str());
            let header = if raw.trim().is_empty() {
                Header::default()
            } else {
                serde_yaml::from_str(raw)?
            };
            (header, caps.get(2).map_or("", |m| m.as_str()))
        } else if let Some(caps) = TOML_RE.captures(text) {
            let raw = caps.get(1).map_or("", |m| m.as_str());
            (toml::from_str(raw)?, caps.get(2).map_or("", |m| m.as_str()))
        } else {
            (Header::default(), text)
        };

        let series = match header.series {
            Some(SeriesField::Many(items)) => items.iter().map(|s| s.to_string()).collect(),
            Some(SeriesField::One(s)) => vec![s.to_string()],
            None => Vec::new(),
        };

        Ok(Post {
            title: header.title.map(|t| t.to_string()),
            series,
            weight: header.weight.as_ref().and_then(Scalar::as_weight),
            content: body.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Post> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        Post::parse(&text).with_context(|| format!("Failed to parse front matter in {:?}", path))
    }

    pub fn weight(&self) -> i64 {
        self.weight.unwrap_or(DEFAULT_WEIGHT)
    }

    /// Case-insensitive containment of `tag` in any series entry.
    pub fn in_series(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.series.iter().any(|s| s.to_lowercase().contains(&tag))
    }
}

// ── Tests ──
