/// Characters dropped from titles outright.
const STRIPPED: &[char] = &[':', '?', '!', ',', '\'', '"'];

/// Convert a post title into a filename-safe slug.
///
/// Lowercases, turns whitespace and `/` into `-`, and drops the characters in
/// [`STRIPPED`]. Applying it to its own output changes nothing.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        match c {
            c if c.is_whitespace() || c == '/' => slug.push('-'),
            c if STRIPPED.contains(&c) => {}
            c => slug.extend(c.to_lowercase()),
        }
    }
    slug
}

// ── Tests ──
