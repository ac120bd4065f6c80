//! Line-oriented comment removal.
//!
//! This is a heuristic, not a lexer: a string literal whose line starts with
//! `#`, `//` or `*` is treated as a comment and dropped.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `/* ... */` blocks plus `//` and `*`-prefixed lines.
    CFamily,
    /// `#` line comments only.
    Script,
    /// `<!-- ... -->` blocks.
    Markup,
}

const COMMENT_STYLES: &[(&str, CommentStyle)] = &[
    ("go", CommentStyle::CFamily),
    ("js", CommentStyle::CFamily),
    ("ts", CommentStyle::CFamily),
    ("java", CommentStyle::CFamily),
    ("c", CommentStyle::CFamily),
    ("cpp", CommentStyle::CFamily),
    ("py", CommentStyle::Script),
    ("sh", CommentStyle::Script),
    ("bash", CommentStyle::Script),
    ("yaml", CommentStyle::Script),
    ("yml", CommentStyle::Script),
    ("html", CommentStyle::Markup),
    ("xml", CommentStyle::Markup),
];

impl CommentStyle {
    pub fn for_tag(tag: &str) -> Option<Self> {
        let tag = tag.to_lowercase();
        COMMENT_STYLES
            .iter()
            .find(|(ext, _)| *ext == tag)
            .map(|(_, style)| *style)
    }
}

/// The lowercased extension without its dot, or an empty string.
pub fn language_tag(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn c_block_comment() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block comment pattern"))
}

fn markup_comment() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("valid markup comment pattern"))
}

/// Removes comments from `content` according to the language `tag`.
///
/// Unknown tags return the content untouched. For known tags the surviving
/// lines are rejoined with `\n`.
pub fn strip_comments(content: &str, tag: &str) -> String {
    match CommentStyle::for_tag(tag) {
        Some(style) => strip_with_style(content, style).0,
        None => content.to_string(),
    }
}

/// Same as [`strip_comments`] but also reports how many lines were removed.
pub fn strip_with_style(content: &str, style: CommentStyle) -> (String, usize) {
    let text = match style {
        CommentStyle::CFamily => remove_blocks(content, c_block_comment()),
        CommentStyle::Markup => remove_blocks(content, markup_comment()),
        CommentStyle::Script => content.to_string(),
    };

    let before = content.lines().count();
    let kept: Vec<&str> = text
        .lines()
        .filter(|line| !is_comment_line(line, style))
        .collect();
    let removed = before.saturating_sub(kept.len());

    (kept.join("\n"), removed)
}

fn is_comment_line(line: &str, style: CommentStyle) -> bool {
    let trimmed = line.trim();
    match style {
        CommentStyle::CFamily => {
            trimmed.starts_with("//")
                || trimmed.starts_with("/*")
                || trimmed.starts_with("*/")
                || trimmed.starts_with('*')
        }
        CommentStyle::Script => trimmed.starts_with('#'),
        CommentStyle::Markup => trimmed.contains("<!--") && trimmed.contains("-->"),
    }
}

/// Cuts every block match out of `content`. A block that is alone on its
/// lines takes its trailing line break with it so no blank line is left.
fn remove_blocks(content: &str, pattern: &Regex) -> String {
    let mut output = String::with_capacity(content.len());
    let mut cursor = 0;

    for found in pattern.find_iter(content) {
        let line_start = content[..found.start()].rfind('\n').map_or(0, |i| i + 1);
        let rest = &content[found.end()..];
        let line_end = rest.find('\n').map_or(content.len(), |i| found.end() + i);

        let alone_before =
            line_start >= cursor && content[line_start..found.start()].trim().is_empty();
        let alone_after = content[found.end()..line_end].trim().is_empty();

        if alone_before && alone_after {
            output.push_str(&content[cursor..line_start]);
            cursor = if line_end < content.len() {
                line_end + 1
            } else {
                line_end
            };
        } else {
            output.push_str(&content[cursor..found.start()]);
            cursor = found.end();
        }
    }

    output.push_str(&content[cursor..]);
    output
}
