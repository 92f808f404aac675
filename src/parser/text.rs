use std::sync::LazyLock;

use regex::Regex;

static HSPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\x0B\x0C]+").unwrap());
static EDGE_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" ?\n ?").unwrap());
static BLANKS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());
static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style|noscript)\b.*?</(script|style|noscript)\s*>").unwrap());
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Canonical form for line splitting and pattern matching: NBSP → space,
/// horizontal whitespace runs → one space, no `\r`, no blank lines.
pub fn normalize(raw: &str) -> String {
    let text = raw.replace('\u{a0}', " ").replace('\r', "");
    let text = HSPACE_RE.replace_all(&text, " ");
    let text = EDGE_SPACE_RE.replace_all(&text, "\n");
    let text = BLANKS_RE.replace_all(&text, "\n");
    text.trim().to_string()
}

/// Blind tag stripping for the markup fallback source, then `normalize`.
/// Every tag becomes a line break so cell and paragraph contents stay apart.
pub fn strip_markup(markup: &str) -> String {
    let text = SCRIPT_RE.replace_all(markup, "\n");
    let text = COMMENT_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, "\n");
    let text = decode_entities(&text);
    normalize(&text)
}

/// Newline-free view used by the block patterns.
pub fn flatten(text: &str) -> String {
    text.replace('\n', " ")
}

/// Non-empty, trimmed lines of normalized text.
pub fn lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&#xa0;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
