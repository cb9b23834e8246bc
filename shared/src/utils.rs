use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static MATH_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\$.*?\$\$|\$.*?\$").expect("valid math regex"));
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*{1,2}").expect("valid regex"));
static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#{1,6}").expect("valid regex"));
static BACKTICKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`{1,3}").expect("valid regex"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^\)]+\)").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Study material formats the CLI can read.
pub fn is_supported_material(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    matches!(ext.as_str(), "txt" | "md" | "pdf" | "docx")
}

pub fn sanitize_content(text: &str) -> String {
    text.trim().to_string()
}

/// Strip LaTeX and Markdown so a speech engine reads plain sentences.
/// Math is replaced by the phrase "an equation".
pub fn clean_text_for_tts(text: &str) -> String {
    let cleaned = MATH_BLOCK.replace_all(text, " an equation ");
    let cleaned = EMPHASIS.replace_all(&cleaned, "");
    let cleaned = HEADING.replace_all(&cleaned, "");
    let cleaned = BACKTICKS.replace_all(&cleaned, "");
    let cleaned = LINK.replace_all(&cleaned, "$1");
    let cleaned = WHITESPACE.replace_all(&cleaned, " ");
    let mut cleaned = cleaned.trim().to_string();
    if !cleaned.ends_with(|c: char| matches!(c, '.' | '!' | '?')) {
        cleaned.push('.');
    }
    cleaned
}

/// Keep at most `max_chars` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
