//! Deliberately naive markdown for preview text fields.
//!
//! The editor only exercises headings, bold, italic, and links, and the
//! preview has to mirror what the site templates do with the same fields.
//! A full CommonMark pass would render differently, so this stays a fixed
//! substitution chain. Input is escaped first; the substitutions only ever
//! introduce the tags listed here.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::application::render::html::escape_html;

static H3_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^### (.*)$").expect("h3 pattern"));
static H2_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^## (.*)$").expect("h2 pattern"));
static H1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^# (.*)$").expect("h1 pattern"));
static STRONG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("strong pattern"));
static EM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").expect("em pattern"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link pattern"));

/// Render a markdown-ish field to an HTML fragment. Empty input renders
/// to the empty string.
pub fn markdown_to_html(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    let text = escape_html(input);
    let text = H3_RE.replace_all(&text, "<h3>$1</h3>");
    let text = H2_RE.replace_all(&text, "<h2>$1</h2>");
    let text = H1_RE.replace_all(&text, "<h1>$1</h1>");
    let text = STRONG_RE.replace_all(&text, "<strong>$1</strong>");
    let text = EM_RE.replace_all(&text, "<em>$1</em>");
    let text = LINK_RE.replace_all(&text, r#"<a href="$2">$1</a>"#);
    text.replace('\n', "<br>")
}
