//! Cleanup applied to model output before it reaches the messaging front end.
//!
//! Each step is a pure `&str -> String` function; [`sanitize`] runs them in
//! [`STEPS`] order. The order is significant: the trailing-colon rewrite runs
//! before the label rewrite, so a line ending in `word:` is first padded to
//! `word :` and then normalized back to `word:` followed by a line break.

use once_cell::sync::Lazy;
use regex::Regex;

// Opens with one bracket and closes with two; kept as the front end emits it.
static TOOL_LOG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[Used tools:[\s\S]*?\]\]").expect("tool log pattern"));
static MARKUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[#_~`]").expect("markup pattern"));
static TRAILING_COLON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m):\s*$").expect("trailing colon pattern"));
static LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+)\s*:").expect("label pattern"));

pub type Step = fn(&str) -> String;

pub const STEPS: [(&str, Step); 6] = [
    ("strip_tool_logs", strip_tool_logs),
    ("trim", trim),
    ("strip_emphasis", strip_emphasis),
    ("strip_markup", strip_markup),
    ("pad_trailing_colons", pad_trailing_colons),
    ("break_after_labels", break_after_labels),
];

pub fn sanitize(raw: &str) -> String {
    STEPS
        .iter()
        .fold(raw.to_string(), |text, (_, step)| step(&text))
}

/// Removes `[Used tools: ...]]` blocks, shortest match, across lines.
pub fn strip_tool_logs(text: &str) -> String {
    TOOL_LOG_RE.replace_all(text, "").into_owned()
}

pub fn trim(text: &str) -> String {
    text.trim().to_string()
}

pub fn strip_emphasis(text: &str) -> String {
    text.replace('*', "")
}

pub fn strip_markup(text: &str) -> String {
    MARKUP_RE.replace_all(text, "").into_owned()
}

/// Rewrites a colon that ends a line (trailing whitespace included) to ` :`.
pub fn pad_trailing_colons(text: &str) -> String {
    TRAILING_COLON_RE.replace_all(text, " :").into_owned()
}

/// Forces a line break after every `word:` label, wherever it appears.
pub fn break_after_labels(text: &str) -> String {
    LABEL_RE.replace_all(text, "${1}:\n").into_owned()
}
