//! Prompt rendering and oracle output cleanup

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::LazyLock;

/// Longest prompt or output echoed into debug logs
pub const MAX_LOG_CHARS: usize = 4_000;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").expect("fence pattern is valid")
});

/// Strip fenced-code markers from oracle output
///
/// Returns the body of the first fenced block when there is one, otherwise the
/// trimmed input.
pub fn strip_code_fences(text: &str) -> &str {
    match FENCED_BLOCK.captures(text).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str().trim(),
        None => text.trim(),
    }
}

/// Cut a string to `max_chars` characters for logging
pub fn truncate_for_log(input: &str, max_chars: usize) -> String {
    let char_count = input.chars().count();
    if char_count <= max_chars {
        return input.to_string();
    }
    let mut preview: String = input.chars().take(max_chars).collect();
    let _ = write!(preview, "... [truncated, total_chars={}]", char_count);
    preview
}

/// A search result line folded into the selection prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub title: String,
    pub snippet: String,
}

/// Append clarification answers and research findings to the user prompt
pub fn build_selection_prompt(
    prompt: &str,
    answers: &BTreeMap<String, String>,
    findings: &[Finding],
) -> String {
    let mut rendered = prompt.to_string();

    if !answers.is_empty() {
        rendered.push_str("\n\nAdditional Context:\n");
        for (id, answer) in answers {
            let _ = writeln!(rendered, "- {}: {}", id, answer);
        }
    }

    if !findings.is_empty() {
        rendered.push_str("\n\nResearch Findings:\n");
        for finding in findings {
            let _ = writeln!(rendered, "{}: {}", finding.title, finding.snippet);
        }
    }

    rendered
}
