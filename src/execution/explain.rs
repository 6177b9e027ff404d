//! Pipeline naming and the natural-language walkthrough

use crate::core::Component;
use std::fmt::Write;

/// Walk through each component with its agent's quote
pub fn explain_pipeline(components: &[Component]) -> String {
    let mut explanation = String::from("This pipeline consists of the following steps:\n\n");
    for (i, component) in components.iter().enumerate() {
        let _ = write!(
            explanation,
            "{}. {}: {}\n   Agent {} ({}) says: {}\n\n",
            i + 1,
            component.name,
            component.description,
            component.agent.name,
            component.agent.role,
            component.agent.quote,
        );
    }
    explanation
}

/// "ML Pipeline for " plus the prompt, cut to `max_chars` characters
pub fn pipeline_name(prompt: &str, max_chars: usize) -> String {
    let prompt = prompt.trim();
    match prompt.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("ML Pipeline for {}...", &prompt[..cut]),
        None => format!("ML Pipeline for {}", prompt),
    }
}
