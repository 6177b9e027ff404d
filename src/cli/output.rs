//! CLI output formatting

use crate::{
    core::{ClarificationResponse, Component, PipelineResult, SearchStep, StepKind},
    execution::{GenerationEvent, RestructureOutcome},
};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write;
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");
pub static SEARCH: Emoji<'_, '_> = Emoji("🔎 ", "? ");

/// Create a spinner shown while the oracles work
pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// A horizontal rule spanning the terminal width
pub fn separator() -> String {
    let width = term_size::dimensions_stdout().map(|(w, _)| w).unwrap_or(80);
    "─".repeat(width)
}

/// Format a search step for display
pub fn format_step(step: &SearchStep) -> String {
    let icon = if step.is_complete() { CHECK } else { SPINNER };
    let label = match step.kind {
        StepKind::Web | StepKind::Search => style(&step.query).cyan(),
        StepKind::Think => style(&step.query).magenta(),
        StepKind::Generate => style(&step.query).bold(),
    };
    format!("{}{}", icon, label)
}

/// Format a generation event for streaming display
pub fn format_generation_event(event: &GenerationEvent) -> Option<String> {
    match event {
        GenerationEvent::RunStarted { run_id, mode } => Some(format!(
            "{}Generating pipeline in {} mode ({})",
            ROCKET,
            style(mode).bold(),
            style(&run_id.to_string()[..8]).dim()
        )),
        GenerationEvent::StageEntered { stage, .. } => {
            Some(format!("{}{}", INFO, style(stage).dim()))
        }
        GenerationEvent::StepsUpdated { steps, .. } => {
            let mut rendered = format!("{}Research steps", SEARCH);
            for step in steps {
                let _ = write!(rendered, "\n   {}", format_step(step));
            }
            Some(rendered)
        }
        GenerationEvent::ComponentsSelected { selections, .. } => {
            let mut rendered = format!("{}Selected {} components", INFO, selections.len());
            for (id, reason) in selections {
                let _ = write!(rendered, "\n   {}: {}", style(id).cyan(), reason);
            }
            Some(rendered)
        }
        GenerationEvent::RunFinished { .. } => None,
        GenerationEvent::RunFailed { error, .. } => {
            Some(format!("{}{}", CROSS, style(error).red()))
        }
    }
}

/// Format one catalog component as a listing line
pub fn format_component(component: &Component) -> String {
    format!(
        "{} {} {}\n    {}",
        style(&component.id).cyan(),
        style(format!("[{}]", component.component_type)).dim(),
        style(&component.name).bold(),
        component.description
    )
}

/// Format a generated pipeline for display
pub fn format_pipeline(result: &PipelineResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}{}", CHECK, style(&result.name).bold().green());
    let _ = writeln!(out, "{}", separator());

    for (i, id) in result.component_ids().iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, style(id).cyan());
    }

    if let Some(steps) = &result.search_steps {
        let _ = writeln!(out, "\n{}Research steps", SEARCH);
        for step in steps {
            let _ = writeln!(out, "   {}", format_step(step));
        }
    }

    let _ = writeln!(out, "\n{}", result.description.trim_end());
    if !result.code_preview.is_empty() {
        let _ = writeln!(out, "{}", separator());
        let _ = writeln!(out, "{}", style(&result.code_preview).dim());
    }
    out
}

/// Format clarification questions for display
pub fn format_clarification(response: &ClarificationResponse) -> String {
    let mut out = format!("{}{}\n", INFO, style(&response.context).dim());
    for question in &response.questions {
        let _ = write!(out, "\n{} {}", style(&question.id).cyan(), question.question);
        if let Some(options) = &question.options {
            let _ = write!(out, "\n    options: {}", options.join(" | "));
        }
        if let Some(placeholder) = &question.placeholder {
            let _ = write!(out, "\n    e.g. {}", style(placeholder).dim());
        }
        out.push('\n');
    }
    out
}

/// Format a restructuring outcome for display
pub fn format_restructure(outcome: &RestructureOutcome) -> String {
    let icon = match (outcome.valid, outcome.needs_restructuring) {
        (false, _) => CROSS,
        (true, true) => WARN,
        (true, false) => CHECK,
    };
    let mut out = format!("{}{}\n", icon, style(&outcome.message).bold());

    if let Some(order) = outcome.suggested_order() {
        let _ = writeln!(out, "\nSuggested order:");
        for (i, component) in order.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {} {}",
                i + 1,
                style(&component.id).cyan(),
                style(format!("[{}]", component.component_type)).dim()
            );
        }
    }

    if !outcome.notes.is_empty() {
        let _ = writeln!(out, "\nNotes:");
        for note in &outcome.notes {
            let _ = writeln!(out, "  - {}", note);
        }
    }
    out
}
