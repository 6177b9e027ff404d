//! CLI command definitions

use crate::core::GenerationMode;
use clap::Args;

/// Generate a pipeline
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// What the pipeline should do
    #[arg(short, long)]
    pub prompt: String,

    /// Generation mode (quick or agentic)
    #[arg(short, long, default_value_t = GenerationMode::Quick)]
    pub mode: GenerationMode,

    /// Clarification answers (id=value)
    #[arg(long, value_parser = parse_key_value)]
    pub answer: Vec<(String, String)>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Generate clarification questions
#[derive(Debug, Args, Clone)]
pub struct ClarifyCommand {
    #[arg(short, long)]
    pub prompt: String,

    /// Problem domain, e.g. "email" or "finance"
    #[arg(short, long)]
    pub domain: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Restructure a component set
#[derive(Debug, Args, Clone)]
pub struct RestructureCommand {
    /// Ids already in the pipeline
    #[arg(long, value_delimiter = ',')]
    pub current: Vec<String>,

    /// Ids being added
    #[arg(long, value_delimiter = ',')]
    pub new: Vec<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// List catalog components
#[derive(Debug, Args, Clone)]
pub struct ComponentsCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Parse key=value pairs
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("Invalid key=value pair: {}", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("latency=under 50ms").unwrap(),
            ("latency".to_string(), "under 50ms".to_string())
        );
        assert_eq!(parse_key_value("a=b=c").unwrap().1, "b=c");
        assert!(parse_key_value("no-separator").is_err());
        assert!(parse_key_value("=value").is_err());
    }
}
