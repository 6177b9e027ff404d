//! Clarification generator - questions to ask before generating

use crate::core::config::GenerationSettings;
use crate::core::ClarificationResponse;
use crate::execution::error::GenerationError;
use crate::execution::prompt::{strip_code_fences, truncate_for_log, MAX_LOG_CHARS};
use crate::oracle::{CompletionRequest, LanguageOracle};
use tracing::{debug, info};

const CLARIFIER_SYSTEM_PROMPT: &str = "You are an ML pipeline assistant. Your task is to \
generate clarification questions that will help refine the pipeline for the user's needs. \
The questions should:
1. Be specific to the domain and use case
2. Help determine technical requirements
3. Clarify data characteristics
4. Identify performance priorities

Output a JSON object with:
{
    \"questions\": [
        {
            \"id\": \"unique_id\",
            \"question\": \"The question text\",
            \"type\": \"select|text|number\",
            \"options\": [\"option1\", \"option2\"],
            \"placeholder\": \"Example input\"
        }
    ],
    \"context\": \"A brief explanation of why these questions are important\"
}

Include \"options\" for select questions only and \"placeholder\" for text and number \
questions only. Limit to 2-3 most important questions. Make them conversational and \
user-friendly.";

/// Parse the oracle's clarification object
pub fn parse_clarification(output: &str) -> Result<ClarificationResponse, GenerationError> {
    serde_json::from_str(strip_code_fences(output))
        .map_err(|e| GenerationError::ClarificationParse(e.to_string()))
}

/// Ask the oracle for clarification questions about `prompt` in `domain`
pub async fn generate_clarification<L>(
    oracle: &L,
    prompt: &str,
    domain: &str,
    settings: &GenerationSettings,
) -> Result<ClarificationResponse, GenerationError>
where
    L: LanguageOracle + ?Sized,
{
    let user = format!(
        "Domain: {}\nUser Request: {}\n\nGenerate clarification questions that will help create a better ML pipeline.",
        domain, prompt
    );
    let request = CompletionRequest::new(CLARIFIER_SYSTEM_PROMPT, user)
        .with_temperature(settings.clarification_temperature)
        .with_max_tokens(settings.clarification_max_tokens);

    let output = oracle.complete(request).await?;
    debug!(output = %truncate_for_log(&output, MAX_LOG_CHARS), "clarification raw output");

    let response = parse_clarification(&output)?;
    info!(questions = response.questions.len(), "clarification questions generated");
    Ok(response)
}
