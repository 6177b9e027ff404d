//! Clarification questions asked before generating a pipeline

use serde::{Deserialize, Serialize};

/// Input widget a question expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Select,
    Text,
    Number,
}

/// A single oracle-generated question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarificationQuestion {
    pub id: String,
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Choices for `select` questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Example input for `text` and `number` questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// Questions plus the oracle's reason for asking them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarificationResponse {
    pub questions: Vec<ClarificationQuestion>,
    pub context: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clarification() {
        let json = r#"{
            "questions": [
                {"id": "data_size", "question": "How many emails?", "type": "number", "placeholder": "10000"},
                {"id": "language", "question": "Which language?", "type": "select", "options": ["en", "de"]}
            ],
            "context": "Volume and language drive model choice."
        }"#;
        let response: ClarificationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.questions.len(), 2);
        assert_eq!(response.questions[0].kind, QuestionKind::Number);
        assert_eq!(response.questions[1].options.as_ref().unwrap().len(), 2);
    }
}
