use crate::analysis::types::{
    AnalysisConfig, CompletionOptions, CompletionRequest, PromptMessage, PromptRole,
};

pub const SYSTEM_INSTRUCTION: &str = concat!(
    "Ты инженер БТИ. Возвращай строго JSON без лишнего текста в формате ",
    r#"{"is_valid":bool,"decision":string,"justification":string,"#,
    r#""technical_basis":[string],"limitations_risks":[string],"clarification_needed":[string]}. "#,
    "Если нет явных нарушений нормативов и несущих конструкций, ",
    r#"decision="можно", is_valid=true. "#,
    "При недостаточности данных или возможных ограничениях ставь ",
    r#"decision="можно при условиях", is_valid=true. "#,
    r#"Значение decision="нельзя" и is_valid=false ставь только при очевидном запрете."#,
);

/// Prefix of `question` holding at most `max_chars` characters.
pub fn truncate_question(question: &str, max_chars: usize) -> &str {
    match question.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &question[..byte_index],
        None => question,
    }
}

pub fn build_request(config: &AnalysisConfig, question: &str) -> CompletionRequest {
    CompletionRequest {
        model_uri: config.model_uri.clone(),
        completion_options: CompletionOptions {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        },
        messages: vec![
            PromptMessage {
                role: PromptRole::System,
                text: SYSTEM_INSTRUCTION.to_string(),
            },
            PromptMessage {
                role: PromptRole::User,
                text: truncate_question(question, config.max_question_chars).to_string(),
            },
        ],
    }
}
