//! Prompt construction for the generation model.

use super::context::RetrievalContext;
use crate::llm::types::ChatMessage;

/// Builds the exact message sequence sent to the generation model.
///
/// The order is fixed: the rendered context block first (only when any note
/// was retrieved), the instruction prompt second, the user's question last.
pub fn build_prompt(
    system_prompt: &str,
    context: &RetrievalContext,
    question: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(3);

    if !context.is_empty() {
        messages.push(ChatMessage::system(context.render()));
    }
    messages.push(ChatMessage::system(system_prompt));
    messages.push(ChatMessage::user(question));

    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context_yields_system_then_user() {
        let messages = build_prompt("Be helpful.", &RetrievalContext::default(), "What is 2+2?");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "Be helpful.");
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "What is 2+2?");
    }

    #[test]
    fn retrieved_context_is_prepended_before_the_instruction() {
        let context = RetrievalContext::new(vec!["Paris is the capital of France.".to_string()]);
        let messages = build_prompt("Be helpful.", &context, "What is the capital of France?");

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0]
            .content
            .contains("- Paris is the capital of France."));
        assert_eq!(messages[1].role, "system");
        assert_eq!(messages[1].content, "Be helpful.");
        assert_eq!(messages[2].role, "user");
        assert_eq!(messages[2].content, "What is the capital of France?");
    }
}
