//! Medical assistant system prompt and context stuffing.

use medibot_types::rag::{Document, Message};

/// Placeholder replaced by the retrieved passages.
pub const CONTEXT_SLOT: &str = "{context}";

/// System prompt for the medical information assistant.
pub const SYSTEM_PROMPT: &str = "\
You are a helpful Medical Information Assistant designed to provide accurate medical information based on reliable sources. \
Your role is to help users understand medical concepts, conditions, and terminology.

IMPORTANT GUIDELINES:
1. Use ONLY the retrieved context below to answer questions
2. If the context doesn't contain the answer, clearly state: 'I don't have enough information in my knowledge base to answer that question. Please consult a healthcare professional.'
3. Keep responses concise (3-5 sentences maximum)
4. Use clear, accessible language while maintaining medical accuracy
5. When appropriate, cite the source document in your response
6. If the question asks for diagnosis or treatment advice, remind the user to consult a healthcare professional
7. Express uncertainty when the information is not definitive

MEDICAL DISCLAIMER: Always remember that this information is educational only and not a substitute for professional medical advice.

Retrieved Context:
{context}

Based on the context above, provide a helpful, accurate response to the user's question.";

/// Join passages with blank lines, in retrieval order.
pub fn stuff_documents(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|d| d.page_content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the system + user message pair for one question.
pub fn build_messages(question: &str, documents: &[Document]) -> Vec<Message> {
    let system = SYSTEM_PROMPT.replace(CONTEXT_SLOT, &stuff_documents(documents));
    vec![Message::system(system), Message::user(question)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use medibot_types::rag::MessageRole;
    use serde_json::Map;

    fn doc(text: &str) -> Document {
        Document {
            page_content: text.to_string(),
            metadata: Map::new(),
        }
    }

    #[test]
    fn test_prompt_has_single_context_slot() {
        assert_eq!(SYSTEM_PROMPT.matches(CONTEXT_SLOT).count(), 1);
        assert!(SYSTEM_PROMPT.starts_with("You are a helpful Medical Information Assistant"));
        assert!(SYSTEM_PROMPT.contains("MEDICAL DISCLAIMER"));
    }

    #[test]
    fn test_stuff_documents_joins_with_blank_line() {
        let docs = vec![doc("first"), doc("second")];
        assert_eq!(stuff_documents(&docs), "first\n\nsecond");
        assert_eq!(stuff_documents(&[]), "");
    }

    #[test]
    fn test_build_messages() {
        let messages = build_messages("What is acne?", &[doc("Acne is a skin condition.")]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert!(
            messages[0]
                .content
                .contains("Retrieved Context:\nAcne is a skin condition.\n\nBased on")
        );
        assert!(!messages[0].content.contains(CONTEXT_SLOT));
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[1].content, "What is acne?");
    }
}
