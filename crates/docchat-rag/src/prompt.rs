//! Grounded prompt construction

/// Placeholder replaced by the joined chunk texts
pub const CONTEXT_SLOT: &str = "{context}";

/// Placeholder replaced by the user's question
pub const QUESTION_SLOT: &str = "{question}";

/// Instruction template used unless another is configured
pub const DEFAULT_TEMPLATE: &str = "You are a helpful assistant.
Answer the question based ONLY on the provided context below.
If the context is insufficient, just say you don't know. Do not make up answers.

Context:
{context}

Question:
{question}";

/// Separator placed between retrieved chunks
const CHUNK_SEPARATOR: &str = "\n\n";

/// Builds the prompt sent to the answer generator
#[derive(Debug, Clone, PartialEq)]
pub struct PromptComposer {
    template: String,
}

impl PromptComposer {
    /// Composer with [`DEFAULT_TEMPLATE`]
    pub fn new() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }

    /// Composer with a custom template
    ///
    /// The template must contain both `{context}` and `{question}`.
    pub fn with_template(template: impl Into<String>) -> Result<Self, String> {
        let template = template.into();
        for slot in [CONTEXT_SLOT, QUESTION_SLOT] {
            if !template.contains(slot) {
                return Err(format!("prompt template is missing {}", slot));
            }
        }
        Ok(Self { template })
    }

    /// Template in use
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Fill the template with the chunk texts, in rank order, and the question
    ///
    /// An empty `contexts` slice still yields a valid prompt; the instruction
    /// tells the model to say it does not know.
    pub fn compose<S: AsRef<str>>(&self, contexts: &[S], question: &str) -> String {
        let context = contexts
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(CHUNK_SEPARATOR);

        render(&self.template, &context, question)
    }
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new()
    }
}

/// Single pass over the template, so placeholder-like text inside the
/// context or question is never substituted again
fn render(template: &str, context: &str, question: &str) -> String {
    let mut out = String::with_capacity(template.len() + context.len() + question.len());
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix(CONTEXT_SLOT) {
            out.push_str(context);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(QUESTION_SLOT) {
            out.push_str(question);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt_layout() {
        let prompt = PromptComposer::new().compose(&["Chunk one.", "Chunk two."], "What?");

        assert!(prompt.starts_with("You are a helpful assistant.\n"));
        assert!(prompt.contains("Answer the question based ONLY on the provided context below."));
        assert!(prompt.contains("just say you don't know"));
        assert!(prompt.contains("Context:\nChunk one.\n\nChunk two.\n\nQuestion:\nWhat?"));
        assert!(prompt.ends_with("What?"));
    }

    #[test]
    fn test_empty_context_is_still_valid() {
        let contexts: [&str; 0] = [];
        let prompt = PromptComposer::new().compose(&contexts, "Anything?");
        assert!(prompt.contains("Context:\n\n\nQuestion:\nAnything?"));
    }

    #[test]
    fn test_placeholders_in_input_not_expanded() {
        let composer = PromptComposer::with_template("C={context} Q={question}").unwrap();
        let prompt = composer.compose(&["see {question}"], "why {context}?");
        assert_eq!(prompt, "C=see {question} Q=why {context}?");
    }

    #[test]
    fn test_template_must_have_both_slots() {
        assert!(PromptComposer::with_template("only {question}").is_err());
        assert!(PromptComposer::with_template("only {context}").is_err());
    }

    #[test]
    fn test_literal_braces_kept() {
        let composer = PromptComposer::with_template("{json} {context} | {question}").unwrap();
        assert_eq!(composer.compose(&["a"], "b"), "{json} a | b");
    }
}
