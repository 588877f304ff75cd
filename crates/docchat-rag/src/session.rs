//! Session controller: one document, one chat history
//!
//! A session starts `Empty` and moves to `DocumentLoaded` once a document
//! is extracted successfully. Loading another document replaces the first;
//! a failed load leaves the session as it was.
//!
//! Questions asked with no document get guidance instead of an answer and
//! never reach the generator. With a document loaded, the user message is
//! recorded, the pipeline runs, and the assistant reply is recorded only if
//! the pipeline succeeded.

use crate::config::RagConfig;
use crate::error::RagError;
use crate::pipeline::{Answer, QueryPipeline};
use docchat_domain::{ChatHistory, ChatMessage, Document, Embedder, LlmProvider};
use docchat_extractor::{TextExtractor, Upload};
use tracing::{info, warn};

/// Shown when a question arrives before any document
pub const NO_DOCUMENT_MESSAGE: &str = "No document loaded. Please load a document first.";

/// Assistant greeting used when [`RagConfig::greeting`] is set
pub const GREETING: &str = "Hello! Load a PDF or text document, and I'll answer questions based on it.";

/// Whether a document is available for questions
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No document yet
    Empty,
    /// Questions are answered from this document
    DocumentLoaded(Document),
}

impl SessionState {
    /// The loaded document, if any
    pub fn document(&self) -> Option<&Document> {
        match self {
            SessionState::Empty => None,
            SessionState::DocumentLoaded(document) => Some(document),
        }
    }
}

/// What happened to a question
#[derive(Debug)]
pub enum QueryOutcome {
    /// The generator answered
    Answered(Answer),
    /// No document is loaded; carries guidance for the user
    NoDocument(String),
    /// A stage failed; nothing was added to history for the assistant
    Failed(RagError),
}

impl QueryOutcome {
    /// Text to show the user for this outcome
    pub fn message(&self) -> String {
        match self {
            QueryOutcome::Answered(answer) => answer.text.clone(),
            QueryOutcome::NoDocument(guidance) => guidance.clone(),
            QueryOutcome::Failed(err) => err.user_message(),
        }
    }

    /// Whether the question was answered
    pub fn is_answered(&self) -> bool {
        matches!(self, QueryOutcome::Answered(_))
    }
}

/// A chat over one document with injected model services
pub struct Session<E, L> {
    embedder: E,
    generator: L,
    extractor: TextExtractor,
    pipeline: QueryPipeline,
    state: SessionState,
    history: ChatHistory,
}

impl<E, L> Session<E, L>
where
    E: Embedder,
    L: LlmProvider,
{
    /// Create a session with the default extractor
    pub fn new(embedder: E, generator: L, config: &RagConfig) -> Result<Self, RagError> {
        Self::with_extractor(embedder, generator, TextExtractor::default(), config)
    }

    /// Create a session with a custom extractor
    pub fn with_extractor(
        embedder: E,
        generator: L,
        extractor: TextExtractor,
        config: &RagConfig,
    ) -> Result<Self, RagError> {
        let pipeline = QueryPipeline::new(config)?;

        let mut history = ChatHistory::new();
        if config.greeting {
            history.push(ChatMessage::assistant(GREETING));
        }

        Ok(Self {
            embedder,
            generator,
            extractor,
            pipeline,
            state: SessionState::Empty,
            history,
        })
    }

    /// Extract an upload and make it the current document
    ///
    /// On failure the previous document (or empty state) is kept.
    pub async fn load_document(&mut self, upload: Upload) -> Result<(), RagError> {
        let name = upload.name().to_string();
        let document = match self.extractor.extract_async(upload).await {
            Ok(document) => document,
            Err(e) => {
                warn!("Failed to load '{}': {}", name, e);
                return Err(e.into());
            }
        };

        self.set_document(document);
        Ok(())
    }

    /// Make an already extracted document current
    pub fn set_document(&mut self, document: Document) {
        info!(
            "Loaded '{}' ({} characters{})",
            document.name(),
            document.char_count(),
            document
                .page_count()
                .map(|pages| format!(", {} pages", pages))
                .unwrap_or_default()
        );
        self.state = SessionState::DocumentLoaded(document);
    }

    /// Answer a question from the current document
    pub async fn ask(&mut self, question: &str) -> QueryOutcome {
        let document = match &self.state {
            SessionState::Empty => {
                return QueryOutcome::NoDocument(NO_DOCUMENT_MESSAGE.to_string());
            }
            SessionState::DocumentLoaded(document) => document,
        };

        self.history.push(ChatMessage::user(question));

        match self
            .pipeline
            .run(document, question, &self.embedder, &self.generator)
            .await
        {
            Ok(answer) => {
                self.history.push(ChatMessage::assistant(answer.text.clone()));
                QueryOutcome::Answered(answer)
            }
            Err(e) => {
                warn!("Query failed at {:?}: {}", e.stage(), e);
                QueryOutcome::Failed(e)
            }
        }
    }

    /// Current state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The loaded document, if any
    pub fn document(&self) -> Option<&Document> {
        self.state.document()
    }

    /// Chat history, oldest first
    pub fn history(&self) -> &[ChatMessage] {
        self.history.messages()
    }

    /// The injected generator
    pub fn generator(&self) -> &L {
        &self.generator
    }

    /// The injected embedder
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// The extractor documents are loaded with
    pub fn extractor(&self) -> &TextExtractor {
        &self.extractor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_domain::Role;
    use docchat_index::HashEmbedder;
    use docchat_llm::MockProvider;

    fn session(generator: MockProvider) -> Session<HashEmbedder, MockProvider> {
        Session::new(HashEmbedder::default(), generator, &RagConfig::default()).unwrap()
    }

    #[test]
    fn test_starts_empty_without_greeting() {
        let session = session(MockProvider::default());
        assert_eq!(session.state(), &SessionState::Empty);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_greeting_seeds_history() {
        let config = RagConfig {
            greeting: true,
            ..RagConfig::default()
        };
        let session = Session::new(HashEmbedder::default(), MockProvider::default(), &config).unwrap();

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].role, Role::Assistant);
        assert_eq!(session.history()[0].content, GREETING);
    }

    #[tokio::test]
    async fn test_answer_appends_both_messages() {
        let mut session = session(MockProvider::new("It is a model."));
        session.set_document(Document::new("a.txt", "SAM is a model.", None));

        let outcome = session.ask("What is SAM?").await;

        assert!(outcome.is_answered());
        assert_eq!(outcome.message(), "It is a model.");
        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], ChatMessage::user("What is SAM?"));
        assert_eq!(history[1], ChatMessage::assistant("It is a model."));
    }

    #[tokio::test]
    async fn test_new_document_replaces_old() {
        let mut session = session(MockProvider::default());
        session.set_document(Document::new("first.txt", "first", None));
        session.set_document(Document::new("second.txt", "second", None));

        assert_eq!(session.document().map(|d| d.name()), Some("second.txt"));
    }
}
