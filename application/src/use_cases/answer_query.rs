//! The `answer` boundary: validate, then run one supervisor for the query.
//!
//! Validation happens before any supervisor exists, so a rejected query
//! never reaches an agent, an index or a tool.

use crate::config::SearchConfig;
use crate::ports::agent_progress::AgentProgressNotifier;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::retriever::Retriever;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::agents::Agents;
use crate::use_cases::supervisor::{Supervisor, SupervisorError};
use gnsearch_domain::{DomainError, FinalAnswer, Query};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Error, Debug)]
pub enum AnswerError {
    #[error("Invalid query: {0}")]
    Validation(#[from] DomainError),

    #[error("Operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Supervisor(SupervisorError),
}

impl From<SupervisorError> for AnswerError {
    fn from(e: SupervisorError) -> Self {
        match e {
            SupervisorError::Cancelled => AnswerError::Cancelled,
            other => AnswerError::Supervisor(other),
        }
    }
}

impl AnswerError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AnswerError::Validation(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AnswerError::Cancelled)
    }
}

/// Use case for answering a question with the supervised agents
pub struct AnswerQueryUseCase {
    gateway: Arc<dyn LlmGateway>,
    lexical: Arc<dyn Retriever>,
    semantic: Arc<dyn Retriever>,
    tools: Arc<dyn ToolExecutorPort>,
    config: Arc<SearchConfig>,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl AnswerQueryUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        lexical: Arc<dyn Retriever>,
        semantic: Arc<dyn Retriever>,
        tools: Arc<dyn ToolExecutorPort>,
        config: Arc<SearchConfig>,
    ) -> Self {
        Self {
            gateway,
            lexical,
            semantic,
            tools,
            config,
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub async fn answer(
        &self,
        query: &str,
        progress: &dyn AgentProgressNotifier,
    ) -> Result<FinalAnswer, AnswerError> {
        let query = Query::parse(query, self.config.max_query_length)?;
        info!(length = query.content().chars().count(), "Query accepted");
        self.conversation_logger.log(ConversationEvent::new(
            "query",
            serde_json::json!({ "text": query.content() }),
        ));

        let agents = Agents::new(
            self.gateway.clone(),
            self.lexical.clone(),
            self.semantic.clone(),
            self.tools.clone(),
            self.config.clone(),
        );
        let supervisor = Supervisor::new(agents, self.gateway.clone(), self.config.clone())
            .with_conversation_logger(self.conversation_logger.clone());

        Ok(supervisor
            .run(&query, progress, &self.cancellation_token)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::agent_progress::NoAgentProgress;
    use crate::testing::{MockRetriever, MockTools, ScriptedGateway};
    use gnsearch_domain::AnswerStatus;
    use gnsearch_domain::RetrievalSource::{Lexical, Semantic};
    use std::sync::Mutex;

    fn use_case(gateway: ScriptedGateway, max_query_length: usize) -> (Arc<ScriptedGateway>, Arc<MockRetriever>, AnswerQueryUseCase) {
        let gateway = Arc::new(gateway);
        let lexical = Arc::new(MockRetriever::new(Lexical, &[("Document 1", 1.0, "text")]));
        let config = SearchConfig::default().with_max_query_length(max_query_length);
        let use_case = AnswerQueryUseCase::new(
            gateway.clone(),
            lexical.clone(),
            Arc::new(MockRetriever::empty(Semantic)),
            Arc::new(MockTools::new()),
            Arc::new(config),
        );
        (gateway, lexical, use_case)
    }

    #[derive(Default)]
    struct EventLog(Mutex<Vec<&'static str>>);

    impl ConversationLogger for EventLog {
        fn log(&self, event: ConversationEvent) {
            self.0.lock().unwrap().push(event.event_type);
        }
    }

    #[tokio::test]
    async fn test_too_long_query_never_reaches_supervisor() {
        let (gateway, lexical, use_case) = use_case(ScriptedGateway::new(), 10);

        let err = use_case
            .answer("this query is far too long", &NoAgentProgress)
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(matches!(
            err,
            AnswerError::Validation(DomainError::QueryTooLong { length: 26, max: 10 })
        ));
        assert!(gateway.purposes().is_empty());
        assert!(lexical.queries().is_empty());
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let (_, _, use_case) = use_case(ScriptedGateway::new(), 100);
        let err = use_case.answer("   ", &NoAgentProgress).await.unwrap_err();
        assert!(matches!(err, AnswerError::Validation(DomainError::EmptyQuery)));
    }

    #[tokio::test]
    async fn test_answers_and_logs() {
        let gateway = ScriptedGateway::new()
            .respond("planner", "[\"find trait X\"]")
            .always("rephrase", "trait X")
            .always("classify_search", "semantic")
            .always("analyze", "Trait X is a body weight trait.")
            .always("expert_step", r#"{"answer": "confirmed"}"#)
            .always("critic", "none")
            .always("route", "end")
            .always("judge_satisfaction", "yes")
            .always("summarize", "- summary")
            .always("finalize", "Trait X measures body weight.");
        let (_, _, use_case) = use_case(gateway, 100);
        let log = Arc::new(EventLog::default());
        let use_case = use_case.with_conversation_logger(log.clone());

        let answer = use_case.answer("  What is trait X?  ", &NoAgentProgress).await.unwrap();

        assert_eq!(answer.query, "What is trait X?");
        assert_eq!(answer.answer, "Trait X measures body weight.");
        assert_eq!(answer.status, AnswerStatus::Complete);
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["status"], "complete");

        let events = log.0.lock().unwrap().clone();
        assert_eq!(events.first(), Some(&"query"));
        assert_eq!(events.last(), Some(&"final_answer"));
        assert!(events.contains(&"state_transition"));
        assert!(events.contains(&"agent_message"));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let (_, _, use_case) = use_case(ScriptedGateway::new(), 100);
        let token = CancellationToken::new();
        token.cancel();
        let use_case = use_case.with_cancellation(token);

        let err = use_case.answer("q", &NoAgentProgress).await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
