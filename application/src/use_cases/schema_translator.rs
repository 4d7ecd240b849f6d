//! Natural-language request → SPARQL, constrained by the RDF vocabulary
//! extracted from the schema files.

use crate::config::SearchConfig;
use crate::ports::agent_progress::NoAgentProgress;
use crate::ports::llm_gateway::{CompletionError, LlmGateway};
use crate::ports::schema_source::{SchemaSource, SchemaSourceError};
use crate::use_cases::shared::{CallError, complete_with_retry};
use gnsearch_domain::{PromptTemplate, SchemaError, SchemaVocabulary, extract_structured_query};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    #[error("Translation call failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("Unusable translation: {0}")]
    Unusable(#[from] SchemaError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl From<CallError> for TranslationError {
    fn from(e: CallError) -> Self {
        match e {
            CallError::Completion(e) => TranslationError::Completion(e),
            CallError::Cancelled => TranslationError::Cancelled,
        }
    }
}

pub struct SchemaTranslator {
    gateway: Arc<dyn LlmGateway>,
    vocabulary: SchemaVocabulary,
    config: Arc<SearchConfig>,
}

impl SchemaTranslator {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        vocabulary: SchemaVocabulary,
        config: Arc<SearchConfig>,
    ) -> Self {
        Self {
            gateway,
            vocabulary,
            config,
        }
    }

    /// Read every schema file and extract its prefixes and predicates.
    pub fn extract_schema(source: &dyn SchemaSource) -> Result<SchemaVocabulary, SchemaSourceError> {
        let files = source.load()?;
        let vocabulary = SchemaVocabulary::extract(files.iter().map(String::as_str));
        info!(
            source = %source.describe(),
            prefixes = vocabulary.prefixes().len(),
            predicates = vocabulary.predicates().len(),
            "Schema vocabulary extracted"
        );
        Ok(vocabulary)
    }

    pub fn vocabulary(&self) -> &SchemaVocabulary {
        &self.vocabulary
    }

    /// Translate against the vocabulary this translator was built with.
    pub async fn translate(
        &self,
        request: &str,
        token: &Option<CancellationToken>,
    ) -> Result<String, TranslationError> {
        self.translate_with(request, &self.vocabulary, token).await
    }

    pub async fn translate_with(
        &self,
        request: &str,
        vocabulary: &SchemaVocabulary,
        token: &Option<CancellationToken>,
    ) -> Result<String, TranslationError> {
        let prompt = PromptTemplate::translate_query(request, vocabulary);
        let response = complete_with_retry(
            self.gateway.as_ref(),
            &prompt,
            &self.config.execution,
            &NoAgentProgress,
            token,
        )
        .await?;

        let query = extract_structured_query(&response, vocabulary)?;
        debug!(query = %query, "Translated request");
        Ok(query)
    }
}
