//! Output formatter trait

use gnsearch_application::SearchOutput;
use gnsearch_domain::{FinalAnswer, OutputFormat, SchemaVocabulary};

/// Trait for formatting command results
pub trait OutputFormatter {
    /// Format a supervised answer
    fn format_answer(&self, answer: &FinalAnswer) -> String;

    /// Format a single-shot search answer
    fn format_search(&self, output: &SearchOutput) -> String;

    /// Format the extracted schema vocabulary
    fn format_schema(&self, vocabulary: &SchemaVocabulary) -> String;

    /// Serialize any result as pretty JSON
    fn format_json<T: serde::Serialize>(&self, value: &T) -> String
    where
        Self: Sized,
    {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Dispatch on the selected format
    fn render_answer(&self, answer: &FinalAnswer, format: OutputFormat) -> String
    where
        Self: Sized,
    {
        match format {
            OutputFormat::Text => self.format_answer(answer),
            OutputFormat::Json => self.format_json(answer),
        }
    }

    fn render_search(&self, output: &SearchOutput, format: OutputFormat) -> String
    where
        Self: Sized,
    {
        match format {
            OutputFormat::Text => self.format_search(output),
            OutputFormat::Json => self.format_json(output),
        }
    }

    fn render_schema(&self, vocabulary: &SchemaVocabulary, format: OutputFormat) -> String
    where
        Self: Sized,
    {
        match format {
            OutputFormat::Text => self.format_schema(vocabulary),
            OutputFormat::Json => self.format_json(vocabulary),
        }
    }
}
