//! Console output formatter

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use gnsearch_application::SearchOutput;
use gnsearch_domain::{AnswerStatus, FinalAnswer, SchemaVocabulary};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a supervised answer
    pub fn format_answer(answer: &FinalAnswer) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("GeneNetwork Answer"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Question:".cyan().bold(), answer.query));
        output.push_str(&format!(
            "{} {}\n",
            "Status:".cyan().bold(),
            Self::status(answer.status)
        ));

        if !answer.plan.is_empty() {
            output.push_str(&Self::section_header("Plan"));
            output.push_str(&Self::indent(&answer.plan.render(), "  "));
            output.push('\n');
        }

        output.push_str(&Self::section_header("Answer"));
        output.push_str(&answer.answer);
        output.push('\n');

        if !answer.findings_used.is_empty() {
            output.push_str(&Self::section_header("Findings used"));
            for finding in &answer.findings_used {
                output.push_str(&format!("  * {}\n", finding.step.bold()));
            }
        }

        if !answer.trace_summary.is_empty() {
            output.push_str(&Self::section_header("Tool calls"));
            for line in &answer.trace_summary {
                output.push_str(&format!("  {}\n", line.dimmed()));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format a single-shot search answer
    pub fn format_search(result: &SearchOutput) -> String {
        let mut output = String::new();

        output.push_str(&format!("{} {}\n", "Q:".bold(), result.query));
        output.push_str(&format!(
            "{} {} ({})\n",
            "Searched as:".dimmed(),
            result.search_text,
            result.kind
        ));

        if !result.answer.detailed_answers.is_empty() {
            output.push_str(&Self::section_header("Details"));
            for info in &result.answer.detailed_answers {
                output.push_str(&format!("  * {}\n", info.answer));
                for link in &info.links {
                    output.push_str(&format!("      {}\n", link.blue().underline()));
                }
            }
        }

        output.push_str(&Self::section_header("Answer"));
        output.push_str(&result.answer.final_answer);
        output.push('\n');

        if !result.documents.is_empty() {
            output.push_str(&format!(
                "\n{} {}\n",
                "Sources:".dimmed(),
                result
                    .documents
                    .iter()
                    .map(|d| d.document_id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        output
    }

    /// Format the extracted schema vocabulary
    pub fn format_schema(vocabulary: &SchemaVocabulary) -> String {
        let mut output = String::new();

        output.push_str(&Self::section_header(&format!(
            "Prefixes ({})",
            vocabulary.prefixes().len()
        )));
        for prefix in vocabulary.prefixes() {
            output.push_str(&format!("  {}\n", prefix));
        }

        output.push_str(&Self::section_header(&format!(
            "Predicates ({})",
            vocabulary.predicates().len()
        )));
        for predicate in vocabulary.predicates() {
            output.push_str(&format!("  {}\n", predicate));
        }

        output
    }

    fn status(status: AnswerStatus) -> String {
        match status {
            AnswerStatus::Complete => status.as_str().green().to_string(),
            AnswerStatus::Degraded => status.as_str().yellow().to_string(),
            AnswerStatus::StepCapReached => status.as_str().yellow().bold().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_answer(&self, answer: &FinalAnswer) -> String {
        Self::format_answer(answer)
    }

    fn format_search(&self, output: &SearchOutput) -> String {
        Self::format_search(output)
    }

    fn format_schema(&self, vocabulary: &SchemaVocabulary) -> String {
        Self::format_schema(vocabulary)
    }
}
