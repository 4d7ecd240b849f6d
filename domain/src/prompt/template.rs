//! Prompt templates for every completion call site

use super::request::{CompletionRequest, ResponseFormat};
use crate::agent::{ConversationHistory, Finding, Plan};
use crate::schema::{NAMESPACES, SchemaVocabulary};
use crate::tool::ToolSpec;

const CLASSIFY_SYSTEM: &str = r#"You are an experienced search classifier.
Decide whether a keyword search or a semantic search will best answer the query.
A keyword search fits when the query names specific entities (a trait id, a marker code, a gene symbol).
A semantic search fits when the system must understand the meaning of the query and make implicit connections.
Answer with exactly one word: keyword or semantic."#;

const KEYWORDS_SYSTEM: &str = r#"You extract keywords from search queries about specific GeneNetwork entities (traits, markers, genes, datasets).
Return the keywords featured in the query as a single space-separated list. Return only that list."#;

const RAG_SYSTEM: &str = r#"You answer search queries using only the context provided. Do not invent facts.
Extract the answers to the query from the context and give the links associated with each RDF entity.
Build links by replacing RDF prefixes with their namespaces:"#;

const TRAIT_LINK_RULE: &str = r#"Links to specific traits must be rewritten to CD links using the trait id and the dataset name.
Original trait link: https://rdf.genenetwork.org/v1/id/trait_BXDPublish_16339
Trait id: 16339
Dataset name: BXDPublish
New trait link: https://cd.genenetwork.org/show_trait?trait_id=16339&dataset=BXDPublish"#;

const RAG_FORMAT: &str = r#"Respond with JSON only:
{"detailed_answers": [{"answer": "specific point addressing the query", "links": ["link", ...]}], "final_answer": "synthesized answer using the detailed answers"}"#;

const TRANSLATE_SYSTEM: &str = r#"You translate natural-language data requests into SPARQL.
Use only the prefixes and predicates of the RDF schema given below; do not invent predicates.
Return only the SPARQL query, with its PREFIX declarations, and nothing else."#;

const PLANNER_SYSTEM: &str = r#"You are an experienced task planner for genomic analysis.
Produce the list of steps needed to answer the query. You can rely on:
- a researcher that searches the GeneNetwork corpus for any information,
- an expert that calls specialized tools, including NCBI databases and the GeneNetwork SPARQL endpoint,
- a reflector that critiques results and suggests follow-up questions.
Keep steps independent of the workers that execute them. Mark a step "parallel": true only when it does not depend on the step before it.
Respond with a JSON array: [{"description": "...", "parallel": false}, ...]"#;

const REPHRASE_SYSTEM: &str = r#"You reformulate queries for document retrieval.
Using the conversation so far, rewrite the task so it stands on its own. If it refers to a trait, marker or entity mentioned earlier, name that entity explicitly.
If the entity is new, do not reformulate. Return only the reformulated query."#;

const ANALYZE_SYSTEM: &str = r#"You are a careful researcher who gives accurate and concise answers about biological and genomic data.
Answer the task using the retrieved context. Do not make assumptions, and do not link pieces of information the data does not explicitly connect.
Do not alter entity names such as traits and markers. A trait name usually contains a pattern like GEMMA or GWA; a marker name does not.
Use at most 200 words. Do not repeat yourself."#;

const EXPERT_SYSTEM: &str = r#"You have specialized tools to fetch biological, genetic and genomic information for any organism.
Work towards the goal one action at a time. At each step respond with a single JSON object, either
{"thought": "...", "tool": "<tool name>", "args": {...}} to call a tool, or
{"thought": "...", "answer": "..."} when you can answer.
Check results against the goal before answering, and include the intermediate results that support your answer.
If a tool call fails, read the error and try a different call or answer with what you have."#;

const CRITIC_SYSTEM: &str = r#"You are a senior scientist with decades of research in biology, genomics and bioinformatics.
Review the work so far and propose follow-up questions that would improve its quality, clarity, relevance and completeness.
Be specific. Return a short list of questions."#;

const ROUTE_SYSTEM: &str = r#"You supervise a genomic analysis carried out by workers: researcher, expert and reflector.
Follow the plan. Any feedback from the reflector must be acted upon by the researcher. Do not finish before the plan is complete.
Never choose the same worker twice in a row. When the work is finished, answer end."#;

const JUDGE_SYSTEM: &str = r#"You evaluate the relevance of biological findings. You take this seriously.
Decide whether the finding can help address the query. A finding that answers part of the query is still relevant.
Answer strictly yes or no."#;

const SUMMARIZE_SYSTEM: &str = r#"You write concise summaries of research results.
Summarize the step results below as a bullet-point list, one bullet per distinct point.
Do not modify entity names such as traits and markers. Use at most 100 words. Do not repeat answers."#;

const FINALIZE_SYSTEM: &str = r#"You are an experienced geneticist, careful when drawing inferences from data.
Using the step results below, write a comprehensive and reliable answer to the query.
Do not omit or substitute important information. Do not alter entity names such as traits and markers.
Do not repeat yourself. Use at most 200 words."#;

/// Templates for generating each completion request
pub struct PromptTemplate;

impl PromptTemplate {
    pub fn classify_search(query: &str) -> CompletionRequest {
        CompletionRequest::new("classify_search", CLASSIFY_SYSTEM, format!("Query: {}", query))
            .choice(&["keyword", "semantic"])
            .with_max_tokens(8)
    }

    pub fn extract_keywords(query: &str) -> CompletionRequest {
        CompletionRequest::new("extract_keywords", KEYWORDS_SYSTEM, format!("Query: {}", query))
            .with_max_tokens(128)
    }

    /// Single-shot answer over fused context; `context` is `(document_id, text)`
    pub fn rag_answer(query: &str, context: &[(String, String)]) -> CompletionRequest {
        let namespaces = NAMESPACES
            .iter()
            .map(|(prefix, namespace)| format!("{} => {}", prefix, namespace))
            .collect::<Vec<_>>()
            .join("\n");
        let system = format!("{}\n{}\n\n{}\n\n{}", RAG_SYSTEM, namespaces, TRAIT_LINK_RULE, RAG_FORMAT);
        let user = format!("Context:\n{}\n\nQuery: {}", render_context(context), query);
        CompletionRequest::new("rag_answer", system, user).with_format(ResponseFormat::Json)
    }

    pub fn translate_query(request: &str, vocabulary: &SchemaVocabulary) -> CompletionRequest {
        let user = format!(
            "RDF prefixes:\n{}\n\nTriple predicates:\n{}\n\nRequest: {}",
            vocabulary.prefixes().join("\n"),
            vocabulary.predicates().join("\n"),
            request
        );
        CompletionRequest::new("translate_query", TRANSLATE_SYSTEM, user)
    }

    pub fn planner(query: &str) -> CompletionRequest {
        CompletionRequest::new("planner", PLANNER_SYSTEM, format!("Query: {}", query))
            .with_format(ResponseFormat::Json)
    }

    pub fn rephrase(step: &str, history: &ConversationHistory) -> CompletionRequest {
        let user = format!(
            "Conversation so far:\n{}\n\nTask to reformulate: {}",
            transcript_or_none(history),
            step
        );
        CompletionRequest::new("rephrase", REPHRASE_SYSTEM, user)
    }

    pub fn analyze(
        step: &str,
        context: &[(String, String)],
        history: &ConversationHistory,
    ) -> CompletionRequest {
        let user = format!(
            "Conversation so far:\n{}\n\nRetrieved context:\n{}\n\nTask: {}",
            transcript_or_none(history),
            render_context(context),
            step
        );
        CompletionRequest::new("analyze", ANALYZE_SYSTEM, user)
    }

    /// THINK prompt for the expert's reason/act loop
    pub fn expert_step(goal: &str, tools: &ToolSpec, trace: &str) -> CompletionRequest {
        let trace = if trace.is_empty() { "(no steps yet)" } else { trace };
        let user = format!(
            "Available tools:\n{}\n\nGoal:\n{}\n\nPrevious steps:\n{}\n\nNext action (JSON only):",
            tools.describe(),
            goal,
            trace
        );
        CompletionRequest::new("expert_step", EXPERT_SYSTEM, user).with_format(ResponseFormat::Json)
    }

    pub fn critic(query: &str, history: &ConversationHistory) -> CompletionRequest {
        let user = format!(
            "Query: {}\n\nWork so far:\n{}",
            query,
            transcript_or_none(history)
        );
        CompletionRequest::new("critic", CRITIC_SYSTEM, user)
    }

    /// Routing decision; `options` are worker names the answer must come from
    pub fn route(
        query: &str,
        plan: &Plan,
        remaining_steps: usize,
        history: &ConversationHistory,
        options: &[&str],
    ) -> CompletionRequest {
        let user = format!(
            "Query: {}\n\nPlan:\n{}\n\nSteps not yet started: {}\n\nConversation:\n{}\n\nWho should act next? Select one of: [{}].",
            query,
            plan.render(),
            remaining_steps,
            transcript_or_none(history),
            options.join(", ")
        );
        CompletionRequest::new("route", ROUTE_SYSTEM, user)
            .choice(options)
            .with_max_tokens(8)
    }

    pub fn judge_satisfaction(query: &str, finding: &Finding) -> CompletionRequest {
        let user = format!(
            "Query: {}\n\nStep: {}\n\nFinding: {}",
            query,
            finding.step,
            finding.answer()
        );
        CompletionRequest::new("judge_satisfaction", JUDGE_SYSTEM, user)
            .choice(&["yes", "no"])
            .with_max_tokens(4)
    }

    /// Synthesis over the satisfied prefix of findings
    pub fn summarize(query: &str, findings: &[Finding]) -> CompletionRequest {
        let user = format!("Query: {}\n\n{}", query, render_steps(findings));
        CompletionRequest::new("summarize", SUMMARIZE_SYSTEM, user)
    }

    /// The bullet summary, when there is one, follows the step results.
    pub fn finalize(query: &str, findings: &[Finding], summary: Option<&str>) -> CompletionRequest {
        let mut user = format!("Query: {}\n\n{}", query, render_steps(findings));
        if let Some(summary) = summary {
            user.push_str(&format!("\n\nSummary:\n{}", summary));
        }
        CompletionRequest::new("finalize", FINALIZE_SYSTEM, user)
    }
}

fn render_steps(findings: &[Finding]) -> String {
    if findings.is_empty() {
        return "(no step produced a usable result)".to_string();
    }
    findings
        .iter()
        .enumerate()
        .map(|(i, f)| format!("Step {}: {}\nResult: {}", i + 1, f.step, f.answer()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_context(context: &[(String, String)]) -> String {
    context
        .iter()
        .map(|(id, text)| format!("[{}] {}", id, text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn transcript_or_none(history: &ConversationHistory) -> String {
    if history.is_empty() {
        "(empty)".to_string()
    } else {
        history.transcript()
    }
}
