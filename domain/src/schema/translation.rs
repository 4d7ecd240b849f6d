//! Recovering a SPARQL query from a translation response

use super::vocabulary::SchemaVocabulary;
use crate::core::string::strip_code_fence;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Translation returned an empty query")]
    EmptyQuery,

    #[error("Translation is not a SPARQL query: {0}")]
    NotAQuery(String),
}

const QUERY_FORMS: [&str; 4] = ["SELECT", "ASK", "CONSTRUCT", "DESCRIBE"];

/// Pull a SPARQL query out of a model response.
///
/// Accepts a bare query, a fenced query, or JSON with a `translated_query`
/// field. The text must contain one of the SPARQL query forms. Prefix
/// labels used in the query but not declared are declared from the
/// vocabulary.
pub fn extract_structured_query(
    response: &str,
    vocabulary: &SchemaVocabulary,
) -> Result<String, SchemaError> {
    let body = strip_code_fence(response);
    let body = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => map
            .get("translated_query")
            .or_else(|| map.get("query"))
            .and_then(|v| v.as_str())
            .map(|s| strip_code_fence(s).to_string())
            .unwrap_or_default(),
        _ => body.to_string(),
    };

    let query = body.trim();
    if query.is_empty() {
        return Err(SchemaError::EmptyQuery);
    }
    let upper = query.to_ascii_uppercase();
    if !QUERY_FORMS.iter().any(|form| upper.contains(form)) {
        return Err(SchemaError::NotAQuery(crate::core::string::truncate(query, 200)));
    }

    Ok(declare_missing_prefixes(query, vocabulary))
}

fn declare_missing_prefixes(query: &str, vocabulary: &SchemaVocabulary) -> String {
    let upper = query.to_ascii_uppercase();
    let missing: Vec<String> = vocabulary
        .prefix_bindings()
        .into_iter()
        .filter(|(label, _)| {
            let usage = format!("{}:", label);
            let declared = format!("PREFIX {}:", label.to_ascii_uppercase());
            uses_label(query, &usage) && !upper.contains(&declared)
        })
        .map(|(label, iri)| format!("PREFIX {}: <{}>", label, iri))
        .collect();

    if missing.is_empty() {
        query.to_string()
    } else {
        format!("{}\n{}", missing.join("\n"), query)
    }
}

/// `gn:` used as a prefixed name, not as the tail of another label like `xgn:`
fn uses_label(query: &str, usage: &str) -> bool {
    query.match_indices(usage).any(|(idx, _)| {
        query[..idx]
            .chars()
            .next_back()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '-' || c == '_'))
    })
}
