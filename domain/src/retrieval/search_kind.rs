//! Search-kind classification (advisory)

use super::weights::FusionWeight;
use serde::{Deserialize, Serialize};

/// Whether a query reads as a lookup of specific entities (keyword) or
/// needs meaning and implicit connections (semantic).
///
/// The classification only selects fusion weights; both retrievers always run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Keyword,
    #[default]
    Semantic,
}

impl SearchKind {
    pub fn as_str(&self) -> &str {
        match self {
            SearchKind::Keyword => "keyword",
            SearchKind::Semantic => "semantic",
        }
    }

    /// Fusion weights for this kind of query.
    pub fn weights(&self) -> FusionWeight {
        match self {
            SearchKind::Keyword => FusionWeight::keyword(),
            SearchKind::Semantic => FusionWeight::balanced(),
        }
    }
}

impl std::fmt::Display for SearchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a classifier response. Fails open to [`SearchKind::Semantic`].
///
/// Accepts a bare word, a quoted word, or a JSON object with a `decision`
/// field. Anything mentioning both kinds, or neither, is ambiguous.
pub fn parse_search_kind(response: &str) -> SearchKind {
    let text = match serde_json::from_str::<serde_json::Value>(response.trim()) {
        Ok(serde_json::Value::Object(map)) => map
            .get("decision")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_lowercase(),
        Ok(serde_json::Value::String(s)) => s.to_lowercase(),
        _ => response.to_lowercase(),
    };

    let keyword = text.contains("keyword");
    let semantic = text.contains("semantic");
    match (keyword, semantic) {
        (true, false) => SearchKind::Keyword,
        _ => SearchKind::Semantic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        assert_eq!(parse_search_kind("keyword"), SearchKind::Keyword);
        assert_eq!(parse_search_kind("  Keyword.\n"), SearchKind::Keyword);
        assert_eq!(parse_search_kind("\"keyword\""), SearchKind::Keyword);
        assert_eq!(parse_search_kind("semantic"), SearchKind::Semantic);
    }

    #[test]
    fn test_parse_json_decision() {
        assert_eq!(
            parse_search_kind(r#"{"decision": "keyword"}"#),
            SearchKind::Keyword
        );
        assert_eq!(
            parse_search_kind(r#"{"decision": "semantic"}"#),
            SearchKind::Semantic
        );
        assert_eq!(parse_search_kind(r#"{"other": "keyword"}"#), SearchKind::Semantic);
    }

    #[test]
    fn test_ambiguous_fails_open() {
        assert_eq!(parse_search_kind(""), SearchKind::Semantic);
        assert_eq!(parse_search_kind("not sure"), SearchKind::Semantic);
        assert_eq!(
            parse_search_kind("either keyword or semantic"),
            SearchKind::Semantic
        );
    }

    #[test]
    fn test_weights() {
        assert_eq!(SearchKind::Keyword.weights(), FusionWeight::keyword());
        assert_eq!(SearchKind::Semantic.weights(), FusionWeight::balanced());
    }
}
