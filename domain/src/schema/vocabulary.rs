use serde::{Deserialize, Serialize};

/// Namespace declarations and predicate names of an RDF schema.
///
/// Both lists are deduplicated and keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaVocabulary {
    prefixes: Vec<String>,
    predicates: Vec<String>,
}

impl SchemaVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the vocabulary from several Turtle sources
    pub fn extract<'a>(sources: impl IntoIterator<Item = &'a str>) -> Self {
        let mut vocabulary = Self::new();
        for source in sources {
            vocabulary.add_source(source);
        }
        vocabulary
    }

    /// Add every declaration and predicate of one source.
    ///
    /// Lines starting with `@` (or a SPARQL-style `PREFIX`) are namespace
    /// declarations. On any other non-blank line the second token is the
    /// predicate. Comments and lines with fewer than two tokens are skipped.
    pub fn add_source(&mut self, source: &str) {
        for line in source.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if is_declaration(line) {
                push_unique(&mut self.prefixes, line);
                continue;
            }
            let mut tokens = line.split_whitespace();
            if let (Some(_), Some(predicate)) = (tokens.next(), tokens.next()) {
                push_unique(&mut self.predicates, predicate);
            }
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn predicates(&self) -> &[String] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.predicates.is_empty()
    }

    /// `(label, iri)` for each declaration that parses, e.g. `("gn", "http://...")`
    pub fn prefix_bindings(&self) -> Vec<(String, String)> {
        self.prefixes.iter().filter_map(|p| parse_declaration(p)).collect()
    }
}

fn is_declaration(line: &str) -> bool {
    line.starts_with('@')
        || line
            .get(..7)
            .is_some_and(|head| head.eq_ignore_ascii_case("prefix "))
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

/// `@prefix gn: <http://x/> .` or `PREFIX gn: <http://x/>` → `("gn", "http://x/")`
fn parse_declaration(line: &str) -> Option<(String, String)> {
    let mut tokens = line.split_whitespace();
    let keyword = tokens.next()?;
    if !keyword.trim_start_matches('@').eq_ignore_ascii_case("prefix") {
        return None;
    }
    let label = tokens.next()?.strip_suffix(':')?;
    let iri = tokens.next()?.strip_prefix('<')?.strip_suffix('>')?;
    Some((label.to_string(), iri.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: &str = "@prefix gn: <http://rdf.genenetwork.org/v1/id/> .
@prefix gnt: <http://rdf.genenetwork.org/v1/term/> .

gn:trait_BXDPublish_10001 gnt:belongsToGroup gn:setBxd ;
    gnt:traitId \"10001\" .
gn:trait_BXDPublish_10002 gnt:belongsToGroup gn:setBxd .
.
# generated file
";

    #[test]
    fn test_extract() {
        let vocabulary = SchemaVocabulary::extract([TTL]);
        assert_eq!(vocabulary.prefixes().len(), 2);
        assert!(vocabulary.prefixes()[0].starts_with("@prefix gn:"));
        // continuation lines yield their second token too ("\"10001\"")
        assert_eq!(
            vocabulary.predicates(),
            &["gnt:belongsToGroup", "\"10001\""]
        );
    }

    #[test]
    fn test_extract_dedups_across_sources() {
        let other = "@prefix gn: <http://rdf.genenetwork.org/v1/id/> .\ngn:a gnt:belongsToGroup gn:b .\ngn:a rdfs:label \"A\" .";
        let vocabulary = SchemaVocabulary::extract([TTL, other]);
        assert_eq!(vocabulary.prefixes().len(), 2);
        assert!(vocabulary.predicates().contains(&"rdfs:label".to_string()));
        assert_eq!(
            vocabulary
                .predicates()
                .iter()
                .filter(|p| *p == "gnt:belongsToGroup")
                .count(),
            1
        );
    }

    #[test]
    fn test_empty_and_malformed() {
        let vocabulary = SchemaVocabulary::extract(["", "\n   \n", "single"]);
        assert!(vocabulary.is_empty());
    }

    #[test]
    fn test_sparql_style_prefix() {
        let vocabulary = SchemaVocabulary::extract(["PREFIX dct: <http://purl.org/dc/terms/>"]);
        assert_eq!(
            vocabulary.prefix_bindings(),
            vec![("dct".to_string(), "http://purl.org/dc/terms/".to_string())]
        );
        assert!(vocabulary.predicates().is_empty());
    }
}
