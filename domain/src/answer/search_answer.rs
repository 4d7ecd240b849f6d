//! Structured answer of the single-shot search

use crate::core::string::{extract_delimited, strip_code_fence};
use crate::schema::expand_prefixed;
use serde::{Deserialize, Serialize};

/// One point addressing the query, with its supporting links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Information {
    pub answer: String,
    #[serde(default)]
    pub links: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchAnswer {
    pub detailed_answers: Vec<Information>,
    pub final_answer: String,
}

/// Parse the model's JSON answer and expand any prefixed links.
///
/// Falls back to treating the whole response as `final_answer` when it
/// holds no usable JSON, so a reply is never lost.
pub fn parse_search_answer(response: &str) -> SearchAnswer {
    let body = strip_code_fence(response);
    let parsed = extract_delimited(body, '{', '}')
        .and_then(|object| serde_json::from_str::<SearchAnswer>(object).ok());

    match parsed {
        Some(mut answer) => {
            for info in &mut answer.detailed_answers {
                for link in &mut info.links {
                    *link = expand_prefixed(link);
                }
            }
            answer
        }
        None => SearchAnswer {
            detailed_answers: Vec::new(),
            final_answer: body.trim().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_expand() {
        let response = r#"```json
{"detailed_answers": [{"answer": "Trait 16339 maps to chr 4", "links": ["gn:trait_BXDPublish_16339", "https://cd.genenetwork.org/show_trait?trait_id=16339&dataset=BXDPublish"]}], "final_answer": "chr 4"}
```"#;
        let answer = parse_search_answer(response);
        assert_eq!(answer.final_answer, "chr 4");
        assert_eq!(
            answer.detailed_answers[0].links[0],
            "http://rdf.genenetwork.org/v1/id/trait_BXDPublish_16339"
        );
        assert!(answer.detailed_answers[0].links[1].starts_with("https://cd."));
    }

    #[test]
    fn test_plain_text_fallback() {
        let answer = parse_search_answer("Nothing relevant in the context.");
        assert!(answer.detailed_answers.is_empty());
        assert_eq!(answer.final_answer, "Nothing relevant in the context.");
    }
}
