//! Weighted score fusion: fused = Σ weight[source] * minmax(score)
//!
//! Each input list is normalized to `[0, 1]` independently, so lexical and
//! semantic scores on unrelated scales become comparable before weighting.

use super::entities::{DocumentId, RankedList, RetrievalSource, RetrievedItem, rank_score};
use super::weights::FusionWeight;
use std::collections::HashMap;
use thiserror::Error;

/// Fusion failure.
///
/// Callers treat [`FusionError::EmptyInput`] as "no evidence found", not as
/// a fatal error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FusionError {
    #[error("No retrieval evidence: all input lists are empty")]
    EmptyInput,
}

struct Accumulated {
    fused: f64,
    best_normalized: f64,
    best_source: RetrievalSource,
    text: String,
}

/// Merge ranked lists into one list of at most `top_k` items.
///
/// Pure and deterministic: ties on the fused score fall back to the best
/// individual normalized score, then to document id ascending.
pub fn fuse(
    lists: &[RankedList],
    weights: FusionWeight,
    top_k: usize,
) -> Result<RankedList, FusionError> {
    if lists.iter().all(RankedList::is_empty) {
        return Err(FusionError::EmptyInput);
    }

    let mut acc: HashMap<DocumentId, Accumulated> = HashMap::new();

    for list in lists {
        for (item, normalized) in normalize(list) {
            let contribution = weights.weight_for(item.source) * normalized;
            match acc.get_mut(&item.document_id) {
                Some(entry) => {
                    entry.fused += contribution;
                    if normalized > entry.best_normalized
                        || (normalized == entry.best_normalized
                            && item.source < entry.best_source)
                    {
                        entry.best_normalized = normalized;
                        entry.best_source = item.source;
                    }
                }
                None => {
                    acc.insert(
                        item.document_id.clone(),
                        Accumulated {
                            fused: contribution,
                            best_normalized: normalized,
                            best_source: item.source,
                            text: item.text.clone(),
                        },
                    );
                }
            }
        }
    }

    let mut fused: Vec<(DocumentId, Accumulated)> = acc.into_iter().collect();
    fused.sort_by(|(id_a, a), (id_b, b)| {
        rank_score(b.fused)
            .total_cmp(&rank_score(a.fused))
            .then_with(|| rank_score(b.best_normalized).total_cmp(&rank_score(a.best_normalized)))
            .then_with(|| id_a.cmp(id_b))
    });
    fused.truncate(top_k);

    let items = fused
        .into_iter()
        .map(|(id, entry)| RetrievedItem {
            document_id: id,
            score: entry.fused,
            source: entry.best_source,
            text: entry.text,
        })
        .collect();

    Ok(RankedList::from_ordered(items))
}

/// Min-max normalize one list's scores.
///
/// A list whose scores are all equal (including a single-item list)
/// normalizes every item to 1.0. Non-finite scores count as the minimum.
/// A document repeated within one list keeps only its first occurrence.
fn normalize(list: &RankedList) -> Vec<(&RetrievedItem, f64)> {
    let finite = |s: f64| if s.is_finite() { Some(s) } else { None };
    let scores: Vec<f64> = list.iter().filter_map(|i| finite(i.score)).collect();
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let mut seen: Vec<&DocumentId> = Vec::with_capacity(list.len());
    let mut out = Vec::with_capacity(list.len());
    for item in list.iter() {
        if seen.contains(&&item.document_id) {
            continue;
        }
        seen.push(&item.document_id);
        let normalized = match finite(item.score) {
            None => 0.0,
            Some(_) if !(range > 0.0) => 1.0,
            Some(score) => (score - min) / range,
        };
        out.push((item, normalized));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexical(items: &[(&str, f64)]) -> RankedList {
        RankedList::new(
            items
                .iter()
                .map(|(id, s)| RetrievedItem::new(*id, *s, RetrievalSource::Lexical, *id))
                .collect(),
        )
    }

    fn semantic(items: &[(&str, f64)]) -> RankedList {
        RankedList::new(
            items
                .iter()
                .map(|(id, s)| RetrievedItem::new(*id, *s, RetrievalSource::Semantic, *id))
                .collect(),
        )
    }

    fn ids(list: &RankedList) -> Vec<&str> {
        list.iter().map(|i| i.document_id.as_str()).collect()
    }

    #[test]
    fn test_all_empty_is_empty_input() {
        let result = fuse(
            &[RankedList::empty(), RankedList::empty()],
            FusionWeight::balanced(),
            10,
        );
        assert_eq!(result, Err(FusionError::EmptyInput));
        assert_eq!(
            fuse(&[], FusionWeight::balanced(), 10),
            Err(FusionError::EmptyInput)
        );
    }

    #[test]
    fn test_single_item_normalizes_to_one() {
        let fused = fuse(&[lexical(&[("a", 3.7)])], FusionWeight::balanced(), 10).unwrap();
        assert_eq!(fused.len(), 1);
        assert!((fused.items()[0].score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_contributions_sum_across_lists() {
        let lists = [
            lexical(&[("a", 10.0), ("b", 5.0), ("c", 0.0)]),
            semantic(&[("b", 0.9), ("c", 0.1)]),
        ];
        let fused = fuse(&lists, FusionWeight::balanced(), 10).unwrap();
        // a: 0.5*1.0 = 0.5; b: 0.5*0.5 + 0.5*1.0 = 0.75; c: 0 + 0 = 0
        assert_eq!(ids(&fused), vec!["b", "a", "c"]);
        assert!((fused.items()[0].score - 0.75).abs() < 1e-12);
        assert_eq!(fused.items()[0].source, RetrievalSource::Semantic);
    }

    #[test]
    fn test_keyword_weights_favor_lexical() {
        let lists = [lexical(&[("lex", 1.0), ("x", 0.0)]), semantic(&[("sem", 1.0), ("y", 0.0)])];
        let fused = fuse(&lists, FusionWeight::keyword(), 10).unwrap();
        assert_eq!(ids(&fused)[0], "lex");
        let fused = fuse(&lists, FusionWeight::new(0.3).unwrap(), 10).unwrap();
        assert_eq!(ids(&fused)[0], "sem");
    }

    #[test]
    fn test_ties_break_on_best_normalized_then_id() {
        let lists = [
            lexical(&[("d1", 2.0), ("d2", 1.0), ("d0", 2.0), ("zz", 0.0)]),
            semantic(&[("d2", 1.0), ("yy", 0.0), ("mid", 2.0)]),
        ];
        let fused = fuse(&lists, FusionWeight::balanced(), 10).unwrap();
        let order = ids(&fused);
        // d0, d1 and mid all fuse to 0.5 with best normalized 1.0; d2 fuses to 0.5 with best 0.5
        assert_eq!(&order[..4], &["d0", "d1", "mid", "d2"]);
    }

    #[test]
    fn test_truncates_to_top_k() {
        let lists = [lexical(&[("a", 3.0), ("b", 2.0), ("c", 1.0)])];
        let fused = fuse(&lists, FusionWeight::balanced(), 2).unwrap();
        assert_eq!(ids(&fused), vec!["a", "b"]);
    }

    #[test]
    fn test_fusion_is_deterministic() {
        let lists = [
            lexical(&[("a", 1.0), ("b", 1.0), ("c", 0.5), ("d", 0.2)]),
            semantic(&[("d", 0.8), ("c", 0.8), ("e", 0.1)]),
        ];
        let first = fuse(&lists, FusionWeight::keyword(), 10).unwrap();
        for _ in 0..20 {
            assert_eq!(fuse(&lists, FusionWeight::keyword(), 10).unwrap(), first);
        }
    }

    #[test]
    fn test_raising_a_score_never_lowers_rank() {
        let base = [("a", 0.9), ("b", 0.6), ("c", 0.4), ("d", 0.1)];
        let other = semantic(&[("a", 0.7), ("c", 0.2), ("d", 0.5)]);
        let target = DocumentId::new("c");

        let mut first_rank = None;
        let mut previous_rank = usize::MAX;
        for bump in 0..12 {
            let mut items = base.to_vec();
            items[2].1 = 0.4 + bump as f64 * 0.1;
            let fused = fuse(
                &[lexical(&items), other.clone()],
                FusionWeight::balanced(),
                10,
            )
            .unwrap();
            let rank = fused.rank_of(&target).unwrap();
            assert!(rank <= previous_rank, "rank rose from {previous_rank} to {rank}");
            first_rank.get_or_insert(rank);
            previous_rank = rank;
        }
        assert!(previous_rank < first_rank.unwrap());
    }

    #[test]
    fn test_nan_scores_fuse_as_the_minimum() {
        let lists = [
            lexical(&[("a", 3.0), ("n", f64::NAN), ("b", 1.0)]),
            semantic(&[("n", 0.9), ("b", 0.1)]),
        ];
        let fused = fuse(&lists, FusionWeight::balanced(), 10).unwrap();
        assert_eq!(ids(&fused), vec!["a", "n", "b"]);
        assert!(fused.iter().all(|i| i.score.is_finite()));
    }

    #[test]
    fn test_duplicate_within_list_counted_once() {
        let list = RankedList::new(vec![
            RetrievedItem::new("a", 1.0, RetrievalSource::Lexical, ""),
            RetrievedItem::new("a", 0.5, RetrievalSource::Lexical, ""),
            RetrievedItem::new("b", 0.0, RetrievalSource::Lexical, ""),
        ]);
        let fused = fuse(&[list], FusionWeight::new(1.0).unwrap(), 10).unwrap();
        assert_eq!(fused.len(), 2);
        assert!((fused.items()[0].score - 1.0).abs() < 1e-12);
    }
}
