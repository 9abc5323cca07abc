use crate::error::MatchError;
use crate::models::{
    Corpus, MatchMode, MatchProgress, MatchResult, MatchResults, MatchScore, Query,
};
use crate::similarity::partial_ratio_percent;
use crate::text::{normalize_for_similarity, split_lines, WordTokenizer};
use std::collections::BTreeSet;
use tracing::debug;

/// Query words shorter than this are dropped in partial mode.
pub const MIN_PARTIAL_WORD_CHARS: usize = 4;

/// Decides whether one document's text matches and what to report for it.
pub trait DocumentMatcher {
    fn match_text(&self, text: &str) -> Option<(MatchScore, String)>;
}

#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    normalized_phrase: String,
    threshold: u8,
}

impl FuzzyMatcher {
    pub fn new(phrase: &str, threshold: u8) -> Self {
        Self {
            normalized_phrase: normalize_for_similarity(phrase),
            threshold,
        }
    }
}

impl DocumentMatcher for FuzzyMatcher {
    fn match_text(&self, text: &str) -> Option<(MatchScore, String)> {
        let mut best: Option<(u8, &str)> = None;

        for line in split_lines(text).into_iter().map(str::trim) {
            if line.is_empty() {
                continue;
            }

            let score = partial_ratio_percent(&self.normalized_phrase, &normalize_for_similarity(line));
            // Strictly greater keeps the first line among equal scores.
            if best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((score, line));
                if score == 100 {
                    break;
                }
            }
        }

        let (score, line) = best?;
        (score >= self.threshold).then(|| (MatchScore::Fuzzy(score), line.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct ExactMatcher {
    folded_phrase: String,
}

impl ExactMatcher {
    pub fn new(phrase: &str) -> Self {
        Self {
            folded_phrase: phrase.to_lowercase(),
        }
    }
}

impl DocumentMatcher for ExactMatcher {
    fn match_text(&self, text: &str) -> Option<(MatchScore, String)> {
        split_lines(text)
            .into_iter()
            .find(|line| line.to_lowercase().contains(&self.folded_phrase))
            .map(|line| (MatchScore::Exact, line.trim().to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct PartialMatcher {
    search_words: Vec<String>,
    tokenizer: WordTokenizer,
}

impl PartialMatcher {
    pub fn new(phrase: &str) -> Result<Self, MatchError> {
        let search_words: Vec<String> = phrase
            .split_whitespace()
            .filter(|word| word.chars().count() >= MIN_PARTIAL_WORD_CHARS)
            .map(str::to_lowercase)
            .collect();

        if search_words.is_empty() {
            return Err(MatchError::InsufficientQueryWords {
                phrase: phrase.to_string(),
                min_len: MIN_PARTIAL_WORD_CHARS,
            });
        }

        Ok(Self {
            search_words,
            tokenizer: WordTokenizer::new()?,
        })
    }

    pub fn search_words(&self) -> &[String] {
        &self.search_words
    }
}

impl DocumentMatcher for PartialMatcher {
    fn match_text(&self, text: &str) -> Option<(MatchScore, String)> {
        let tokens = self.tokenizer.distinct_tokens(text);

        let matched: BTreeSet<&str> = tokens
            .iter()
            .filter(|token| {
                self.search_words
                    .iter()
                    .any(|word| token.starts_with(word.as_str()))
            })
            .map(String::as_str)
            .collect();

        if matched.is_empty() {
            return None;
        }

        let joined = matched.into_iter().collect::<Vec<_>>().join(", ");
        Some((MatchScore::Partial, joined))
    }
}

/// Matches every document of the corpus against the query.
///
/// Fails before touching any document when the query is unusable for its mode.
pub fn match_corpus(corpus: &Corpus, query: &Query) -> Result<MatchResults, MatchError> {
    match_corpus_with_progress(corpus, query, |_| {})
}

pub fn match_corpus_with_progress<F>(
    corpus: &Corpus,
    query: &Query,
    on_progress: F,
) -> Result<MatchResults, MatchError>
where
    F: FnMut(MatchProgress<'_>),
{
    query.validate()?;

    match query.mode {
        MatchMode::Fuzzy { threshold } => Ok(run(
            corpus,
            &FuzzyMatcher::new(&query.phrase, threshold),
            on_progress,
        )),
        MatchMode::Exact => Ok(run(corpus, &ExactMatcher::new(&query.phrase), on_progress)),
        MatchMode::Partial => {
            let matcher = PartialMatcher::new(&query.phrase)?;
            debug!(words = ?matcher.search_words(), "partial search words");
            Ok(run(corpus, &matcher, on_progress))
        }
    }
}

fn run<M, F>(corpus: &Corpus, matcher: &M, mut on_progress: F) -> MatchResults
where
    M: DocumentMatcher,
    F: FnMut(MatchProgress<'_>),
{
    let total = corpus.len();
    let mut results = MatchResults::new();

    for (index, (document_id, text)) in corpus.iter().enumerate() {
        let found = if text.is_empty() {
            None
        } else {
            matcher.match_text(text)
        };

        let matched = found.is_some();
        if let Some((score, matched_text)) = found {
            debug!(document = %document_id, score = %score, "document matched");
            results.insert(
                document_id.clone(),
                MatchResult {
                    document_id: document_id.clone(),
                    score,
                    matched_text,
                },
            );
        }

        on_progress(MatchProgress {
            position: index + 1,
            total,
            document_id,
            matched,
        });
    }

    results
}

/// Presentation order: higher fuzzy scores first, then document id.
pub fn rank(results: &MatchResults) -> Vec<MatchResult> {
    let mut ranked: Vec<MatchResult> = results.values().cloned().collect();
    ranked.sort_by(|left, right| {
        right
            .score
            .cmp(&left.score)
            .then_with(|| left.document_id.cmp(&right.document_id))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(entries: &[(&str, &str)]) -> Corpus {
        entries
            .iter()
            .map(|(id, text)| (id.to_string(), text.to_string()))
            .collect()
    }

    fn query(mode: MatchMode, phrase: &str) -> Query {
        Query::new(mode, phrase).expect("query should be valid")
    }

    #[test]
    fn empty_documents_never_match() {
        let docs = corpus(&[("empty.pdf", "")]);
        for mode in [MatchMode::Fuzzy { threshold: 0 }, MatchMode::Exact, MatchMode::Partial] {
            let results = match_corpus(&docs, &query(mode, "anything")).expect("search should run");
            assert!(results.is_empty(), "mode {} matched empty text", mode.name());
        }
    }

    #[test]
    fn fuzzy_contained_phrase_scores_hundred() {
        let docs = corpus(&[("a.pdf", "intro\n  say hello world now  \nbye")]);
        let results = match_corpus(&docs, &query(MatchMode::Fuzzy { threshold: 100 }, "hello world"))
            .expect("search should run");

        let hit = &results["a.pdf"];
        assert_eq!(hit.score, MatchScore::Fuzzy(100));
        assert_eq!(hit.score_label(), "100%");
        assert_eq!(hit.matched_text, "say hello world now");
    }

    #[test]
    fn fuzzy_below_threshold_is_excluded() {
        let docs = corpus(&[("a.pdf", "the quick brown fox\njumps over")]);
        let results = match_corpus(&docs, &query(MatchMode::Fuzzy { threshold: 80 }, "zzz"))
            .expect("search should run");
        assert!(results.is_empty());
    }

    #[test]
    fn fuzzy_tie_keeps_first_line() {
        let docs = corpus(&[("a.pdf", "pump alpha\npump beta")]);
        let results = match_corpus(&docs, &query(MatchMode::Fuzzy { threshold: 50 }, "pump"))
            .expect("search should run");
        assert_eq!(results["a.pdf"].matched_text, "pump alpha");
    }

    #[test]
    fn fuzzy_tie_below_full_score_keeps_first_line() {
        let docs = corpus(&[("a.pdf", "abxx\nxxcd")]);
        let results = match_corpus(&docs, &query(MatchMode::Fuzzy { threshold: 50 }, "abcd"))
            .expect("search should run");

        let hit = &results["a.pdf"];
        assert_eq!(hit.score, MatchScore::Fuzzy(67));
        assert_eq!(hit.matched_text, "abxx");
    }

    #[test]
    fn fuzzy_ignores_case_and_punctuation() {
        let docs = corpus(&[("a.pdf", "Section 4: HYDRAULIC-PUMP failure")]);
        let results = match_corpus(&docs, &query(MatchMode::Fuzzy { threshold: 95 }, "hydraulic pump"))
            .expect("search should run");
        assert_eq!(results["a.pdf"].matched_text, "Section 4: HYDRAULIC-PUMP failure");
    }

    #[test]
    fn fuzzy_skips_whitespace_only_documents() {
        let docs = corpus(&[("blank.pdf", " \n\t\n ")]);
        let results = match_corpus(&docs, &query(MatchMode::Fuzzy { threshold: 0 }, "pump"))
            .expect("search should run");
        assert!(results.is_empty());
    }

    #[test]
    fn exact_is_case_insensitive_and_keeps_original_line() {
        let docs = corpus(&[("a.pdf", "header\n  this is an INVOICE number 5  ")]);
        let results = match_corpus(&docs, &query(MatchMode::Exact, "Invoice")).expect("search should run");

        let hit = &results["a.pdf"];
        assert_eq!(hit.score_label(), "Exact Match");
        assert_eq!(hit.matched_text, "this is an INVOICE number 5");
    }

    #[test]
    fn exact_first_matching_line_wins() {
        let docs = corpus(&[("a.pdf", "no match here\nInvoice A\nInvoice B")]);
        let results = match_corpus(&docs, &query(MatchMode::Exact, "invoice")).expect("search should run");
        assert_eq!(results["a.pdf"].matched_text, "Invoice A");
    }

    #[test]
    fn exact_does_not_span_lines() {
        let docs = corpus(&[("a.pdf", "total\namount")]);
        let results = match_corpus(&docs, &query(MatchMode::Exact, "total amount")).expect("search should run");
        assert!(results.is_empty());
    }

    #[test]
    fn partial_collects_sorted_prefix_matches() {
        let docs = corpus(&[("a.pdf", "The contractor signed. Contracts are short.")]);
        let results = match_corpus(&docs, &query(MatchMode::Partial, "contract")).expect("search should run");

        let hit = &results["a.pdf"];
        assert_eq!(hit.score_label(), "Partial Match");
        assert_eq!(hit.matched_text, "contractor, contracts");
    }

    #[test]
    fn partial_unions_tokens_across_words_and_drops_short_words() {
        let docs = corpus(&[("a.pdf", "Pumps and pumping; valve_a VALVES to the sea")]);
        let results = match_corpus(&docs, &query(MatchMode::Partial, "the pump valv"))
            .expect("search should run");
        assert_eq!(results["a.pdf"].matched_text, "pumping, pumps, valve_a, valves");
    }

    #[test]
    fn partial_without_long_words_fails_before_any_document() {
        let docs = corpus(&[("a.pdf", "to be or not to be"), ("b.pdf", "")]);
        let mut seen = 0;
        let error = match_corpus_with_progress(&docs, &query(MatchMode::Partial, "to be"), |_| seen += 1)
            .unwrap_err();

        assert!(matches!(error, MatchError::InsufficientQueryWords { min_len: 4, .. }));
        assert_eq!(seen, 0);
    }

    #[test]
    fn hand_built_empty_query_is_rejected() {
        let bad = Query {
            mode: MatchMode::Exact,
            phrase: "   ".to_string(),
        };
        let error = match_corpus(&corpus(&[("a.pdf", "text")]), &bad).unwrap_err();
        assert!(matches!(error, MatchError::InvalidQuery(_)));
    }

    #[test]
    fn progress_reports_every_document() {
        let docs = corpus(&[("a.pdf", "invoice"), ("b.pdf", ""), ("c.pdf", "receipt")]);
        let mut events = Vec::new();
        match_corpus_with_progress(&docs, &query(MatchMode::Exact, "invoice"), |progress| {
            events.push((progress.position, progress.total, progress.document_id.to_string(), progress.matched));
        })
        .expect("search should run");

        assert_eq!(
            events,
            vec![
                (1, 3, "a.pdf".to_string(), true),
                (2, 3, "b.pdf".to_string(), false),
                (3, 3, "c.pdf".to_string(), false),
            ]
        );
    }

    #[test]
    fn repeated_runs_are_identical() {
        let docs = corpus(&[
            ("x/one.pdf", "pump maintenance schedule"),
            ("two.pdf", "pumping station"),
            ("three.pdf", "unrelated"),
        ]);
        let search = query(MatchMode::Fuzzy { threshold: 60 }, "pump");

        let first = match_corpus(&docs, &search).expect("search should run");
        let second = match_corpus(&docs, &search).expect("search should run");
        assert_eq!(first, second);
    }

    #[test]
    fn rank_orders_by_score_then_document() {
        let mut results = MatchResults::new();
        for (id, score) in [("b.pdf", 90), ("a.pdf", 90), ("c.pdf", 95)] {
            results.insert(
                id.to_string(),
                MatchResult {
                    document_id: id.to_string(),
                    score: MatchScore::Fuzzy(score),
                    matched_text: String::new(),
                },
            );
        }

        let order: Vec<_> = rank(&results).into_iter().map(|hit| hit.document_id).collect();
        assert_eq!(order, vec!["c.pdf", "a.pdf", "b.pdf"]);
    }
}
