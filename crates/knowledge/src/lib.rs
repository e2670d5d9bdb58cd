//! The static knowledge base and its fuzzy matcher.
//!
//! A [`KnowledgeBase`] is built once at startup from configuration and never
//! mutated. Each lookup normalizes the query, scores it against every
//! normalized question with [`similarity::ratio`], and reports the best
//! entry. Whether that entry is good enough is the caller's call, via
//! [`KnowledgeBase::lookup`] or by comparing [`Match::score`] itself.

pub mod normalize;
pub mod similarity;

pub use normalize::normalize;
pub use similarity::ratio;

use askdesk_config::KnowledgeEntryConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// An immutable predefined question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub question: String,
    pub answer: String,
}

impl KnowledgeEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

impl From<&KnowledgeEntryConfig> for KnowledgeEntry {
    fn from(cfg: &KnowledgeEntryConfig) -> Self {
        Self::new(&cfg.question, &cfg.answer)
    }
}

/// The best-scoring entry for a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'kb> {
    pub entry: &'kb KnowledgeEntry,
    pub score: f64,
}

struct IndexedEntry {
    normalized: String,
    entry: KnowledgeEntry,
}

/// Ordered, read-only table of knowledge entries.
///
/// Order matters only for tie-breaking: on equal scores the earlier entry
/// wins.
pub struct KnowledgeBase {
    entries: Vec<IndexedEntry>,
}

impl KnowledgeBase {
    pub fn new(entries: impl IntoIterator<Item = KnowledgeEntry>) -> Self {
        let mut indexed: Vec<IndexedEntry> = Vec::new();
        for entry in entries {
            let normalized = normalize(&entry.question);
            if let Some(existing) = indexed.iter().find(|e| e.normalized == normalized) {
                // Equal normalized forms always tie, so the later one is unreachable.
                warn!(
                    question = %entry.question,
                    shadowed_by = %existing.entry.question,
                    "Knowledge entry is shadowed by an earlier entry with the same normalized question"
                );
            }
            indexed.push(IndexedEntry { normalized, entry });
        }
        debug!(count = indexed.len(), "Knowledge base built");
        Self { entries: indexed }
    }

    pub fn from_config(entries: &[KnowledgeEntryConfig]) -> Self {
        Self::new(entries.iter().map(KnowledgeEntry::from))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &KnowledgeEntry> {
        self.entries.iter().map(|e| &e.entry)
    }

    /// Score `query` against every entry and return the strictly best one.
    ///
    /// The query is trimmed and normalized here. Returns `None` when the
    /// table is empty or nothing scores above 0.0.
    pub fn best_match(&self, query: &str) -> Option<Match<'_>> {
        let query = normalize(query.trim());

        let mut best: Option<Match<'_>> = None;
        let mut best_score = 0.0;
        for indexed in &self.entries {
            let score = ratio(&query, &indexed.normalized);
            if score > best_score {
                best_score = score;
                best = Some(Match {
                    entry: &indexed.entry,
                    score,
                });
            }
        }
        best
    }

    /// The best match if its score reaches `threshold`.
    pub fn lookup(&self, query: &str, threshold: f64) -> Option<Match<'_>> {
        self.best_match(query).filter(|m| m.score >= threshold)
    }
}

impl Default for KnowledgeBase {
    /// The built-in professional Q&A table.
    fn default() -> Self {
        Self::from_config(&askdesk_config::default_knowledge())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f64 = 0.75;

    #[test]
    fn default_table_has_eight_entries() {
        let kb = KnowledgeBase::default();
        assert_eq!(kb.len(), 8);
        assert_eq!(
            kb.entries().next().map(|e| e.question.as_str()),
            Some("How can I improve team productivity?")
        );
    }

    #[test]
    fn exact_question_scores_one() {
        let kb = KnowledgeBase::default();
        let m = kb.lookup("How can I improve team productivity?", THRESHOLD).unwrap();
        assert!((m.score - 1.0).abs() < f64::EPSILON);
        assert_eq!(
            m.entry.answer,
            "Use daily stand-ups, set clear OKRs, and encourage time-blocking."
        );
    }

    #[test]
    fn every_entry_matches_itself() {
        let kb = KnowledgeBase::default();
        for entry in kb.entries() {
            let m = kb.best_match(&entry.question).unwrap();
            assert_eq!(m.entry, entry);
            assert!((m.score - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn casing_punctuation_and_padding_are_ignored() {
        let kb = KnowledgeBase::default();
        let m = kb.lookup("   HOW TO AVOID BURNOUT!!!   ", THRESHOLD).unwrap();
        assert_eq!(m.entry.question, "How to avoid burnout?");
        assert!((m.score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn close_paraphrases_match() {
        let kb = KnowledgeBase::default();
        let cases = [
            ("how do i avoid burnout", "How to avoid burnout?"),
            ("tips for remote working", "Tips for remote work?"),
            ("how to prioritise my tasks", "How to prioritize tasks?"),
            ("best practice for time managment", "Best practices for time management?"),
            ("whats the best way to run a meeting", "What’s the best way to run meetings?"),
        ];
        for (query, expected) in cases {
            let m = kb.lookup(query, THRESHOLD);
            assert_eq!(m.map(|m| m.entry.question.as_str()), Some(expected), "{query}");
        }
    }

    #[test]
    fn unrelated_question_falls_below_threshold() {
        let kb = KnowledgeBase::default();
        let best = kb.best_match("what is the capital of France").unwrap();
        assert!(best.score < THRESHOLD);
        assert!(kb.lookup("what is the capital of France", THRESHOLD).is_none());
    }

    #[test]
    fn punctuation_only_query_has_no_match() {
        let kb = KnowledgeBase::default();
        assert!(kb.best_match("???").is_none());
        assert!(kb.best_match("").is_none());
        assert!(kb.lookup("???", 0.0).is_none());
    }

    #[test]
    fn ties_keep_the_earlier_entry() {
        let kb = KnowledgeBase::new([
            KnowledgeEntry::new("abc", "first"),
            KnowledgeEntry::new("ABC!", "second"),
        ]);
        let m = kb.best_match("abc").unwrap();
        assert_eq!(m.entry.answer, "first");
    }

    #[test]
    fn equal_scores_on_different_entries_keep_order() {
        // "ab" scores 2·2/6 against both
        let kb = KnowledgeBase::new([
            KnowledgeEntry::new("abxx", "first"),
            KnowledgeEntry::new("abyy", "second"),
        ]);
        let m = kb.best_match("ab").unwrap();
        assert_eq!(m.entry.answer, "first");
    }

    #[test]
    fn empty_knowledge_base_never_matches() {
        let kb = KnowledgeBase::new(Vec::new());
        assert!(kb.is_empty());
        assert!(kb.best_match("How to avoid burnout?").is_none());
    }

    #[test]
    fn threshold_is_inclusive() {
        // ratio("abcd", "bcde") == 0.75
        let kb = KnowledgeBase::new([KnowledgeEntry::new("bcde", "hit")]);
        assert!(kb.lookup("abcd", 0.75).is_some());
        assert!(kb.lookup("abcd", 0.76).is_none());
    }

    #[test]
    fn entry_serializes_with_question_and_answer() {
        let entry = KnowledgeEntry::new("Q", "A");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"question":"Q","answer":"A"}"#);
    }
}
