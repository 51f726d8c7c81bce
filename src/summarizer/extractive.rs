//! Extractive sentence selection
//!
//! Scores each sentence by its centrality: the summed cosine similarity of
//! its term-frequency vector to every other sentence. The top sentences are
//! returned in document order.

use std::collections::HashMap;

use crate::text::split_sentences;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have", "he",
    "her", "his", "i", "in", "is", "it", "its", "of", "on", "or", "she", "that", "the", "their",
    "they", "this", "to", "was", "we", "were", "which", "with", "you",
];

/// Sparse term-frequency vector with a cached norm
struct TermVector {
    counts: HashMap<String, f64>,
    norm: f64,
}

impl TermVector {
    fn from_sentence(sentence: &str) -> Self {
        let mut counts: HashMap<String, f64> = HashMap::new();
        for token in sentence
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .filter(|t| !STOPWORDS.contains(&t.as_str()))
        {
            *counts.entry(token).or_insert(0.0) += 1.0;
        }
        let norm = counts.values().map(|v| v * v).sum::<f64>().sqrt();
        Self { counts, norm }
    }

    fn cosine(&self, other: &TermVector) -> f64 {
        if self.norm == 0.0 || other.norm == 0.0 {
            return 0.0;
        }
        let (small, large) = if self.counts.len() <= other.counts.len() {
            (&self.counts, &other.counts)
        } else {
            (&other.counts, &self.counts)
        };
        let dot: f64 = small
            .iter()
            .filter_map(|(term, a)| large.get(term).map(|b| a * b))
            .sum();
        dot / (self.norm * other.norm)
    }
}

/// Indices of the `max_sentences` most central sentences, in document order.
///
/// Ties keep the earlier sentence.
pub fn select_sentences(sentences: &[String], max_sentences: usize) -> Vec<usize> {
    if sentences.len() <= max_sentences {
        return (0..sentences.len()).collect();
    }

    let vectors: Vec<TermVector> = sentences.iter().map(|s| TermVector::from_sentence(s)).collect();
    let scores: Vec<f64> = vectors
        .iter()
        .enumerate()
        .map(|(i, v)| {
            vectors
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, other)| v.cosine(other))
                .sum()
        })
        .collect();

    let mut ranked: Vec<usize> = (0..sentences.len()).collect();
    ranked.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    ranked.truncate(max_sentences);
    ranked.sort_unstable();
    ranked
}

/// Keep at most `max_words` whitespace-delimited words
pub fn cap_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        text.to_string()
    } else {
        words[..max_words].join(" ")
    }
}

/// Extractive summary of at most `max_sentences` sentences and `max_words` words
pub fn summarize(text: &str, max_sentences: usize, max_words: usize) -> String {
    let sentences = split_sentences(text);
    let selected = select_sentences(&sentences, max_sentences);
    let summary = selected
        .into_iter()
        .map(|i| sentences[i].as_str())
        .collect::<Vec<_>>()
        .join(" ");
    cap_words(&summary, max_words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_returned_whole() {
        let summary = summarize("Only one sentence here. And a second.", 3, 150);
        assert_eq!(summary, "Only one sentence here. And a second.");
    }

    #[test]
    fn test_identical_sentences_keep_document_order() {
        let text = "This is a test text for summarization. ".repeat(10);
        let summary = summarize(&text, 3, 150);
        assert_eq!(
            summary,
            "This is a test text for summarization. This is a test text for summarization. \
             This is a test text for summarization."
        );
    }

    #[test]
    fn test_off_topic_sentence_dropped() {
        let text = "Rust compilers check ownership rules. \
                    The ownership rules in Rust prevent data races. \
                    Bananas are yellow fruit. \
                    Rust ownership rules are checked at compile time.";
        let sentences = split_sentences(text);
        let selected = select_sentences(&sentences, 3);
        assert_eq!(selected, vec![0, 1, 3]);
    }

    #[test]
    fn test_cap_words() {
        assert_eq!(cap_words("one two three four", 2), "one two");
        assert_eq!(cap_words("one two", 5), "one two");
    }

    #[test]
    fn test_summary_respects_word_cap() {
        let text = "Alpha beta gamma delta. Epsilon zeta eta theta. Iota kappa lambda mu.";
        let summary = summarize(text, 3, 5);
        assert_eq!(summary.split_whitespace().count(), 5);
    }
}
