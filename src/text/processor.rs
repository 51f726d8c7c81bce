//! Text cleanup, sentence splitting and statistics

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[^\w\s.!?,;:\-()'"]"#).expect("valid regex"));

static SPACE_BEFORE_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+([.!?,;:])").expect("valid regex"));

/// Clean raw text before it is summarized or returned from an upload.
///
/// Drops symbols outside word characters and basic punctuation, collapses
/// whitespace and capitalizes a lowercase first letter.
pub fn preprocess(text: &str) -> String {
    let text = DISALLOWED.replace_all(text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    let text = text.trim();

    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
        _ => text.to_string(),
    }
}

/// Whitespace-delimited word count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn is_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

fn is_closer(ch: char) -> bool {
    matches!(ch, '"' | '\'' | ')')
}

fn push_trimmed(sentences: &mut Vec<String>, candidate: &str) {
    let candidate = candidate.trim();
    if !candidate.is_empty() {
        sentences.push(candidate.to_string());
    }
}

/// Split text into sentences.
///
/// A sentence ends after a run of `.`, `!` or `?` (plus trailing quotes or a
/// closing parenthesis) that is followed by whitespace or the end of input,
/// so decimals like `3.5` stay intact.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !is_terminator(ch) {
            continue;
        }

        let mut end = idx + ch.len_utf8();
        while let Some(&(next_idx, next)) = chars.peek() {
            if is_terminator(next) || is_closer(next) {
                end = next_idx + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        let at_boundary = chars.peek().map_or(true, |&(_, next)| next.is_whitespace());
        if at_boundary {
            push_trimmed(&mut sentences, &text[start..end]);
            start = end;
        }
    }

    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

/// Greedily pack whole sentences into chunks of at most `max_chars` characters.
///
/// A single sentence longer than the limit becomes its own chunk.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(text) {
        let projected = current.chars().count() + sentence.chars().count();
        if current.is_empty() || projected < max_chars {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&sentence);
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(&sentence);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Basic statistics about a text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStatistics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub character_count: usize,
    pub character_count_no_spaces: usize,
    pub avg_words_per_sentence: f64,
    pub avg_chars_per_word: f64,
}

pub fn statistics(text: &str) -> TextStatistics {
    let words: Vec<&str> = text.split_whitespace().collect();
    let sentence_count = split_sentences(text).len();
    let word_chars: usize = words.iter().map(|w| w.chars().count()).sum();

    TextStatistics {
        word_count: words.len(),
        sentence_count,
        character_count: text.chars().count(),
        character_count_no_spaces: text.chars().filter(|c| *c != ' ').count(),
        avg_words_per_sentence: if sentence_count > 0 {
            words.len() as f64 / sentence_count as f64
        } else {
            0.0
        },
        avg_chars_per_word: if words.is_empty() {
            0.0
        } else {
            word_chars as f64 / words.len() as f64
        },
    }
}

/// Language guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
    French,
    Unknown,
}

const ENGLISH_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];
const SPANISH_WORDS: &[&str] = &[
    "el", "la", "y", "o", "pero", "en", "a", "para", "de", "con", "por",
];
const FRENCH_WORDS: &[&str] = &[
    "le", "la", "et", "ou", "mais", "dans", "à", "pour", "de", "avec", "par",
];

/// Guess the language from overlap with common function words.
///
/// Returns `Unknown` unless one language strictly leads.
pub fn detect_language(text: &str) -> Language {
    let lowered = text.to_lowercase();
    let words: std::collections::HashSet<&str> = lowered.split_whitespace().collect();
    let overlap = |vocab: &[&str]| vocab.iter().filter(|w| words.contains(*w)).count();

    let english = overlap(ENGLISH_WORDS);
    let spanish = overlap(SPANISH_WORDS);
    let french = overlap(FRENCH_WORDS);

    if english > spanish && english > french {
        Language::English
    } else if spanish > english && spanish > french {
        Language::Spanish
    } else if french > english && french > spanish {
        Language::French
    } else {
        Language::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_collapses_whitespace_and_symbols() {
        assert_eq!(preprocess("  hello   @world\n\nagain  "), "Hello world again");
        assert_eq!(preprocess("Price is 5 $ ."), "Price is 5.");
        assert_eq!(preprocess("Hello world"), "Hello world");
    }

    #[test]
    fn test_preprocess_keeps_apostrophes() {
        assert_eq!(preprocess("don't stop"), "Don't stop");
    }

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("One here. Two there! Is it three? Yes");
        assert_eq!(sentences, vec!["One here.", "Two there!", "Is it three?", "Yes"]);
    }

    #[test]
    fn test_split_sentences_keeps_decimals() {
        let sentences = split_sentences("Version 3.5 shipped. It works.");
        assert_eq!(sentences, vec!["Version 3.5 shipped.", "It works."]);
    }

    #[test]
    fn test_split_sentences_with_closers() {
        let sentences = split_sentences("He said \"stop.\" Then left.");
        assert_eq!(sentences, vec!["He said \"stop.\"", "Then left."]);
    }

    #[test]
    fn test_chunk_text_respects_limit() {
        let text = "Alpha beta gamma. Delta epsilon zeta. Eta theta iota.";
        let chunks = chunk_text(text, 40);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "Alpha beta gamma. Delta epsilon zeta.");
        assert_eq!(chunks[1], "Eta theta iota.");
    }

    #[test]
    fn test_chunk_text_oversized_sentence() {
        let chunks = chunk_text("Short one. This sentence is rather long indeed.", 12);
        assert_eq!(chunks, vec!["Short one.", "This sentence is rather long indeed."]);
    }

    #[test]
    fn test_statistics() {
        let stats = statistics("Hello world. Bye now.");
        assert_eq!(stats.word_count, 4);
        assert_eq!(stats.sentence_count, 2);
        assert_eq!(stats.character_count, 21);
        assert_eq!(stats.character_count_no_spaces, 18);
        assert!((stats.avg_words_per_sentence - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_statistics_empty() {
        let stats = statistics("");
        assert_eq!(stats.word_count, 0);
        assert_eq!(stats.avg_words_per_sentence, 0.0);
        assert_eq!(stats.avg_chars_per_word, 0.0);
    }

    #[test]
    fn test_detect_language() {
        assert_eq!(
            detect_language("The cat sat on the mat and looked at the dog"),
            Language::English
        );
        assert_eq!(
            detect_language("El perro come pero el gato duerme con calma"),
            Language::Spanish
        );
        assert_eq!(
            detect_language("Le chat et le chien dans la maison avec nous"),
            Language::French
        );
        assert_eq!(detect_language("xyz qwerty"), Language::Unknown);
    }
}
