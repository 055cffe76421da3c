//! Bag-of-words keyword extraction for Russian and English video text.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Filler and marketing words that say nothing about a video's subject
const STOP_WORDS: &[&str] = &[
    // Russian
    "для", "детей", "лет", "года", "видео", "смотреть", "онлайн", "бесплатно",
    "развивающее", "обучающее", "детское", "мультик", "мультфильм", "серия",
    "эпизод", "полная", "новый", "новая", "новые", "лучший", "лучшая", "лучшие",
    "смотри", "все", "самый", "самая", "самые", "как", "что", "это", "про",
    // English
    "for", "the", "and", "with", "from", "are", "was", "were",
    "video", "videos", "watch", "online", "free", "subscribe", "like", "share",
    "episode", "full", "new", "compilation", "hours", "hour", "minutes",
    "channel", "show", "series", "collection", "official", "page",
    "how", "what", "why", "when", "where", "this", "that", "these", "those",
];

static STOP_WORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORD_SET.contains(word)
}

fn is_kept_char(c: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&c)
        || c.is_ascii_lowercase()
        || c.is_ascii_digit()
        || c.is_whitespace()
}

/// Lowercases, replaces anything but Cyrillic/Latin letters, digits and
/// whitespace with a space, and splits into tokens.
fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_kept_char(c) { c } else { ' ' })
        .collect();

    cleaned.split_whitespace().map(str::to_string).collect()
}

/// Returns up to `max_words` distinct keywords ordered by descending frequency.
///
/// Tokens of two characters or fewer and stop words are discarded. Ties keep
/// the order in which the words first appear in `text`.
pub fn extract_keywords(text: &str, max_words: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    // (word, count) in first-seen order
    let mut frequencies: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for word in tokenize(text) {
        if word.chars().count() <= 2 || is_stop_word(&word) {
            continue;
        }

        match positions.get(&word) {
            Some(&idx) => frequencies[idx].1 += 1,
            None => {
                positions.insert(word.clone(), frequencies.len());
                frequencies.push((word, 1));
            }
        }
    }

    // sort_by is stable, so equal counts stay in first-seen order
    frequencies.sort_by(|a, b| b.1.cmp(&a.1));

    frequencies
        .into_iter()
        .take(max_words)
        .map(|(word, _)| word)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_then_first_seen_order() {
        let keywords = extract_keywords("Учим алфавит учим цифры", 10);
        assert_eq!(keywords, vec!["учим", "алфавит", "цифры"]);
    }

    #[test]
    fn test_only_stop_words_and_short_tokens() {
        assert!(extract_keywords("для детей the and a an по video FREE", 10).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_keywords("", 10).is_empty());
        assert!(extract_keywords("   \n\t", 10).is_empty());
    }

    #[test]
    fn test_strips_punctuation_and_symbols() {
        let keywords = extract_keywords("Dinosaurs!!! dinosaurs, (DINOSAURS) #space 🚀space", 10);
        assert_eq!(keywords, vec!["dinosaurs", "space"]);
    }

    #[test]
    fn test_hyphen_splits_words() {
        let keywords = extract_keywords("мастер-класс оригами", 10);
        assert_eq!(keywords, vec!["мастер", "класс", "оригами"]);
    }

    #[test]
    fn test_respects_max_words() {
        let keywords = extract_keywords("one two three four five six seven", 3);
        assert_eq!(keywords, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_digits_are_kept() {
        let keywords = extract_keywords("count to 100 and 100 again", 10);
        assert_eq!(keywords, vec!["100", "count", "again"]);
    }

    #[test]
    fn test_non_cyrillic_non_latin_letters_are_separators() {
        // Greek and accented Latin letters are outside the kept alphabets
        let keywords = extract_keywords("café αβγ naïve", 10);
        assert_eq!(keywords, vec!["caf"]);
    }
}
