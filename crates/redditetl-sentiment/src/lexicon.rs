//! Word valences, intensity modifiers and negators.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Word valences on a `[-4.0, 4.0]` scale, one `token<TAB>mean` entry per
/// line. Extra tab-separated columns (standard deviation, raw ratings) are
/// ignored, so the upstream VADER file drops in unchanged.
const VALENCE_SOURCE: &str = include_str!("vader_lexicon.txt");

/// Parsed valences keyed by lowercase token. The first entry for a token wins.
static VALENCE: LazyLock<HashMap<String, f64>> = LazyLock::new(|| parse_valences(VALENCE_SOURCE));

fn parse_valences(source: &str) -> HashMap<String, f64> {
    let mut table = HashMap::with_capacity(source.len() / 12);
    for line in source.lines() {
        let mut fields = line.split('\t');
        let (Some(token), Some(mean)) = (fields.next(), fields.next()) else {
            continue;
        };
        let token = token.trim();
        let Ok(mean) = mean.trim().parse::<f64>() else {
            continue;
        };
        if token.is_empty() {
            continue;
        }
        table.entry(token.to_lowercase()).or_insert(mean);
    }
    table
}

/// Intensity modifiers: words that scale the following sentiment word.
pub(crate) const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", super::scorer::B_INCR),
    ("amazingly", super::scorer::B_INCR),
    ("completely", super::scorer::B_INCR),
    ("considerably", super::scorer::B_INCR),
    ("decidedly", super::scorer::B_INCR),
    ("deeply", super::scorer::B_INCR),
    ("enormously", super::scorer::B_INCR),
    ("entirely", super::scorer::B_INCR),
    ("especially", super::scorer::B_INCR),
    ("exceptionally", super::scorer::B_INCR),
    ("extremely", super::scorer::B_INCR),
    ("fully", super::scorer::B_INCR),
    ("greatly", super::scorer::B_INCR),
    ("hella", super::scorer::B_INCR),
    ("highly", super::scorer::B_INCR),
    ("hugely", super::scorer::B_INCR),
    ("incredibly", super::scorer::B_INCR),
    ("intensely", super::scorer::B_INCR),
    ("majorly", super::scorer::B_INCR),
    ("more", super::scorer::B_INCR),
    ("most", super::scorer::B_INCR),
    ("particularly", super::scorer::B_INCR),
    ("purely", super::scorer::B_INCR),
    ("quite", super::scorer::B_INCR),
    ("really", super::scorer::B_INCR),
    ("remarkably", super::scorer::B_INCR),
    ("so", super::scorer::B_INCR),
    ("substantially", super::scorer::B_INCR),
    ("thoroughly", super::scorer::B_INCR),
    ("totally", super::scorer::B_INCR),
    ("tremendously", super::scorer::B_INCR),
    ("truly", super::scorer::B_INCR),
    ("unbelievably", super::scorer::B_INCR),
    ("unusually", super::scorer::B_INCR),
    ("utterly", super::scorer::B_INCR),
    ("very", super::scorer::B_INCR),
    ("almost", super::scorer::B_DECR),
    ("barely", super::scorer::B_DECR),
    ("hardly", super::scorer::B_DECR),
    ("kinda", super::scorer::B_DECR),
    ("less", super::scorer::B_DECR),
    ("little", super::scorer::B_DECR),
    ("marginally", super::scorer::B_DECR),
    ("occasionally", super::scorer::B_DECR),
    ("partly", super::scorer::B_DECR),
    ("scarcely", super::scorer::B_DECR),
    ("slightly", super::scorer::B_DECR),
    ("somewhat", super::scorer::B_DECR),
    ("sorta", super::scorer::B_DECR),
];

/// Words that flip the polarity of a following sentiment word.
pub(crate) const NEGATORS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont", "hadnt",
    "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "never", "no", "nobody", "none",
    "nope", "nor", "not", "nothing", "nowhere", "shant", "shouldnt", "wasnt", "werent", "without",
    "wont", "wouldnt", "rarely", "seldom", "despite",
];

pub(crate) fn valence(word_lower: &str) -> Option<f64> {
    VALENCE.get(word_lower).copied()
}

pub(crate) fn booster(word_lower: &str) -> Option<f64> {
    BOOSTERS
        .iter()
        .find(|(w, _)| *w == word_lower)
        .map(|&(_, v)| v)
}

pub(crate) fn is_negator(word_lower: &str) -> bool {
    NEGATORS.contains(&word_lower) || word_lower.contains("n't")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiled_lexicon_is_loaded() {
        assert!(VALENCE.len() > 2000, "only {} entries", VALENCE.len());
    }

    #[test]
    fn looks_up_common_title_words() {
        assert_eq!(valence("fails"), Some(-1.8));
        assert_eq!(valence("lol"), Some(1.8));
        assert_eq!(valence("celebrates"), Some(2.7));
        assert_eq!(valence("good"), Some(1.9));
        assert_eq!(valence("fox"), None);
    }

    #[test]
    fn emoticons_are_keyed_lowercase() {
        assert!(valence(":d").is_some_and(|v| v > 0.0));
        assert!(valence(":(").is_some_and(|v| v < 0.0));
    }

    #[test]
    fn parser_skips_malformed_lines_and_keeps_first_entry() {
        let source = "ok\t1.5\t0.5\t[1, 2]\n\nbroken line\nnan\tx\nOK\t-3.0\nXD\t1.4\n";
        let table = parse_valences(source);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("ok"), Some(&1.5));
        assert_eq!(table.get("xd"), Some(&1.4));
    }
}
