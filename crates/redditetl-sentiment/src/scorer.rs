//! Rule-based compound polarity scorer.
//!
//! Each token that carries a lexicon valence contributes to a running sum,
//! adjusted for all-caps emphasis, preceding intensifiers, preceding negators
//! and a contrastive `but`. Trailing `!`/`?` amplify the sum, which is then
//! squashed into `[-1.0, 1.0]`.

use crate::lexicon::{booster, is_negator, valence};

/// Scalar added by an intensifier ("very good").
pub(crate) const B_INCR: f64 = 0.293;
/// Scalar added by a dampener ("slightly good").
pub(crate) const B_DECR: f64 = -0.293;
/// Emphasis added to an ALL-CAPS sentiment word in mixed-case text.
const C_INCR: f64 = 0.733;
/// Multiplier applied to a negated sentiment word.
const N_SCALAR: f64 = -0.74;
/// Normalization constant approximating the max expected raw sum.
const ALPHA: f64 = 15.0;

/// Weight of a modifier found 1, 2 or 3 tokens before the sentiment word.
const DISTANCE_DECAY: [f64; 3] = [1.0, 0.95, 0.9];

/// Compound polarity of `text` in `[-1.0, 1.0]`, rounded to four decimals.
///
/// Returns `0.0` for empty text or text with no sentiment-bearing tokens.
#[must_use]
pub fn polarity_score(text: &str) -> f64 {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return 0.0;
    }
    let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
    let cap_diff = has_cap_differential(&tokens);

    let mut sentiments = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        let word = lowered[i].as_str();
        if booster(word).is_some() {
            sentiments.push(0.0);
            continue;
        }
        if word == "kind" && lowered.get(i + 1).is_some_and(|n| n == "of") {
            sentiments.push(0.0);
            continue;
        }
        let Some(mut v) = valence(word) else {
            sentiments.push(0.0);
            continue;
        };

        if cap_diff && is_shouting(token) {
            v += C_INCR.copysign(v);
        }

        for (distance, decay) in DISTANCE_DECAY.iter().enumerate() {
            if i <= distance {
                break;
            }
            let prev_idx = i - distance - 1;
            let prev = lowered[prev_idx].as_str();
            if valence(prev).is_some() {
                continue;
            }
            v += modifier_scalar(prev, &tokens[prev_idx], v, cap_diff) * decay;
            v = apply_negation(v, &lowered, i, distance);
        }

        sentiments.push(v);
    }

    apply_but_rule(&lowered, &mut sentiments);

    let mut sum: f64 = sentiments.iter().sum();
    let emphasis = punctuation_emphasis(text);
    if sum > 0.0 {
        sum += emphasis;
    } else if sum < 0.0 {
        sum -= emphasis;
    }

    round4(normalize(sum))
}

/// Splits on whitespace and strips surrounding punctuation, except where
/// stripping would leave two characters or fewer (keeps emoticons intact).
fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|raw| {
            let stripped = raw.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.chars().count() <= 2 {
                raw
            } else {
                stripped
            }
        })
        .collect()
}

fn is_shouting(token: &str) -> bool {
    token.chars().any(char::is_alphabetic) && !token.chars().any(char::is_lowercase)
}

/// True when some, but not all, tokens are ALL CAPS.
fn has_cap_differential(tokens: &[&str]) -> bool {
    let shouted = tokens.iter().filter(|t| is_shouting(t)).count();
    shouted > 0 && shouted < tokens.len()
}

fn modifier_scalar(word_lower: &str, raw: &str, valence: f64, cap_diff: bool) -> f64 {
    let Some(mut scalar) = booster(word_lower) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if cap_diff && is_shouting(raw) {
        scalar += C_INCR.copysign(valence);
    }
    scalar
}

fn apply_negation(valence: f64, lowered: &[String], i: usize, distance: usize) -> f64 {
    let prev = |back: usize| lowered[i - back].as_str();
    match distance {
        0 if is_negator(prev(1)) => valence * N_SCALAR,
        1 | 2 => {
            let far = prev(distance + 1);
            let near = prev(distance);
            if far == "never" && (near == "so" || near == "this") {
                valence * 1.25
            } else if far == "without" && near == "doubt" {
                valence
            } else if is_negator(far) {
                valence * N_SCALAR
            } else {
                valence
            }
        }
        _ => valence,
    }
}

/// Sentiment before a contrastive `but` is halved, after it amplified by half.
fn apply_but_rule(lowered: &[String], sentiments: &mut [f64]) {
    let Some(pivot) = lowered.iter().position(|w| w == "but") else {
        return;
    };
    for (idx, s) in sentiments.iter_mut().enumerate() {
        if idx < pivot {
            *s *= 0.5;
        } else if idx > pivot {
            *s *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclaims = text.matches('!').count().min(4);
    let questions = text.matches('?').count();
    #[allow(clippy::cast_precision_loss)]
    let exclaim_amp = exclaims as f64 * 0.292;
    #[allow(clippy::cast_precision_loss)]
    let question_amp = match questions {
        0 | 1 => 0.0,
        2..=3 => questions as f64 * 0.18,
        _ => 0.96,
    };
    exclaim_amp + question_amp
}

fn normalize(sum: f64) -> f64 {
    (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
