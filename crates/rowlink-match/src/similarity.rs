//! Fuzzy string similarity on a 0–100 scale.
//!
//! Every ratio is built on the normalized indel similarity from `rapidfuzz`
//! and scaled to percent. The token variants normalize their inputs first
//! (lowercase, punctuation to spaces, collapsed whitespace); `ratio` and
//! `partial_ratio` compare the strings as given.

use std::collections::BTreeSet;

use rapidfuzz::distance::indel;
use serde::{Deserialize, Serialize};

/// Pairwise similarity between two cell values, bounded to `[0, 100]`.
///
/// Closures of the right shape implement this trait, which keeps
/// deterministic stub scorers one line long in tests.
pub trait Similarity: Send + Sync {
    fn score(&self, a: &str, b: &str) -> f64;
}

impl<F> Similarity for F
where
    F: Fn(&str, &str) -> f64 + Send + Sync,
{
    fn score(&self, a: &str, b: &str) -> f64 {
        self(a, b)
    }
}

/// Weighted-ratio scorer, robust to token reordering and partial overlap.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRatio;

impl Similarity for WeightedRatio {
    fn score(&self, a: &str, b: &str) -> f64 {
        weighted_ratio(a, b)
    }
}

/// Length- and shape-dependent scorer for short, single-field values.
///
/// - either value two characters or shorter: [`partial_ratio`]
/// - either value hyphenated or multi-word: [`token_set_ratio`]
/// - otherwise: [`ratio`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptiveRatio;

impl Similarity for AdaptiveRatio {
    fn score(&self, a: &str, b: &str) -> f64 {
        let a = a.trim().to_lowercase();
        let b = b.trim().to_lowercase();
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        if a.chars().count() <= 2 || b.chars().count() <= 2 {
            partial_ratio(&a, &b)
        } else if is_compound(&a) || is_compound(&b) {
            token_set_ratio(&a, &b)
        } else {
            ratio(&a, &b)
        }
    }
}

fn is_compound(value: &str) -> bool {
    value.contains('-') || value.contains(' ')
}

/// Named scorer selection used by configuration files and the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    #[default]
    Weighted,
    Adaptive,
}

impl Similarity for ScorerKind {
    fn score(&self, a: &str, b: &str) -> f64 {
        match self {
            ScorerKind::Weighted => WeightedRatio.score(a, b),
            ScorerKind::Adaptive => AdaptiveRatio.score(a, b),
        }
    }
}

const UNBASE_SCALE: f64 = 0.95;
const PARTIAL_SCALE: f64 = 0.9;
const LONG_PARTIAL_SCALE: f64 = 0.6;
const PARTIAL_LENGTH_RATIO: f64 = 1.5;
const LONG_LENGTH_RATIO: f64 = 8.0;

/// Indel similarity of the raw strings, 0 when either is empty.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    indel::normalized_similarity(a.chars(), b.chars()) * 100.0
}

/// Best [`ratio`] of the shorter string against windows of the longer one.
///
/// Besides every equally long window, the shorter string is slid partly off
/// either edge, so a suffix of it can align with the start of the longer
/// string and a prefix with its end.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if shorter.is_empty() {
        return 0.0;
    }

    let (needle, haystack) = (shorter.len(), longer.len());
    let windows = (1..needle)
        .map(|end| &longer[..end])
        .chain(longer.windows(needle))
        .chain((haystack - needle + 1..haystack).map(|start| &longer[start..]));

    let mut best = 0.0_f64;
    for window in windows {
        let score =
            indel::normalized_similarity(shorter.iter().copied(), window.iter().copied()) * 100.0;
        if score > 99.5 {
            return 100.0;
        }
        best = best.max(score);
    }
    best
}

pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(&normalize(a)), &sorted_tokens(&normalize(b)))
}

pub fn partial_token_sort_ratio(a: &str, b: &str) -> f64 {
    partial_ratio(&sorted_tokens(&normalize(a)), &sorted_tokens(&normalize(b)))
}

pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    token_set_with(&normalize(a), &normalize(b), ratio)
}

pub fn partial_token_set_ratio(a: &str, b: &str) -> f64 {
    token_set_with(&normalize(a), &normalize(b), partial_ratio)
}

/// Weighted combination of the ratios above, rounded to a whole percent.
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let base = ratio(&a, &b);
    let (len_a, len_b) = (a.chars().count() as f64, b.chars().count() as f64);
    let length_ratio = len_a.max(len_b) / len_a.min(len_b);

    let best = if length_ratio < PARTIAL_LENGTH_RATIO {
        let sort = ratio(&sorted_tokens(&a), &sorted_tokens(&b)) * UNBASE_SCALE;
        let set = token_set_with(&a, &b, ratio) * UNBASE_SCALE;
        base.max(sort).max(set)
    } else {
        let partial_scale = if length_ratio > LONG_LENGTH_RATIO {
            LONG_PARTIAL_SCALE
        } else {
            PARTIAL_SCALE
        };
        let partial = partial_ratio(&a, &b) * partial_scale;
        let sort =
            partial_ratio(&sorted_tokens(&a), &sorted_tokens(&b)) * UNBASE_SCALE * partial_scale;
        let set = token_set_with(&a, &b, partial_ratio) * UNBASE_SCALE * partial_scale;
        base.max(partial).max(sort).max(set)
    };
    best.round()
}

/// Lowercase, replace non-alphanumerics with spaces and collapse whitespace.
pub fn normalize(value: &str) -> String {
    value
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() {
                ch.to_lowercase().next().unwrap_or(ch)
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn sorted_tokens(value: &str) -> String {
    let mut tokens: Vec<&str> = value.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_set_with(a: &str, b: &str, scorer: fn(&str, &str) -> f64) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let common = join(tokens_a.intersection(&tokens_b));
    let only_a = join(tokens_a.difference(&tokens_b));
    let only_b = join(tokens_b.difference(&tokens_a));
    let combined_a = format!("{common} {only_a}").trim().to_string();
    let combined_b = format!("{common} {only_b}").trim().to_string();

    scorer(&common, &combined_a)
        .max(scorer(&common, &combined_b))
        .max(scorer(&combined_a, &combined_b))
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}
