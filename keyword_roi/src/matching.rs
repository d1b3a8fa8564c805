//! Matching locally observed keywords against report keywords.
//!
//! Candidates are tried in order of strength: an exact match on the
//! normalized text, then one text containing the other, then character
//! bigram similarity. Both non-exact kinds must score at least
//! [`SIMILARITY_THRESHOLD`].

use crate::report::{KeywordMetrics, KeywordReport};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lowest score accepted for a containment or similarity match
pub const SIMILARITY_THRESHOLD: f64 = 0.85;

/// Lower-case and trim a keyword
pub fn normalize_keyword(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

/// How a local keyword was paired with a report keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Containment,
    Similar,
}

/// A local keyword paired with report metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMatch {
    /// Keyword as given by the caller
    pub local: String,
    /// Normalized report keyword it matched
    pub remote: String,
    pub kind: MatchKind,
    /// 1.0 for exact, length ratio for containment, Dice for similar
    pub score: f64,
    pub metrics: KeywordMetrics,
}

fn bigrams(text: &str) -> HashMap<(char, char), usize> {
    let chars: Vec<char> = text.chars().collect();
    let mut counts = HashMap::new();
    for pair in chars.windows(2) {
        *counts.entry((pair[0], pair[1])).or_insert(0) += 1;
    }
    counts
}

/// Sørensen–Dice coefficient over character bigrams, in `[0, 1]`.
///
/// Strings too short to have a bigram score 1.0 when equal and 0.0 otherwise.
pub fn dice_coefficient(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let (left, right) = (bigrams(a), bigrams(b));
    let total: usize = left.values().sum::<usize>() + right.values().sum::<usize>();
    if total == 0 {
        return 0.0;
    }

    let shared: usize = left
        .iter()
        .map(|(pair, count)| (*count).min(right.get(pair).copied().unwrap_or(0)))
        .sum();
    2.0 * shared as f64 / total as f64
}

fn containment_score(a: &str, b: &str) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    longer
        .contains(shorter)
        .then(|| shorter.chars().count() as f64 / longer.chars().count() as f64)
        .filter(|score| *score >= SIMILARITY_THRESHOLD)
}

/// Best report keyword for `keyword`, if any qualifies.
///
/// Among several candidates of the same kind the highest score wins, and
/// ties go to the alphabetically first report keyword.
pub fn best_match<'r>(
    keyword: &str,
    report: &'r KeywordReport,
) -> Option<(&'r str, MatchKind, f64)> {
    let needle = normalize_keyword(keyword);
    if needle.is_empty() {
        return None;
    }

    if let Some((remote, _)) = report.get_key_value(&needle) {
        return Some((remote.as_str(), MatchKind::Exact, 1.0));
    }

    let contained = best_scoring(report, |remote| containment_score(&needle, remote));
    if let Some((remote, score)) = contained {
        return Some((remote, MatchKind::Containment, score));
    }

    best_scoring(report, |remote| {
        Some(dice_coefficient(&needle, remote)).filter(|s| *s >= SIMILARITY_THRESHOLD)
    })
    .map(|(remote, score)| (remote, MatchKind::Similar, score))
}

/// Highest-scoring report keyword; the first one wins a tie
fn best_scoring<'r, F>(report: &'r KeywordReport, score: F) -> Option<(&'r str, f64)>
where
    F: Fn(&str) -> Option<f64>,
{
    let mut best: Option<(&'r str, f64)> = None;
    for remote in report.keys() {
        if let Some(s) = score(remote.as_str()) {
            if best.map_or(true, |(_, b)| s > b) {
                best = Some((remote.as_str(), s));
            }
        }
    }
    best
}

/// Pair each local keyword with report metrics; unmatched keywords are left out
pub fn match_keywords<S: AsRef<str>>(local: &[S], report: &KeywordReport) -> Vec<KeywordMatch> {
    local
        .iter()
        .filter_map(|keyword| {
            let keyword = keyword.as_ref();
            let (remote, kind, score) = best_match(keyword, report)?;
            Some(KeywordMatch {
                local: keyword.to_string(),
                remote: remote.to_string(),
                kind,
                score,
                metrics: report.get(remote).copied().unwrap_or_default(),
            })
        })
        .collect()
}
