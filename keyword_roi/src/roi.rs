//! Return on ad spend per keyword

use crate::matching::{best_match, MatchKind};
use crate::report::KeywordReport;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Revenue attributed to a keyword by the local analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalKeyword {
    pub keyword: String,
    pub revenue: f64,
}

impl LocalKeyword {
    pub fn new(keyword: impl Into<String>, revenue: f64) -> Self {
        Self {
            keyword: keyword.into(),
            revenue,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoiRating {
    /// At least 2x
    Good,
    /// At least break-even
    Okay,
    Poor,
}

impl RoiRating {
    pub fn from_roi(roi: f64) -> Self {
        if roi >= 2.0 {
            RoiRating::Good
        } else if roi >= 1.0 {
            RoiRating::Okay
        } else {
            RoiRating::Poor
        }
    }
}

/// One local keyword joined with its spend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRoi {
    pub keyword: String,
    pub revenue: f64,
    /// Report keyword that supplied the spend
    pub matched: Option<String>,
    pub match_kind: Option<MatchKind>,
    pub spend: Option<f64>,
    /// `revenue / spend`; `None` without positive spend
    pub roi: Option<f64>,
    pub rating: Option<RoiRating>,
}

/// Join every local keyword with the report
pub fn keyword_roi(local: &[LocalKeyword], report: &KeywordReport) -> Vec<KeywordRoi> {
    local
        .iter()
        .map(|entry| {
            let found = best_match(&entry.keyword, report);
            let spend = found.and_then(|(remote, _, _)| report.get(remote).map(|m| m.spend));
            let roi = spend.filter(|s| *s > 0.0).map(|s| entry.revenue / s);

            KeywordRoi {
                keyword: entry.keyword.clone(),
                revenue: entry.revenue,
                matched: found.map(|(remote, _, _)| remote.to_string()),
                match_kind: found.map(|(_, kind, _)| kind),
                spend,
                roi,
                rating: roi.map(RoiRating::from_roi),
            }
        })
        .collect()
}

/// Totals over a set of keyword rows
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiSummary {
    pub total_revenue: f64,
    pub total_spend: f64,
    /// `None` when nothing was spent
    #[serde(rename = "overallROI")]
    pub overall_roi: Option<f64>,
    pub matched_keywords: usize,
    pub total_keywords: usize,
    /// Share of keywords with spend data, `0.0` for an empty set
    pub match_rate: f64,
}

impl RoiSummary {
    pub fn from_rows(rows: &[KeywordRoi]) -> Self {
        let total_revenue: f64 = rows.iter().map(|r| r.revenue).sum();
        let total_spend: f64 = rows.iter().filter_map(|r| r.spend).sum();
        let matched_keywords = rows.iter().filter(|r| r.matched.is_some()).count();
        let total_keywords = rows.len();

        let summary = Self {
            total_revenue,
            total_spend,
            overall_roi: (total_spend > 0.0).then(|| total_revenue / total_spend),
            matched_keywords,
            total_keywords,
            match_rate: if total_keywords > 0 {
                matched_keywords as f64 / total_keywords as f64
            } else {
                0.0
            },
        };
        debug!(matched_keywords, total_keywords, "summarized keyword roi");
        summary
    }
}
