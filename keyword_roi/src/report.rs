//! Keyword report request and response.
//!
//! Rows without a keyword are skipped and missing metrics count as zero.

use crate::error::Result;
use crate::matching::normalize_keyword;
use crate::range::DateRange;
use chrono::NaiveDate;
use revenue_forecast::parse_currency;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Endpoint the request body is posted to
pub const KEYWORD_REPORT_URL: &str = "https://api.searchads.apple.com/api/v5/reports/campaigns/keywords";

/// Rows requested per page
pub const REPORT_PAGE_LIMIT: u32 = 1000;

/// Spend and funnel counts for one keyword
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMetrics {
    pub spend: f64,
    pub impressions: u64,
    pub taps: u64,
    pub installs: u64,
}

impl KeywordMetrics {
    /// Add another row's metrics to these
    pub fn absorb(&mut self, other: &KeywordMetrics) {
        self.spend += other.spend;
        self.impressions += other.impressions;
        self.taps += other.taps;
        self.installs += other.installs;
    }

    /// Spend per install, when there were installs
    pub fn cost_per_install(&self) -> Option<f64> {
        (self.installs > 0).then(|| self.spend / self.installs as f64)
    }
}

/// Metrics keyed by normalized keyword
pub type KeywordReport = BTreeMap<String, KeywordMetrics>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderBy {
    field: &'static str,
    sort_order: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Pagination {
    offset: u32,
    limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct Selector {
    order_by: Vec<OrderBy>,
    pagination: Pagination,
}

/// Body of a keyword report request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    start_time: NaiveDate,
    end_time: NaiveDate,
    selector: Selector,
    group_by: Vec<&'static str>,
    time_zone: &'static str,
    return_row_totals: bool,
    return_records_with_no_metrics: bool,
}

impl ReportRequest {
    /// Report over `range`, highest local spend first
    pub fn new(range: DateRange) -> Self {
        Self {
            start_time: range.start,
            end_time: range.end,
            selector: Selector {
                order_by: vec![OrderBy {
                    field: "localSpend",
                    sort_order: "DESCENDING",
                }],
                pagination: Pagination {
                    offset: 0,
                    limit: REPORT_PAGE_LIMIT,
                },
            },
            group_by: vec!["countryOrRegion"],
            time_zone: "UTC",
            return_row_totals: true,
            return_records_with_no_metrics: false,
        }
    }

    /// Same request starting at row `offset`
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.selector.pagination.offset = offset;
        self
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Headers accompanying the body for organization `org_id`
    pub fn headers(access_token: &str, org_id: &str) -> [(&'static str, String); 3] {
        [
            ("Authorization", format!("Bearer {}", access_token)),
            ("X-AP-Context", format!("orgId={}", org_id)),
            ("Content-Type", "application/json".to_string()),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct ReportEnvelope {
    #[serde(default)]
    data: Option<ReportData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportData {
    #[serde(default)]
    reporting_data_response: Option<ReportRows>,
}

#[derive(Debug, Deserialize)]
struct ReportRows {
    #[serde(default)]
    row: Vec<ReportRow>,
}

#[derive(Debug, Deserialize)]
struct ReportRow {
    #[serde(default)]
    metadata: Option<RowMetadata>,
    #[serde(default)]
    total: Option<RowMetrics>,
    #[serde(default)]
    granularity: Vec<RowMetrics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RowMetadata {
    #[serde(default)]
    keyword: Option<String>,
    #[serde(default)]
    keyword_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RowMetrics {
    #[serde(default)]
    local_spend: Option<Money>,
    #[serde(default)]
    impressions: Option<u64>,
    #[serde(default)]
    taps: Option<u64>,
    #[serde(default)]
    installs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Money {
    #[serde(default)]
    amount: Option<Amount>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    fn value(&self) -> Option<f64> {
        match self {
            Amount::Number(n) => Some(*n),
            Amount::Text(text) => parse_currency(text).ok(),
        }
    }
}

impl ReportRow {
    fn keyword(&self) -> Option<&str> {
        let metadata = self.metadata.as_ref()?;
        [&metadata.keyword, &metadata.keyword_text]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|k| !k.trim().is_empty())
    }

    fn spend(&self) -> f64 {
        let from_total = self.total.as_ref().and_then(RowMetrics::spend);
        from_total
            .or_else(|| self.granularity.first().and_then(RowMetrics::spend))
            .unwrap_or(0.0)
    }

    fn metrics(&self) -> KeywordMetrics {
        let total = self.total.as_ref();
        KeywordMetrics {
            spend: self.spend(),
            impressions: total.and_then(|t| t.impressions).unwrap_or(0),
            taps: total.and_then(|t| t.taps).unwrap_or(0),
            installs: total.and_then(|t| t.installs).unwrap_or(0),
        }
    }
}

impl RowMetrics {
    fn spend(&self) -> Option<f64> {
        self.local_spend
            .as_ref()?
            .amount
            .as_ref()?
            .value()
            .filter(|v| v.is_finite())
    }
}

/// Parse a keyword report response into metrics per normalized keyword.
///
/// Rows for the same keyword, one per country when grouped by region,
/// are summed.
pub fn parse_keyword_report(json: &str) -> Result<KeywordReport> {
    let envelope: ReportEnvelope = serde_json::from_str(json)?;
    let rows = envelope
        .data
        .and_then(|d| d.reporting_data_response)
        .map(|r| r.row)
        .unwrap_or_default();

    let mut report = KeywordReport::new();
    let mut skipped = 0usize;
    for row in &rows {
        let Some(keyword) = row.keyword() else {
            skipped += 1;
            continue;
        };
        report
            .entry(normalize_keyword(keyword))
            .or_default()
            .absorb(&row.metrics());
    }

    debug!(rows = rows.len(), keywords = report.len(), skipped, "parsed keyword report");
    Ok(report)
}
