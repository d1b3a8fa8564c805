//! # Keyword ROI
//!
//! Joins locally attributed keyword revenue with ad-network keyword spend.
//!
//! ## Features
//!
//! - The keyword report request body and a tolerant parser for its response
//! - Client-credentials token handling with an expiry buffer
//! - Keyword matching: exact, then containment, then bigram similarity
//! - Per-keyword return on ad spend with a rating, and a summary
//! - Date ranges as shown in dashboard headers
//!
//! Sending requests is left to the caller; nothing here does network I/O.

pub mod error;
pub mod matching;
pub mod range;
pub mod report;
pub mod roi;
pub mod token;

pub use error::{Result, RoiError};
pub use matching::{
    best_match, dice_coefficient, match_keywords, normalize_keyword, KeywordMatch, MatchKind,
};
pub use range::DateRange;
pub use report::{parse_keyword_report, KeywordMetrics, KeywordReport, ReportRequest};
pub use roi::{keyword_roi, KeywordRoi, LocalKeyword, RoiRating, RoiSummary};
pub use token::{token_form, AccessToken, TokenResponse};
