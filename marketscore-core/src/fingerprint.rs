//! Input fingerprinting and audit records.
//!
//! - `InputHash`: 32-bit multiply-add hash of the canonical input projection.
//!   Groups audits by "same inputs"; not tamper-resistant.
//! - `snapshot_digest`: BLAKE3 over the canonical JSON of the whole snapshot.
//!   Content identity for the full reconciled input.
//! - `AuditRecord`: what an audit log needs to check that equal inputs
//!   produced equal recommendations.

use crate::analysis::TrendDirection;
use crate::domain::{InputHash, Provenance, ReconciledSnapshot};
use crate::scoring::{Recommendation, Timeframe, TradingScore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fields that determine a score's identity, in canonical order.
///
/// Field order is the serialization order and therefore part of the hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputProjection<'a> {
    pub symbol: &'a str,
    pub snapshot_timestamp: DateTime<Utc>,
    pub price: f64,
    pub rsi: f64,
    pub macd_histogram: f64,
    pub trend_direction: TrendDirection,
    pub timeframe: Timeframe,
}

/// `h = h * 31 + unit` over UTF-16 code units, wrapping at 32 bits.
pub fn rolling_hash(text: &str) -> u32 {
    text.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
        as u32
}

pub fn input_hash(projection: &InputProjection<'_>) -> InputHash {
    let json = serde_json::to_string(projection).expect("InputProjection must serialize");
    InputHash::from_u32(rolling_hash(&json))
}

/// BLAKE3 hex digest of the snapshot's canonical JSON.
pub fn snapshot_digest(snapshot: &ReconciledSnapshot) -> String {
    let json = serde_json::to_vec(snapshot).expect("ReconciledSnapshot must serialize");
    blake3::hash(&json).to_hex().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub input_hash: InputHash,
    pub snapshot_digest: String,
    pub symbol: String,
    pub timeframe: Timeframe,
    pub recommendation: Recommendation,
    pub weighted_score: f64,
    pub confidence: f64,
    pub provenance: Provenance,
}

impl AuditRecord {
    pub fn new(snapshot: &ReconciledSnapshot, timeframe: Timeframe, score: &TradingScore) -> Self {
        Self {
            input_hash: score.input_hash.clone(),
            snapshot_digest: snapshot_digest(snapshot),
            symbol: score.symbol.clone(),
            timeframe,
            recommendation: score.recommendation,
            weighted_score: score.weighted_score,
            confidence: score.confidence,
            provenance: snapshot.provenance.clone(),
        }
    }

    /// False only when both records share an input hash but disagree on the
    /// recommendation. Records for different inputs never conflict.
    pub fn is_consistent_with(&self, other: &AuditRecord) -> bool {
        self.input_hash != other.input_hash || self.recommendation == other.recommendation
    }
}
