//! Completeness detection for a primary fundamentals snapshot.
//!
//! Score = 100 * (weight of populated fields) / (weight of all fields).
//! A snapshot is sparse when the score is under the sparse threshold or any
//! critical field is missing.

use crate::domain::{FundamentalData, FundamentalField};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackRecommendation {
    #[serde(rename = "use-as-is")]
    UseAsIs,
    #[serde(rename = "enhance-with-sec")]
    EnhanceWithSec,
    #[serde(rename = "sec-only")]
    SecOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SparseDataResult {
    pub is_sparse: bool,
    pub sparse_fields: Vec<FundamentalField>,
    pub completeness_score: f64,
    pub recommendation: FallbackRecommendation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeight {
    pub weight: f64,
    pub critical: bool,
}

const fn w(weight: f64, critical: bool) -> FieldWeight {
    FieldWeight { weight, critical }
}

/// Weight and criticality of every fundamental field.
pub fn field_weight(field: FundamentalField) -> FieldWeight {
    use FundamentalField as F;
    match field {
        F::PeRatio => w(3.0, true),
        F::Eps => w(3.0, true),
        F::MarketCap => w(2.0, true),
        F::ForwardPe => w(2.0, false),
        F::PegRatio => w(1.5, false),
        F::PriceToBook => w(1.5, false),
        F::ForwardEps => w(1.5, false),
        F::AvgVolume => w(1.0, false),
        F::SharesOutstanding => w(1.0, false),
        F::Beta => w(1.0, false),
        F::Week52High => w(1.0, false),
        F::Week52Low => w(1.0, false),
        F::TargetPrice => w(1.0, false),
        F::RecommendationKey => w(1.0, false),
        F::DebtToEquity => w(1.0, false),
        F::ReturnOnEquity => w(1.0, false),
        F::Week52Change => w(0.5, false),
        F::DividendYield => w(0.5, false),
        F::DividendRate => w(0.5, false),
        F::EarningsDate => w(0.5, false),
        F::ExDividendDate => w(0.5, false),
        F::CurrentRatio => w(0.5, false),
        F::ReturnOnAssets => w(0.5, false),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletenessThresholds {
    /// Scores strictly below this are sparse.
    pub sparse_threshold: f64,
    /// Scores strictly below this mean the primary source is nearly empty.
    pub sec_only_threshold: f64,
}

impl Default for CompletenessThresholds {
    fn default() -> Self {
        Self {
            sparse_threshold: 70.0,
            sec_only_threshold: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompletenessDetector {
    thresholds: CompletenessThresholds,
}

impl CompletenessDetector {
    pub fn new(thresholds: CompletenessThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> CompletenessThresholds {
        self.thresholds
    }

    pub fn detect(&self, data: &FundamentalData) -> SparseDataResult {
        let mut total = 0.0;
        let mut present = 0.0;
        let mut critical_missing = false;
        let mut sparse_fields = Vec::new();

        for field in FundamentalField::ALL {
            let fw = field_weight(field);
            total += fw.weight;
            if data.has(field) {
                present += fw.weight;
            } else {
                sparse_fields.push(field);
                critical_missing |= fw.critical;
            }
        }

        let completeness_score = if total > 0.0 {
            (100.0 * present / total).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let is_sparse = completeness_score < self.thresholds.sparse_threshold || critical_missing;
        let recommendation = if completeness_score < self.thresholds.sec_only_threshold {
            FallbackRecommendation::SecOnly
        } else if is_sparse {
            FallbackRecommendation::EnhanceWithSec
        } else {
            FallbackRecommendation::UseAsIs
        };

        SparseDataResult {
            is_sparse,
            sparse_fields,
            completeness_score,
            recommendation,
        }
    }
}
