//! Fundamental-data reconciliation against the filing source.
//!
//! The reconciler never fails. Every secondary-source problem ends up as a
//! `fallback_reason` in the provenance and a warning in the log; the primary
//! snapshot is then used as-is.

use super::completeness::{CompletenessDetector, FallbackRecommendation, SparseDataResult};
use super::filing::FilingFacts;
use crate::data::{FilingFetcher, IdentifierResolver};
use crate::domain::{FundamentalData, FundamentalsSource, MarketSnapshot, Provenance, ReconciledSnapshot};
use tracing::{info, warn};

pub const REASON_IDENTIFIER_NOT_FOUND: &str = "identifier not found";
pub const REASON_SECONDARY_UNAVAILABLE: &str = "secondary unavailable";
pub const REASON_NOTHING_ADDED: &str = "secondary added no new fields";

/// Result of reconciling one fundamentals snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    pub fundamentals: FundamentalData,
    pub provenance: Provenance,
    /// Completeness of the primary snapshot, before any merge.
    pub completeness: SparseDataResult,
}

pub struct DataReconciler<R, F> {
    detector: CompletenessDetector,
    resolver: R,
    fetcher: F,
}

impl<R: IdentifierResolver, F: FilingFetcher> DataReconciler<R, F> {
    pub fn new(detector: CompletenessDetector, resolver: R, fetcher: F) -> Self {
        Self {
            detector,
            resolver,
            fetcher,
        }
    }

    pub fn detector(&self) -> &CompletenessDetector {
        &self.detector
    }

    /// Reconcile a full market snapshot into the scoring input.
    pub async fn reconcile(&self, snapshot: MarketSnapshot) -> ReconciledSnapshot {
        let price = snapshot.quote.price;
        let outcome = self
            .reconcile_fundamentals(&snapshot.symbol, Some(price), &snapshot.fundamentals)
            .await;
        ReconciledSnapshot::from_market(snapshot, outcome.fundamentals, outcome.provenance)
    }

    /// Merge secondary fundamentals into `primary` where the detector asks
    /// for it. Present primary values are never replaced.
    pub async fn reconcile_fundamentals(
        &self,
        symbol: &str,
        price: Option<f64>,
        primary: &FundamentalData,
    ) -> ReconcileOutcome {
        let completeness = self.detector.detect(primary);
        let before = completeness.completeness_score;

        if completeness.recommendation == FallbackRecommendation::UseAsIs {
            return ReconcileOutcome {
                fundamentals: primary.clone(),
                provenance: Provenance::primary(before),
                completeness,
            };
        }

        info!(
            symbol,
            score = before,
            recommendation = ?completeness.recommendation,
            missing = completeness.sparse_fields.len(),
            "primary fundamentals sparse; consulting filings"
        );

        let degraded = |reason: &str| ReconcileOutcome {
            fundamentals: primary.clone(),
            provenance: Provenance::primary_with_reason(before, reason),
            completeness: completeness.clone(),
        };

        let cik = match self.resolver.resolve_identifier(symbol).await {
            Ok(Some(cik)) => cik,
            Ok(None) => {
                warn!(symbol, "no filing identifier for symbol");
                return degraded(REASON_IDENTIFIER_NOT_FOUND);
            }
            Err(e) => {
                warn!(symbol, error = %e, "identifier lookup failed");
                return degraded(REASON_SECONDARY_UNAVAILABLE);
            }
        };

        let document = match self.fetcher.fetch_filing_facts(cik).await {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                warn!(symbol, %cik, "no filing document");
                return degraded(REASON_SECONDARY_UNAVAILABLE);
            }
            Err(e) => {
                warn!(symbol, %cik, error = %e, "filing fetch failed");
                return degraded(REASON_SECONDARY_UNAVAILABLE);
            }
        };

        let facts = FilingFacts::extract(&document);
        if facts.is_empty() {
            warn!(symbol, %cik, "filing document has no usable facts");
            return degraded(REASON_SECONDARY_UNAVAILABLE);
        }

        let secondary = facts.to_fundamentals(price);
        let mut merged = primary.clone();
        let merged_fields = merged.fill_missing_from(&secondary);
        if merged_fields.is_empty() {
            info!(symbol, %cik, "filings added nothing the primary source lacked");
            return degraded(REASON_NOTHING_ADDED);
        }

        let after = self.detector.detect(&merged).completeness_score;
        let source = if primary.is_empty() {
            FundamentalsSource::Secondary
        } else {
            FundamentalsSource::PrimaryWithSecondary
        };
        info!(
            symbol,
            %cik,
            merged = merged_fields.len(),
            before,
            after,
            "fundamentals reconciled"
        );

        ReconcileOutcome {
            fundamentals: merged,
            provenance: Provenance {
                fundamentals: source,
                fallback_used: true,
                fallback_reason: None,
                merged_fields,
                completeness_before: before,
                completeness_after: Some(after),
            },
            completeness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataError;
    use crate::domain::{Cik, FundamentalField};
    use crate::fundamentals::RawFilingDocument;
    use async_trait::async_trait;

    struct Resolver(Option<Cik>);

    #[async_trait]
    impl IdentifierResolver for Resolver {
        async fn resolve_identifier(&self, _ticker: &str) -> Result<Option<Cik>, DataError> {
            Ok(self.0)
        }
    }

    enum Fetcher {
        Doc(RawFilingDocument),
        Missing,
        Broken,
    }

    #[async_trait]
    impl FilingFetcher for Fetcher {
        async fn fetch_filing_facts(&self, _cik: Cik) -> Result<Option<RawFilingDocument>, DataError> {
            match self {
                Fetcher::Doc(doc) => Ok(Some(doc.clone())),
                Fetcher::Missing => Ok(None),
                Fetcher::Broken => Err(DataError::RateLimited { retry_after_secs: 60 }),
            }
        }
    }

    fn filing() -> RawFilingDocument {
        serde_json::from_value(serde_json::json!({
            "facts": {
                "us-gaap": {
                    "EarningsPerShareDiluted": {"units": {"USD/shares": [
                        {"val": 6.0, "fp": "FY", "form": "10-K", "end": "2023-09-30"}
                    ]}},
                    "NetIncomeLoss": {"units": {"USD": [
                        {"val": 100.0, "fp": "FY", "form": "10-K", "end": "2023-09-30"}
                    ]}},
                    "StockholdersEquity": {"units": {"USD": [
                        {"val": 500.0, "fp": "FY", "form": "10-K", "end": "2023-09-30"}
                    ]}}
                },
                "dei": {
                    "EntityCommonStockSharesOutstanding": {"units": {"shares": [
                        {"val": 1000.0, "fp": "FY", "form": "10-K", "end": "2023-09-30"}
                    ]}}
                }
            }
        }))
        .unwrap()
    }

    fn reconciler(cik: Option<Cik>, fetcher: Fetcher) -> DataReconciler<Resolver, Fetcher> {
        DataReconciler::new(CompletenessDetector::default(), Resolver(cik), fetcher)
    }

    fn sparse_primary() -> FundamentalData {
        FundamentalData {
            pe_ratio: Some(99.0),
            beta: Some(1.1),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn complete_primary_is_used_as_is() {
        let full = FundamentalData {
            pe_ratio: Some(20.0),
            forward_pe: Some(18.0),
            peg_ratio: Some(1.5),
            price_to_book: Some(4.0),
            eps: Some(5.0),
            forward_eps: Some(5.5),
            market_cap: Some(1e12),
            avg_volume: Some(1e6),
            shares_outstanding: Some(1e9),
            beta: Some(1.0),
            week52_high: Some(120.0),
            week52_low: Some(80.0),
            target_price: Some(130.0),
            debt_to_equity: Some(1.0),
            return_on_equity: Some(0.2),
            ..Default::default()
        };
        let out = reconciler(Some(Cik(1)), Fetcher::Broken)
            .reconcile_fundamentals("AAPL", Some(100.0), &full)
            .await;
        assert_eq!(out.fundamentals, full);
        assert_eq!(out.provenance, Provenance::primary(out.completeness.completeness_score));
    }

    #[tokio::test]
    async fn sparse_primary_is_filled_without_overwriting() {
        let out = reconciler(Some(Cik(320193)), Fetcher::Doc(filing()))
            .reconcile_fundamentals("AAPL", Some(120.0), &sparse_primary())
            .await;

        // Primary P/E survives even though the filing implies 120 / 6 = 20.
        assert_eq!(out.fundamentals.pe_ratio, Some(99.0));
        assert_eq!(out.fundamentals.eps, Some(6.0));
        assert_eq!(out.fundamentals.market_cap, Some(120_000.0));
        assert_eq!(out.fundamentals.return_on_equity, Some(0.2));

        let p = &out.provenance;
        assert_eq!(p.fundamentals, FundamentalsSource::PrimaryWithSecondary);
        assert!(p.fallback_used);
        assert!(p.merged_fields.contains(&FundamentalField::Eps));
        assert!(!p.merged_fields.contains(&FundamentalField::PeRatio));
        assert!(p.completeness_after.unwrap() > p.completeness_before);
    }

    #[tokio::test]
    async fn empty_primary_becomes_secondary() {
        let out = reconciler(Some(Cik(320193)), Fetcher::Doc(filing()))
            .reconcile_fundamentals("AAPL", Some(120.0), &FundamentalData::default())
            .await;
        assert_eq!(out.provenance.fundamentals, FundamentalsSource::Secondary);
        assert_eq!(out.fundamentals.pe_ratio, Some(20.0));
    }

    #[tokio::test]
    async fn unknown_identifier_degrades() {
        let out = reconciler(None, Fetcher::Doc(filing()))
            .reconcile_fundamentals("ZZZZ", Some(10.0), &sparse_primary())
            .await;
        assert_eq!(out.fundamentals, sparse_primary());
        assert!(!out.provenance.fallback_used);
        assert_eq!(out.provenance.fallback_reason.as_deref(), Some(REASON_IDENTIFIER_NOT_FOUND));
    }

    #[tokio::test]
    async fn secondary_errors_and_absence_degrade() {
        for fetcher in [Fetcher::Missing, Fetcher::Broken, Fetcher::Doc(RawFilingDocument::default())] {
            let out = reconciler(Some(Cik(1)), fetcher)
                .reconcile_fundamentals("AAPL", Some(10.0), &sparse_primary())
                .await;
            assert_eq!(out.fundamentals, sparse_primary());
            assert_eq!(out.provenance.fundamentals, FundamentalsSource::Primary);
            assert_eq!(out.provenance.fallback_reason.as_deref(), Some(REASON_SECONDARY_UNAVAILABLE));
        }
    }
}
