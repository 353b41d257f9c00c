//! Structured-filing fact extraction.
//!
//! Input is a company-facts document: namespace → concept → units → facts.
//! Each target field has an ordered alias list of `(namespace, concept)`
//! pairs. The first alias that yields an annual fact wins; among its annual
//! facts the one with the latest period end is taken.

use crate::domain::FundamentalData;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Forms that count as annual reports even when the fiscal period is absent.
const ANNUAL_FORMS: [&str; 4] = ["10-K", "10-K/A", "20-F", "40-F"];
const FULL_YEAR_PERIOD: &str = "FY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFilingDocument {
    #[serde(default)]
    pub cik: Option<u64>,
    #[serde(default, rename = "entityName")]
    pub entity_name: Option<String>,
    #[serde(default)]
    pub facts: BTreeMap<String, BTreeMap<String, RawConcept>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawConcept {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub units: BTreeMap<String, Vec<RawFact>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFact {
    #[serde(rename = "val", alias = "value")]
    pub value: f64,
    #[serde(default, rename = "fy", alias = "fiscalYear")]
    pub fiscal_year: Option<i32>,
    #[serde(default, rename = "fp", alias = "fiscalPeriod")]
    pub fiscal_period: Option<String>,
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default)]
    pub filed: Option<NaiveDate>,
    #[serde(default, rename = "start", alias = "periodStart")]
    pub period_start: Option<NaiveDate>,
    #[serde(rename = "end", alias = "periodEnd")]
    pub period_end: NaiveDate,
}

impl RawFact {
    pub fn is_annual(&self) -> bool {
        self.fiscal_period.as_deref() == Some(FULL_YEAR_PERIOD)
            || self
                .form
                .as_deref()
                .is_some_and(|form| ANNUAL_FORMS.contains(&form))
    }
}

/// A normalized financial fact target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactField {
    Revenue,
    NetIncome,
    OperatingIncome,
    GrossProfit,
    ResearchAndDevelopment,
    TotalAssets,
    CurrentAssets,
    Cash,
    TotalLiabilities,
    CurrentLiabilities,
    LongTermDebt,
    TotalEquity,
    EpsBasic,
    EpsDiluted,
    SharesOutstanding,
    SharesDiluted,
}

const GAAP: &str = "us-gaap";
const DEI: &str = "dei";

impl FactField {
    /// Acceptable concepts in priority order.
    pub fn aliases(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Revenue => &[
                (GAAP, "Revenues"),
                (GAAP, "RevenueFromContractWithCustomerExcludingAssessedTax"),
                (GAAP, "RevenueFromContractWithCustomerIncludingAssessedTax"),
                (GAAP, "SalesRevenueNet"),
            ],
            Self::NetIncome => &[
                (GAAP, "NetIncomeLoss"),
                (GAAP, "ProfitLoss"),
                (GAAP, "NetIncomeLossAvailableToCommonStockholdersBasic"),
            ],
            Self::OperatingIncome => &[(GAAP, "OperatingIncomeLoss")],
            Self::GrossProfit => &[(GAAP, "GrossProfit")],
            Self::ResearchAndDevelopment => &[
                (GAAP, "ResearchAndDevelopmentExpense"),
                (GAAP, "ResearchAndDevelopmentExpenseExcludingAcquiredInProcessCost"),
            ],
            Self::TotalAssets => &[(GAAP, "Assets")],
            Self::CurrentAssets => &[(GAAP, "AssetsCurrent")],
            Self::Cash => &[
                (GAAP, "CashAndCashEquivalentsAtCarryingValue"),
                (GAAP, "CashCashEquivalentsRestrictedCashAndRestrictedCashEquivalents"),
                (GAAP, "Cash"),
            ],
            Self::TotalLiabilities => &[(GAAP, "Liabilities")],
            Self::CurrentLiabilities => &[(GAAP, "LiabilitiesCurrent")],
            Self::LongTermDebt => &[
                (GAAP, "LongTermDebtNoncurrent"),
                (GAAP, "LongTermDebt"),
            ],
            Self::TotalEquity => &[
                (GAAP, "StockholdersEquity"),
                (GAAP, "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest"),
            ],
            Self::EpsBasic => &[(GAAP, "EarningsPerShareBasic")],
            Self::EpsDiluted => &[(GAAP, "EarningsPerShareDiluted")],
            Self::SharesOutstanding => &[
                (DEI, "EntityCommonStockSharesOutstanding"),
                (GAAP, "CommonStockSharesOutstanding"),
            ],
            Self::SharesDiluted => &[(GAAP, "WeightedAverageNumberOfDilutedSharesOutstanding")],
        }
    }
}

impl RawFilingDocument {
    /// Most recent annual value of `field`, trying aliases in order.
    pub fn latest_annual(&self, field: FactField) -> Option<f64> {
        field
            .aliases()
            .iter()
            .find_map(|(namespace, concept)| self.latest_annual_for(namespace, concept))
    }

    fn latest_annual_for(&self, namespace: &str, concept: &str) -> Option<f64> {
        let concept = self.facts.get(namespace)?.get(concept)?;
        let mut annual: Vec<&RawFact> = concept
            .units
            .values()
            .flatten()
            .filter(|fact| fact.is_annual())
            .collect();
        // Latest period end first; for restatements of the same period the
        // later filing wins.
        annual.sort_by(|a, b| {
            b.period_end
                .cmp(&a.period_end)
                .then_with(|| b.filed.cmp(&a.filed))
        });
        annual.first().map(|fact| fact.value)
    }
}

/// Normalized financial facts extracted from one filing document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingFacts {
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
    pub operating_income: Option<f64>,
    pub gross_profit: Option<f64>,
    pub research_and_development: Option<f64>,
    pub total_assets: Option<f64>,
    pub current_assets: Option<f64>,
    pub cash: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub long_term_debt: Option<f64>,
    pub total_equity: Option<f64>,
    pub eps_basic: Option<f64>,
    pub eps_diluted: Option<f64>,
    /// Diluted EPS if reported, else basic.
    pub eps: Option<f64>,
    pub shares_outstanding: Option<f64>,
    pub shares_diluted: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
}

impl FilingFacts {
    pub fn extract(doc: &RawFilingDocument) -> Self {
        let get = |field| doc.latest_annual(field);

        let net_income = get(FactField::NetIncome);
        let total_assets = get(FactField::TotalAssets);
        let current_assets = get(FactField::CurrentAssets);
        let total_liabilities = get(FactField::TotalLiabilities);
        let current_liabilities = get(FactField::CurrentLiabilities);
        let total_equity = get(FactField::TotalEquity);
        let eps_basic = get(FactField::EpsBasic);
        let eps_diluted = get(FactField::EpsDiluted);

        Self {
            revenue: get(FactField::Revenue),
            net_income,
            operating_income: get(FactField::OperatingIncome),
            gross_profit: get(FactField::GrossProfit),
            research_and_development: get(FactField::ResearchAndDevelopment),
            total_assets,
            current_assets,
            cash: get(FactField::Cash),
            total_liabilities,
            current_liabilities,
            long_term_debt: get(FactField::LongTermDebt),
            total_equity,
            eps_basic,
            eps_diluted,
            eps: eps_diluted.or(eps_basic),
            shares_outstanding: get(FactField::SharesOutstanding),
            shares_diluted: get(FactField::SharesDiluted),
            debt_to_equity: ratio(total_liabilities, total_equity),
            current_ratio: ratio(current_assets, current_liabilities),
            return_on_equity: ratio(net_income, total_equity),
            return_on_assets: ratio(net_income, total_assets),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Project the facts onto the fundamentals record, pricing per-share
    /// ratios at `price` when one is known.
    pub fn to_fundamentals(&self, price: Option<f64>) -> FundamentalData {
        let price = price.filter(|p| *p > 0.0);
        let market_cap = match (price, self.shares_outstanding) {
            (Some(p), Some(shares)) if shares > 0.0 => Some(p * shares),
            _ => None,
        };
        let pe_ratio = match (price, self.eps) {
            (Some(p), Some(eps)) if eps > 0.0 => Some(p / eps),
            _ => None,
        };
        let price_to_book = match (market_cap, self.total_equity) {
            (Some(cap), Some(equity)) if equity > 0.0 => Some(cap / equity),
            _ => None,
        };

        FundamentalData {
            pe_ratio,
            price_to_book,
            eps: self.eps,
            market_cap,
            shares_outstanding: self.shares_outstanding,
            debt_to_equity: self.debt_to_equity,
            current_ratio: self.current_ratio,
            return_on_equity: self.return_on_equity,
            return_on_assets: self.return_on_assets,
            ..Default::default()
        }
    }
}

/// `numerator / denominator` when both are present and the denominator is
/// non-zero; absent otherwise.
fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fact(val: f64, fy: i32, fp: &str, form: &str, end: &str) -> serde_json::Value {
        json!({"val": val, "fy": fy, "fp": fp, "form": form, "filed": end, "end": end})
    }

    fn doc(facts: serde_json::Value) -> RawFilingDocument {
        serde_json::from_value(json!({"cik": 320193, "entityName": "Test Co", "facts": facts})).unwrap()
    }

    #[test]
    fn takes_most_recent_annual_value() {
        let d = doc(json!({"us-gaap": {"Revenues": {"label": "Revenues", "units": {"USD": [
            fact(100.0, 2022, "FY", "10-K", "2022-12-31"),
            fact(130.0, 2023, "FY", "10-K", "2023-12-31"),
            fact(40.0, 2024, "Q1", "10-Q", "2024-03-31"),
        ]}}}}));
        assert_eq!(d.latest_annual(FactField::Revenue), Some(130.0));
    }

    #[test]
    fn annual_form_counts_without_fy_period() {
        let d = doc(json!({"us-gaap": {"Assets": {"units": {"USD": [
            {"val": 500.0, "form": "10-K", "end": "2023-12-31"},
            {"val": 900.0, "fp": "Q3", "form": "10-Q", "end": "2024-09-30"},
        ]}}}}));
        assert_eq!(d.latest_annual(FactField::TotalAssets), Some(500.0));
    }

    #[test]
    fn first_alias_with_annual_values_wins() {
        let d = doc(json!({"us-gaap": {
            "Revenues": {"units": {"USD": [fact(10.0, 2020, "FY", "10-K", "2020-12-31")]}},
            "RevenueFromContractWithCustomerExcludingAssessedTax": {"units": {"USD": [
                fact(99.0, 2023, "FY", "10-K", "2023-12-31")
            ]}}
        }}));
        // Older, but the first alias produced a value: later aliases are not tried.
        assert_eq!(d.latest_annual(FactField::Revenue), Some(10.0));
    }

    #[test]
    fn alias_with_only_quarterly_values_falls_through() {
        let d = doc(json!({"us-gaap": {
            "Revenues": {"units": {"USD": [fact(10.0, 2024, "Q1", "10-Q", "2024-03-31")]}},
            "SalesRevenueNet": {"units": {"USD": [fact(77.0, 2023, "FY", "10-K", "2023-12-31")]}}
        }}));
        assert_eq!(d.latest_annual(FactField::Revenue), Some(77.0));
    }

    #[test]
    fn restatement_prefers_later_filing() {
        let d = doc(json!({"us-gaap": {"NetIncomeLoss": {"units": {"USD": [
            {"val": 50.0, "fp": "FY", "form": "10-K", "filed": "2024-02-01", "end": "2023-12-31"},
            {"val": 48.0, "fp": "FY", "form": "10-K/A", "filed": "2024-05-01", "end": "2023-12-31"},
        ]}}}}));
        assert_eq!(d.latest_annual(FactField::NetIncome), Some(48.0));
    }

    #[test]
    fn eps_prefers_diluted_and_ratios_guard_zero() {
        let d = doc(json!({
            "us-gaap": {
                "EarningsPerShareBasic": {"units": {"USD/shares": [fact(6.2, 2023, "FY", "10-K", "2023-12-31")]}},
                "EarningsPerShareDiluted": {"units": {"USD/shares": [fact(6.1, 2023, "FY", "10-K", "2023-12-31")]}},
                "NetIncomeLoss": {"units": {"USD": [fact(100.0, 2023, "FY", "10-K", "2023-12-31")]}},
                "StockholdersEquity": {"units": {"USD": [fact(0.0, 2023, "FY", "10-K", "2023-12-31")]}},
                "Assets": {"units": {"USD": [fact(1000.0, 2023, "FY", "10-K", "2023-12-31")]}},
                "Liabilities": {"units": {"USD": [fact(400.0, 2023, "FY", "10-K", "2023-12-31")]}}
            },
            "dei": {
                "EntityCommonStockSharesOutstanding": {"units": {"shares": [fact(50.0, 2023, "FY", "10-K", "2023-12-31")]}}
            }
        }));
        let facts = FilingFacts::extract(&d);
        assert_eq!(facts.eps, Some(6.1));
        assert_eq!(facts.shares_outstanding, Some(50.0));
        assert_eq!(facts.return_on_assets, Some(0.1));
        // Zero equity: ratios that divide by it stay absent.
        assert_eq!(facts.return_on_equity, None);
        assert_eq!(facts.debt_to_equity, None);
        // Missing operand: absent, not zero.
        assert_eq!(facts.current_ratio, None);
    }

    #[test]
    fn empty_document_yields_empty_facts() {
        let facts = FilingFacts::extract(&RawFilingDocument::default());
        assert!(facts.is_empty());
    }

    #[test]
    fn to_fundamentals_prices_per_share_values() {
        let facts = FilingFacts {
            eps: Some(5.0),
            shares_outstanding: Some(1_000.0),
            total_equity: Some(20_000.0),
            ..Default::default()
        };
        let f = facts.to_fundamentals(Some(100.0));
        assert_eq!(f.pe_ratio, Some(20.0));
        assert_eq!(f.market_cap, Some(100_000.0));
        assert_eq!(f.price_to_book, Some(5.0));

        let negative = FilingFacts {
            eps: Some(-1.0),
            ..Default::default()
        };
        assert_eq!(negative.to_fundamentals(Some(100.0)).pe_ratio, None);
        assert_eq!(facts.to_fundamentals(None).market_cap, None);
    }
}
