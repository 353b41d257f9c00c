//! Fundamental data snapshot as a sparse, nullable record.
//!
//! Every field is independently optional; absence is meaningful (the provider
//! did not report it) and is what the completeness detector measures.
//! `FundamentalField` names each field so the weight table and the merge can
//! be exhaustive matches instead of string-keyed maps.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Analyst consensus recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKey {
    StrongBuy,
    Buy,
    Hold,
    Underperform,
    Sell,
    StrongSell,
    #[serde(other)]
    Unrated,
}

impl RecommendationKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongBuy => "strong_buy",
            Self::Buy => "buy",
            Self::Hold => "hold",
            Self::Underperform => "underperform",
            Self::Sell => "sell",
            Self::StrongSell => "strong_sell",
            Self::Unrated => "none",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FundamentalData {
    pub pe_ratio: Option<f64>,
    pub forward_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub price_to_book: Option<f64>,
    pub eps: Option<f64>,
    pub forward_eps: Option<f64>,
    pub market_cap: Option<f64>,
    pub avg_volume: Option<f64>,
    pub shares_outstanding: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub dividend_rate: Option<f64>,
    pub beta: Option<f64>,
    pub earnings_date: Option<NaiveDate>,
    pub ex_dividend_date: Option<NaiveDate>,
    pub week52_high: Option<f64>,
    pub week52_low: Option<f64>,
    pub week52_change: Option<f64>,
    pub target_price: Option<f64>,
    pub recommendation_key: Option<RecommendationKey>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
}

/// Name of a single `FundamentalData` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FundamentalField {
    PeRatio,
    ForwardPe,
    PegRatio,
    PriceToBook,
    Eps,
    ForwardEps,
    MarketCap,
    AvgVolume,
    SharesOutstanding,
    DividendYield,
    DividendRate,
    Beta,
    EarningsDate,
    ExDividendDate,
    Week52High,
    Week52Low,
    Week52Change,
    TargetPrice,
    RecommendationKey,
    DebtToEquity,
    CurrentRatio,
    ReturnOnEquity,
    ReturnOnAssets,
}

impl FundamentalField {
    pub const ALL: [FundamentalField; 23] = [
        Self::PeRatio,
        Self::ForwardPe,
        Self::PegRatio,
        Self::PriceToBook,
        Self::Eps,
        Self::ForwardEps,
        Self::MarketCap,
        Self::AvgVolume,
        Self::SharesOutstanding,
        Self::DividendYield,
        Self::DividendRate,
        Self::Beta,
        Self::EarningsDate,
        Self::ExDividendDate,
        Self::Week52High,
        Self::Week52Low,
        Self::Week52Change,
        Self::TargetPrice,
        Self::RecommendationKey,
        Self::DebtToEquity,
        Self::CurrentRatio,
        Self::ReturnOnEquity,
        Self::ReturnOnAssets,
    ];

    /// Wire name, identical to the JSON key of the field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PeRatio => "peRatio",
            Self::ForwardPe => "forwardPe",
            Self::PegRatio => "pegRatio",
            Self::PriceToBook => "priceToBook",
            Self::Eps => "eps",
            Self::ForwardEps => "forwardEps",
            Self::MarketCap => "marketCap",
            Self::AvgVolume => "avgVolume",
            Self::SharesOutstanding => "sharesOutstanding",
            Self::DividendYield => "dividendYield",
            Self::DividendRate => "dividendRate",
            Self::Beta => "beta",
            Self::EarningsDate => "earningsDate",
            Self::ExDividendDate => "exDividendDate",
            Self::Week52High => "week52High",
            Self::Week52Low => "week52Low",
            Self::Week52Change => "week52Change",
            Self::TargetPrice => "targetPrice",
            Self::RecommendationKey => "recommendationKey",
            Self::DebtToEquity => "debtToEquity",
            Self::CurrentRatio => "currentRatio",
            Self::ReturnOnEquity => "returnOnEquity",
            Self::ReturnOnAssets => "returnOnAssets",
        }
    }
}

impl fmt::Display for FundamentalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FundamentalData {
    pub fn has(&self, field: FundamentalField) -> bool {
        use FundamentalField as F;
        match field {
            F::PeRatio => self.pe_ratio.is_some(),
            F::ForwardPe => self.forward_pe.is_some(),
            F::PegRatio => self.peg_ratio.is_some(),
            F::PriceToBook => self.price_to_book.is_some(),
            F::Eps => self.eps.is_some(),
            F::ForwardEps => self.forward_eps.is_some(),
            F::MarketCap => self.market_cap.is_some(),
            F::AvgVolume => self.avg_volume.is_some(),
            F::SharesOutstanding => self.shares_outstanding.is_some(),
            F::DividendYield => self.dividend_yield.is_some(),
            F::DividendRate => self.dividend_rate.is_some(),
            F::Beta => self.beta.is_some(),
            F::EarningsDate => self.earnings_date.is_some(),
            F::ExDividendDate => self.ex_dividend_date.is_some(),
            F::Week52High => self.week52_high.is_some(),
            F::Week52Low => self.week52_low.is_some(),
            F::Week52Change => self.week52_change.is_some(),
            F::TargetPrice => self.target_price.is_some(),
            F::RecommendationKey => self.recommendation_key.is_some(),
            F::DebtToEquity => self.debt_to_equity.is_some(),
            F::CurrentRatio => self.current_ratio.is_some(),
            F::ReturnOnEquity => self.return_on_equity.is_some(),
            F::ReturnOnAssets => self.return_on_assets.is_some(),
        }
    }

    /// True when no field at all is populated.
    pub fn is_empty(&self) -> bool {
        FundamentalField::ALL.iter().all(|f| !self.has(*f))
    }

    pub fn populated_fields(&self) -> Vec<FundamentalField> {
        FundamentalField::ALL
            .iter()
            .copied()
            .filter(|f| self.has(*f))
            .collect()
    }

    /// Fill every absent field from `secondary`. Present values are never
    /// overwritten. Returns the fields that were filled.
    pub fn fill_missing_from(&mut self, secondary: &FundamentalData) -> Vec<FundamentalField> {
        use FundamentalField as F;
        let FundamentalData {
            pe_ratio,
            forward_pe,
            peg_ratio,
            price_to_book,
            eps,
            forward_eps,
            market_cap,
            avg_volume,
            shares_outstanding,
            dividend_yield,
            dividend_rate,
            beta,
            earnings_date,
            ex_dividend_date,
            week52_high,
            week52_low,
            week52_change,
            target_price,
            recommendation_key,
            debt_to_equity,
            current_ratio,
            return_on_equity,
            return_on_assets,
        } = secondary;

        let mut filled = Vec::new();
        fill(&mut self.pe_ratio, pe_ratio, F::PeRatio, &mut filled);
        fill(&mut self.forward_pe, forward_pe, F::ForwardPe, &mut filled);
        fill(&mut self.peg_ratio, peg_ratio, F::PegRatio, &mut filled);
        fill(&mut self.price_to_book, price_to_book, F::PriceToBook, &mut filled);
        fill(&mut self.eps, eps, F::Eps, &mut filled);
        fill(&mut self.forward_eps, forward_eps, F::ForwardEps, &mut filled);
        fill(&mut self.market_cap, market_cap, F::MarketCap, &mut filled);
        fill(&mut self.avg_volume, avg_volume, F::AvgVolume, &mut filled);
        fill(&mut self.shares_outstanding, shares_outstanding, F::SharesOutstanding, &mut filled);
        fill(&mut self.dividend_yield, dividend_yield, F::DividendYield, &mut filled);
        fill(&mut self.dividend_rate, dividend_rate, F::DividendRate, &mut filled);
        fill(&mut self.beta, beta, F::Beta, &mut filled);
        fill(&mut self.earnings_date, earnings_date, F::EarningsDate, &mut filled);
        fill(&mut self.ex_dividend_date, ex_dividend_date, F::ExDividendDate, &mut filled);
        fill(&mut self.week52_high, week52_high, F::Week52High, &mut filled);
        fill(&mut self.week52_low, week52_low, F::Week52Low, &mut filled);
        fill(&mut self.week52_change, week52_change, F::Week52Change, &mut filled);
        fill(&mut self.target_price, target_price, F::TargetPrice, &mut filled);
        fill(&mut self.recommendation_key, recommendation_key, F::RecommendationKey, &mut filled);
        fill(&mut self.debt_to_equity, debt_to_equity, F::DebtToEquity, &mut filled);
        fill(&mut self.current_ratio, current_ratio, F::CurrentRatio, &mut filled);
        fill(&mut self.return_on_equity, return_on_equity, F::ReturnOnEquity, &mut filled);
        fill(&mut self.return_on_assets, return_on_assets, F::ReturnOnAssets, &mut filled);
        filled
    }
}

fn fill<T: Clone>(
    dst: &mut Option<T>,
    src: &Option<T>,
    field: FundamentalField,
    filled: &mut Vec<FundamentalField>,
) {
    if dst.is_none() {
        if let Some(value) = src {
            *dst = Some(value.clone());
            filled.push(field);
        }
    }
}
