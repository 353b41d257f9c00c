//! Multi-factor scoring: rule tables, category signals, timeframe weights,
//! risk levels and the composite [`TradingScore`].

pub mod categories;
pub mod engine;
pub mod risk;
pub mod rules;
pub mod signal;
pub mod timeframe;

pub use categories::CategoryEvaluation;
pub use engine::{score, score_many, Recommendation, TradingScore};
pub use risk::RiskLevels;
pub use rules::{Contribution, Rule};
pub use signal::{Category, CategoryScore, Signal, SignalScore, Strength};
pub use timeframe::{Timeframe, TimeframeWeights, UnknownTimeframe};
