//! Seeded synthetic bar generator for demos and benches.
//!
//! Geometric random walk with normal daily returns. The per-symbol RNG seed
//! is derived from `(seed, symbol)` with BLAKE3, so a symbol's series does not
//! depend on which other symbols were generated before it.

use crate::domain::PriceBar;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy)]
pub struct RandomWalk {
    pub start_price: f64,
    /// Mean daily log return.
    pub drift: f64,
    /// Daily return standard deviation.
    pub volatility: f64,
}

impl Default for RandomWalk {
    fn default() -> Self {
        Self {
            start_price: 100.0,
            drift: 0.0005,
            volatility: 0.015,
        }
    }
}

pub fn symbol_seed(seed: u64, symbol: &str) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&seed.to_le_bytes());
    hasher.update(symbol.as_bytes());
    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

impl RandomWalk {
    /// `days` consecutive calendar-day bars starting at `start`.
    pub fn generate(&self, symbol: &str, seed: u64, start: NaiveDate, days: usize) -> Vec<PriceBar> {
        let mut rng = StdRng::seed_from_u64(symbol_seed(seed, symbol));
        let mut close = self.start_price;
        let mut bars = Vec::with_capacity(days);

        for i in 0..days {
            let open = close;
            let ret = self.drift + self.volatility * standard_normal(&mut rng);
            close = (open * ret.exp()).max(0.01);
            let wick_up: f64 = rng.gen_range(0.0..self.volatility);
            let wick_down: f64 = rng.gen_range(0.0..self.volatility);
            bars.push(PriceBar {
                date: start + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) * (1.0 + wick_up),
                low: open.min(close) * (1.0 - wick_down),
                close,
                volume: rng.gen_range(500_000..5_000_000),
            });
        }
        bars
    }
}

/// Box–Muller transform.
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
