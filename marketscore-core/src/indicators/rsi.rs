//! Relative Strength Index (RSI).
//!
//! Gains and losses are averaged with a simple arithmetic mean over the most
//! recent `period` price changes, not Wilder's recursive smoothing. Every
//! threshold downstream is calibrated against this variant.
//!
//! RS = avg_gain / avg_loss; RSI = 100 - 100 / (1 + RS).
//! avg_loss == 0 → 100. Fewer than `period + 1` prices → neutral 50.

pub const DEFAULT_RSI_PERIOD: usize = 14;

pub fn rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return 50.0;
    }

    let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let recent = &changes[changes.len() - period..];

    let avg_gain = recent.iter().map(|&c| c.max(0.0)).sum::<f64>() / period as f64;
    let avg_loss = recent.iter().map(|&c| (-c).max(0.0)).sum::<f64>() / period as f64;

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn rsi_all_gains_is_100() {
        // 14 consecutive equal gains, no losses
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&prices, 14), 100.0);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        assert_approx(rsi(&prices, 14), 0.0, 1e-9);
    }

    #[test]
    fn rsi_uses_only_recent_window() {
        // Early large loss falls outside the 3-change window.
        // Changes: -50, +1, +1, -1 → window (+1, +1, -1)
        // avg_gain = 2/3, avg_loss = 1/3, RS = 2, RSI = 66.666...
        let prices = [150.0, 100.0, 101.0, 102.0, 101.0];
        assert_approx(rsi(&prices, 3), 200.0 / 3.0, 1e-9);
    }

    #[test]
    fn rsi_simple_mean_differs_from_wilder() {
        // Wilder smoothing would carry the early loss forward; the simple
        // mean over the window does not see it at all.
        let prices = [150.0, 100.0, 101.0, 102.0, 103.0];
        assert_eq!(rsi(&prices, 3), 100.0);
    }

    #[test]
    fn rsi_insufficient_history_is_neutral() {
        assert_eq!(rsi(&[100.0, 101.0], 14), 50.0);
        assert_eq!(rsi(&[], 14), 50.0);
    }

    #[test]
    fn rsi_bounds() {
        let prices = [100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0];
        for end in 4..=prices.len() {
            let v = rsi(&prices[..end], 3);
            assert!((0.0..=100.0).contains(&v), "RSI out of bounds: {v}");
        }
    }
}
