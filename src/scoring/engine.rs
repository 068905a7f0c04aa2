//! Point computation primitives
//!
//! All quantitative policy lives here: the fixed currency→USDC conversion
//! and the volume-to-points formula applied to finalized net flows.

use super::rules::VolumePolicy;

/// Converts volumes to points. Stateless apart from the configured
/// currency conversion rate.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    usdc_per_currency: f64,
}

impl ScoringEngine {
    pub fn new(usdc_per_currency: f64) -> Self {
        Self { usdc_per_currency }
    }

    /// Convert a native-currency amount to the USDC reference unit at the
    /// fixed configured rate
    pub fn to_usdc(&self, currency_amount: f64) -> f64 {
        currency_amount * self.usdc_per_currency
    }

    /// Points for a finalized net volume: zero below the minimum threshold,
    /// otherwise `floor(net / ratio)` with the net clamped to the cap first.
    ///
    /// Called exactly once per wallet per category, after the whole window
    /// has been folded, so wash loops that net out earn nothing.
    pub fn points_for_net_volume(&self, policy: VolumePolicy, net_volume: f64) -> u64 {
        if !net_volume.is_finite() || net_volume <= 0.0 {
            return 0;
        }
        if net_volume < policy.min_volume {
            return 0;
        }

        let capped = net_volume.min(policy.ratio * policy.cap_points as f64);
        (capped / policy.ratio).floor() as u64
    }
}
