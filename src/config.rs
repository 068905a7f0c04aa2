//! Configuration loaded from environment variables

use std::env;

/// Scoring and fetch configuration.
///
/// Everything has a default matching the published competition rules, so a
/// bare run scores the current month against the public node. The currency
/// conversion rate has changed between competitions, which is why it is a
/// parameter and not a literal in the scoring code.
#[derive(Debug, Clone)]
pub struct Config {
    /// GraphQL endpoint of the node
    pub node_url: String,
    /// USDC value of one unit of the native currency
    pub usdc_per_currency: f64,
    /// Contract emitting tracked pool events
    pub pair_contract: String,
    /// `data_indexed.pair` id of the tracked pool
    pub tracked_pair: String,

    /// USDC per bridge point
    pub bridge_ratio: f64,
    pub bridge_cap: u64,
    pub bridge_min_volume: f64,

    /// USDC per swap point
    pub swap_ratio: f64,
    pub swap_cap: u64,
    pub swap_min_volume: f64,

    /// USDC per liquidity point
    pub liquidity_ratio: f64,
    pub liquidity_cap: u64,
    pub liquidity_min_volume: f64,

    /// Days of double points at the start of the window
    pub bonus_days: i64,
    /// Hours of linear decay before the window end
    pub hold_period_hours: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_url: "https://node.xian.org/graphql".to_string(),
            usdc_per_currency: 0.01,
            pair_contract: "con_pairs".to_string(),
            tracked_pair: "1".to_string(),
            bridge_ratio: 10.0,
            bridge_cap: 50,
            bridge_min_volume: 0.0,
            swap_ratio: 10.0,
            swap_cap: 50,
            swap_min_volume: 10.0,
            liquidity_ratio: 10.0,
            liquidity_cap: 50,
            liquidity_min_volume: 10.0,
            bonus_days: 5,
            hold_period_hours: 24,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// competition defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            node_url: env::var("XIAN_GRAPHQL_URL").unwrap_or(defaults.node_url),
            usdc_per_currency: env_parsed("USDC_PER_CURRENCY", defaults.usdc_per_currency),
            pair_contract: env::var("PAIR_CONTRACT").unwrap_or(defaults.pair_contract),
            tracked_pair: env::var("TRACKED_PAIR").unwrap_or(defaults.tracked_pair),
            bridge_ratio: env_parsed("BRIDGE_RATIO", defaults.bridge_ratio),
            bridge_cap: env_parsed("BRIDGE_CAP", defaults.bridge_cap),
            bridge_min_volume: env_parsed("BRIDGE_MIN_VOLUME", defaults.bridge_min_volume),
            swap_ratio: env_parsed("SWAP_RATIO", defaults.swap_ratio),
            swap_cap: env_parsed("SWAP_CAP", defaults.swap_cap),
            swap_min_volume: env_parsed("SWAP_MIN_VOLUME", defaults.swap_min_volume),
            liquidity_ratio: env_parsed("LIQUIDITY_RATIO", defaults.liquidity_ratio),
            liquidity_cap: env_parsed("LIQUIDITY_CAP", defaults.liquidity_cap),
            liquidity_min_volume: env_parsed("LIQUIDITY_MIN_VOLUME", defaults.liquidity_min_volume),
            bonus_days: env_parsed("BONUS_DAYS", defaults.bonus_days),
            hold_period_hours: env_parsed("HOLD_PERIOD_HOURS", defaults.hold_period_hours),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
