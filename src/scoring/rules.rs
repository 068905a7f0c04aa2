//! Static scoring rule table
//!
//! The rule set is data, not branching code: a `(contract, function)` map for
//! top-level actions plus one volume policy per flow category. Keys are
//! unique by construction, so at most one rule matches a call; pairs with no
//! entry score zero.

use crate::config::Config;
use std::collections::HashMap;

/// Net-flow categories tracked separately per wallet until finalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowCategory {
    Bridge,
    Swap,
    Liquidity,
}

impl FlowCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowCategory::Bridge => "bridge",
            FlowCategory::Swap => "swap",
            FlowCategory::Liquidity => "liquidity",
        }
    }

    pub fn all() -> [FlowCategory; 3] {
        [
            FlowCategory::Bridge,
            FlowCategory::Swap,
            FlowCategory::Liquidity,
        ]
    }
}

/// Which address a rule credits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribution {
    /// The transaction sender
    Sender,
    /// The destination named in the `to` kwarg (bridge mints credit the
    /// receiving party, not the caller)
    KwargTo,
}

/// Sign of a volume contribution within its category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    Inflow,
    Outflow,
}

impl FlowDirection {
    pub fn sign(&self) -> f64 {
        match self {
            FlowDirection::Inflow => 1.0,
            FlowDirection::Outflow => -1.0,
        }
    }
}

/// What a matched top-level call earns
#[derive(Debug, Clone)]
pub enum Action {
    /// Flat points per occurrence. When `dedup_kwarg` is set, the kwarg's
    /// value is admitted once per run: repeat submissions of the same value
    /// (by anyone) earn nothing.
    Fixed {
        points: u64,
        dedup_kwarg: Option<&'static str>,
    },
    /// Signed USDC volume folded into the wallet's category net-flow
    Volume {
        category: FlowCategory,
        direction: FlowDirection,
        amount_kwarg: &'static str,
        attribution: Attribution,
    },
}

/// Volume-to-points policy for one flow category
#[derive(Debug, Clone, Copy)]
pub struct VolumePolicy {
    /// USDC per point
    pub ratio: f64,
    /// Maximum points the category can award
    pub cap_points: u64,
    /// Net volume strictly below this earns zero
    pub min_volume: f64,
}

pub struct RuleTable {
    actions: HashMap<(String, String), Action>,
    policies: HashMap<FlowCategory, VolumePolicy>,
    /// Contract emitting pool events (Swap / Mint / Burn)
    pub pair_contract: String,
    /// `data_indexed.pair` value of the tracked pool
    pub tracked_pair: String,
}

impl RuleTable {
    pub fn from_config(config: &Config) -> Self {
        let mut actions = HashMap::new();

        // One-time fixed actions
        actions.insert(
            key("con_name_service_final", "mint_name"),
            Action::Fixed {
                points: 5,
                dedup_kwarg: None,
            },
        );
        actions.insert(
            key("con_pixel_frames", "create_thing"),
            Action::Fixed {
                points: 5,
                dedup_kwarg: None,
            },
        );
        actions.insert(
            key("submission", "submit_contract"),
            Action::Fixed {
                points: 15,
                dedup_kwarg: Some("code"),
            },
        );

        // Bridge flows: mints credit the named destination, burns debit
        // the caller
        actions.insert(
            key("con_usdc", "mint"),
            Action::Volume {
                category: FlowCategory::Bridge,
                direction: FlowDirection::Inflow,
                amount_kwarg: "amount",
                attribution: Attribution::KwargTo,
            },
        );
        actions.insert(
            key("con_usdc", "burn"),
            Action::Volume {
                category: FlowCategory::Bridge,
                direction: FlowDirection::Outflow,
                amount_kwarg: "amount",
                attribution: Attribution::Sender,
            },
        );

        let mut policies = HashMap::new();
        policies.insert(
            FlowCategory::Bridge,
            VolumePolicy {
                ratio: config.bridge_ratio,
                cap_points: config.bridge_cap,
                min_volume: config.bridge_min_volume,
            },
        );
        policies.insert(
            FlowCategory::Swap,
            VolumePolicy {
                ratio: config.swap_ratio,
                cap_points: config.swap_cap,
                min_volume: config.swap_min_volume,
            },
        );
        policies.insert(
            FlowCategory::Liquidity,
            VolumePolicy {
                ratio: config.liquidity_ratio,
                cap_points: config.liquidity_cap,
                min_volume: config.liquidity_min_volume,
            },
        );

        Self {
            actions,
            policies,
            pair_contract: config.pair_contract.clone(),
            tracked_pair: config.tracked_pair.clone(),
        }
    }

    pub fn action(&self, contract: &str, function: &str) -> Option<&Action> {
        self.actions
            .get(&(contract.to_string(), function.to_string()))
    }

    pub fn policy(&self, category: FlowCategory) -> VolumePolicy {
        // Every category is inserted in from_config
        self.policies[&category]
    }
}

fn key(contract: &str, function: &str) -> (String, String) {
    (contract.to_string(), function.to_string())
}
