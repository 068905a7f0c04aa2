//! Transaction classification
//!
//! Turns one raw transaction into zero or more scoring contributions: the
//! top-level call is matched against the rule table, and nested execution
//! events are scanned independently for tracked-pool activity. Both feed the
//! same accumulator, so a single transaction can earn on both paths.

use super::engine::ScoringEngine;
use super::rules::{Action, Attribution, FlowCategory, RuleTable};
use crate::types::{numeric_field, string_field, EmittedEvent, TransactionRecord};

/// One scoring contribution extracted from a transaction
#[derive(Debug, Clone, PartialEq)]
pub enum Contribution {
    /// Flat points, optionally guarded by a once-per-run dedup key
    Fixed {
        address: String,
        points: u64,
        dedup_key: Option<String>,
    },
    /// Signed USDC-equivalent delta for a net-flow category (unweighted;
    /// the aggregation pass applies hold weight and bonus)
    Flow {
        address: String,
        category: FlowCategory,
        usdc_delta: f64,
    },
}

/// Classify one transaction into contributions.
///
/// Failed transactions contribute nothing. Per-record anomalies (missing
/// destination, unparseable amounts) drop the offending contribution and
/// never fail the run.
pub fn classify(
    tx: &TransactionRecord,
    rules: &RuleTable,
    engine: &ScoringEngine,
) -> Vec<Contribution> {
    if !tx.success {
        return Vec::new();
    }

    let mut contributions = Vec::new();

    if let Some(action) = rules.action(&tx.contract, &tx.function) {
        if let Some(contribution) = classify_call(tx, action) {
            contributions.push(contribution);
        }
    }

    for event in &tx.json_content.tx_result.events {
        if let Some(contribution) = classify_event(event, rules, engine) {
            contributions.push(contribution);
        }
    }

    contributions
}

/// Match the top-level call against its rule
fn classify_call(tx: &TransactionRecord, action: &Action) -> Option<Contribution> {
    let kwargs = &tx.json_content.payload.kwargs;

    match action {
        Action::Fixed {
            points,
            dedup_kwarg,
        } => {
            let dedup_key = match dedup_kwarg {
                Some(kwarg) => match string_field(kwargs, kwarg) {
                    Some(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
                    _ => {
                        log::debug!(
                            "Skipping {}.{}: missing dedup kwarg '{}'",
                            tx.contract,
                            tx.function,
                            kwarg
                        );
                        return None;
                    }
                },
                None => None,
            };

            Some(Contribution::Fixed {
                address: tx.sender.clone(),
                points: *points,
                dedup_key,
            })
        }
        Action::Volume {
            category,
            direction,
            amount_kwarg,
            attribution,
        } => {
            let amount = numeric_field(kwargs, amount_kwarg);
            if amount == 0.0 {
                log::debug!(
                    "Skipping {}.{}: no usable '{}' amount",
                    tx.contract,
                    tx.function,
                    amount_kwarg
                );
                return None;
            }

            let address = match attribution {
                Attribution::Sender => tx.sender.clone(),
                Attribution::KwargTo => match string_field(kwargs, "to") {
                    Some(to) if !to.is_empty() => to.to_string(),
                    _ => {
                        log::debug!(
                            "Skipping {}.{}: missing 'to' destination",
                            tx.contract,
                            tx.function
                        );
                        return None;
                    }
                },
            };

            Some(Contribution::Flow {
                address,
                category: *category,
                usdc_delta: amount * direction.sign(),
            })
        }
    }
}

/// Match a nested execution event against the tracked pool.
///
/// Swap: `amount0In` is USDC paid in (buy side), `amount1In` is currency
/// paid in (sell side, converted at the fixed rate). Mint adds liquidity,
/// Burn removes it; both are valued as `amount0 + convert(amount1)`.
fn classify_event(
    event: &EmittedEvent,
    rules: &RuleTable,
    engine: &ScoringEngine,
) -> Option<Contribution> {
    if event.contract != rules.pair_contract {
        return None;
    }
    if string_field(&event.data_indexed, "pair") != Some(rules.tracked_pair.as_str()) {
        return None;
    }

    let (category, usdc_delta) = match event.event.as_str() {
        "Swap" => {
            let usdc_in = numeric_field(&event.data, "amount0In");
            let currency_in = numeric_field(&event.data, "amount1In");
            (FlowCategory::Swap, usdc_in - engine.to_usdc(currency_in))
        }
        "Mint" => (FlowCategory::Liquidity, liquidity_value(event, engine)),
        "Burn" => (FlowCategory::Liquidity, -liquidity_value(event, engine)),
        _ => return None,
    };

    if usdc_delta == 0.0 || event.signer.is_empty() {
        return None;
    }

    Some(Contribution::Flow {
        address: event.signer.clone(),
        category,
        usdc_delta,
    })
}

fn liquidity_value(event: &EmittedEvent, engine: &ScoringEngine) -> f64 {
    let usdc = numeric_field(&event.data, "amount0");
    let currency = numeric_field(&event.data, "amount1");
    usdc + engine.to_usdc(currency)
}
