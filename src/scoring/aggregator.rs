//! Per-wallet aggregation pass
//!
//! One `ScorePass` per run. Contributions fold into lazily-created wallet
//! accumulators: fixed points sum directly, net-flow deltas stay signed and
//! separate per category until `finalize` converts each wallet to an integer
//! total exactly once. The submission dedup set lives on the pass, so nothing
//! leaks into a later run.

use super::classifier::{classify, Contribution};
use super::engine::ScoringEngine;
use super::rules::{FlowCategory, RuleTable};
use super::window::ContestWindow;
use crate::types::TransactionRecord;
use std::collections::{HashMap, HashSet};

/// Running totals for one wallet, created on first contribution
#[derive(Debug, Clone, Default)]
pub struct WalletAccumulator {
    fixed_points: u64,
    /// Signed, hold-weighted USDC net flow per category
    flows: HashMap<FlowCategory, f64>,
}

impl WalletAccumulator {
    fn add_fixed(&mut self, points: u64) {
        self.fixed_points += points;
    }

    fn add_flow(&mut self, category: FlowCategory, weighted_delta: f64) {
        *self.flows.entry(category).or_insert(0.0) += weighted_delta;
    }

    fn total(&self, rules: &RuleTable, engine: &ScoringEngine) -> u64 {
        let flow_points: u64 = self
            .flows
            .iter()
            .map(|(category, net)| engine.points_for_net_volume(rules.policy(*category), *net))
            .sum();
        self.fixed_points + flow_points
    }
}

/// One aggregation pass over a fetched window of transactions
pub struct ScorePass<'a> {
    window: &'a ContestWindow,
    rules: &'a RuleTable,
    engine: &'a ScoringEngine,
    wallets: HashMap<String, WalletAccumulator>,
    seen_submissions: HashSet<String>,
}

impl<'a> ScorePass<'a> {
    pub fn new(window: &'a ContestWindow, rules: &'a RuleTable, engine: &'a ScoringEngine) -> Self {
        Self {
            window,
            rules,
            engine,
            wallets: HashMap::new(),
            seen_submissions: HashSet::new(),
        }
    }

    /// Fold one transaction into the pass.
    ///
    /// Records outside the contest window are ignored, so the pass is a pure
    /// function of (window, records) whatever the data source returned.
    pub fn fold(&mut self, tx: &TransactionRecord) {
        if !self.window.contains(tx.created) {
            log::debug!("Ignoring out-of-window transaction at {}", tx.created);
            return;
        }

        for contribution in classify(tx, self.rules, self.engine) {
            self.apply(contribution, tx.created);
        }
    }

    fn apply(&mut self, contribution: Contribution, created: chrono::DateTime<chrono::Utc>) {
        match contribution {
            Contribution::Fixed {
                address,
                points,
                dedup_key,
            } => {
                if let Some(key) = dedup_key {
                    // First occurrence of a value wins, by anyone
                    if !self.seen_submissions.insert(key) {
                        log::debug!("Duplicate submission by {}, no points", address);
                        return;
                    }
                }

                let awarded = points * self.window.bonus_multiplier(created) as u64;
                self.wallets.entry(address).or_default().add_fixed(awarded);
            }
            Contribution::Flow {
                address,
                category,
                usdc_delta,
            } => {
                // Hold weight and bonus scale the delta before accumulation;
                // cap and minimum apply to the finalized net only
                let weighted = usdc_delta
                    * self.window.hold_weight(created)
                    * self.window.bonus_multiplier(created);
                self.wallets
                    .entry(address)
                    .or_default()
                    .add_flow(category, weighted);
            }
        }
    }

    /// Convert every accumulator to its final integer score.
    ///
    /// Consumes the pass: accumulators and the dedup set cannot survive into
    /// another run.
    pub fn finalize(self) -> HashMap<String, u64> {
        self.wallets
            .into_iter()
            .map(|(address, acc)| {
                let total = acc.total(self.rules, self.engine);
                (address, total)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde_json::{json, Value};

    struct Fixture {
        window: ContestWindow,
        rules: RuleTable,
        engine: ScoringEngine,
    }

    impl Fixture {
        fn new() -> Self {
            let now = Utc.with_ymd_and_hms(2025, 5, 14, 0, 0, 0).unwrap();
            Self {
                window: ContestWindow::current_month(now, 5, 24),
                rules: RuleTable::from_config(&Config::default()),
                engine: ScoringEngine::new(0.01),
            }
        }

        fn pass(&self) -> ScorePass<'_> {
            ScorePass::new(&self.window, &self.rules, &self.engine)
        }

        /// Mid-month timestamp: outside the bonus window, full hold weight
        fn mid_month(&self) -> DateTime<Utc> {
            self.window.start + Duration::days(10)
        }
    }

    fn tx_at(
        contract: &str,
        function: &str,
        sender: &str,
        kwargs: Value,
        created: DateTime<Utc>,
    ) -> TransactionRecord {
        serde_json::from_value(json!({
            "contract": contract,
            "function": function,
            "sender": sender,
            "success": true,
            "created": created.to_rfc3339(),
            "jsonContent": { "payload": { "kwargs": kwargs } }
        }))
        .unwrap()
    }

    fn swap_tx(signer: &str, usdc_in: f64, currency_in: f64, created: DateTime<Utc>) -> TransactionRecord {
        serde_json::from_value(json!({
            "contract": "con_dex_router",
            "function": "swap",
            "sender": signer,
            "success": true,
            "created": created.to_rfc3339(),
            "jsonContent": {
                "payload": { "kwargs": {} },
                "tx_result": {
                    "events": [{
                        "contract": "con_pairs",
                        "event": "Swap",
                        "signer": signer,
                        "data": { "amount0In": usdc_in, "amount1In": currency_in },
                        "data_indexed": { "pair": "1" }
                    }]
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_bridge_and_swap_totals() {
        let fx = Fixture::new();
        let at = fx.mid_month();
        let mut pass = fx.pass();

        pass.fold(&tx_at("con_usdc", "mint", "relayer", json!({"amount": 100, "to": "wallet_a"}), at));
        pass.fold(&swap_tx("wallet_b", 25.0, 0.0, at));

        let totals = pass.finalize();
        assert_eq!(totals.get("wallet_a"), Some(&10));
        assert_eq!(totals.get("wallet_b"), Some(&2));
        assert!(totals.get("relayer").is_none());
    }

    #[test]
    fn test_matched_buy_and_sell_net_to_zero() {
        let fx = Fixture::new();
        let at = fx.mid_month();
        let mut pass = fx.pass();

        // Buy 200 USDC, then sell 20_000 currency (= 200 USDC) back
        pass.fold(&swap_tx("washer", 200.0, 0.0, at));
        pass.fold(&swap_tx("washer", 0.0, 20_000.0, at + Duration::minutes(1)));

        let totals = pass.finalize();
        assert_eq!(totals.get("washer").copied().unwrap_or(0), 0);
    }

    #[test]
    fn test_gross_turnover_earns_less_than_net_exposure() {
        let fx = Fixture::new();
        let at = fx.mid_month();

        // Wash trader: buys 300, sells 250 back → net 50
        let mut wash = fx.pass();
        wash.fold(&swap_tx("w", 300.0, 0.0, at));
        wash.fold(&swap_tx("w", 0.0, 25_000.0, at + Duration::hours(1)));
        let wash_points = wash.finalize().get("w").copied().unwrap_or(0);

        // Holder: buys 300 and keeps it
        let mut hold = fx.pass();
        hold.fold(&swap_tx("h", 300.0, 0.0, at));
        let hold_points = hold.finalize().get("h").copied().unwrap_or(0);

        assert_eq!(wash_points, 5);
        assert_eq!(hold_points, 30);
        assert!(wash_points < hold_points);
    }

    #[test]
    fn test_hold_weight_zeroes_boundary_activity() {
        let fx = Fixture::new();
        let mut pass = fx.pass();

        // A large buy timestamped right at contest end carries weight 0
        pass.fold(&swap_tx("sniper", 500.0, 0.0, fx.window.end - Duration::seconds(1)));

        let totals = pass.finalize();
        assert_eq!(totals.get("sniper").copied().unwrap_or(0), 0);
    }

    #[test]
    fn test_hold_weight_halves_midway_through_decay() {
        let fx = Fixture::new();
        let mut pass = fx.pass();

        // 100 USDC at end-12h → weighted 50 → 5 points
        pass.fold(&swap_tx("late", 100.0, 0.0, fx.window.end - Duration::hours(12)));

        let totals = pass.finalize();
        assert_eq!(totals.get("late"), Some(&5));
    }

    #[test]
    fn test_bonus_window_doubles_pre_cap() {
        let fx = Fixture::new();
        let bonus_at = fx.window.start + Duration::days(2);
        let normal_at = fx.mid_month();

        let mut pass = fx.pass();
        pass.fold(&swap_tx("early", 100.0, 0.0, bonus_at));
        pass.fold(&swap_tx("later", 100.0, 0.0, normal_at));
        let totals = pass.finalize();

        assert_eq!(totals.get("later"), Some(&10));
        assert_eq!(totals.get("early"), Some(&20));
    }

    #[test]
    fn test_bonus_window_doubles_fixed_actions() {
        let fx = Fixture::new();
        let bonus_at = fx.window.start + Duration::days(1);
        let mut pass = fx.pass();

        pass.fold(&tx_at(
            "con_name_service_final",
            "mint_name",
            "namer",
            json!({"name": "xian"}),
            bonus_at,
        ));

        let totals = pass.finalize();
        assert_eq!(totals.get("namer"), Some(&10));
    }

    #[test]
    fn test_duplicate_submission_scores_once() {
        let fx = Fixture::new();
        let at = fx.mid_month();
        let mut pass = fx.pass();

        let code = json!({"name": "con_a", "code": "def seed(): pass"});
        pass.fold(&tx_at("submission", "submit_contract", "first", code.clone(), at));
        pass.fold(&tx_at(
            "submission",
            "submit_contract",
            "second",
            json!({"name": "con_b", "code": "def seed(): pass"}),
            at + Duration::minutes(5),
        ));
        // Different code still scores
        pass.fold(&tx_at(
            "submission",
            "submit_contract",
            "second",
            json!({"name": "con_c", "code": "def other(): pass"}),
            at + Duration::minutes(10),
        ));

        let totals = pass.finalize();
        assert_eq!(totals.get("first"), Some(&15));
        assert_eq!(totals.get("second"), Some(&15));
    }

    #[test]
    fn test_dedup_set_does_not_survive_the_pass() {
        let fx = Fixture::new();
        let at = fx.mid_month();
        let code = json!({"name": "con_a", "code": "def seed(): pass"});

        for _ in 0..2 {
            let mut pass = fx.pass();
            pass.fold(&tx_at("submission", "submit_contract", "w", code.clone(), at));
            let totals = pass.finalize();
            assert_eq!(totals.get("w"), Some(&15));
        }
    }

    #[test]
    fn test_failed_transaction_excluded() {
        let fx = Fixture::new();
        let mut record = tx_at(
            "con_usdc",
            "mint",
            "relayer",
            json!({"amount": 100, "to": "wallet_c"}),
            fx.mid_month(),
        );
        record.success = false;

        let mut pass = fx.pass();
        pass.fold(&record);
        assert!(pass.finalize().is_empty());
    }

    #[test]
    fn test_out_of_window_transaction_ignored() {
        let fx = Fixture::new();
        let mut pass = fx.pass();
        pass.fold(&tx_at(
            "con_usdc",
            "mint",
            "relayer",
            json!({"amount": 100, "to": "wallet_a"}),
            fx.window.start - Duration::hours(1),
        ));
        assert!(pass.finalize().is_empty());
    }

    #[test]
    fn test_categories_capped_independently() {
        let fx = Fixture::new();
        let at = fx.mid_month();
        let mut pass = fx.pass();

        // 10_000 USDC bridged and 10_000 USDC swapped: each capped at 50
        pass.fold(&tx_at("con_usdc", "mint", "relayer", json!({"amount": 10_000, "to": "whale"}), at));
        pass.fold(&swap_tx("whale", 10_000.0, 0.0, at));

        let totals = pass.finalize();
        assert_eq!(totals.get("whale"), Some(&100));
    }
}
