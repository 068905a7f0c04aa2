//! Scoring core - competition point computation
//!
//! Pure computation over an already-fetched window of transactions.
//!
//! # Pipeline
//!
//! ```text
//! ContestWindow (UTC month, bonus sub-window, hold-weight decay)
//!     ↓
//! classify() (rule-table match + nested pool-event scan)
//!     ↓
//! ScorePass (per-wallet accumulators, signed net flows, dedup set)
//!     ↓
//! ScoringEngine (conversion, minimum threshold, cap, floor division)
//!     ↓
//! rank() (points descending, address ascending on ties)
//! ```

pub mod aggregator;
pub mod classifier;
pub mod engine;
pub mod ranker;
pub mod rules;
pub mod window;

pub use aggregator::{ScorePass, WalletAccumulator};
pub use classifier::{classify, Contribution};
pub use engine::ScoringEngine;
pub use ranker::{rank, LeaderboardEntry};
pub use rules::{Action, Attribution, FlowCategory, FlowDirection, RuleTable, VolumePolicy};
pub use window::ContestWindow;
