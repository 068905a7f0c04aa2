//! Final ranking of wallet totals

use serde::Serialize;
use std::collections::HashMap;

/// One row of the final leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub address: String,
    pub points: u64,
}

/// Sort finalized totals into the leaderboard.
///
/// Points descending; ties break by address ascending so the ranking is
/// reproducible. Wallets that finalized to zero are dropped.
pub fn rank(totals: HashMap<String, u64>) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = totals
        .into_iter()
        .filter(|(_, points)| *points > 0)
        .map(|(address, points)| LeaderboardEntry { address, points })
        .collect();

    entries.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| a.address.cmp(&b.address))
    });

    entries
}
