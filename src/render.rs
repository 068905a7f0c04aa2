// Renderer module - one-shot text table for the final ranking

use crate::scoring::LeaderboardEntry;
use std::fmt::Write;

/// Format the complete ranking as an aligned text table.
///
/// Called once with the final ranking; there is no incremental rendering.
pub fn render_table(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "No scoring activity in the contest window.".to_string();
    }

    let address_width = entries
        .iter()
        .map(|e| e.address.len())
        .max()
        .unwrap_or(0)
        .max("ADDRESS".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:>4}  {:<width$}  {:>7}", "RANK", "ADDRESS", "POINTS", width = address_width);

    for (idx, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4}  {:<width$}  {:>7}",
            idx + 1,
            entry.address,
            entry.points,
            width = address_width
        );
    }

    out
}
