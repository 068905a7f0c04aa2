
pub mod config;
pub mod fetch;
pub mod render;
pub mod scoring;
pub mod types;

use {
    chrono::Utc,
    config::Config,
    fetch::{fetch_with_retry, GraphqlSource},
    scoring::{rank, ContestWindow, RuleTable, ScorePass, ScoringEngine},
};

#[tokio::main]
pub async fn main() {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = Config::from_env();

    log::info!("🚀 Starting xianflow leaderboard run...");
    log::info!("📊 Configuration:");
    log::info!("   Node: {}", config.node_url);
    log::info!("   USDC per currency: {}", config.usdc_per_currency);
    log::info!(
        "   Tracked pool: {} pair {}",
        config.pair_contract,
        config.tracked_pair
    );

    if let Err(err) = run(&config).await {
        log::error!("❌ Leaderboard run failed: {}", err);
        std::process::exit(1);
    }
}

/// One complete scoring run: fetch the window, fold every record, rank,
/// render. Recomputes from scratch; nothing persists between runs.
async fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let window =
        ContestWindow::current_month(Utc::now(), config.bonus_days, config.hold_period_hours);
    log::info!(
        "📅 Contest window: {} → {} (UTC)",
        window.start.format("%Y-%m-%d"),
        window.end.format("%Y-%m-%d")
    );

    let source = GraphqlSource::new(&config.node_url)?;
    let records = fetch_with_retry(&source, window.start, window.end).await?;
    log::info!("📦 Fetched {} transactions", records.len());

    let rules = RuleTable::from_config(config);
    let engine = ScoringEngine::new(config.usdc_per_currency);

    let mut pass = ScorePass::new(&window, &rules, &engine);
    for record in &records {
        pass.fold(record);
    }

    let ranking = rank(pass.finalize());
    log::info!("🏆 {} wallets scored points", ranking.len());

    println!("{}", render::render_table(&ranking));
    Ok(())
}
