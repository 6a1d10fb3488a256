//! Simulator CLI - fast in-memory match simulation.
//!
//! Runs full matches against the real engine with timers compressed to
//! millisecond scale, for exercising the rule pipeline and timeout paths
//! without a chat platform attached.

mod driver;
mod policy;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use clap::Parser;
use engine::domain::state::UserId;
use engine::EngineConfig;
use tracing::{info, warn};

use driver::{run_match, MatchReport};
use policy::BotPolicy;

#[derive(Parser)]
#[command(name = "simulator")]
#[command(about = "Fast in-memory match simulator")]
struct Args {
    /// Number of matches to simulate
    #[arg(short, long, default_value = "1")]
    matches: u32,

    /// Players per match
    #[arg(short, long, default_value = "5")]
    players: usize,

    /// Pick policy for every bot
    #[arg(long, default_value = "random")]
    policy: BotPolicy,

    /// Probability that a bot skips a pick and lets the deadline fire
    #[arg(long, default_value = "0.0")]
    miss_rate: f64,

    /// Base seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Matches to run in flight at once
    #[arg(long, default_value = "1")]
    concurrency: usize,

    /// Pick window in milliseconds
    #[arg(long, default_value = "200")]
    pick_window_ms: u64,

    /// Print a JSON report line per match
    #[arg(long)]
    show_output: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = sim_config(&args);
    let concurrency = args.concurrency.max(1);
    let start = Instant::now();
    let mut reports: Vec<MatchReport> = Vec::new();
    let mut errors = 0u32;

    let mut in_flight = tokio::task::JoinSet::new();
    let mut next_match = 1u32;
    while next_match <= args.matches || !in_flight.is_empty() {
        while next_match <= args.matches && in_flight.len() < concurrency {
            let match_no = next_match;
            next_match += 1;
            let seed = args
                .seed
                .map(|s| s.wrapping_add(u64::from(match_no)))
                .unwrap_or_else(rand::random);
            let config = config.clone();
            let (players, policy, miss_rate) = (args.players, args.policy, args.miss_rate);
            in_flight.spawn(async move {
                (
                    match_no,
                    run_match(match_no, players, policy, miss_rate, seed, config).await,
                )
            });
        }

        let Some(joined) = in_flight.join_next().await else {
            break;
        };
        match joined? {
            (match_no, Ok(report)) => {
                if args.show_output {
                    println!("{}", serde_json::to_string(&report)?);
                }
                if args.verbose {
                    info!(
                        match_no,
                        rounds = report.rounds,
                        champion = ?report.champion,
                        "match completed"
                    );
                }
                reports.push(report);
            }
            (match_no, Err(error)) => {
                errors += 1;
                warn!(match_no, %error, "match failed");
            }
        }
    }

    print_summary(&reports, errors, start.elapsed(), args.matches);
    Ok(())
}

/// Production timing scaled down so matches finish in milliseconds. The
/// rule thresholds stay at their real values, except that the lobby floor
/// follows the requested player count.
fn sim_config(args: &Args) -> EngineConfig {
    EngineConfig {
        join_window: Duration::from_millis(50),
        join_warnings: Vec::new(),
        pick_window: Duration::from_millis(args.pick_window_ms),
        pick_warning_lead: Duration::from_millis(args.pick_window_ms / 4),
        min_players: args.players.min(EngineConfig::default().min_players),
        max_players: args.players.max(EngineConfig::default().max_players),
        ..EngineConfig::default()
    }
}

fn print_summary(reports: &[MatchReport], errors: u32, elapsed: Duration, total: u32) {
    println!("\n=== Simulation Summary ===");
    println!("Matches completed: {}/{}", reports.len(), total);
    if errors > 0 {
        println!("Errors: {errors}");
    }
    println!("Total time: {elapsed:?}");
    if reports.is_empty() {
        return;
    }

    let mut wins: HashMap<UserId, u32> = HashMap::new();
    let mut total_rounds = 0u64;
    for report in reports {
        total_rounds += u64::from(report.rounds);
        if let Some(champion) = report.champion {
            *wins.entry(champion).or_default() += 1;
        }
    }

    println!(
        "Average rounds per match: {:.1}",
        total_rounds as f64 / reports.len() as f64
    );
    println!("\n=== Wins by Player ===");
    let mut by_user: Vec<(UserId, u32)> = wins.into_iter().collect();
    by_user.sort_by_key(|&(user, _)| user);
    for (user, count) in by_user {
        let rate = (f64::from(count) / reports.len() as f64) * 100.0;
        println!("Player {user}: wins={count} ({rate:.1}%)");
    }
}
