//! canastra-bench - measure bot strength with in-memory matches.
//!
//! Subcommands:
//! - `vs-random`: a search bot against random play
//! - `head-to-head`: the in-game configuration against a challenger
//! - `blunders`: advisory search on the fixed blunder positions

use canastra::arena::{
    control_vs_challenger, default_challenger, run_blunder_scenarios, win_rate_vs_random, MatchConfig,
};
use canastra::core::{GameRng, Team};
use canastra::mcts::SearchConfig;
use std::time::Instant;
use clap::{Args, Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "canastra-bench")]
#[command(about = "Benchmark the Canastra bots with headless matches")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Show progress logs
    #[arg(long, global = true)]
    show_output: bool,

    /// Seat turns before a game is abandoned
    #[arg(long, global = true, default_value = "500")]
    max_turns: u32,
}

#[derive(Subcommand)]
enum Command {
    /// Search bot against uniformly random play
    VsRandom {
        /// Number of games
        #[arg(short, long, default_value = "20")]
        games: u32,

        /// Team the search bot plays (0 or 1)
        #[arg(long, default_value = "0")]
        team: u8,

        /// First game seed
        #[arg(long, default_value = "42")]
        seed: u64,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// In-game configuration against a stronger challenger, both seatings
    HeadToHead {
        /// Games per seating
        #[arg(short, long, default_value = "10")]
        games: u32,

        /// First game seed
        #[arg(long, default_value = "100")]
        seed: u64,

        /// Challenger rollouts per decision
        #[arg(long, default_value = "10")]
        challenger_rollouts: u32,

        /// Challenger rollout depth
        #[arg(long, default_value = "6")]
        challenger_depth: u32,
    },

    /// Advisory search on the fixed blunder positions
    Blunders {
        /// Search seed
        #[arg(long, default_value = "7")]
        seed: u64,

        /// Rollouts per decision (defaults to the advisory budget)
        #[arg(long)]
        rollouts: Option<u32>,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Rollouts per decision
    #[arg(long, default_value = "4")]
    rollouts: u32,

    /// Actions per rollout
    #[arg(long, default_value = "5")]
    depth: u32,

    /// Penalize early sets
    #[arg(long)]
    discourage_early_triple: bool,
}

impl SearchArgs {
    fn config(&self) -> SearchConfig {
        SearchConfig::in_game()
            .with_rollouts(self.rollouts)
            .with_max_rollout_depth(self.depth)
            .with_discourage_early_triple(self.discourage_early_triple)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    // Silent by default, only warnings and errors
    let filter = if args.verbose {
        "debug"
    } else if args.show_output {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let match_config = MatchConfig::default().with_max_turns(args.max_turns);
    let start = Instant::now();

    match args.command {
        Command::VsRandom {
            games,
            team,
            seed,
            search,
        } => {
            if team > 1 {
                return Err(format!("team must be 0 or 1, got {team}").into());
            }
            info!(games, team, seed, "running bot vs random");
            let report = win_rate_vs_random(&search.config(), games, Team(team), seed, &match_config);

            println!("\n=== Search Bot vs Random ===");
            println!("Games:          {} ({} completed)", report.games, report.completed);
            println!("Wins:           {} ({:.1}%)", report.wins, report.win_rate() * 100.0);
            println!("Ties:           {}", report.ties);
            println!("Avg point diff: {:+.1}", report.avg_point_diff());
        }
        Command::HeadToHead {
            games,
            seed,
            challenger_rollouts,
            challenger_depth,
        } => {
            let control = SearchConfig::in_game();
            let challenger = default_challenger()
                .with_rollouts(challenger_rollouts)
                .with_max_rollout_depth(challenger_depth);
            info!(games, seed, "running control vs challenger");
            let report = control_vs_challenger(&control, &challenger, games, seed, &match_config);

            println!("\n=== Control vs Challenger ===");
            println!("Games played:    {} of {}", report.games_played, report.games_requested);
            println!("Control wins:    {}", report.control_wins);
            println!("Challenger wins: {}", report.challenger_wins);
            println!("Ties:            {}", report.ties);
            println!("Avg point diff:  {:+.1} (challenger - control)", report.avg_point_diff());
            println!(
                "Verdict:         {}",
                if report.challenger_is_better() {
                    "challenger stronger"
                } else {
                    "no improvement"
                }
            );
        }
        Command::Blunders { seed, rollouts } => {
            let mut config = SearchConfig::advisory();
            if let Some(rollouts) = rollouts {
                config = config.with_rollouts(rollouts);
            }
            let reports = run_blunder_scenarios(&config, &mut GameRng::new(seed))?;
            let passed = reports.iter().filter(|r| r.passed).count();

            println!("\n=== Blunder Scenarios ===");
            for report in &reports {
                let advice = report
                    .advice
                    .as_ref()
                    .map_or_else(|| "none".to_string(), ToString::to_string);
                println!(
                    "[{}] {:<32} advice: {}",
                    if report.passed { "PASS" } else { "FAIL" },
                    report.name,
                    advice
                );
            }
            println!("Passed: {passed}/{}", reports.len());
        }
    }

    println!("Elapsed:         {:.2?}", start.elapsed());
    Ok(())
}
