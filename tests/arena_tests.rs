//! Headless match and benchmark report tests.

use canastra::arena::{
    control_vs_challenger, default_challenger, play_match, run_blunder_scenarios, win_rate_vs_random, Bot,
    MatchConfig,
};
use canastra::core::{GameRng, Team, TeamMap};
use canastra::mcts::SearchConfig;

fn quick_search() -> SearchConfig {
    SearchConfig::in_game().with_rollouts(2).with_max_rollout_depth(3)
}

#[test]
fn test_match_is_reproducible() {
    let bots = TeamMap::new(|team| if team == Team(0) { Bot::Search(quick_search()) } else { Bot::Random });
    let a = play_match(&bots, 17, &MatchConfig::default());
    let b = play_match(&bots, 17, &MatchConfig::default());

    assert!(a.completed());
    assert_eq!(a.outcome, b.outcome);
    assert_eq!(a.turns, b.turns);
    assert_eq!(a.decisions, b.decisions);
}

#[test]
fn test_vs_random_report_is_consistent() {
    let report = win_rate_vs_random(&quick_search(), 3, Team(1), 42, &MatchConfig::default());

    assert_eq!(report.games, 3);
    assert!(report.completed <= 3);
    assert!(report.wins + report.ties <= report.completed);
    assert!((0.0..=1.0).contains(&report.win_rate()));
}

#[test]
fn test_head_to_head_swaps_seats() {
    let report = control_vs_challenger(&quick_search(), &quick_search().with_rollouts(3), 1, 100, &MatchConfig::default());

    assert_eq!(report.games_requested, 2);
    assert!(report.games_played <= 2);
    assert_eq!(
        report.control_wins + report.challenger_wins + report.ties,
        report.games_played
    );
}

#[test]
fn test_default_challenger_searches_harder() {
    let challenger = default_challenger();
    let control = SearchConfig::in_game();
    assert!(challenger.rollouts > control.rollouts);
    assert!(challenger.max_rollout_depth > control.max_rollout_depth);
    assert!(challenger.discourage_early_triple);
}

#[test]
fn test_blunder_scenarios_report_each_position() {
    let config = SearchConfig::advisory().with_rollouts(6);
    let reports = run_blunder_scenarios(&config, &mut GameRng::new(3)).unwrap();

    assert_eq!(reports.len(), 3);
    for report in &reports {
        assert!(report.advice.is_some(), "{} produced no advice", report.name);
    }
}
