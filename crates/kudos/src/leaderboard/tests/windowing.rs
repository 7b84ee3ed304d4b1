use chrono::Duration;

use super::common::*;
use crate::leaderboard::scoring::{score_achievements, ScoringConfig};
use crate::leaderboard::window::{active_window, monthly_winners, ranked_active_window};

#[test]
fn active_window_keeps_only_the_last_thirty_days() {
    let now = at(2025, 8, 20);
    let config = ScoringConfig::default();
    let achievements = vec![
        achievement(1, "a@corp.com", 10, now - Duration::days(2)),
        achievement(2, "b@corp.com", 20, now - Duration::days(29)),
        achievement(3, "c@corp.com", 30, now - Duration::days(31)),
    ];
    let scored = score_achievements(&achievements, &config);

    let active = active_window(&scored, now, &config);

    let ids: Vec<i64> = active.iter().map(|entry| entry.achievement.id.0).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn window_boundary_is_inclusive() {
    let now = at(2025, 8, 20);
    let config = ScoringConfig::default();
    let achievements = vec![achievement(1, "a@corp.com", 1, now - Duration::days(30))];
    let scored = score_achievements(&achievements, &config);

    assert_eq!(active_window(&scored, now, &config).len(), 1);
}

#[test]
fn rolling_window_and_calendar_month_disagree_near_boundaries() {
    // Early in a month the rolling window still reaches into the prior
    // calendar month, so one achievement can sit on both boards.
    let now = at(2025, 8, 5);
    let config = ScoringConfig::default();
    let achievements = vec![achievement(1, "a@corp.com", 40, at(2025, 7, 20))];
    let scored = score_achievements(&achievements, &config);

    let active = active_window(&scored, now, &config);
    let cohort = monthly_winners(&scored, now, &config);

    assert_eq!(active.len(), 1);
    assert_eq!(cohort.winners.len(), 1);
}

#[test]
fn winners_come_only_from_the_prior_calendar_month() {
    let now = at(2025, 8, 20);
    let config = ScoringConfig::default();
    let achievements = vec![
        achievement(1, "a@corp.com", 100, at(2025, 7, 3)),
        achievement(2, "b@corp.com", 90, at(2025, 8, 1)),
        achievement(3, "c@corp.com", 80, at(2025, 6, 30)),
        achievement(4, "d@corp.com", 70, at(2024, 7, 10)),
    ];
    let scored = score_achievements(&achievements, &config);

    let cohort = monthly_winners(&scored, now, &config);

    assert_eq!(cohort.month_label, "July");
    let ids: Vec<i64> = cohort
        .winners
        .iter()
        .map(|entry| entry.achievement.id.0)
        .collect();
    assert_eq!(ids, vec![1]);
}

#[test]
fn cohort_never_exceeds_three_winners() {
    let now = at(2025, 8, 20);
    let config = ScoringConfig::default();
    let achievements: Vec<_> = (1..=5)
        .map(|id| achievement(id, "a@corp.com", id as u32 * 10, at(2025, 7, id as u32)))
        .collect();
    let scored = score_achievements(&achievements, &config);

    let cohort = monthly_winners(&scored, now, &config);

    assert_eq!(cohort.winners.len(), 3);
    // Descending by weighted score: highest upvotes first.
    let ids: Vec<i64> = cohort
        .winners
        .iter()
        .map(|entry| entry.achievement.id.0)
        .collect();
    assert_eq!(ids, vec![5, 4, 3]);
}

#[test]
fn january_rolls_back_to_prior_december() {
    let now = at(2026, 1, 10);
    let config = ScoringConfig::default();
    let achievements = vec![
        achievement(1, "a@corp.com", 10, at(2025, 12, 24)),
        achievement(2, "b@corp.com", 20, at(2026, 1, 2)),
        achievement(3, "c@corp.com", 30, at(2024, 12, 24)),
    ];
    let scored = score_achievements(&achievements, &config);

    let cohort = monthly_winners(&scored, now, &config);

    assert_eq!(cohort.month_label, "December");
    let ids: Vec<i64> = cohort
        .winners
        .iter()
        .map(|entry| entry.achievement.id.0)
        .collect();
    assert_eq!(ids, vec![1]);
}

#[test]
fn equal_scores_rank_the_earlier_submission_first() {
    let now = at(2025, 8, 20);
    let config = ScoringConfig::default();
    let achievements = vec![
        achievement(200, "a@corp.com", 50, at(2025, 7, 10)),
        achievement(100, "b@corp.com", 50, at(2025, 7, 12)),
    ];
    let scored = score_achievements(&achievements, &config);

    let cohort = monthly_winners(&scored, now, &config);

    let ids: Vec<i64> = cohort
        .winners
        .iter()
        .map(|entry| entry.achievement.id.0)
        .collect();
    assert_eq!(ids, vec![100, 200]);
}

#[test]
fn empty_input_yields_an_empty_cohort_with_a_month_label() {
    let now = at(2025, 3, 1);
    let config = ScoringConfig::default();

    let cohort = monthly_winners(&[], now, &config);

    assert!(cohort.winners.is_empty());
    assert_eq!(cohort.month_label, "February");
}

#[test]
fn ranked_window_sorts_descending_by_weighted_score() {
    let now = at(2025, 8, 20);
    let config = ScoringConfig::default();
    let achievements = vec![
        achievement(1, "a@corp.com", 5, now),
        achievement(2, "b@corp.com", 50, now),
        achievement(3, "c@corp.com", 20, now),
    ];
    let scored = score_achievements(&achievements, &config);

    let ranked = ranked_active_window(&scored, now, &config);

    let ids: Vec<i64> = ranked.iter().map(|entry| entry.achievement.id.0).collect();
    assert_eq!(ids, vec![2, 3, 1]);
}
