use super::common::*;
use crate::leaderboard::badges::compute_badges;
use crate::leaderboard::domain::{Badge, Role};
use crate::leaderboard::scoring::{score_achievements, ScoringConfig};
use crate::leaderboard::window::monthly_winners;

#[test]
fn user_with_no_submissions_has_an_empty_badge_set() {
    let users = user_map(&[profile("Quiet Quinn", "quinn@corp.com", Role::Employee)]);

    let badges = compute_badges(&users, &[], &[]);

    assert_eq!(badges.len(), 1);
    assert!(badges[&email("quinn@corp.com")].is_empty());
}

#[test]
fn first_submission_awards_the_badge_after_recompute() {
    let users = user_map(&[profile("Sam", "sam@corp.com", Role::Employee)]);
    let achievements = vec![achievement(1, "sam@corp.com", 0, at(2025, 8, 1))];

    let badges = compute_badges(&users, &achievements, &[]);

    assert_eq!(
        badges[&email("sam@corp.com")],
        [Badge::FirstSubmission].into_iter().collect()
    );
}

#[test]
fn hundred_upvotes_counts_lifetime_totals_across_achievements() {
    let users = user_map(&[profile("Ada", "ada@corp.com", Role::Employee)]);
    let just_short = vec![
        achievement(1, "ada@corp.com", 60, at(2024, 1, 1)),
        achievement(2, "ada@corp.com", 39, at(2025, 8, 1)),
    ];

    let badges = compute_badges(&users, &just_short, &[]);
    assert!(!badges[&email("ada@corp.com")].contains(&Badge::HundredUpvotes));

    // One more upvote crosses the threshold on the next full recompute.
    let mut reaching = just_short;
    reaching[1].upvotes += 1;

    let badges = compute_badges(&users, &reaching, &[]);
    assert!(badges[&email("ada@corp.com")].contains(&Badge::HundredUpvotes));
}

#[test]
fn old_achievements_still_count_toward_lifetime_upvotes() {
    // The hundred-upvotes badge is all-time, not windowed.
    let users = user_map(&[profile("Vet", "vet@corp.com", Role::Employee)]);
    let achievements = vec![achievement(1, "vet@corp.com", 150, at(2020, 1, 1))];

    let badges = compute_badges(&users, &achievements, &[]);

    assert!(badges[&email("vet@corp.com")].contains(&Badge::HundredUpvotes));
}

#[test]
fn winner_authors_receive_the_monthly_badge() {
    let now = at(2025, 8, 10);
    let config = ScoringConfig::default();
    let users = user_map(&[
        profile("Winner", "winner@corp.com", Role::Employee),
        profile("Runner", "runner@corp.com", Role::Employee),
        profile("Absent", "absent@corp.com", Role::Employee),
    ]);
    let achievements = vec![
        achievement(1, "winner@corp.com", 90, at(2025, 7, 5)),
        achievement(2, "runner@corp.com", 10, at(2025, 8, 2)),
    ];
    let scored = score_achievements(&achievements, &config);
    let cohort = monthly_winners(&scored, now, &config);

    let badges = compute_badges(&users, &achievements, &cohort.winners);

    assert!(badges[&email("winner@corp.com")].contains(&Badge::TopVotedMonthly));
    assert!(!badges[&email("runner@corp.com")].contains(&Badge::TopVotedMonthly));
    assert!(badges[&email("absent@corp.com")].is_empty());
}

#[test]
fn badge_sets_are_deterministic_for_identical_inputs() {
    let users = user_map(&[
        profile("A", "a@corp.com", Role::Employee),
        profile("B", "b@corp.com", Role::Manager),
    ]);
    let achievements = vec![
        achievement(1, "a@corp.com", 120, at(2025, 8, 1)),
        achievement(2, "b@corp.com", 3, at(2025, 8, 2)),
    ];

    let first = compute_badges(&users, &achievements, &[]);
    let second = compute_badges(&users, &achievements, &[]);

    assert_eq!(first, second);
}

#[test]
fn badges_follow_the_stable_identity_not_the_display_name() {
    // Two users sharing a display name keep separate histories because
    // matching is by email.
    let users = user_map(&[
        profile("Alex", "alex.a@corp.com", Role::Employee),
        profile("Alex", "alex.b@corp.com", Role::Employee),
    ]);
    let achievements = vec![achievement(1, "alex.a@corp.com", 200, at(2025, 8, 1))];

    let badges = compute_badges(&users, &achievements, &[]);

    assert!(badges[&email("alex.a@corp.com")].contains(&Badge::HundredUpvotes));
    assert!(badges[&email("alex.b@corp.com")].is_empty());
}
