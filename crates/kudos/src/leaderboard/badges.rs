use std::collections::{BTreeMap, BTreeSet};

use super::domain::{Achievement, Badge, UserEmail, UserProfile};
use super::scoring::ScoredAchievement;

/// Lifetime upvote total required for the hundred-upvotes badge.
pub const HUNDRED_UPVOTES_THRESHOLD: u32 = 100;

/// Recomputes every registered user's badge set from scratch.
///
/// Matching is by author email, the stable identity, so display-name
/// changes never detach a user from their badge history. Every registered
/// user gets an entry, possibly empty; BTree containers keep iteration
/// deterministic for identical inputs.
pub fn compute_badges(
    users: &BTreeMap<UserEmail, UserProfile>,
    achievements: &[Achievement],
    monthly_winners: &[ScoredAchievement],
) -> BTreeMap<UserEmail, BTreeSet<Badge>> {
    let winner_authors: BTreeSet<&UserEmail> = monthly_winners
        .iter()
        .map(|entry| &entry.achievement.author)
        .collect();

    users
        .keys()
        .map(|email| {
            let mut badges = BTreeSet::new();

            let mut submitted_any = false;
            let mut lifetime_upvotes: u32 = 0;
            for achievement in achievements {
                if &achievement.author == email {
                    submitted_any = true;
                    lifetime_upvotes = lifetime_upvotes.saturating_add(achievement.upvotes);
                }
            }

            if submitted_any {
                badges.insert(Badge::FirstSubmission);
            }
            if lifetime_upvotes >= HUNDRED_UPVOTES_THRESHOLD {
                badges.insert(Badge::HundredUpvotes);
            }
            if winner_authors.contains(email) {
                badges.insert(Badge::TopVotedMonthly);
            }

            (email.clone(), badges)
        })
        .collect()
}
