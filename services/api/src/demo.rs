use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clap::Args;
use kudos::error::AppError;
use kudos::leaderboard::{AchievementStore, LeaderboardService, RubricScore, ScoringConfig};

use crate::infra::{
    date_to_utc, parse_date, seed_sample_data, InMemoryAchievementStore, InMemoryUserDirectory,
    LoggingAnnouncementPublisher,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the simulated winner announcements
    #[arg(long)]
    pub(crate) skip_announcements: bool,
}

#[derive(Args, Debug)]
pub(crate) struct WinnersReportArgs {
    /// Date the report is computed for (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

type DemoService =
    LeaderboardService<InMemoryAchievementStore, InMemoryUserDirectory, LoggingAnnouncementPublisher>;

fn seeded_service(now: chrono::DateTime<Utc>) -> (Arc<DemoService>, Arc<InMemoryAchievementStore>) {
    let store = Arc::new(InMemoryAchievementStore::default());
    let directory = Arc::new(InMemoryUserDirectory::default());
    let publisher = Arc::new(LoggingAnnouncementPublisher::default());
    seed_sample_data(&store, &directory, now);
    let service = Arc::new(LeaderboardService::new(
        store.clone(),
        directory,
        publisher,
        ScoringConfig::default(),
    ));
    (service, store)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = args.today.map(date_to_utc).unwrap_or_else(Utc::now);
    let (service, store) = seeded_service(now);

    // A manager rates last month's strongest entry so the demo shows both
    // score components at work.
    if let Some(top_seed) = store
        .all()
        .map_err(kudos::leaderboard::ServiceError::Store)?
        .iter()
        .max_by_key(|achievement| achievement.upvotes)
    {
        service.save_rating(
            top_seed.id,
            "dana.whitfield@corp.com",
            RubricScore::new(5, 4, 5, 4).expect("demo rubric in range"),
        )?;
    }

    let snapshot = service.snapshot(now)?;
    let users = service.users()?;

    println!("== Active leaderboard (last 30 days) ==");
    for entry in snapshot.board_views(&users) {
        println!(
            "  {:>2}. {:<22} {:<28} votes {:>3}  score {:>5.2}",
            entry.rank, entry.author_name, entry.title, entry.upvotes, entry.weighted_score
        );
    }

    println!();
    println!("== {} winners ==", snapshot.cohort.month_label);
    for winner in snapshot.winner_views(&users) {
        println!(
            "  #{} {} - \"{}\" (score {:.2})",
            winner.rank, winner.author_name, winner.title, winner.weighted_score
        );
    }

    println!();
    println!("== Badges ==");
    for (email, profile) in &users {
        let labels: Vec<&str> = snapshot
            .badges_for(email)
            .into_iter()
            .map(|badge| badge.label())
            .collect();
        let rendered = if labels.is_empty() {
            "-".to_string()
        } else {
            labels.join(", ")
        };
        println!("  {:<22} {}", profile.name, rendered);
    }

    if !args.skip_announcements {
        println!();
        println!("== Simulated announcements ==");
        for announcement in service.announce_winners(now)? {
            println!("--- {} ---", announcement.subject);
            print!("{}", announcement.body);
            println!();
        }
    }

    Ok(())
}

pub(crate) fn run_winners_report(args: WinnersReportArgs) -> Result<(), AppError> {
    let now = args.today.map(date_to_utc).unwrap_or_else(Utc::now);
    let (service, _) = seeded_service(now);

    let snapshot = service.snapshot(now)?;
    let users = service.users()?;

    println!("Winners for {}:", snapshot.cohort.month_label);
    if snapshot.cohort.winners.is_empty() {
        println!("  no achievements were recorded that month");
    }
    for winner in snapshot.winner_views(&users) {
        println!(
            "  #{} {} <{}> - \"{}\" - score {:.2}, {} upvotes",
            winner.rank,
            winner.author_name,
            winner.author_email,
            winner.title,
            winner.weighted_score,
            winner.upvotes
        );
    }

    Ok(())
}
