use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::snapshot::WinnerView;

/// Rendered announcement handed to a publisher. Delivery is simulated:
/// real email or social transport is an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub channel: AnnouncementChannel,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementChannel {
    EmailDigest,
    SocialPost,
}

/// Outbound hook for announcement delivery so tests and the demo can
/// capture what would be sent.
pub trait AnnouncementPublisher: Send + Sync {
    fn publish(&self, announcement: Announcement) -> Result<(), PublishError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("announcement transport unavailable: {0}")]
    Transport(String),
}

/// Plain-text monthly digest listing the winner cohort in rank order.
pub fn winner_email(month_label: &str, winners: &[WinnerView]) -> Announcement {
    let mut body = String::new();
    let _ = writeln!(body, "Celebrating {month_label}'s Top Performers!");
    let _ = writeln!(body);

    if winners.is_empty() {
        let _ = writeln!(body, "No winners were recorded for {month_label}.");
    } else {
        for winner in winners {
            let _ = writeln!(
                body,
                "#{rank} {name} - \"{title}\" ({category}) - score {score:.2}, {upvotes} upvotes",
                rank = winner.rank,
                name = winner.author_name,
                title = winner.title,
                category = winner.category,
                score = winner.weighted_score,
                upvotes = winner.upvotes,
            );
            for badge in &winner.badges {
                let _ = writeln!(body, "    badge: {badge}");
            }
        }
    }

    let _ = writeln!(body);
    let _ = writeln!(
        body,
        "This is an automated message. The next digest will be sent at the end of next month."
    );

    Announcement {
        channel: AnnouncementChannel::EmailDigest,
        subject: format!("Celebrating {month_label}'s Top Performers!"),
        body,
    }
}

/// Share-ready blurb for a single winner.
pub fn social_post(winner: &WinnerView) -> Announcement {
    let body = format!(
        "Congratulations to {name} for their outstanding achievement: \"{title}\"! \
         So proud to have them on our team. #EmployeeRecognition #AcodezLife",
        name = winner.author_name,
        title = winner.title,
    );

    Announcement {
        channel: AnnouncementChannel::SocialPost,
        subject: format!("Shout-out: {}", winner.author_name),
        body,
    }
}
