use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::announce::AnnouncementPublisher;
use super::domain::{AchievementCategory, AchievementId, Role, RubricScore, UserEmail};
use super::repository::{AchievementStore, DirectoryError, UserDirectory};
use super::service::{LeaderboardService, ServiceError};

/// Router exposing the leaderboard's domain endpoints.
pub fn leaderboard_router<S, D, N>(service: Arc<LeaderboardService<S, D, N>>) -> Router
where
    S: AchievementStore + 'static,
    D: UserDirectory + 'static,
    N: AnnouncementPublisher + 'static,
{
    Router::new()
        .route("/api/v1/users", post(register_handler::<S, D, N>))
        .route("/api/v1/users/:email", patch(rename_handler::<S, D, N>))
        .route(
            "/api/v1/users/:email/badges",
            get(badges_handler::<S, D, N>),
        )
        .route("/api/v1/achievements", post(submit_handler::<S, D, N>))
        .route(
            "/api/v1/achievements/:id/votes",
            post(vote_handler::<S, D, N>),
        )
        .route(
            "/api/v1/achievements/:id/rating",
            put(rating_handler::<S, D, N>),
        )
        .route("/api/v1/leaderboard", get(board_handler::<S, D, N>))
        .route("/api/v1/winners", get(winners_handler::<S, D, N>))
        .route(
            "/api/v1/winners/announcement",
            get(announcement_handler::<S, D, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) role: Role,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RenameRequest {
    pub(crate) name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequest {
    pub(crate) author_email: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) category: AchievementCategory,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VoteRequest {
    pub(crate) voter_email: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RatingRequest {
    pub(crate) manager_email: String,
    pub(crate) campaign_impact: u8,
    pub(crate) creativity: u8,
    pub(crate) ownership: u8,
    pub(crate) team_support: u8,
}

fn error_response(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::UnknownUser(_) | ServiceError::UnknownAchievement(_) => {
            StatusCode::NOT_FOUND
        }
        ServiceError::NotAManager(_) => StatusCode::FORBIDDEN,
        ServiceError::Rubric(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Directory(DirectoryError::Conflict) => StatusCode::CONFLICT,
        ServiceError::Directory(DirectoryError::NotFound) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn register_handler<S, D, N>(
    State(service): State<Arc<LeaderboardService<S, D, N>>>,
    axum::Json(request): axum::Json<RegisterRequest>,
) -> Response
where
    S: AchievementStore + 'static,
    D: UserDirectory + 'static,
    N: AnnouncementPublisher + 'static,
{
    match service.register(request.name, &request.email, request.role) {
        Ok(profile) => (StatusCode::CREATED, axum::Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rename_handler<S, D, N>(
    State(service): State<Arc<LeaderboardService<S, D, N>>>,
    Path(email): Path<String>,
    axum::Json(request): axum::Json<RenameRequest>,
) -> Response
where
    S: AchievementStore + 'static,
    D: UserDirectory + 'static,
    N: AnnouncementPublisher + 'static,
{
    match service.rename(&email, request.name) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn badges_handler<S, D, N>(
    State(service): State<Arc<LeaderboardService<S, D, N>>>,
    Path(email): Path<String>,
) -> Response
where
    S: AchievementStore + 'static,
    D: UserDirectory + 'static,
    N: AnnouncementPublisher + 'static,
{
    let email = UserEmail::new(&email);
    match service.snapshot(Utc::now()) {
        Ok(snapshot) => {
            let labels: Vec<&'static str> = snapshot
                .badges_for(&email)
                .into_iter()
                .map(|badge| badge.label())
                .collect();
            (
                StatusCode::OK,
                axum::Json(json!({ "email": email, "badges": labels })),
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<S, D, N>(
    State(service): State<Arc<LeaderboardService<S, D, N>>>,
    axum::Json(request): axum::Json<SubmitRequest>,
) -> Response
where
    S: AchievementStore + 'static,
    D: UserDirectory + 'static,
    N: AnnouncementPublisher + 'static,
{
    match service.submit(
        &request.author_email,
        request.title,
        request.description,
        request.category,
        Utc::now(),
    ) {
        Ok(achievement) => (StatusCode::CREATED, axum::Json(achievement)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn vote_handler<S, D, N>(
    State(service): State<Arc<LeaderboardService<S, D, N>>>,
    Path(id): Path<i64>,
    axum::Json(request): axum::Json<VoteRequest>,
) -> Response
where
    S: AchievementStore + 'static,
    D: UserDirectory + 'static,
    N: AnnouncementPublisher + 'static,
{
    match service.toggle_upvote(AchievementId(id), &request.voter_email) {
        Ok(achievement) => (
            StatusCode::OK,
            axum::Json(json!({ "id": achievement.id, "upvotes": achievement.upvotes })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rating_handler<S, D, N>(
    State(service): State<Arc<LeaderboardService<S, D, N>>>,
    Path(id): Path<i64>,
    axum::Json(request): axum::Json<RatingRequest>,
) -> Response
where
    S: AchievementStore + 'static,
    D: UserDirectory + 'static,
    N: AnnouncementPublisher + 'static,
{
    // Range check happens at this boundary; the engine assumes rubric
    // input is already valid.
    let rating = match RubricScore::new(
        request.campaign_impact,
        request.creativity,
        request.ownership,
        request.team_support,
    ) {
        Ok(rating) => rating,
        Err(error) => return error_response(ServiceError::Rubric(error)),
    };

    match service.save_rating(AchievementId(id), &request.manager_email, rating) {
        Ok(achievement) => (
            StatusCode::OK,
            axum::Json(json!({
                "id": achievement.id,
                "manager_ratings": achievement.manager_scores.len(),
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn board_handler<S, D, N>(
    State(service): State<Arc<LeaderboardService<S, D, N>>>,
) -> Response
where
    S: AchievementStore + 'static,
    D: UserDirectory + 'static,
    N: AnnouncementPublisher + 'static,
{
    let now = Utc::now();
    let snapshot = match service.snapshot(now) {
        Ok(snapshot) => snapshot,
        Err(error) => return error_response(error),
    };
    let users = match service.users() {
        Ok(users) => users,
        Err(error) => return error_response(error),
    };
    (StatusCode::OK, axum::Json(snapshot.board_views(&users))).into_response()
}

pub(crate) async fn winners_handler<S, D, N>(
    State(service): State<Arc<LeaderboardService<S, D, N>>>,
) -> Response
where
    S: AchievementStore + 'static,
    D: UserDirectory + 'static,
    N: AnnouncementPublisher + 'static,
{
    let snapshot = match service.snapshot(Utc::now()) {
        Ok(snapshot) => snapshot,
        Err(error) => return error_response(error),
    };
    let users = match service.users() {
        Ok(users) => users,
        Err(error) => return error_response(error),
    };
    (
        StatusCode::OK,
        axum::Json(json!({
            "month": snapshot.cohort.month_label,
            "winners": snapshot.winner_views(&users),
        })),
    )
        .into_response()
}

pub(crate) async fn announcement_handler<S, D, N>(
    State(service): State<Arc<LeaderboardService<S, D, N>>>,
) -> Response
where
    S: AchievementStore + 'static,
    D: UserDirectory + 'static,
    N: AnnouncementPublisher + 'static,
{
    match service.announce_winners(Utc::now()) {
        Ok(announcements) => (StatusCode::OK, axum::Json(announcements)).into_response(),
        Err(error) => error_response(error),
    }
}
