use std::sync::Arc;

use axum::Router;

use super::AppState;

mod age_groups;
mod coaches;
mod matches;
mod news;
mod photos;
mod players;
mod teams;
mod tournaments;
mod trainings;
mod upload;
mod videos;

pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(age_groups::router())
        .merge(coaches::router())
        .merge(matches::router())
        .merge(news::router())
        .merge(photos::router())
        .merge(players::router())
        .merge(teams::router())
        .merge(tournaments::router())
        .merge(trainings::router())
        .merge(upload::router())
        .merge(videos::router())
}
