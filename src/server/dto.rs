//! Request payloads. The same shape serves POST and PUT: updates fully
//! replace the stored row, so optional fields omitted by the caller become
//! NULL.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::types::VideoType;

#[derive(Debug, Deserialize)]
pub struct AgeGroupPayload {
    pub name: String,
    pub min_age: i32,
    pub max_age: i32,
}

#[derive(Debug, Deserialize)]
pub struct TeamPayload {
    pub name: String,
    pub description: Option<String>,
    pub age_group_id: String,
    pub founded: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerPayload {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub position: Option<String>,
    pub number: Option<i32>,
    pub team_id: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CoachPayload {
    pub first_name: String,
    pub last_name: String,
    pub position: Option<String>,
    pub experience_years: Option<i32>,
    pub biography: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub achievements: Option<String>,
    pub team_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchPayload {
    pub home_team_id: String,
    pub away_team_id: String,
    pub match_date: DateTime<Utc>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TournamentPayload {
    pub name: String,
    pub season: String,
    pub age_group_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// One row of a submitted tournament table. Position is assigned from the
/// submitted order, so it is not part of the payload.
#[derive(Debug, Deserialize)]
pub struct StandingPayload {
    pub team_name: String,
    #[serde(default)]
    pub played: i32,
    #[serde(default)]
    pub wins: i32,
    #[serde(default)]
    pub draws: i32,
    #[serde(default)]
    pub losses: i32,
    #[serde(default)]
    pub goals_for: i32,
    #[serde(default)]
    pub goals_against: i32,
    #[serde(default)]
    pub points: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateTablePayload {
    pub tournament_id: String,
    pub age_group_id: String,
    #[serde(default)]
    pub standings: Vec<StandingPayload>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTablePayload {
    pub standings: Vec<StandingPayload>,
}

#[derive(Debug, Deserialize)]
pub struct TrainingPayload {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub team_id: Option<String>,
    pub age_group_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewsPayload {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Deserialize)]
pub struct PhotoPayload {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub url: String,
    pub team_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VideoPayload {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub video_type: Option<VideoType>,
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
    pub duration: Option<i32>,
    pub published: Option<bool>,
    pub team_id: Option<String>,
    pub match_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListPlayersParams {
    pub team_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListVideosParams {
    pub category: Option<String>,
    pub team_id: Option<String>,
    pub published: Option<bool>,
}
