use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An age bracket (e.g. "U-12") that teams and tournaments belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeGroup {
    pub id: String,
    pub name: String,
    pub min_age: i32,
    pub max_age: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub age_group_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founded: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i32>,
    pub team_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coach {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub home_team_id: String,
    pub away_team_id: String,
    pub match_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: String,
    pub name: String,
    pub season: String,
    pub age_group_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentTable {
    pub id: String,
    pub tournament_id: String,
    pub age_group_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of a tournament table. The position comes from the order the
/// admin submitted the standings in, never from the win/goal columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standing {
    pub id: String,
    pub table_id: String,
    pub position: i32,
    pub team_name: String,
    pub played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Training {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_group_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct News {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Where a video's bytes live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VideoType {
    Upload,
    Youtube,
    Vimeo,
    Other,
}

impl VideoType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoType::Upload => "UPLOAD",
            VideoType::Youtube => "YOUTUBE",
            VideoType::Vimeo => "VIMEO",
            VideoType::Other => "OTHER",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "UPLOAD" => Some(VideoType::Upload),
            "YOUTUBE" => Some(VideoType::Youtube),
            "VIMEO" => Some(VideoType::Vimeo),
            "OTHER" => Some(VideoType::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    pub video_type: VideoType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An admin credential. The raw token is shown once at creation; only the
/// argon2id hash and a short lookup prefix are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    #[serde(skip)]
    pub token_hash: String,
    #[serde(skip)]
    pub token_lookup: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}

// Composite shapes returned by list/detail endpoints, with parent records
// attached the way the public site expects them.

#[derive(Debug, Clone, Serialize)]
pub struct TeamWithAgeGroup {
    #[serde(flatten)]
    pub team: Team,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_group: Option<AgeGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamDetail {
    #[serde(flatten)]
    pub team: Team,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_group: Option<AgeGroup>,
    pub players: Vec<Player>,
    pub photos: Vec<Photo>,
    pub videos: Vec<Video>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgeGroupWithTeams {
    #[serde(flatten)]
    pub age_group: AgeGroup,
    pub teams: Vec<Team>,
    pub team_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerWithTeam {
    #[serde(flatten)]
    pub player: Player,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamWithAgeGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoachWithTeam {
    #[serde(flatten)]
    pub coach: Coach,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamWithAgeGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchWithTeams {
    #[serde(flatten)]
    pub match_: Match,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_team: Option<Team>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_team: Option<Team>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TournamentWithAgeGroup {
    #[serde(flatten)]
    pub tournament: Tournament,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_group: Option<AgeGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableDetail {
    #[serde(flatten)]
    pub table: TournamentTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tournament: Option<Tournament>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_group: Option<AgeGroup>,
    pub standings: Vec<Standing>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhotoWithTeam {
    #[serde(flatten)]
    pub photo: Photo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoWithRelations {
    #[serde(flatten)]
    pub video: Video,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_: Option<Match>,
}
