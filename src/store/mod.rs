mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Query parameters accepted by the video listing.
#[derive(Debug, Clone, Default)]
pub struct VideoFilter {
    pub category: Option<String>,
    pub team_id: Option<String>,
    pub published: Option<bool>,
}

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Age group operations
    fn create_age_group(&self, group: &AgeGroup) -> Result<()>;
    fn get_age_group(&self, id: &str) -> Result<Option<AgeGroup>>;
    fn list_age_groups(&self) -> Result<Vec<AgeGroup>>;
    fn update_age_group(&self, group: &AgeGroup) -> Result<()>;
    fn delete_age_group(&self, id: &str) -> Result<bool>;

    // Team operations
    fn create_team(&self, team: &Team) -> Result<()>;
    fn get_team(&self, id: &str) -> Result<Option<Team>>;
    fn list_teams(&self) -> Result<Vec<Team>>;
    fn list_age_group_teams(&self, age_group_id: &str) -> Result<Vec<Team>>;
    fn update_team(&self, team: &Team) -> Result<()>;
    fn delete_team(&self, id: &str) -> Result<bool>;

    // Player operations
    fn create_player(&self, player: &Player) -> Result<()>;
    fn get_player(&self, id: &str) -> Result<Option<Player>>;
    fn list_players(&self, team_id: Option<&str>) -> Result<Vec<Player>>;
    fn update_player(&self, player: &Player) -> Result<()>;
    fn delete_player(&self, id: &str) -> Result<bool>;

    // Coach operations
    fn create_coach(&self, coach: &Coach) -> Result<()>;
    fn get_coach(&self, id: &str) -> Result<Option<Coach>>;
    fn list_coaches(&self) -> Result<Vec<Coach>>;
    fn list_coaches_by_position(&self, position: &str) -> Result<Vec<Coach>>;
    fn update_coach(&self, coach: &Coach) -> Result<()>;
    fn delete_coach(&self, id: &str) -> Result<bool>;

    // Match operations
    fn create_match(&self, m: &Match) -> Result<()>;
    fn get_match(&self, id: &str) -> Result<Option<Match>>;
    fn list_matches(&self) -> Result<Vec<Match>>;
    fn update_match(&self, m: &Match) -> Result<()>;
    fn delete_match(&self, id: &str) -> Result<bool>;

    // Tournament operations
    fn create_tournament(&self, tournament: &Tournament) -> Result<()>;
    fn get_tournament(&self, id: &str) -> Result<Option<Tournament>>;
    fn list_tournaments(&self) -> Result<Vec<Tournament>>;
    fn update_tournament(&self, tournament: &Tournament) -> Result<()>;
    fn delete_tournament(&self, id: &str) -> Result<bool>;

    // Tournament table operations. Standings are always written together
    // with their table, inside one transaction.
    fn create_table(&self, table: &TournamentTable, standings: &[Standing]) -> Result<()>;
    fn get_table(&self, id: &str) -> Result<Option<TournamentTable>>;
    fn list_tables_by_age_group(&self, age_group_id: &str) -> Result<Vec<TournamentTable>>;
    fn list_tables_by_season(&self, season: &str) -> Result<Vec<TournamentTable>>;
    fn replace_table_standings(&self, table_id: &str, standings: &[Standing]) -> Result<()>;
    fn list_table_standings(&self, table_id: &str) -> Result<Vec<Standing>>;

    // Training operations
    fn create_training(&self, training: &Training) -> Result<()>;
    fn get_training(&self, id: &str) -> Result<Option<Training>>;
    fn list_trainings(&self) -> Result<Vec<Training>>;
    fn update_training(&self, training: &Training) -> Result<()>;
    fn delete_training(&self, id: &str) -> Result<bool>;

    // News operations
    fn create_news(&self, news: &News) -> Result<()>;
    fn get_news(&self, id: &str) -> Result<Option<News>>;
    fn list_published_news(&self) -> Result<Vec<News>>;
    fn list_all_news(&self) -> Result<Vec<News>>;
    fn update_news(&self, news: &News) -> Result<()>;
    fn delete_news(&self, id: &str) -> Result<bool>;

    // Photo operations
    fn create_photo(&self, photo: &Photo) -> Result<()>;
    fn get_photo(&self, id: &str) -> Result<Option<Photo>>;
    fn list_photos(&self) -> Result<Vec<Photo>>;
    fn list_team_photos(&self, team_id: &str, limit: i32) -> Result<Vec<Photo>>;
    fn update_photo(&self, photo: &Photo) -> Result<()>;
    fn delete_photo(&self, id: &str) -> Result<bool>;

    // Video operations
    fn create_video(&self, video: &Video) -> Result<()>;
    fn get_video(&self, id: &str) -> Result<Option<Video>>;
    fn list_videos(&self, filter: &VideoFilter) -> Result<Vec<Video>>;
    fn list_team_videos(&self, team_id: &str, limit: i32) -> Result<Vec<Video>>;
    fn update_video(&self, video: &Video) -> Result<()>;
    fn delete_video(&self, id: &str) -> Result<bool>;

    // Token operations
    fn create_token(&self, token: &Token) -> Result<()>;
    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>>;
    fn update_token_last_used(&self, id: &str) -> Result<()>;
    fn has_admin_token(&self) -> Result<bool>;
}
