use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};

use super::{Store, VideoFilter};
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_else(|e| {
        tracing::error!("Invalid date in database: '{}' - {}", s, e);
        Utc::now().date_naive()
    })
}

fn format_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

fn opt_datetime(value: Option<String>) -> Option<DateTime<Utc>> {
    value.map(|s| parse_datetime(&s))
}

fn opt_date(value: Option<String>) -> Option<NaiveDate> {
    value.map(|s| parse_date(&s))
}

fn parse_video_type(s: &str) -> VideoType {
    VideoType::parse(s).unwrap_or_else(|| {
        tracing::error!("Invalid video type in database: '{}'", s);
        VideoType::Other
    })
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

// Row mappers, matching the column order of the SELECT lists below.

fn row_to_age_group(row: &Row<'_>) -> rusqlite::Result<AgeGroup> {
    Ok(AgeGroup {
        id: row.get(0)?,
        name: row.get(1)?,
        min_age: row.get(2)?,
        max_age: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
    })
}

fn row_to_team(row: &Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        age_group_id: row.get(3)?,
        founded: opt_date(row.get(4)?),
        created_at: parse_datetime(&row.get::<_, String>(5)?),
        updated_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

fn row_to_player(row: &Row<'_>) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        date_of_birth: parse_date(&row.get::<_, String>(3)?),
        position: row.get(4)?,
        number: row.get(5)?,
        team_id: row.get(6)?,
        photo_url: row.get(7)?,
        created_at: parse_datetime(&row.get::<_, String>(8)?),
        updated_at: parse_datetime(&row.get::<_, String>(9)?),
    })
}

fn row_to_coach(row: &Row<'_>) -> rusqlite::Result<Coach> {
    Ok(Coach {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        position: row.get(3)?,
        experience_years: row.get(4)?,
        biography: row.get(5)?,
        phone: row.get(6)?,
        email: row.get(7)?,
        photo_url: row.get(8)?,
        achievements: row.get(9)?,
        team_id: row.get(10)?,
        created_at: parse_datetime(&row.get::<_, String>(11)?),
        updated_at: parse_datetime(&row.get::<_, String>(12)?),
    })
}

fn row_to_match(row: &Row<'_>) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        home_team_id: row.get(1)?,
        away_team_id: row.get(2)?,
        match_date: parse_datetime(&row.get::<_, String>(3)?),
        home_score: row.get(4)?,
        away_score: row.get(5)?,
        location: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
        updated_at: parse_datetime(&row.get::<_, String>(8)?),
    })
}

fn row_to_tournament(row: &Row<'_>) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        season: row.get(2)?,
        age_group_id: row.get(3)?,
        start_date: opt_date(row.get(4)?),
        end_date: opt_date(row.get(5)?),
        description: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

fn row_to_table(row: &Row<'_>) -> rusqlite::Result<TournamentTable> {
    Ok(TournamentTable {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        age_group_id: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
        updated_at: parse_datetime(&row.get::<_, String>(4)?),
    })
}

fn row_to_standing(row: &Row<'_>) -> rusqlite::Result<Standing> {
    Ok(Standing {
        id: row.get(0)?,
        table_id: row.get(1)?,
        position: row.get(2)?,
        team_name: row.get(3)?,
        played: row.get(4)?,
        wins: row.get(5)?,
        draws: row.get(6)?,
        losses: row.get(7)?,
        goals_for: row.get(8)?,
        goals_against: row.get(9)?,
        points: row.get(10)?,
    })
}

fn row_to_training(row: &Row<'_>) -> rusqlite::Result<Training> {
    Ok(Training {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        date: parse_date(&row.get::<_, String>(3)?),
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        location: row.get(6)?,
        team_id: row.get(7)?,
        age_group_id: row.get(8)?,
        created_at: parse_datetime(&row.get::<_, String>(9)?),
        updated_at: parse_datetime(&row.get::<_, String>(10)?),
    })
}

fn row_to_news(row: &Row<'_>) -> rusqlite::Result<News> {
    Ok(News {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        excerpt: row.get(3)?,
        image_url: row.get(4)?,
        published: row.get(5)?,
        published_at: opt_datetime(row.get(6)?),
        created_at: parse_datetime(&row.get::<_, String>(7)?),
        updated_at: parse_datetime(&row.get::<_, String>(8)?),
    })
}

fn row_to_photo(row: &Row<'_>) -> rusqlite::Result<Photo> {
    Ok(Photo {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        url: row.get(4)?,
        team_id: row.get(5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

fn row_to_video(row: &Row<'_>) -> rusqlite::Result<Video> {
    Ok(Video {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        url: row.get(3)?,
        video_type: parse_video_type(&row.get::<_, String>(4)?),
        thumbnail_url: row.get(5)?,
        category: row.get(6)?,
        duration: row.get(7)?,
        published: row.get(8)?,
        team_id: row.get(9)?,
        match_id: row.get(10)?,
        created_at: parse_datetime(&row.get::<_, String>(11)?),
        updated_at: parse_datetime(&row.get::<_, String>(12)?),
    })
}

const TEAM_COLUMNS: &str = "id, name, description, age_group_id, founded, created_at, updated_at";
const PLAYER_COLUMNS: &str =
    "id, first_name, last_name, date_of_birth, position, number, team_id, photo_url, created_at, updated_at";
const COACH_COLUMNS: &str =
    "id, first_name, last_name, position, experience_years, biography, phone, email, photo_url, achievements, team_id, created_at, updated_at";
const MATCH_COLUMNS: &str =
    "id, home_team_id, away_team_id, match_date, home_score, away_score, location, created_at, updated_at";
const TOURNAMENT_COLUMNS: &str =
    "id, name, season, age_group_id, start_date, end_date, description, created_at";
const STANDING_COLUMNS: &str =
    "id, table_id, position, team_name, played, wins, draws, losses, goals_for, goals_against, points";
const TRAINING_COLUMNS: &str =
    "id, title, description, date, start_time, end_time, location, team_id, age_group_id, created_at, updated_at";
const NEWS_COLUMNS: &str =
    "id, title, content, excerpt, image_url, published, published_at, created_at, updated_at";
const PHOTO_COLUMNS: &str = "id, title, description, category, url, team_id, created_at";
const VIDEO_COLUMNS: &str =
    "id, title, description, url, video_type, thumbnail_url, category, duration, published, team_id, match_id, created_at, updated_at";

fn insert_standing(conn: &Connection, standing: &Standing) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO tournament_standings
             (id, table_id, position, team_name, played, wins, draws, losses, goals_for, goals_against, points)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            standing.id,
            standing.table_id,
            standing.position,
            standing.team_name,
            standing.played,
            standing.wins,
            standing.draws,
            standing.losses,
            standing.goals_for,
            standing.goals_against,
            standing.points,
        ],
    )
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Age group operations

    fn create_age_group(&self, group: &AgeGroup) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO age_groups (id, name, min_age, max_age, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    group.id,
                    group.name,
                    group.min_age,
                    group.max_age,
                    format_datetime(&group.created_at),
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Error::AlreadyExists
                } else {
                    Error::from(e)
                }
            })?;
        Ok(())
    }

    fn get_age_group(&self, id: &str) -> Result<Option<AgeGroup>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, min_age, max_age, created_at FROM age_groups WHERE id = ?1",
            params![id],
            row_to_age_group,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_age_groups(&self) -> Result<Vec<AgeGroup>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, min_age, max_age, created_at FROM age_groups ORDER BY min_age",
        )?;
        let rows = stmt.query_map([], row_to_age_group)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_age_group(&self, group: &AgeGroup) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE age_groups SET name = ?1, min_age = ?2, max_age = ?3 WHERE id = ?4",
            params![group.name, group.min_age, group.max_age, group.id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_age_group(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM age_groups WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Team operations

    fn create_team(&self, team: &Team) -> Result<()> {
        self.conn().execute(
            &format!("INSERT INTO teams ({TEAM_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            params![
                team.id,
                team.name,
                team.description,
                team.age_group_id,
                team.founded.as_ref().map(format_date),
                format_datetime(&team.created_at),
                format_datetime(&team.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_team(&self, id: &str) -> Result<Option<Team>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = ?1"),
            params![id],
            row_to_team,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_teams(&self) -> Result<Vec<Team>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT t.id, t.name, t.description, t.age_group_id, t.founded, t.created_at, t.updated_at
             FROM teams t
             JOIN age_groups g ON t.age_group_id = g.id
             ORDER BY g.name, t.name",
        )?;
        let rows = stmt.query_map([], row_to_team)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_age_group_teams(&self, age_group_id: &str) -> Result<Vec<Team>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE age_group_id = ?1 ORDER BY name"
        ))?;
        let rows = stmt.query_map(params![age_group_id], row_to_team)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_team(&self, team: &Team) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE teams SET name = ?1, description = ?2, age_group_id = ?3, founded = ?4, updated_at = ?5
             WHERE id = ?6",
            params![
                team.name,
                team.description,
                team.age_group_id,
                team.founded.as_ref().map(format_date),
                format_datetime(&team.updated_at),
                team.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_team(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM teams WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Player operations

    fn create_player(&self, player: &Player) -> Result<()> {
        self.conn().execute(
            &format!(
                "INSERT INTO players ({PLAYER_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            ),
            params![
                player.id,
                player.first_name,
                player.last_name,
                format_date(&player.date_of_birth),
                player.position,
                player.number,
                player.team_id,
                player.photo_url,
                format_datetime(&player.created_at),
                format_datetime(&player.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_player(&self, id: &str) -> Result<Option<Player>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1"),
            params![id],
            row_to_player,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_players(&self, team_id: Option<&str>) -> Result<Vec<Player>> {
        let conn = self.conn();
        let order = "ORDER BY number IS NULL, number, last_name";

        let mut rows = Vec::new();
        match team_id {
            Some(team_id) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {PLAYER_COLUMNS} FROM players WHERE team_id = ?1 {order}"
                ))?;
                for player in stmt.query_map(params![team_id], row_to_player)? {
                    rows.push(player?);
                }
            }
            None => {
                let mut stmt =
                    conn.prepare(&format!("SELECT {PLAYER_COLUMNS} FROM players {order}"))?;
                for player in stmt.query_map([], row_to_player)? {
                    rows.push(player?);
                }
            }
        }
        Ok(rows)
    }

    fn update_player(&self, player: &Player) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE players SET first_name = ?1, last_name = ?2, date_of_birth = ?3, position = ?4,
                 number = ?5, team_id = ?6, photo_url = ?7, updated_at = ?8
             WHERE id = ?9",
            params![
                player.first_name,
                player.last_name,
                format_date(&player.date_of_birth),
                player.position,
                player.number,
                player.team_id,
                player.photo_url,
                format_datetime(&player.updated_at),
                player.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_player(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM players WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Coach operations

    fn create_coach(&self, coach: &Coach) -> Result<()> {
        self.conn().execute(
            &format!(
                "INSERT INTO coaches ({COACH_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
            ),
            params![
                coach.id,
                coach.first_name,
                coach.last_name,
                coach.position,
                coach.experience_years,
                coach.biography,
                coach.phone,
                coach.email,
                coach.photo_url,
                coach.achievements,
                coach.team_id,
                format_datetime(&coach.created_at),
                format_datetime(&coach.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_coach(&self, id: &str) -> Result<Option<Coach>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {COACH_COLUMNS} FROM coaches WHERE id = ?1"),
            params![id],
            row_to_coach,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_coaches(&self) -> Result<Vec<Coach>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {COACH_COLUMNS} FROM coaches ORDER BY position IS NULL, position, last_name"
        ))?;
        let rows = stmt.query_map([], row_to_coach)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_coaches_by_position(&self, position: &str) -> Result<Vec<Coach>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {COACH_COLUMNS} FROM coaches
             WHERE position LIKE '%' || ?1 || '%'
             ORDER BY last_name"
        ))?;
        let rows = stmt.query_map(params![position], row_to_coach)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_coach(&self, coach: &Coach) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE coaches SET first_name = ?1, last_name = ?2, position = ?3, experience_years = ?4,
                 biography = ?5, phone = ?6, email = ?7, photo_url = ?8, achievements = ?9,
                 team_id = ?10, updated_at = ?11
             WHERE id = ?12",
            params![
                coach.first_name,
                coach.last_name,
                coach.position,
                coach.experience_years,
                coach.biography,
                coach.phone,
                coach.email,
                coach.photo_url,
                coach.achievements,
                coach.team_id,
                format_datetime(&coach.updated_at),
                coach.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_coach(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM coaches WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Match operations

    fn create_match(&self, m: &Match) -> Result<()> {
        self.conn().execute(
            &format!(
                "INSERT INTO matches ({MATCH_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
            ),
            params![
                m.id,
                m.home_team_id,
                m.away_team_id,
                format_datetime(&m.match_date),
                m.home_score,
                m.away_score,
                m.location,
                format_datetime(&m.created_at),
                format_datetime(&m.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_match(&self, id: &str) -> Result<Option<Match>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1"),
            params![id],
            row_to_match,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_matches(&self) -> Result<Vec<Match>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches ORDER BY match_date DESC"
        ))?;
        let rows = stmt.query_map([], row_to_match)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_match(&self, m: &Match) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE matches SET home_team_id = ?1, away_team_id = ?2, match_date = ?3,
                 home_score = ?4, away_score = ?5, location = ?6, updated_at = ?7
             WHERE id = ?8",
            params![
                m.home_team_id,
                m.away_team_id,
                format_datetime(&m.match_date),
                m.home_score,
                m.away_score,
                m.location,
                format_datetime(&m.updated_at),
                m.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_match(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM matches WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Tournament operations

    fn create_tournament(&self, tournament: &Tournament) -> Result<()> {
        self.conn().execute(
            &format!(
                "INSERT INTO tournaments ({TOURNAMENT_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
            ),
            params![
                tournament.id,
                tournament.name,
                tournament.season,
                tournament.age_group_id,
                tournament.start_date.as_ref().map(format_date),
                tournament.end_date.as_ref().map(format_date),
                tournament.description,
                format_datetime(&tournament.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_tournament(&self, id: &str) -> Result<Option<Tournament>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE id = ?1"),
            params![id],
            row_to_tournament,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_tournaments(&self) -> Result<Vec<Tournament>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments
             ORDER BY start_date IS NULL, start_date DESC"
        ))?;
        let rows = stmt.query_map([], row_to_tournament)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_tournament(&self, tournament: &Tournament) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE tournaments SET name = ?1, season = ?2, age_group_id = ?3, start_date = ?4,
                 end_date = ?5, description = ?6
             WHERE id = ?7",
            params![
                tournament.name,
                tournament.season,
                tournament.age_group_id,
                tournament.start_date.as_ref().map(format_date),
                tournament.end_date.as_ref().map(format_date),
                tournament.description,
                tournament.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_tournament(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM tournaments WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Tournament table operations

    fn create_table(&self, table: &TournamentTable, standings: &[Standing]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO tournament_tables (id, tournament_id, age_group_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                table.id,
                table.tournament_id,
                table.age_group_id,
                format_datetime(&table.created_at),
                format_datetime(&table.updated_at),
            ],
        )?;

        for standing in standings {
            insert_standing(&tx, standing)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn get_table(&self, id: &str) -> Result<Option<TournamentTable>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, tournament_id, age_group_id, created_at, updated_at
             FROM tournament_tables WHERE id = ?1",
            params![id],
            row_to_table,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_tables_by_age_group(&self, age_group_id: &str) -> Result<Vec<TournamentTable>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, tournament_id, age_group_id, created_at, updated_at
             FROM tournament_tables WHERE age_group_id = ?1 ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![age_group_id], row_to_table)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_tables_by_season(&self, season: &str) -> Result<Vec<TournamentTable>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT tt.id, tt.tournament_id, tt.age_group_id, tt.created_at, tt.updated_at
             FROM tournament_tables tt
             JOIN tournaments t ON tt.tournament_id = t.id
             WHERE t.season = ?1
             ORDER BY tt.created_at",
        )?;
        let rows = stmt.query_map(params![season], row_to_table)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Replaces every standing of a table in one transaction, so a failure
    // mid-way leaves the previous standings intact.
    fn replace_table_standings(&self, table_id: &str, standings: &[Standing]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let rows = tx.execute(
            "UPDATE tournament_tables SET updated_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), table_id],
        )?;
        if rows == 0 {
            return Err(Error::NotFound);
        }

        tx.execute(
            "DELETE FROM tournament_standings WHERE table_id = ?1",
            params![table_id],
        )?;

        for standing in standings {
            insert_standing(&tx, standing)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn list_table_standings(&self, table_id: &str) -> Result<Vec<Standing>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {STANDING_COLUMNS} FROM tournament_standings
             WHERE table_id = ?1 ORDER BY position"
        ))?;
        let rows = stmt.query_map(params![table_id], row_to_standing)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Training operations

    fn create_training(&self, training: &Training) -> Result<()> {
        self.conn().execute(
            &format!(
                "INSERT INTO trainings ({TRAINING_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            ),
            params![
                training.id,
                training.title,
                training.description,
                format_date(&training.date),
                training.start_time,
                training.end_time,
                training.location,
                training.team_id,
                training.age_group_id,
                format_datetime(&training.created_at),
                format_datetime(&training.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_training(&self, id: &str) -> Result<Option<Training>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {TRAINING_COLUMNS} FROM trainings WHERE id = ?1"),
            params![id],
            row_to_training,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_trainings(&self) -> Result<Vec<Training>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TRAINING_COLUMNS} FROM trainings ORDER BY date, start_time"
        ))?;
        let rows = stmt.query_map([], row_to_training)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_training(&self, training: &Training) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE trainings SET title = ?1, description = ?2, date = ?3, start_time = ?4,
                 end_time = ?5, location = ?6, team_id = ?7, age_group_id = ?8, updated_at = ?9
             WHERE id = ?10",
            params![
                training.title,
                training.description,
                format_date(&training.date),
                training.start_time,
                training.end_time,
                training.location,
                training.team_id,
                training.age_group_id,
                format_datetime(&training.updated_at),
                training.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_training(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM trainings WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // News operations

    fn create_news(&self, news: &News) -> Result<()> {
        self.conn().execute(
            &format!(
                "INSERT INTO news ({NEWS_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
            ),
            params![
                news.id,
                news.title,
                news.content,
                news.excerpt,
                news.image_url,
                news.published,
                news.published_at.as_ref().map(format_datetime),
                format_datetime(&news.created_at),
                format_datetime(&news.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_news(&self, id: &str) -> Result<Option<News>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {NEWS_COLUMNS} FROM news WHERE id = ?1"),
            params![id],
            row_to_news,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_published_news(&self) -> Result<Vec<News>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {NEWS_COLUMNS} FROM news WHERE published = 1 ORDER BY published_at DESC"
        ))?;
        let rows = stmt.query_map([], row_to_news)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_all_news(&self) -> Result<Vec<News>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {NEWS_COLUMNS} FROM news ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([], row_to_news)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_news(&self, news: &News) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE news SET title = ?1, content = ?2, excerpt = ?3, image_url = ?4,
                 published = ?5, published_at = ?6, updated_at = ?7
             WHERE id = ?8",
            params![
                news.title,
                news.content,
                news.excerpt,
                news.image_url,
                news.published,
                news.published_at.as_ref().map(format_datetime),
                format_datetime(&news.updated_at),
                news.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_news(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM news WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Photo operations

    fn create_photo(&self, photo: &Photo) -> Result<()> {
        self.conn().execute(
            &format!("INSERT INTO photos ({PHOTO_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            params![
                photo.id,
                photo.title,
                photo.description,
                photo.category,
                photo.url,
                photo.team_id,
                format_datetime(&photo.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_photo(&self, id: &str) -> Result<Option<Photo>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE id = ?1"),
            params![id],
            row_to_photo,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_photos(&self) -> Result<Vec<Photo>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PHOTO_COLUMNS} FROM photos ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([], row_to_photo)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_team_photos(&self, team_id: &str, limit: i32) -> Result<Vec<Photo>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PHOTO_COLUMNS} FROM photos WHERE team_id = ?1
             ORDER BY created_at DESC LIMIT ?2"
        ))?;
        let rows = stmt.query_map(params![team_id, limit], row_to_photo)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_photo(&self, photo: &Photo) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE photos SET title = ?1, description = ?2, category = ?3, url = ?4, team_id = ?5
             WHERE id = ?6",
            params![
                photo.title,
                photo.description,
                photo.category,
                photo.url,
                photo.team_id,
                photo.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_photo(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM photos WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Video operations

    fn create_video(&self, video: &Video) -> Result<()> {
        self.conn().execute(
            &format!(
                "INSERT INTO videos ({VIDEO_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
            ),
            params![
                video.id,
                video.title,
                video.description,
                video.url,
                video.video_type.as_str(),
                video.thumbnail_url,
                video.category,
                video.duration,
                video.published,
                video.team_id,
                video.match_id,
                format_datetime(&video.created_at),
                format_datetime(&video.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_video(&self, id: &str) -> Result<Option<Video>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = ?1"),
            params![id],
            row_to_video,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_videos(&self, filter: &VideoFilter) -> Result<Vec<Video>> {
        let mut sql = format!("SELECT {VIDEO_COLUMNS} FROM videos");
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<&dyn ToSql> = Vec::new();

        if let Some(category) = &filter.category {
            clauses.push("category = ?");
            values.push(category);
        }
        if let Some(team_id) = &filter.team_id {
            clauses.push("team_id = ?");
            values.push(team_id);
        }
        if let Some(published) = &filter.published {
            clauses.push("published = ?");
            values.push(published);
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(values.as_slice(), row_to_video)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_team_videos(&self, team_id: &str, limit: i32) -> Result<Vec<Video>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE team_id = ?1
             ORDER BY created_at DESC LIMIT ?2"
        ))?;
        let rows = stmt.query_map(params![team_id, limit], row_to_video)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_video(&self, video: &Video) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE videos SET title = ?1, description = ?2, url = ?3, video_type = ?4,
                 thumbnail_url = ?5, category = ?6, duration = ?7, published = ?8,
                 team_id = ?9, match_id = ?10, updated_at = ?11
             WHERE id = ?12",
            params![
                video.title,
                video.description,
                video.url,
                video.video_type.as_str(),
                video.thumbnail_url,
                video.category,
                video.duration,
                video.published,
                video.team_id,
                video.match_id,
                format_datetime(&video.updated_at),
                video.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_video(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM videos WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Token operations

    fn create_token(&self, token: &Token) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO tokens (id, token_hash, token_lookup, created_at, expires_at, last_used_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    token.id,
                    token.token_hash,
                    token.token_lookup,
                    format_datetime(&token.created_at),
                    token.expires_at.as_ref().map(format_datetime),
                    token.last_used_at.as_ref().map(format_datetime),
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Error::TokenLookupCollision
                } else {
                    Error::from(e)
                }
            })?;
        Ok(())
    }

    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, token_hash, token_lookup, created_at, expires_at, last_used_at
             FROM tokens WHERE token_lookup = ?1",
            params![lookup],
            |row| {
                Ok(Token {
                    id: row.get(0)?,
                    token_hash: row.get(1)?,
                    token_lookup: row.get(2)?,
                    created_at: parse_datetime(&row.get::<_, String>(3)?),
                    expires_at: opt_datetime(row.get(4)?),
                    last_used_at: opt_datetime(row.get(5)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_token_last_used(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE tokens SET last_used_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), id],
        )?;
        Ok(())
    }

    fn has_admin_token(&self) -> Result<bool> {
        let conn = self.conn();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM tokens", [], |row| row.get(0))?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn open_store() -> (TempDir, SqliteStore) {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();
        (temp, store)
    }

    fn sample_age_group(id: &str, name: &str) -> AgeGroup {
        AgeGroup {
            id: id.to_string(),
            name: name.to_string(),
            min_age: 10,
            max_age: 12,
            created_at: Utc::now(),
        }
    }

    fn sample_team(id: &str, age_group_id: &str, name: &str) -> Team {
        let now = Utc::now();
        Team {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            age_group_id: age_group_id.to_string(),
            founded: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_standing(id: &str, table_id: &str, position: i32, team_name: &str) -> Standing {
        Standing {
            id: id.to_string(),
            table_id: table_id.to_string(),
            position,
            team_name: team_name.to_string(),
            played: 10,
            wins: 6,
            draws: 2,
            losses: 2,
            goals_for: 20,
            goals_against: 11,
            points: 20,
        }
    }

    #[test]
    fn test_initialize_creates_tables() {
        let (_temp, store) = open_store();

        let conn = store.connection();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table'")
            .unwrap();
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        for expected in [
            "age_groups",
            "teams",
            "players",
            "coaches",
            "matches",
            "tournaments",
            "tournament_tables",
            "tournament_standings",
            "trainings",
            "news",
            "photos",
            "videos",
            "tokens",
        ] {
            assert!(tables.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn test_age_group_crud() {
        let (_temp, store) = open_store();

        store
            .create_age_group(&sample_age_group("ag-1", "U-12"))
            .unwrap();

        let fetched = store.get_age_group("ag-1").unwrap().unwrap();
        assert_eq!(fetched.name, "U-12");
        assert_eq!(fetched.min_age, 10);

        let mut updated = fetched.clone();
        updated.name = "U-13".to_string();
        updated.max_age = 13;
        store.update_age_group(&updated).unwrap();
        assert_eq!(store.get_age_group("ag-1").unwrap().unwrap().max_age, 13);

        assert!(store.delete_age_group("ag-1").unwrap());
        assert!(store.get_age_group("ag-1").unwrap().is_none());
    }

    #[test]
    fn test_age_group_name_is_unique() {
        let (_temp, store) = open_store();

        store
            .create_age_group(&sample_age_group("ag-1", "U-10"))
            .unwrap();
        let result = store.create_age_group(&sample_age_group("ag-2", "U-10"));
        assert!(matches!(result, Err(Error::AlreadyExists)));
    }

    #[test]
    fn test_team_requires_existing_age_group() {
        let (_temp, store) = open_store();

        let result = store.create_team(&sample_team("team-1", "missing", "Eagles"));
        assert!(result.is_err());
    }

    #[test]
    fn test_team_crud_and_full_replace() {
        let (_temp, store) = open_store();
        store
            .create_age_group(&sample_age_group("ag-1", "U-12"))
            .unwrap();

        let mut team = sample_team("team-1", "ag-1", "Eagles");
        team.description = Some("First squad".to_string());
        store.create_team(&team).unwrap();

        let fetched = store.get_team("team-1").unwrap().unwrap();
        assert_eq!(fetched.description.as_deref(), Some("First squad"));

        // A full-replace update clears fields omitted by the caller.
        let mut replaced = fetched.clone();
        replaced.description = None;
        replaced.updated_at = Utc::now();
        store.update_team(&replaced).unwrap();
        assert!(store.get_team("team-1").unwrap().unwrap().description.is_none());

        assert!(store.delete_team("team-1").unwrap());
        assert!(!store.delete_team("team-1").unwrap());
    }

    #[test]
    fn test_list_players_filters_by_team() {
        let (_temp, store) = open_store();
        store
            .create_age_group(&sample_age_group("ag-1", "U-12"))
            .unwrap();
        store
            .create_team(&sample_team("team-1", "ag-1", "Eagles"))
            .unwrap();
        store
            .create_team(&sample_team("team-2", "ag-1", "Hawks"))
            .unwrap();

        let now = Utc::now();
        for (id, team_id, number) in [("p-1", "team-1", 9), ("p-2", "team-1", 1), ("p-3", "team-2", 7)] {
            store
                .create_player(&Player {
                    id: id.to_string(),
                    first_name: "Alex".to_string(),
                    last_name: format!("Player{number}"),
                    date_of_birth: NaiveDate::from_ymd_opt(2014, 5, 1).unwrap(),
                    position: None,
                    number: Some(number),
                    team_id: team_id.to_string(),
                    photo_url: None,
                    created_at: now,
                    updated_at: now,
                })
                .unwrap();
        }

        let all = store.list_players(None).unwrap();
        assert_eq!(all.len(), 3);

        let team_one = store.list_players(Some("team-1")).unwrap();
        assert_eq!(team_one.len(), 2);
        // Ordered by shirt number.
        assert_eq!(team_one[0].number, Some(1));
        assert_eq!(team_one[1].number, Some(9));
    }

    #[test]
    fn test_news_published_filter() {
        let (_temp, store) = open_store();
        let now = Utc::now();

        for (id, published) in [("n-1", true), ("n-2", false)] {
            store
                .create_news(&News {
                    id: id.to_string(),
                    title: format!("Item {id}"),
                    content: "Body".to_string(),
                    excerpt: None,
                    image_url: None,
                    published,
                    published_at: published.then_some(now),
                    created_at: now,
                    updated_at: now,
                })
                .unwrap();
        }

        assert_eq!(store.list_published_news().unwrap().len(), 1);
        assert_eq!(store.list_all_news().unwrap().len(), 2);
    }

    #[test]
    fn test_video_filters() {
        let (_temp, store) = open_store();
        store
            .create_age_group(&sample_age_group("ag-1", "U-12"))
            .unwrap();
        store
            .create_team(&sample_team("team-1", "ag-1", "Eagles"))
            .unwrap();

        let now = Utc::now();
        let video = |id: &str, category: &str, team_id: Option<&str>, published: bool| Video {
            id: id.to_string(),
            title: format!("Video {id}"),
            description: None,
            url: format!("/uploads/{id}.mp4"),
            video_type: VideoType::Upload,
            thumbnail_url: None,
            category: category.to_string(),
            duration: None,
            published,
            team_id: team_id.map(str::to_string),
            match_id: None,
            created_at: now,
            updated_at: now,
        };

        store.create_video(&video("v-1", "match", Some("team-1"), true)).unwrap();
        store.create_video(&video("v-2", "training", Some("team-1"), false)).unwrap();
        store.create_video(&video("v-3", "match", None, true)).unwrap();

        let by_category = store
            .list_videos(&VideoFilter {
                category: Some("match".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_category.len(), 2);

        let by_team_published = store
            .list_videos(&VideoFilter {
                team_id: Some("team-1".to_string()),
                published: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_team_published.len(), 1);
        assert_eq!(by_team_published[0].id, "v-1");
    }

    #[test]
    fn test_replace_table_standings_positions_and_cleanup() {
        let (_temp, store) = open_store();
        store
            .create_age_group(&sample_age_group("ag-1", "U-12"))
            .unwrap();
        let now = Utc::now();
        store
            .create_tournament(&Tournament {
                id: "t-1".to_string(),
                name: "Spring Cup".to_string(),
                season: "2025-2026".to_string(),
                age_group_id: "ag-1".to_string(),
                start_date: None,
                end_date: None,
                description: None,
                created_at: now,
            })
            .unwrap();

        let table = TournamentTable {
            id: "tbl-1".to_string(),
            tournament_id: "t-1".to_string(),
            age_group_id: "ag-1".to_string(),
            created_at: now,
            updated_at: now,
        };
        store
            .create_table(
                &table,
                &[
                    sample_standing("s-1", "tbl-1", 1, "Eagles"),
                    sample_standing("s-2", "tbl-1", 2, "Hawks"),
                ],
            )
            .unwrap();

        store
            .replace_table_standings(
                "tbl-1",
                &[
                    sample_standing("s-3", "tbl-1", 1, "Hawks"),
                    sample_standing("s-4", "tbl-1", 2, "Eagles"),
                    sample_standing("s-5", "tbl-1", 3, "Falcons"),
                ],
            )
            .unwrap();

        let standings = store.list_table_standings("tbl-1").unwrap();
        assert_eq!(standings.len(), 3);
        assert_eq!(standings[0].team_name, "Hawks");
        assert_eq!(standings[0].position, 1);
        assert_eq!(standings[2].team_name, "Falcons");
        // No leftovers from the first write.
        assert!(standings.iter().all(|s| s.id != "s-1" && s.id != "s-2"));
    }

    #[test]
    fn test_failed_replace_keeps_prior_standings() {
        let (_temp, store) = open_store();
        store
            .create_age_group(&sample_age_group("ag-1", "U-12"))
            .unwrap();
        let now = Utc::now();
        store
            .create_tournament(&Tournament {
                id: "t-1".to_string(),
                name: "Spring Cup".to_string(),
                season: "2025-2026".to_string(),
                age_group_id: "ag-1".to_string(),
                start_date: None,
                end_date: None,
                description: None,
                created_at: now,
            })
            .unwrap();
        store
            .create_table(
                &TournamentTable {
                    id: "tbl-1".to_string(),
                    tournament_id: "t-1".to_string(),
                    age_group_id: "ag-1".to_string(),
                    created_at: now,
                    updated_at: now,
                },
                &[
                    sample_standing("s-1", "tbl-1", 1, "Eagles"),
                    sample_standing("s-2", "tbl-1", 2, "Hawks"),
                ],
            )
            .unwrap();

        // Duplicate row id fails the second insert mid-rewrite; the
        // transaction rolls back and the original rows survive.
        let result = store.replace_table_standings(
            "tbl-1",
            &[
                sample_standing("s-dup", "tbl-1", 1, "Falcons"),
                sample_standing("s-dup", "tbl-1", 2, "Kestrels"),
            ],
        );
        assert!(result.is_err());

        let standings = store.list_table_standings("tbl-1").unwrap();
        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].id, "s-1");
        assert_eq!(standings[0].team_name, "Eagles");
        assert_eq!(standings[1].id, "s-2");
        assert_eq!(standings[1].team_name, "Hawks");
    }

    #[test]
    fn test_replace_standings_missing_table() {
        let (_temp, store) = open_store();

        let result = store
            .replace_table_standings("missing", &[sample_standing("s-1", "missing", 1, "Eagles")]);
        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[test]
    fn test_token_lookup_collision() {
        let (_temp, store) = open_store();

        let token = |id: &str| Token {
            id: id.to_string(),
            token_hash: format!("hash-{id}"),
            token_lookup: "lookup12".to_string(),
            created_at: Utc::now(),
            expires_at: None,
            last_used_at: None,
        };

        store.create_token(&token("token-1")).unwrap();
        let result = store.create_token(&token("token-2"));
        assert!(matches!(result, Err(Error::TokenLookupCollision)));
    }

    #[test]
    fn test_has_admin_token() {
        let (_temp, store) = open_store();
        assert!(!store.has_admin_token().unwrap());

        store
            .create_token(&Token {
                id: "token-1".to_string(),
                token_hash: "hash".to_string(),
                token_lookup: "lookup12".to_string(),
                created_at: Utc::now(),
                expires_at: None,
                last_used_at: None,
            })
            .unwrap();
        assert!(store.has_admin_token().unwrap());
    }
}
