pub const SCHEMA: &str = r#"
-- Age brackets that teams and tournaments belong to
CREATE TABLE IF NOT EXISTS age_groups (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    min_age INTEGER NOT NULL,
    max_age INTEGER NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS teams (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    age_group_id TEXT NOT NULL REFERENCES age_groups(id),
    founded TEXT,               -- date, NULL = unknown
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS players (
    id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,
    position TEXT,
    number INTEGER,
    team_id TEXT NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
    photo_url TEXT,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Coaches may be club-level (team_id NULL) or assigned to one team
CREATE TABLE IF NOT EXISTS coaches (
    id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    position TEXT,
    experience_years INTEGER,
    biography TEXT,
    phone TEXT,
    email TEXT,
    photo_url TEXT,
    achievements TEXT,
    team_id TEXT REFERENCES teams(id) ON DELETE SET NULL,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS matches (
    id TEXT PRIMARY KEY,
    home_team_id TEXT NOT NULL REFERENCES teams(id),
    away_team_id TEXT NOT NULL REFERENCES teams(id),
    match_date TEXT NOT NULL,
    home_score INTEGER,         -- NULL = not played yet
    away_score INTEGER,
    location TEXT,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS tournaments (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    season TEXT NOT NULL,       -- e.g. "2025-2026"
    age_group_id TEXT NOT NULL REFERENCES age_groups(id),
    start_date TEXT,
    end_date TEXT,
    description TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS tournament_tables (
    id TEXT PRIMARY KEY,
    tournament_id TEXT NOT NULL REFERENCES tournaments(id) ON DELETE CASCADE,
    age_group_id TEXT NOT NULL REFERENCES age_groups(id),
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Standing positions come from the submitted order, not from the results
CREATE TABLE IF NOT EXISTS tournament_standings (
    id TEXT PRIMARY KEY,
    table_id TEXT NOT NULL REFERENCES tournament_tables(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    team_name TEXT NOT NULL,
    played INTEGER NOT NULL DEFAULT 0,
    wins INTEGER NOT NULL DEFAULT 0,
    draws INTEGER NOT NULL DEFAULT 0,
    losses INTEGER NOT NULL DEFAULT 0,
    goals_for INTEGER NOT NULL DEFAULT 0,
    goals_against INTEGER NOT NULL DEFAULT 0,
    points INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS trainings (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    date TEXT NOT NULL,
    start_time TEXT NOT NULL,   -- "HH:MM"
    end_time TEXT NOT NULL,
    location TEXT NOT NULL,
    team_id TEXT REFERENCES teams(id) ON DELETE SET NULL,
    age_group_id TEXT REFERENCES age_groups(id) ON DELETE SET NULL,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS news (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    excerpt TEXT,
    image_url TEXT,
    published INTEGER NOT NULL DEFAULT 0,
    published_at TEXT,          -- set once, on the first publish
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS photos (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    category TEXT NOT NULL DEFAULT 'general',
    url TEXT NOT NULL,
    team_id TEXT REFERENCES teams(id) ON DELETE SET NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS videos (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    url TEXT NOT NULL,
    video_type TEXT NOT NULL DEFAULT 'UPLOAD'
        CHECK (video_type IN ('UPLOAD', 'YOUTUBE', 'VIMEO', 'OTHER')),
    thumbnail_url TEXT,
    category TEXT NOT NULL DEFAULT 'general',
    duration INTEGER,           -- seconds
    published INTEGER NOT NULL DEFAULT 1,
    team_id TEXT REFERENCES teams(id) ON DELETE SET NULL,
    match_id TEXT REFERENCES matches(id) ON DELETE SET NULL,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Admin credentials
CREATE TABLE IF NOT EXISTS tokens (
    id TEXT PRIMARY KEY,
    token_hash TEXT NOT NULL,   -- argon2id hash with embedded salt
    token_lookup TEXT NOT NULL, -- first 8 chars of the raw token id for fast lookup
    created_at TEXT DEFAULT (datetime('now')),
    expires_at TEXT,            -- NULL = never
    last_used_at TEXT
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_teams_age_group ON teams(age_group_id);
CREATE INDEX IF NOT EXISTS idx_players_team ON players(team_id);
CREATE INDEX IF NOT EXISTS idx_coaches_team ON coaches(team_id);
CREATE INDEX IF NOT EXISTS idx_matches_home_team ON matches(home_team_id);
CREATE INDEX IF NOT EXISTS idx_matches_away_team ON matches(away_team_id);
CREATE INDEX IF NOT EXISTS idx_tournaments_age_group ON tournaments(age_group_id);
CREATE INDEX IF NOT EXISTS idx_tables_tournament ON tournament_tables(tournament_id);
CREATE INDEX IF NOT EXISTS idx_tables_age_group ON tournament_tables(age_group_id);
CREATE INDEX IF NOT EXISTS idx_standings_table ON tournament_standings(table_id);
CREATE INDEX IF NOT EXISTS idx_trainings_team ON trainings(team_id);
CREATE INDEX IF NOT EXISTS idx_news_published ON news(published);
CREATE INDEX IF NOT EXISTS idx_photos_team ON photos(team_id);
CREATE INDEX IF NOT EXISTS idx_videos_team ON videos(team_id);
CREATE INDEX IF NOT EXISTS idx_videos_match ON videos(match_id);
CREATE UNIQUE INDEX IF NOT EXISTS idx_tokens_lookup ON tokens(token_lookup);
"#;
