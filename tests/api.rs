//! End-to-end tests that drive the router in-process.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use touchline::auth::TokenGenerator;
use touchline::config::ServerConfig;
use touchline::media::MediaStorage;
use touchline::server::{AppState, create_router};
use touchline::store::{SqliteStore, Store};
use touchline::types::Token;

struct TestServer {
    app: Router,
    token: String,
    uploads_dir: PathBuf,
    _data: TempDir,
}

fn setup() -> TestServer {
    let data = TempDir::new().unwrap();
    let config = ServerConfig {
        data_dir: data.path().to_path_buf(),
        ..ServerConfig::default()
    };

    let store = SqliteStore::new(config.db_path()).unwrap();
    store.initialize().unwrap();

    let generator = TokenGenerator::new();
    let (raw_token, lookup, hash) = generator.generate().unwrap();
    store
        .create_token(&Token {
            id: Uuid::new_v4().to_string(),
            token_hash: hash,
            token_lookup: lookup,
            created_at: Utc::now(),
            expires_at: None,
            last_used_at: None,
        })
        .unwrap();

    let uploads_dir = config.uploads_dir();
    let state = Arc::new(AppState {
        store: Arc::new(store),
        media: MediaStorage::new(&uploads_dir),
        config,
    });

    TestServer {
        app: create_router(state),
        token: raw_token,
        uploads_dir,
        _data: data,
    }
}

impl TestServer {
    async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.request("GET", path, None, None).await
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", path, Some(self.token.as_str()), Some(body))
            .await
    }

    async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request("PUT", path, Some(self.token.as_str()), Some(body))
            .await
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        self.request("DELETE", path, Some(self.token.as_str()), None)
            .await
    }

    async fn multipart(
        &self,
        path: &str,
        files: &[(&str, &[u8])],
        fields: &[(&str, &str)],
    ) -> (StatusCode, Value) {
        let boundary = "----touchline-test-boundary";
        let mut body: Vec<u8> = Vec::new();

        for (name, value) in fields {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                    .as_bytes(),
            );
        }
        for (filename, data) in files {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_age_group(&self, name: &str) -> String {
        let (status, body) = self
            .post(
                "/api/age-groups",
                json!({ "name": name, "min_age": 10, "max_age": 12 }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    async fn create_team(&self, name: &str, age_group_id: &str) -> String {
        let (status, body) = self
            .post(
                "/api/teams",
                json!({ "name": name, "age_group_id": age_group_id }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }
}

// Tiny but valid-enough payloads for upload tests.
const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];

#[tokio::test]
async fn test_health_and_index() {
    let server = setup();

    let (status, body) = server.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");

    let (status, body) = server.get("/api").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "touchline");
    assert!(body["endpoints"]["teams"].is_string());
}

#[tokio::test]
async fn test_team_create_and_detail() {
    let server = setup();
    let age_group_id = server.create_age_group("U-12").await;

    let (status, created) = server
        .post(
            "/api/teams",
            json!({
                "name": "Eagles",
                "description": "First squad",
                "age_group_id": age_group_id,
                "founded": "2018-09-01",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let team_id = created["id"].as_str().unwrap();

    let (status, detail) = server.get(&format!("/api/teams/{team_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["name"], "Eagles");
    assert_eq!(detail["description"], "First squad");
    assert_eq!(detail["founded"], "2018-09-01");
    assert_eq!(detail["age_group"]["name"], "U-12");
    assert_eq!(detail["players"], json!([]));
    assert_eq!(detail["photos"], json!([]));
    assert_eq!(detail["videos"], json!([]));
}

#[tokio::test]
async fn test_put_is_full_replace() {
    let server = setup();
    let age_group_id = server.create_age_group("U-12").await;

    let (_, created) = server
        .post(
            "/api/teams",
            json!({
                "name": "Eagles",
                "description": "First squad",
                "age_group_id": age_group_id,
            }),
        )
        .await;
    let team_id = created["id"].as_str().unwrap();

    // Description omitted: the update clears it.
    let (status, _) = server
        .put(
            &format!("/api/teams/{team_id}"),
            json!({ "name": "Eagles", "age_group_id": age_group_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = server.get(&format!("/api/teams/{team_id}")).await;
    assert!(detail.get("description").is_none());
}

#[tokio::test]
async fn test_mutations_require_auth() {
    let server = setup();
    let age_group_id = server.create_age_group("U-12").await;

    let payload = json!({ "name": "Eagles", "age_group_id": age_group_id });

    let (status, body) = server
        .request("POST", "/api/teams", None, Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = server
        .request(
            "POST",
            "/api/teams",
            Some("touchline_12345678_123456789012345678901234"),
            Some(payload),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Reads stay public.
    let (status, _) = server.get("/api/teams").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_validation_rejects_bad_payloads() {
    let server = setup();

    let (status, body) = server
        .post(
            "/api/age-groups",
            json!({ "name": "U-12", "min_age": 12, "max_age": 10 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = server
        .post(
            "/api/age-groups",
            json!({ "name": "  ", "min_age": 8, "max_age": 10 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .post(
            "/api/trainings",
            json!({
                "title": "Evening session",
                "date": "2026-09-01",
                "start_time": "25:00",
                "end_time": "19:30",
                "location": "Main pitch",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_players_filter_by_team() {
    let server = setup();
    let age_group_id = server.create_age_group("U-12").await;
    let eagles = server.create_team("Eagles", &age_group_id).await;
    let hawks = server.create_team("Hawks", &age_group_id).await;

    for (team_id, last_name, number) in
        [(&eagles, "Keeper", 1), (&eagles, "Striker", 9), (&hawks, "Winger", 7)]
    {
        let (status, _) = server
            .post(
                "/api/players",
                json!({
                    "first_name": "Alex",
                    "last_name": last_name,
                    "date_of_birth": "2014-05-01",
                    "number": number,
                    "team_id": team_id,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, all) = server.get("/api/players").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (status, filtered) = server.get(&format!("/api/players?team_id={eagles}")).await;
    assert_eq!(status, StatusCode::OK);
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 2);
    assert_eq!(filtered[0]["number"], 1);
    assert_eq!(filtered[0]["team"]["name"], "Eagles");
}

#[tokio::test]
async fn test_news_publish_lifecycle() {
    let server = setup();

    let (status, draft) = server
        .post(
            "/api/news",
            json!({ "title": "Season opener", "content": "Kickoff soon." }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = draft["id"].as_str().unwrap().to_string();
    assert_eq!(draft["published"], false);
    assert!(draft.get("published_at").is_none());

    // Drafts are hidden from the public listing but visible to admins.
    let (_, public) = server.get("/api/news").await;
    assert_eq!(public.as_array().unwrap().len(), 0);

    let (status, admin) = server
        .request("GET", "/api/news/admin", Some(server.token.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(admin.as_array().unwrap().len(), 1);

    let (status, _) = server.request("GET", "/api/news/admin", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // First publish stamps published_at.
    let (_, published) = server
        .put(
            &format!("/api/news/{id}"),
            json!({ "title": "Season opener", "content": "Kickoff soon.", "published": true }),
        )
        .await;
    let first_published_at = published["published_at"].as_str().unwrap().to_string();

    let (_, public) = server.get("/api/news").await;
    assert_eq!(public.as_array().unwrap().len(), 1);

    // Unpublishing and republishing keeps the original timestamp.
    server
        .put(
            &format!("/api/news/{id}"),
            json!({ "title": "Season opener", "content": "Kickoff soon.", "published": false }),
        )
        .await;
    let (_, republished) = server
        .put(
            &format!("/api/news/{id}"),
            json!({ "title": "Season opener", "content": "Kickoff soon.", "published": true }),
        )
        .await;
    assert_eq!(republished["published_at"], first_published_at.as_str());
}

#[tokio::test]
async fn test_standings_replace_follows_submitted_order() {
    let server = setup();
    let age_group_id = server.create_age_group("U-12").await;

    let (status, tournament) = server
        .post(
            "/api/tournaments",
            json!({
                "name": "Spring Cup",
                "season": "2025-2026",
                "age_group_id": age_group_id,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let tournament_id = tournament["id"].as_str().unwrap();

    let (status, table) = server
        .post(
            "/api/tournaments/tables",
            json!({
                "tournament_id": tournament_id,
                "age_group_id": age_group_id,
                "standings": [
                    { "team_name": "Eagles", "played": 2, "points": 6 },
                    { "team_name": "Hawks", "played": 2, "points": 3 },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let table_id = table["id"].as_str().unwrap().to_string();
    assert_eq!(table["standings"][0]["position"], 1);
    assert_eq!(table["standings"][0]["team_name"], "Eagles");

    // A rewrite replaces every row; positions follow the submitted order.
    let (status, updated) = server
        .put(
            &format!("/api/tournaments/tables/{table_id}"),
            json!({
                "standings": [
                    { "team_name": "Hawks", "played": 3, "points": 6 },
                    { "team_name": "Eagles", "played": 3, "points": 6 },
                    { "team_name": "Falcons", "played": 3, "points": 1 },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let standings = updated["standings"].as_array().unwrap();
    assert_eq!(standings.len(), 3);
    assert_eq!(standings[0]["team_name"], "Hawks");
    assert_eq!(standings[0]["position"], 1);
    assert_eq!(standings[1]["team_name"], "Eagles");
    assert_eq!(standings[1]["position"], 2);
    assert_eq!(standings[2]["team_name"], "Falcons");
    assert_eq!(standings[2]["position"], 3);

    // The current-season listing picks the table up.
    let (status, current) = server.get("/api/tournaments/tables/current").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current.as_array().unwrap().len(), 1);

    // GET on the param route lists by age group.
    let (status, by_group) = server
        .get(&format!("/api/tournaments/tables/{age_group_id}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_group.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_photo_upload_and_delete_removes_file() {
    let server = setup();

    let (status, body) = server
        .multipart(
            "/api/upload/photos",
            &[("team-photo.jpg", FAKE_JPEG)],
            &[("title", "Match day"), ("category", "match")],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let photo = &body["photos"][0];
    assert_eq!(photo["title"], "Match day");
    assert_eq!(photo["category"], "match");
    let url = photo["url"].as_str().unwrap();
    let filename = url.strip_prefix("/uploads/").unwrap();
    assert!(filename.ends_with(".jpg"));
    assert!(server.uploads_dir.join(filename).exists());

    let photo_id = photo["id"].as_str().unwrap();
    let (status, _) = server.delete(&format!("/api/photos/{photo_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!server.uploads_dir.join(filename).exists());

    let (_, photos) = server.get("/api/photos").await;
    assert_eq!(photos.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_photo_delete_tolerates_missing_file() {
    let server = setup();

    let (status, body) = server
        .multipart("/api/upload/photos", &[("pitch.jpg", FAKE_JPEG)], &[])
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let photo = &body["photos"][0];
    let filename = photo["url"]
        .as_str()
        .unwrap()
        .strip_prefix("/uploads/")
        .unwrap()
        .to_string();
    let photo_id = photo["id"].as_str().unwrap();

    std::fs::remove_file(server.uploads_dir.join(&filename)).unwrap();

    let (status, _) = server.delete(&format!("/api/photos/{photo_id}")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_upload_rejects_disallowed_types() {
    let server = setup();

    let (status, body) = server
        .multipart("/api/upload/photos", &[("schedule.pdf", b"%PDF-1.4")], &[])
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("schedule.pdf"));

    // Nothing was stored.
    let (_, photos) = server.get("/api/photos").await;
    assert_eq!(photos.as_array().unwrap().len(), 0);

    // A video endpoint rejects images.
    let (status, _) = server
        .multipart("/api/upload/videos", &[("frame.jpg", FAKE_JPEG)], &[])
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server.multipart("/api/upload/photos", &[], &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_video_upload_creates_published_record() {
    let server = setup();

    let (status, body) = server
        .multipart(
            "/api/upload/videos",
            &[("highlights.mp4", b"\x00\x00\x00\x18ftypmp42")],
            &[("title", "Matchday highlights")],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let video = &body["videos"][0];
    assert_eq!(video["video_type"], "UPLOAD");
    assert_eq!(video["published"], true);

    let (_, videos) = server.get("/api/videos").await;
    assert_eq!(videos.as_array().unwrap().len(), 1);

    let (_, filtered) = server.get("/api/videos?published=false").await;
    assert_eq!(filtered.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_coaches_position_filter() {
    let server = setup();

    for (last_name, position) in [
        ("Marsh", "Head Coach"),
        ("Vega", "Goalkeeper Coach"),
        ("Okafor", "Assistant Coach"),
    ] {
        let (status, _) = server
            .post(
                "/api/coaches",
                json!({
                    "first_name": "Sam",
                    "last_name": last_name,
                    "position": position,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, matched) = server.get("/api/coaches/position/goalkeeper").await;
    assert_eq!(status, StatusCode::OK);
    let matched = matched.as_array().unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0]["last_name"], "Vega");
}

#[tokio::test]
async fn test_match_validation_and_detail() {
    let server = setup();
    let age_group_id = server.create_age_group("U-12").await;
    let eagles = server.create_team("Eagles", &age_group_id).await;
    let hawks = server.create_team("Hawks", &age_group_id).await;

    let (status, _) = server
        .post(
            "/api/matches",
            json!({
                "home_team_id": eagles,
                "away_team_id": eagles,
                "match_date": "2026-09-12T10:00:00Z",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = server
        .post(
            "/api/matches",
            json!({
                "home_team_id": eagles,
                "away_team_id": hawks,
                "match_date": "2026-09-12T10:00:00Z",
                "home_score": 2,
                "away_score": 1,
                "location": "Main pitch",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let match_id = created["id"].as_str().unwrap();
    let (status, detail) = server.get(&format!("/api/matches/{match_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["home_team"]["name"], "Eagles");
    assert_eq!(detail["away_team"]["name"], "Hawks");
    assert_eq!(detail["home_score"], 2);
}

#[tokio::test]
async fn test_missing_resources_return_404() {
    let server = setup();

    for path in [
        "/api/teams/missing",
        "/api/players/missing",
        "/api/news/missing",
        "/api/matches/missing",
    ] {
        let (status, body) = server.get(path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert!(body["error"].is_string());
    }

    let (status, _) = server.delete("/api/teams/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_age_group_delete_refused_while_referenced() {
    let server = setup();
    let age_group_id = server.create_age_group("U-12").await;
    server.create_team("Eagles", &age_group_id).await;

    let (status, body) = server.delete(&format!("/api/age-groups/{age_group_id}")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_age_group_delete_refused_while_table_references_it() {
    let server = setup();
    let table_group = server.create_age_group("U-10").await;
    let tournament_group = server.create_age_group("U-12").await;

    let (status, tournament) = server
        .post(
            "/api/tournaments",
            json!({
                "name": "Autumn Cup",
                "season": "2025-2026",
                "age_group_id": tournament_group,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let tournament_id = tournament["id"].as_str().unwrap();

    // A table may carry a different age group than its tournament; that
    // group has no teams or tournaments of its own but must still refuse
    // the delete while the table points at it.
    let (status, _) = server
        .post(
            "/api/tournaments/tables",
            json!({
                "tournament_id": tournament_id,
                "age_group_id": table_group,
                "standings": [],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = server.delete(&format!("/api/age-groups/{table_group}")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("tournament tables")
    );
}
