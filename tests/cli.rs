use assert_cmd::Command;
use tempfile::TempDir;

#[test]
fn test_admin_init_creates_database_and_token() {
    let data = TempDir::new().unwrap();
    let dir = data.path().to_str().unwrap();

    Command::cargo_bin("touchline")
        .unwrap()
        .args(["admin", "init", "--data-dir", dir])
        .assert()
        .success()
        .stdout(predicates::str::contains("Admin token"));

    assert!(data.path().join("touchline.db").exists());
    assert!(data.path().join("uploads").is_dir());

    let token = std::fs::read_to_string(data.path().join(".admin_token")).unwrap();
    assert!(token.starts_with("touchline_"));
}

#[test]
fn test_admin_init_refuses_second_run() {
    let data = TempDir::new().unwrap();
    let dir = data.path().to_str().unwrap();

    Command::cargo_bin("touchline")
        .unwrap()
        .args(["admin", "init", "--data-dir", dir])
        .assert()
        .success();

    Command::cargo_bin("touchline")
        .unwrap()
        .args(["admin", "init", "--data-dir", dir])
        .assert()
        .failure()
        .stderr(predicates::str::contains("already initialized"));
}

#[test]
fn test_serve_requires_initialization() {
    let data = TempDir::new().unwrap();
    let dir = data.path().to_str().unwrap();

    Command::cargo_bin("touchline")
        .unwrap()
        .args(["serve", "--data-dir", dir])
        .assert()
        .failure()
        .stderr(predicates::str::contains("not initialized"));
}
