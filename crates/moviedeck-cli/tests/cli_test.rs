#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::Command;
use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command with a clean credential environment and an isolated config dir.
fn moviedeck(dir: &tempfile::TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("moviedeck");
    cmd.env_remove("TMDB_API_KEY")
        .env_remove("TMDB_API_TOKEN")
        .env_remove("TMDB_BASE_URL")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .env("RUST_LOG", "info")
        .arg("--dir")
        .arg(dir.path());
    cmd
}

/// Command pointed at `server` with an API key.
fn moviedeck_against(dir: &tempfile::TempDir, server: &MockServer) -> Command {
    let mut cmd = moviedeck(dir);
    cmd.env("TMDB_API_KEY", "test-key")
        .env("TMDB_BASE_URL", format!("{}/3", server.uri()));
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviedeck");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("popular"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("details"));
}

#[test]
fn test_details_missing_id() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviedeck");
    cmd.arg("details")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--id"));
}

#[test]
fn test_search_missing_query() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviedeck");
    cmd.arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query"));
}

#[test]
fn test_missing_api_key_is_reported() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    moviedeck(&dir)
        .arg("popular")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB API key is required"));
}

#[test]
fn test_blank_search_query_is_rejected() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    moviedeck(&dir)
        .env("TMDB_API_KEY", "test-key")
        .args(["search", "--query", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("search query must not be empty"));
}

#[test]
fn test_config_init_and_path() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    // Act & Assert
    moviedeck(&dir).args(["config", "init"]).assert().success();
    let written = std::fs::read_to_string(&config_path).unwrap();
    assert!(written.contains("language = \"en-US\""));
    assert!(written.contains("debounce_ms = 500"));

    moviedeck(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    moviedeck(&dir)
        .args(["config", "init", "--force"])
        .assert()
        .success();
    moviedeck(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_api_key_from_config_file() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[tmdb]\napi_key = \"from-config\"\n",
    )
    .unwrap();

    // Act & Assert: the key is accepted, so the failure is the bad URL
    moviedeck(&dir)
        .env("TMDB_BASE_URL", "not a url")
        .arg("popular")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid TMDB_BASE_URL"));
}

#[test]
fn test_completions_bash() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviedeck");
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("moviedeck"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_popular_against_mock_server() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/popular"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("language", "en-US"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("../../../fixtures/tmdb/movie_popular.json")),
        )
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    moviedeck_against(&dir, &server)
        .arg("popular")
        .assert()
        .success()
        .stdout(predicate::str::contains("Popular Movies"))
        .stdout(predicate::str::contains("Inception"))
        .stdout(predicate::str::contains("Interstellar"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_popular_region_flag() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/popular"))
        .and(query_param("region", "JP"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("../../../fixtures/tmdb/movie_popular.json")),
        )
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    moviedeck_against(&dir, &server)
        .args(["popular", "--region", "JP"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Inception"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_without_results() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .and(query_param("query", "zzqq"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("../../../fixtures/tmdb/search_movie_empty.json")),
        )
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    moviedeck_against(&dir, &server)
        .args(["search", "--query", "zzqq"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No movies found. Try different keywords.",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_details_against_mock_server() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/27205"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(include_str!(
                "../../../fixtures/tmdb/movie_details_27205.json"
            )),
        )
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    moviedeck_against(&dir, &server)
        .args(["details", "--id", "27205"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Inception"))
        .stdout(predicate::str::contains("Runtime: 148 min"))
        .stdout(predicate::str::contains(
            "https://www.google.com/search?q=Inception+2010+movie",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_details_not_found() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/1"))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            r#"{"status_code":34,"status_message":"The resource you requested could not be found.","success":false}"#,
        ))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    moviedeck_against(&dir, &server)
        .args(["details", "--id", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Movie details not found."));
}
