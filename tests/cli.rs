use assert_cmd::prelude::*;
use chrono::Local;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "TEST-TOKEN";

// Runs the binary from inside `workdir` with the token in the environment and
// no secret config on disk.
fn export_cmd(workdir: &Path, api_root: &str) -> Command {
    let mut cmd = Command::cargo_bin("avhdata-export").unwrap();
    cmd.current_dir(workdir)
        .env("AVHDATA_API_TOKEN", TOKEN)
        .env_remove("RUST_LOG")
        .arg("--secret-config")
        .arg(workdir.join("missing-secret.toml"))
        .arg("--api-root")
        .arg(api_root);
    cmd
}

async fn mount_january(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/{}/avhdata/range", TOKEN)))
        .and(query_param("startdate", "2021-01-01"))
        .and(query_param("enddate", "2021-01-31"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_end_to_end_verbose() {
    let server = MockServer::start().await;
    mount_january(&server, 200, json!({"DATA": [{"name": "X"}]})).await;

    let workdir = TempDir::new().unwrap();
    let mut cmd = export_cmd(workdir.path(), &server.uri());
    cmd.args(["-s", "2021-01-01", "-e", "2021-01-31"]);

    tokio::task::spawn_blocking(move || {
        cmd.assert()
            .success()
            .stdout(predicate::str::contains("contactData.csv"))
            .stdout(predicate::str::contains("Number of records: 1"))
            .stdout(predicate::str::contains("2021-01-01"))
            .stdout(predicate::str::contains("2021-01-31"))
            .stderr(predicate::str::is_empty());
    }).await.unwrap();

    let written = fs::read_to_string(workdir.path().join("contactData.csv")).unwrap();
    assert_eq!(written, ",name\n0,X\n");
}

#[tokio::test]
async fn test_quiet_run_prints_nothing() {
    let server = MockServer::start().await;
    mount_january(&server, 200, json!({"DATA": [{"a": 1, "b": 2}, {"a": 3}]})).await;

    let workdir = TempDir::new().unwrap();
    let mut cmd = export_cmd(workdir.path(), &server.uri());
    cmd.args(["--startDate", "2021-01-01", "--endDate", "2021-01-31", "--outputFile", "fuel.CSV", "--verbose", "0"]);

    tokio::task::spawn_blocking(move || {
        cmd.assert()
            .success()
            .stdout(predicate::str::is_empty());
    }).await.unwrap();

    let written = fs::read_to_string(workdir.path().join("fuel.CSV")).unwrap();
    assert_eq!(written, ",a,b\n0,1,2\n1,3,\n");
}

#[tokio::test]
async fn test_defaults_to_current_month() {
    let today = Local::now().naive_local().date();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/{}/avhdata/range", TOKEN)))
        .and(query_param("startdate", today.format("%Y-%m-01").to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"DATA": [{"name": "X"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let workdir = TempDir::new().unwrap();
    let mut cmd = export_cmd(workdir.path(), &server.uri());

    tokio::task::spawn_blocking(move || {
        cmd.assert().success();
    }).await.unwrap();

    assert!(workdir.path().join("contactData.csv").exists());
}

#[tokio::test]
async fn test_invalid_filename_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"DATA": [{"name": "X"}]})))
        .expect(0)
        .mount(&server)
        .await;

    let workdir = TempDir::new().unwrap();
    let mut cmd = export_cmd(workdir.path(), &server.uri());
    cmd.args(["-o", "data.txt"]);

    tokio::task::spawn_blocking(move || {
        cmd.assert()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Output file must end with .csv - invalid filename: data.txt"));
    }).await.unwrap();

    assert!(!workdir.path().join("data.txt").exists());
}

#[tokio::test]
async fn test_api_failure_writes_nothing() {
    let server = MockServer::start().await;
    mount_january(&server, 500, json!({"DATA": [{"name": "X"}]})).await;

    let workdir = TempDir::new().unwrap();
    let mut cmd = export_cmd(workdir.path(), &server.uri());
    cmd.args(["-s", "2021-01-01", "-e", "2021-01-31"]);

    tokio::task::spawn_blocking(move || {
        cmd.assert()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Request to API Failed"))
            .stderr(predicate::str::contains(TOKEN).not());
    }).await.unwrap();

    assert!(!workdir.path().join("contactData.csv").exists());
}

#[tokio::test]
async fn test_empty_result_set() {
    let server = MockServer::start().await;
    mount_january(&server, 200, json!({"DATA": []})).await;

    let workdir = TempDir::new().unwrap();
    let mut cmd = export_cmd(workdir.path(), &server.uri());
    cmd.args(["-s", "2021-01-01", "-e", "2021-01-31"]);

    tokio::task::spawn_blocking(move || {
        cmd.assert()
            .code(1)
            .stderr(predicate::str::contains("No records returned. No file created. Check query dates."));
    }).await.unwrap();

    assert!(!workdir.path().join("contactData.csv").exists());
}

#[tokio::test]
async fn test_missing_data_key() {
    let server = MockServer::start().await;
    mount_january(&server, 200, json!({"ERROR": "bad token"})).await;

    let workdir = TempDir::new().unwrap();
    let mut cmd = export_cmd(workdir.path(), &server.uri());
    cmd.args(["-s", "2021-01-01", "-e", "2021-01-31"]);

    tokio::task::spawn_blocking(move || {
        cmd.assert()
            .code(1)
            .stderr(predicate::str::contains("Malformed API response"));
    }).await.unwrap();

    assert!(!workdir.path().join("contactData.csv").exists());
}

#[tokio::test]
async fn test_token_from_secret_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/FILE-TOKEN/avhdata/range"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"DATA": [{"name": "X"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let workdir = TempDir::new().unwrap();
    let secret = workdir.path().join("secret.toml");
    fs::write(&secret, format!("[leads]\ntoken = \"FILE-TOKEN\"\nroot = \"{}\"\n", server.uri())).unwrap();

    let mut cmd = Command::cargo_bin("avhdata-export").unwrap();
    cmd.current_dir(workdir.path())
        .env_remove("AVHDATA_API_TOKEN")
        .arg("--secret-config")
        .arg(&secret)
        .args(["-v", "0"]);

    tokio::task::spawn_blocking(move || {
        cmd.assert().success();
    }).await.unwrap();

    assert!(workdir.path().join("contactData.csv").exists());
}

#[test]
fn test_missing_token() {
    let workdir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("avhdata-export").unwrap();
    cmd.current_dir(workdir.path())
        .env_remove("AVHDATA_API_TOKEN")
        .arg("--secret-config")
        .arg(workdir.path().join("missing-secret.toml"));

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("No API token configured"));
}

#[test]
fn test_invalid_date() {
    let workdir = TempDir::new().unwrap();

    let mut cmd = export_cmd(workdir.path(), "http://127.0.0.1:9");
    cmd.args(["-s", "2021-13-01"]);

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid date, expected YYYY-MM-DD: 2021-13-01"));
}
