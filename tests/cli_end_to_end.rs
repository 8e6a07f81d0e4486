#![deny(clippy::all, clippy::pedantic)]

use std::io::Write;

use assert_cmd::Command;
use httpmock::MockServer;
use predicates::str::contains;
use serde_json::json;
use tempfile::{NamedTempFile, TempDir};

fn secret_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    file.write_all(contents.as_bytes()).expect("write secret");
    file
}

fn cli(server: &MockServer, session_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("photolog-cli"));
    cmd.env("PHOTOLOG_SITE_URL", server.base_url())
        .env("PHOTOLOG_SESSION_FILE", session_dir.path().join("session.toml"))
        .env_remove("PHOTOLOG_PASSPHRASE")
        .env_remove("PHOTOLOG_PASSPHRASE_FILE")
        .env_remove("PHOTOLOG_CONFIG_FILE");
    cmd
}

#[test]
fn login_persists_token_for_later_commands() {
    let server = MockServer::start();
    let token = server.mock(|when, then| {
        when.method("POST")
            .path("/api/auth/token")
            .json_body(json!({"passphrase": "xyz"}));
        then.status(200)
            .json_body(json!({"access_token": "tok1", "token_type": "bearer"}));
    });
    let feed = server.mock(|when, then| {
        when.method("GET")
            .path("/api/posts/feed/all")
            .header("authorization", "Bearer tok1");
        then.status(200).json_body(json!([
            {"id": 4, "caption": "", "published": false, "images": [], "tags": []}
        ]));
    });

    let session = TempDir::new().expect("session dir");
    let passphrase = secret_file("xyz\n");

    cli(&server, &session)
        .env("PHOTOLOG_PASSPHRASE_FILE", passphrase.path())
        .arg("login")
        .assert()
        .success()
        .stdout(contains("/feed"));
    token.assert();

    cli(&server, &session)
        .args(["posts", "feed"])
        .assert()
        .success()
        .stdout(contains("(no caption)"))
        .stdout(contains("Draft"));
    feed.assert();

    cli(&server, &session)
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Logged in"));

    cli(&server, &session)
        .arg("logout")
        .assert()
        .success();
    cli(&server, &session)
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Logged out"))
        .stdout(contains("Log in (/login)"));
}

#[test]
fn owner_commands_require_login() {
    let server = MockServer::start();
    let session = TempDir::new().expect("session dir");
    cli(&server, &session)
        .args(["posts", "feed"])
        .assert()
        .failure()
        .stderr(contains("LoginRequired"));
}

#[test]
fn missing_passphrase_fails_fast() {
    let server = MockServer::start();
    let session = TempDir::new().expect("session dir");
    cli(&server, &session)
        .arg("login")
        .assert()
        .failure()
        .stderr(contains("MissingPassphrase"));
}

#[test]
fn public_list_filters_by_tag() {
    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method("GET").path("/api/posts").query_param("tag", "travel");
        then.status(200)
            .json_body(json!([{"id": 9, "caption": "Lisbon", "tags": [{"id": 1, "name": "travel"}]}]));
    });

    let session = TempDir::new().expect("session dir");
    cli(&server, &session)
        .args(["posts", "list", "--tag", "travel"])
        .assert()
        .success()
        .stdout(contains("\"caption\": \"Lisbon\""));
    list.assert();
}

#[test]
fn gallery_walks_carousel_with_keys() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/profile");
        then.status(200).json_body(json!({"name": "", "bio": "", "links": []}));
    });
    server.mock(|when, then| {
        when.method("GET").path("/api/posts");
        then.status(200).json_body(json!([{
            "id": 1,
            "caption": "harbour",
            "created_at": "2024-03-05T10:20:30",
            "images": [
                {"id": 1, "filename": "a.jpg", "url": "/u/a.jpg"},
                {"id": 2, "filename": "b.jpg", "url": "/u/b.jpg"}
            ]
        }]));
    });

    let session = TempDir::new().expect("session dir");
    cli(&server, &session)
        .args(["gallery", "--open", "1", "--key", "ArrowLeft"])
        .assert()
        .success()
        .stdout(contains("No name set"))
        .stdout(contains("image: /u/b.jpg"))
        .stdout(contains("Mar 5, 2024"));
}
