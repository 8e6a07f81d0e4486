#![deny(clippy::all, clippy::pedantic)]

use std::sync::Arc;

use httpmock::MockServer;
use photolog::application::session::TOKEN_KEY;
use photolog::application::shell::Shell;
use photolog::config::ApiSettings;
use photolog::infra::storage::MemoryStore;
use serde_json::json;
use tempfile::NamedTempFile;

use crate::args::{DirectionArg, PostsCmd, ProfileCmd};
use crate::client::{CliError, enter};
use crate::handlers::{auth, gallery, posts, profile};

fn shell(server: &MockServer, token: Option<&str>) -> Shell {
    let store = match token {
        Some(token) => MemoryStore::with_entry(TOKEN_KEY, token),
        None => MemoryStore::default(),
    };
    let settings = ApiSettings {
        base_url: server.base_url().parse().expect("url"),
        root: "/api".to_string(),
    };
    Shell::with_store(&settings, Arc::new(store)).expect("shell")
}

fn tmp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    std::io::Write::write_all(&mut file, contents.as_bytes()).expect("write tmp");
    file
}

#[test]
fn passphrase_file_wins_over_env() -> Result<(), CliError> {
    let file = tmp_file("from-file\n");
    let secret = crate::io::read_secret(Some(file.path().to_path_buf()), Some("env".into()))?;
    assert_eq!(secret, "from-file");
    Ok(())
}

#[test]
fn missing_passphrase_is_reported() {
    let err = crate::io::read_secret(None, None).expect_err("no passphrase");
    assert!(matches!(err, CliError::MissingPassphrase));
    let err = crate::io::read_secret(None, Some("   ".into())).expect_err("blank passphrase");
    assert!(matches!(err, CliError::MissingPassphrase));
}

#[test]
fn link_arguments_split_at_first_equals() -> Result<(), CliError> {
    let (label, url) = crate::io::parse_link("site=https://a.example/?q=1")?;
    assert_eq!(label, "site");
    assert_eq!(url, "https://a.example/?q=1");
    assert!(matches!(
        crate::io::parse_link("nolink"),
        Err(CliError::InvalidInput(_))
    ));
    Ok(())
}

#[test]
fn owner_routes_require_login() {
    let server = MockServer::start();
    let shell = shell(&server, None);
    let err = enter(&shell, "/feed").expect_err("anonymous");
    match err {
        CliError::LoginRequired(location) => assert_eq!(location, "/login?redirect=%2Ffeed"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn login_failure_surfaces_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST").path("/api/auth/token");
        then.status(401);
    });

    let shell = shell(&server, None);
    let err = auth::login(&shell, None, Some("nope".into()), None)
        .await
        .expect_err("wrong passphrase");
    match err {
        CliError::LoginFailed(message) => assert_eq!(message, "Wrong passphrase."),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!shell.session().is_logged_in());
}

#[tokio::test]
async fn login_continues_to_requested_location() -> Result<(), CliError> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST")
            .path("/api/auth/token")
            .json_body(json!({"passphrase": "xyz"}));
        then.status(200)
            .json_body(json!({"access_token": "tok1", "token_type": "bearer"}));
    });

    let shell = shell(&server, None);
    auth::login(&shell, None, Some("xyz".into()), Some("/feed/profile".into())).await?;
    assert_eq!(shell.session().token().as_deref(), Some("tok1"));
    assert_eq!(shell.navigator().current(), "/feed/profile");
    Ok(())
}

#[tokio::test]
async fn posts_edit_sends_mirror_and_tags() -> Result<(), CliError> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/posts/5");
        then.status(200).json_body(json!({
            "id": 5,
            "caption": "old",
            "location": "Porto",
            "published": false,
            "images": [],
            "tags": [{"id": 1, "name": "film"}]
        }));
    });
    let patch = server.mock(|when, then| {
        when.method("PATCH")
            .path("/api/posts/5")
            .header("authorization", "Bearer tok")
            .json_body(json!({
                "caption": "new",
                "location": null,
                "published": true,
                "tags": ["travel"]
            }));
        then.status(200).json_body(json!({
            "id": 5,
            "caption": "new",
            "published": true,
            "tags": [{"id": 2, "name": "travel"}]
        }));
    });

    let shell = shell(&server, Some("tok"));
    let cmd = PostsCmd::Edit {
        id: 5,
        caption: Some("new".into()),
        location: Some(String::new()),
        published: Some(true),
        add_tags: vec!["  Travel ".into()],
        remove_tags: vec!["film".into()],
    };
    posts::handle(&shell, cmd).await?;
    patch.assert();
    Ok(())
}

#[tokio::test]
async fn missing_post_is_reported_after_redirect() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/posts/404");
        then.status(404);
    });

    let shell = shell(&server, Some("tok"));
    let cmd = PostsCmd::DeleteImage {
        id: 404,
        image_id: 1,
    };
    let err = posts::handle(&shell, cmd).await.expect_err("missing");
    assert!(matches!(err, CliError::PostNotFound(404)));
    assert_eq!(shell.navigator().current(), "/feed");
}

#[tokio::test]
async fn move_image_out_of_range_is_rejected_locally() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/posts/2");
        then.status(200).json_body(json!({
            "id": 2,
            "images": [{"id": 7, "filename": "a.jpg", "order": 0}]
        }));
    });
    let reorder = server.mock(|when, then| {
        when.method("PATCH").path("/api/posts/2/images/reorder");
        then.status(200).json_body(json!({"id": 2}));
    });

    let shell = shell(&server, Some("tok"));
    let cmd = PostsCmd::MoveImage {
        id: 2,
        image_id: 7,
        direction: DirectionArg::Left,
    };
    let err = posts::handle(&shell, cmd).await.expect_err("edge");
    assert!(matches!(err, CliError::InvalidInput(_)));
    reorder.assert_calls(0);
}

#[tokio::test]
async fn profile_edit_removes_then_adds_links() -> Result<(), CliError> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/profile");
        then.status(200).json_body(json!({
            "name": "Ana",
            "bio": "b",
            "links": [
                {"label": "a", "url": "https://a"},
                {"label": "b", "url": "https://b"},
                {"label": "c", "url": "https://c"}
            ]
        }));
    });
    let patch = server.mock(|when, then| {
        when.method("PATCH").path("/api/profile").json_body(json!({
            "name": "Ana",
            "bio": "b",
            "links": [
                {"label": "b", "url": "https://b"},
                {"label": "d", "url": "https://d"}
            ]
        }));
        then.status(200).json_body(json!({"name": "Ana", "bio": "b", "links": []}));
    });

    let shell = shell(&server, Some("tok"));
    let cmd = ProfileCmd::Edit {
        name: None,
        bio: None,
        add_links: vec!["d=https://d".into()],
        remove_links: vec![0, 2],
    };
    profile::handle(&shell, cmd).await?;
    patch.assert();
    Ok(())
}

#[tokio::test]
async fn gallery_keys_stop_after_view_is_gone() -> Result<(), CliError> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/profile");
        then.status(200).json_body(json!({"name": "Ana", "bio": "", "links": []}));
    });
    server.mock(|when, then| {
        when.method("GET").path("/api/posts");
        then.status(200).json_body(json!([{
            "id": 1,
            "images": [{"id": 1, "filename": "a.jpg"}, {"id": 2, "filename": "b.jpg"}]
        }]));
    });

    let shell = shell(&server, None);
    let input = gallery::GalleryInput {
        tag: None,
        open: Some(1),
        keys: vec!["ArrowRight".into(), "Escape".into()],
        select: None,
    };
    gallery::browse(&shell, input).await?;
    assert_eq!(shell.keyboard().listener_count(), 0);
    Ok(())
}
