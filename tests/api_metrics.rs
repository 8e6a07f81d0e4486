use std::collections::HashMap;
use std::sync::Arc;

use httpmock::MockServer;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use photolog::application::session::TOKEN_KEY;
use photolog::application::shell::Shell;
use photolog::config::ApiSettings;
use photolog::infra::storage::MemoryStore;
use photolog::infra::telemetry::{API_REQUESTS_TOTAL, SESSION_TERMINATIONS_TOTAL};
use serde_json::json;

#[tokio::test]
async fn request_outcomes_and_session_terminations_are_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/posts/feed/all");
        then.status(200).json_body(json!([]));
    });
    server.mock(|when, then| {
        when.method("GET").path("/api/posts/1");
        then.status(404);
    });
    server.mock(|when, then| {
        when.method("GET").path("/api/profile");
        then.status(401);
    });

    let settings = ApiSettings {
        base_url: server.base_url().parse().expect("url"),
        root: "/api".to_string(),
    };
    let shell = Shell::with_store(&settings, Arc::new(MemoryStore::with_entry(TOKEN_KEY, "tok")))
        .expect("shell");

    shell.feed().load().await.expect("feed");
    shell.post_editor(1).load().await.expect("redirected");
    shell
        .profile_editor()
        .load()
        .await
        .expect_err("401 ends the session");

    let mut counters: HashMap<(String, Option<String>), u64> = HashMap::new();
    for (composite_key, _, _, value) in snapshotter.snapshot().into_vec() {
        let key = composite_key.key();
        let outcome = key
            .labels()
            .find(|label| label.key() == "outcome")
            .map(|label| label.value().to_string());
        if let DebugValue::Counter(count) = value {
            counters.insert((key.name().to_string(), outcome), count);
        }
    }

    let count = |name: &str, outcome: Option<&str>| {
        counters
            .get(&(name.to_string(), outcome.map(str::to_string)))
            .copied()
            .unwrap_or_default()
    };
    assert_eq!(count(API_REQUESTS_TOTAL, Some("success")), 1);
    assert_eq!(count(API_REQUESTS_TOTAL, Some("status")), 1);
    assert_eq!(count(API_REQUESTS_TOTAL, Some("unauthorized")), 1);
    assert_eq!(count(SESSION_TERMINATIONS_TOTAL, None), 1);
}
