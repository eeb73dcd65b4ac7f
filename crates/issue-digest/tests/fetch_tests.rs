//! Integration tests for fetching issues from the GitHub API.
//!
//! A wiremock server stands in for api.github.com.

use issue_digest::{FetchError, IssueFetcher};
use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Helpers
// =============================================================================

fn fetcher_for(server: &MockServer, token: Option<&str>) -> IssueFetcher {
    IssueFetcher::new(token.map(ToString::to_string))
        .expect("client builds")
        .with_base_url(server.uri())
}

fn issues_json() -> serde_json::Value {
    json!([
        {
            "number": 12,
            "title": "Lasercutter kalibrieren",
            "body": "Der Fokus ist\r\nverstellt.",
            "html_url": "https://github.com/openlab-aux/orgafoo/issues/12",
            "state": "open"
        },
        {
            "number": 9,
            "title": "Mate nachbestellen",
            "body": null,
            "html_url": "https://github.com/openlab-aux/orgafoo/issues/9",
            "state": "open"
        }
    ])
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_fetch_returns_issues_in_api_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/openlab-aux/orgafoo/issues"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(issues_json()))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, None);
    let issues = fetcher.fetch_issues("openlab-aux", "orgafoo").await.unwrap();

    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].title, "Lasercutter kalibrieren");
    assert_eq!(issues[0].body, "Der Fokus ist\r\nverstellt.");
    assert_eq!(issues[1].title, "Mate nachbestellen");
    assert_eq!(issues[1].body, "");
}

#[tokio::test]
async fn test_fetch_sends_token_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/openlab-aux/orgafoo/issues"))
        .and(header("authorization", "Bearer ghp_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, Some("ghp_test"));
    let issues = fetcher.fetch_issues("openlab-aux", "orgafoo").await.unwrap();

    assert!(issues.is_empty());
}

#[tokio::test]
async fn test_fetch_404_is_repo_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/openlab-aux/missing/issues"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, None);
    let err = fetcher
        .fetch_issues("openlab-aux", "missing")
        .await
        .unwrap_err();

    match err {
        FetchError::RepoNotFound { org, repo } => {
            assert_eq!(org, "openlab-aux");
            assert_eq!(repo, "missing");
        }
        other => panic!("expected RepoNotFound, got {other}"),
    }
}

#[tokio::test]
async fn test_fetch_other_status_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/openlab-aux/orgafoo/issues"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API rate limit exceeded"))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, None);
    let err = fetcher
        .fetch_issues("openlab-aux", "orgafoo")
        .await
        .unwrap_err();

    match err {
        FetchError::Api { status, message } => {
            assert_eq!(status, 403);
            assert!(message.contains("rate limit"));
        }
        other => panic!("expected Api error, got {other}"),
    }
}

#[tokio::test]
async fn test_fetch_rejects_non_list_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/openlab-aux/orgafoo/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "odd"})))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, None);
    let err = fetcher
        .fetch_issues("openlab-aux", "orgafoo")
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn test_fetch_connection_failure_is_http_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let fetcher = IssueFetcher::new(None).unwrap().with_base_url(uri);
    let err = fetcher
        .fetch_issues("openlab-aux", "orgafoo")
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Http(_)));
}
