//! Drives the clients against real HTTP servers bound to ephemeral ports: the auth
//! backend from the `api` crate, and a stand-in for the summary service.

use api_lib::{
    adapters::InMemoryUserRepository,
    config::{Config, UserStore},
    web::{router, state::AppState},
};
use axum::{extract::Query, routing::get, Json, Router};
use blog_summary_client::{AuthClient, ClientConfig, ClientError, FileSessionStorage, SummaryClient};
use blog_summary_core::ports::SummaryService;
use blog_summary_core::session::SessionState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn auth_backend() -> String {
    let config = Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        user_store: UserStore::Memory,
        log_level: tracing::Level::INFO,
        jwt_secret: "client-test-secret-client-test-secret".to_string(),
        token_ttl_secs: 3600,
        cors_allowed_origin: None,
    };
    let state = AppState::new(Arc::new(InMemoryUserRepository::new()), Arc::new(config));
    serve(router(Arc::new(state))).await
}

/// Echoes the request back inside canned per-site results.
async fn summary_stub(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let keyword = params.get("keyword").cloned().unwrap_or_default();
    let sites = params.get("sites").cloned().unwrap_or_default();
    let mut results = serde_json::Map::new();
    for site in sites.split(',') {
        let entry = match site {
            "wix" => json!({ "error": "Unsupported site: wix" }),
            other => json!({
                "summary": format!("{} on {}", keyword, other),
                "sources": [{
                    "title": format!("{} post", other),
                    "url": format!("https://{}.com/{}", other, keyword),
                    "website": other
                }]
            }),
        };
        results.insert(site.to_string(), entry);
    }
    Json(json!({ "keyword": keyword, "sites": sites.split(',').collect::<Vec<_>>(), "results": results }))
}

fn sites(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

//=========================================================================================
// Auth
//=========================================================================================

#[tokio::test]
async fn register_then_restore_session_from_disk() {
    let base = auth_backend().await;
    let client = AuthClient::new(&ClientConfig::default().with_auth_base_url(&base)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let session = client.register("Ada", "ada@example.com", "pw-123").await.unwrap();
    let mut state = SessionState::new(FileSessionStorage::new(&path));
    state.sign_in(session.clone()).unwrap();

    let mut restored = SessionState::new(FileSessionStorage::new(&path));
    let loaded = restored.load().unwrap().cloned().unwrap();
    assert_eq!(loaded, session);

    let user_id = client.me(&loaded.token).await.unwrap();
    assert_eq!(user_id, session.user.id);
}

#[tokio::test]
async fn server_messages_are_surfaced() {
    let base = auth_backend().await;
    let client = AuthClient::new(&ClientConfig::default().with_auth_base_url(&base)).unwrap();
    client.register("Ada", "ada@example.com", "pw-123").await.unwrap();

    let err = client.register("Ada", "ada@example.com", "pw-123").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 400, ref message } if message == "User already exists"));

    let err = client.login("ada@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 400, ref message } if message == "Invalid credentials"));

    let err = client.me("garbage").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 401, .. }));
}

#[tokio::test]
async fn unreachable_backend_is_an_http_error() {
    // Bind and drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::default().with_auth_base_url(format!("http://{}", addr));
    let err = AuthClient::new(&config)
        .unwrap()
        .login("a@b.c", "pw")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
}

//=========================================================================================
// Summaries
//=========================================================================================

#[tokio::test]
async fn combines_site_results_in_selection_order() {
    let base = serve(Router::new().route("/scrape-and-summarize", get(summary_stub))).await;
    let client = SummaryClient::new(&ClientConfig::default().with_summary_base_url(&base)).unwrap();

    let result = client
        .get_article_summary(&sites(&["devto", "wix", "medium"]), "  rust  ")
        .await
        .unwrap();

    assert_eq!(result.topic, "rust");
    assert_eq!(
        result.summary,
        "rust on devto\n\nNo summary available for wix.\n\nrust on medium"
    );
    let websites: Vec<&str> = result.sources.iter().map(|s| s.website.as_str()).collect();
    assert_eq!(websites, vec!["devto", "medium"]);
}

#[tokio::test]
async fn empty_selection_queries_defaults_but_yields_no_summary() {
    let base = serve(Router::new().route("/scrape-and-summarize", get(summary_stub))).await;
    let client = SummaryClient::new(&ClientConfig::default().with_summary_base_url(&base)).unwrap();

    let raw = client.scrape_and_summarize("rust", &[]).await.unwrap();
    let queried: Vec<&str> = raw.keys().map(String::as_str).collect();
    assert_eq!(queried, vec!["devto", "medium", "wix"]);

    let err = client.get_article_summary(&[], "rust").await.unwrap_err();
    assert!(matches!(err, ClientError::Port(_)));
}

#[tokio::test]
async fn missing_results_is_an_invalid_response() {
    let app = Router::new().route(
        "/scrape-and-summarize",
        get(|| async { Json(json!({ "detail": "nope" })) }),
    );
    let base = serve(app).await;
    let client = SummaryClient::new(&ClientConfig::default().with_summary_base_url(&base)).unwrap();

    let err = client
        .get_article_summary(&sites(&["medium"]), "rust")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
}

#[tokio::test]
async fn blank_topic_never_hits_the_network() {
    let client = SummaryClient::new(
        &ClientConfig::default().with_summary_base_url("http://127.0.0.1:1"),
    )
    .unwrap();
    let err = client
        .get_article_summary(&sites(&["medium"]), "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Port(_)));
}
