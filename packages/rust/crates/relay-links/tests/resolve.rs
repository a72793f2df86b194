#![allow(missing_docs)]

mod support;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{Router, http::StatusCode, response::Redirect, routing::get};
use relay_links::{HttpRedirectFollower, LinkResolver, ResolveError};
use support::{StalledFollower, TableFollower, resolver_with};

#[tokio::test]
async fn resolve_full_path_url_without_network() {
    let follower = Arc::new(TableFollower::default());
    let resolver = resolver_with(follower.clone());
    let id = resolver
        .resolve("https://www.amazon.in/dp/B08N5WRWNW?ref=x")
        .await;
    assert_eq!(id.map(|id| id.to_string()), Some("B08N5WRWNW".to_string()));
    assert!(follower.calls().is_empty());
}

#[tokio::test]
async fn resolve_bare_short_link_follows_normalized_url() {
    let follower = Arc::new(
        TableFollower::default()
            .with_route("https://amzn.to/abc123", "https://www.amazon.in/dp/B08N5WRWNW/ref=x"),
    );
    let resolver = resolver_with(follower.clone());
    let id = resolver.resolve("amzn.to/abc123").await;
    assert_eq!(id.map(|id| id.to_string()), Some("B08N5WRWNW".to_string()));
    assert_eq!(follower.calls(), vec!["https://amzn.to/abc123".to_string()]);
}

#[tokio::test]
async fn resolve_reports_network_failure_as_absent() {
    let follower = Arc::new(TableFollower::default().with_failure("https://amzaff.in/dead"));
    let resolver = resolver_with(follower);
    assert!(resolver.resolve("https://amzaff.in/dead").await.is_none());
    let error = resolver.try_resolve("https://amzaff.in/dead").await;
    assert!(matches!(error, Err(ResolveError::Request { .. })));
}

#[tokio::test]
async fn resolve_redirect_without_product_is_absent() {
    let follower = Arc::new(
        TableFollower::default().with_route("https://amzn.in/home", "https://www.amazon.in/"),
    );
    let resolver = resolver_with(follower);
    let error = resolver.try_resolve("amzn.in/home").await;
    assert_eq!(
        error,
        Err(ResolveError::NoProductId {
            url: "https://www.amazon.in/".to_string()
        })
    );
}

#[tokio::test]
async fn resolve_times_out_stalled_short_link() {
    let resolver = LinkResolver::new(Arc::new(StalledFollower), Duration::from_millis(50));
    let error = resolver.try_resolve("https://amzn.to/slow").await;
    assert!(matches!(
        error,
        Err(ResolveError::Timeout { timeout_ms: 50, .. })
    ));
}

async fn spawn_redirect_server() -> Result<Option<(String, tokio::task::JoinHandle<()>)>> {
    let app = Router::new()
        .route("/short", get(|| async { Redirect::temporary("/hop") }))
        .route("/hop", get(|| async { Redirect::permanent("/dp/B08N5WRWNW/ref=sr") }))
        .route(
            "/dp/B08N5WRWNW/ref=sr",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "robot check") }),
        );
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
            eprintln!("skipping redirect tests: local socket bind is not permitted");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    wait_for_listener(addr).await;
    Ok(Some((format!("http://{addr}"), handle)))
}

async fn wait_for_listener(addr: std::net::SocketAddr) {
    for _ in 0..20 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn http_follower_returns_final_url_even_on_error_status() -> Result<()> {
    use relay_links::RedirectFollower;

    let Some((base, handle)) = spawn_redirect_server().await? else {
        return Ok(());
    };
    let follower = HttpRedirectFollower::new(Duration::from_secs(2))?;
    let final_url = follower.follow(&format!("{base}/short")).await?;
    assert_eq!(final_url, format!("{base}/dp/B08N5WRWNW/ref=sr"));

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn http_follower_reports_refused_connection() -> Result<()> {
    use relay_links::RedirectFollower;

    let follower = HttpRedirectFollower::new(Duration::from_secs(1))?;
    let result = follower.follow("http://127.0.0.1:9/short").await;
    assert!(matches!(result, Err(ResolveError::Request { .. })));
    Ok(())
}
