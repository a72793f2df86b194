#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use relay_links::{LinkResolver, RedirectFollower, ResolveError};

/// Redirect backend answering from a fixed table and recording every lookup.
#[derive(Default)]
pub struct TableFollower {
    routes: HashMap<String, Result<String, ResolveError>>,
    calls: Mutex<Vec<String>>,
}

impl TableFollower {
    pub fn with_route(mut self, from: &str, to: &str) -> Self {
        self.routes.insert(from.to_string(), Ok(to.to_string()));
        self
    }

    pub fn with_failure(mut self, from: &str) -> Self {
        self.routes.insert(
            from.to_string(),
            Err(ResolveError::Request {
                url: from.to_string(),
                reason: "connection refused".to_string(),
            }),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RedirectFollower for TableFollower {
    async fn follow(&self, url: &str) -> Result<String, ResolveError> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(url.to_string());
        self.routes
            .get(url)
            .cloned()
            .unwrap_or_else(|| Ok(url.to_string()))
    }
}

/// Backend that never answers within any reasonable timeout.
pub struct StalledFollower;

#[async_trait]
impl RedirectFollower for StalledFollower {
    async fn follow(&self, url: &str) -> Result<String, ResolveError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(url.to_string())
    }
}

pub fn resolver_with(follower: Arc<TableFollower>) -> LinkResolver {
    LinkResolver::new(follower, Duration::from_secs(1))
}
