#![allow(dead_code)]

use async_trait::async_trait;
use marquee::client::{CatalogApi, FetchError};
use marquee::config::CatalogConfig;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub const BASE: &str = "http://catalog.test/3/movie";
pub const KEY: &str = "test-key";

pub fn config() -> CatalogConfig {
    CatalogConfig::new(KEY).with_catalog_base(BASE)
}

pub fn url(path: &str) -> String {
    format!("{BASE}/{path}?api_key={KEY}")
}

pub fn extras_url(id: &str, kind: &str) -> String {
    format!("{BASE}/{id}/{kind}?api_key={KEY}&language=en-US")
}

pub fn movie_value(id: u64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "original_title": title,
        "poster_path": format!("/{id}.jpg"),
        "overview": format!("About {title}"),
        "release_date": "2010-07-16",
        "vote_average": 7.5
    })
}

pub fn movie_body(id: u64, title: &str) -> String {
    movie_value(id, title).to_string()
}

pub fn bulk_body(movies: &[(u64, &str)]) -> String {
    let results: Vec<_> = movies.iter().map(|(id, t)| movie_value(*id, t)).collect();
    json!({ "page": 1, "results": results }).to_string()
}

#[derive(Clone)]
pub enum Reply {
    Body(String),
    Fail(FetchError),
}

/// Answers fixed urls, optionally after a delay. Unknown urls get a 404.
#[derive(Default)]
pub struct FakeCatalog {
    routes: HashMap<String, (Reply, Duration)>,
    calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(self, url: String, body: impl Into<String>) -> Self {
        self.delayed(url, Reply::Body(body.into()), Duration::ZERO)
    }

    pub fn fail(self, url: String, err: FetchError) -> Self {
        self.delayed(url, Reply::Fail(err), Duration::ZERO)
    }

    pub fn delayed(mut self, url: String, reply: Reply, delay: Duration) -> Self {
        self.routes.insert(url, (reply, delay));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn fetch(&self, url: Option<&str>) -> Result<String, FetchError> {
        let Some(url) = url else {
            return Ok(String::new());
        };
        self.calls.lock().unwrap().push(url.to_string());
        let Some((reply, delay)) = self.routes.get(url).cloned() else {
            return Err(FetchError::BadStatus(404));
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match reply {
            Reply::Body(body) => Ok(body),
            Reply::Fail(err) => Err(err),
        }
    }
}
