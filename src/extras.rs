use crate::client::CatalogApi;
use crate::config::CatalogConfig;
use crate::decode;
use crate::models::{MovieExtras, Review, Trailer};
use crate::planner;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, warn};

pub struct ExtrasLoader {
    catalog: Arc<dyn CatalogApi>,
    config: Arc<CatalogConfig>,
    movie_id: Option<String>,
}

impl ExtrasLoader {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        config: Arc<CatalogConfig>,
        movie_id: Option<String>,
    ) -> Self {
        Self {
            catalog,
            config,
            movie_id,
        }
    }

    pub async fn load(self) -> Option<MovieExtras> {
        let movie_id = self.movie_id?;
        let urls = planner::extras_urls(&self.config, &movie_id);
        let catalog = self.catalog.as_ref();
        let (trailers, reviews) = tokio::join!(
            fetch_trailers(catalog, &urls.videos),
            fetch_reviews(catalog, &urls.reviews),
        );
        debug!(
            "Extras for {}: {} trailer(s), {} review(s)",
            movie_id,
            trailers.len(),
            reviews.len()
        );
        Some(MovieExtras { trailers, reviews })
    }

    pub fn spawn(self) -> oneshot::Receiver<Option<MovieExtras>> {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let extras = self.load().await;
            if tx.send(extras).is_err() {
                debug!("Extras receiver dropped before delivery");
            }
        });
        rx
    }
}

async fn fetch_trailers(catalog: &dyn CatalogApi, url: &str) -> Vec<Trailer> {
    match catalog.fetch(Some(url)).await {
        Ok(body) => decode::decode_trailers(&body),
        Err(e) => {
            warn!("Fetching trailers failed: {}", e);
            Vec::new()
        }
    }
}

async fn fetch_reviews(catalog: &dyn CatalogApi, url: &str) -> Vec<Review> {
    match catalog.fetch(Some(url)).await {
        Ok(body) => decode::decode_reviews(&body),
        Err(e) => {
            warn!("Fetching reviews failed: {}", e);
            Vec::new()
        }
    }
}
