use crate::client::{CatalogApi, FetchError};
use crate::config::CatalogConfig;
use crate::decode;
use crate::favorites::FavoritesStore;
use crate::models::{Movie, SortMode};
use crate::planner::{self, RequestPlan};
use futures::future::join_all;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutcome {
    Loaded,
    Failed,
    Reset,
}

#[derive(Debug, Clone)]
pub struct ListDelivery {
    pub sort_mode: Option<SortMode>,
    pub movies: Vec<Movie>,
    pub outcome: ListOutcome,
    generation: u64,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("list request failed: {0}")]
    Bulk(#[from] FetchError),
    #[error("all {0} favorite requests failed")]
    AllFavoritesFailed(usize),
}

pub async fn load_movies(
    catalog: &dyn CatalogApi,
    plan: RequestPlan,
) -> Result<Vec<Movie>, LoadError> {
    match plan {
        RequestPlan::Bulk { url } => {
            let body = catalog.fetch(Some(&url)).await?;
            Ok(decode::decode_movies(&body))
        }
        RequestPlan::PerId(requests) if requests.is_empty() => Ok(Vec::new()),
        RequestPlan::PerId(requests) => {
            let fetches = requests.iter().map(|req| async move {
                match catalog.fetch(Some(&req.url)).await {
                    Ok(body) => decode::decode_movie(&body, Some(&req.movie_id)),
                    Err(e) => {
                        warn!("Favorite {} could not be fetched: {}", req.movie_id, e);
                        None
                    }
                }
            });
            let movies: Vec<Movie> = join_all(fetches).await.into_iter().flatten().collect();
            if movies.is_empty() {
                return Err(LoadError::AllFavoritesFailed(requests.len()));
            }
            Ok(movies)
        }
    }
}

#[derive(Debug)]
struct Cycle {
    generation: u64,
    state: LoadState,
    sort_mode: Option<SortMode>,
    cancel: CancellationToken,
}

fn lock(cycle: &Mutex<Cycle>) -> MutexGuard<'_, Cycle> {
    cycle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct ListLoader {
    catalog: Arc<dyn CatalogApi>,
    favorites: Arc<dyn FavoritesStore>,
    config: Arc<CatalogConfig>,
    cycle: Arc<Mutex<Cycle>>,
    tx: mpsc::UnboundedSender<ListDelivery>,
}

pub struct ListReceiver {
    rx: mpsc::UnboundedReceiver<ListDelivery>,
    cycle: Arc<Mutex<Cycle>>,
}

impl ListLoader {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        favorites: Arc<dyn FavoritesStore>,
        config: Arc<CatalogConfig>,
    ) -> (Self, ListReceiver) {
        let cycle = Arc::new(Mutex::new(Cycle {
            generation: 0,
            state: LoadState::Idle,
            sort_mode: None,
            cancel: CancellationToken::new(),
        }));
        let (tx, rx) = mpsc::unbounded_channel();
        let loader = Self {
            catalog,
            favorites,
            config,
            cycle: cycle.clone(),
            tx,
        };
        (loader, ListReceiver { rx, cycle })
    }

    pub fn state(&self) -> LoadState {
        lock(&self.cycle).state
    }

    pub fn sort_mode(&self) -> Option<SortMode> {
        lock(&self.cycle).sort_mode
    }

    pub fn start(&self, sort_mode: SortMode) {
        let favorite_ids = match sort_mode {
            SortMode::Favorites => self.favorites.get_all(),
            _ => BTreeSet::new(),
        };
        let plan = planner::plan(sort_mode, &self.config, &favorite_ids);

        let (generation, token) = {
            let mut cycle = lock(&self.cycle);
            cycle.cancel.cancel();
            cycle.generation += 1;
            cycle.state = LoadState::Loading;
            cycle.sort_mode = Some(sort_mode);
            cycle.cancel = CancellationToken::new();
            (cycle.generation, cycle.cancel.clone())
        };
        info!(
            "Loading {} movies ({} request(s), cycle {})",
            sort_mode,
            plan.len(),
            generation
        );

        let catalog = self.catalog.clone();
        let cycle = self.cycle.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                _ = token.cancelled() => {
                    debug!("Cycle {} cancelled before completion", generation);
                    return;
                }
                result = load_movies(catalog.as_ref(), plan) => result,
            };
            let mut cycle = lock(&cycle);
            if cycle.generation != generation || token.is_cancelled() {
                debug!("Discarding result of superseded cycle {}", generation);
                return;
            }
            let (state, outcome, movies) = match result {
                Ok(movies) => (LoadState::Ready, ListOutcome::Loaded, movies),
                Err(e) => {
                    warn!("Loading {} movies failed: {}", sort_mode, e);
                    (LoadState::Failed, ListOutcome::Failed, Vec::new())
                }
            };
            cycle.state = state;
            // Sent under the lock so a concurrent restart can't interleave.
            let _ = tx.send(ListDelivery {
                sort_mode: Some(sort_mode),
                movies,
                outcome,
                generation,
            });
        });
    }

    pub fn restart(&self, sort_mode: SortMode) {
        self.start(sort_mode);
    }

    pub fn refresh(&self) {
        if let Some(mode) = self.sort_mode() {
            self.start(mode);
        }
    }

    pub fn reset(&self) {
        let mut cycle = lock(&self.cycle);
        cycle.cancel.cancel();
        cycle.generation += 1;
        cycle.state = LoadState::Idle;
        let _ = self.tx.send(ListDelivery {
            sort_mode: cycle.sort_mode,
            movies: Vec::new(),
            outcome: ListOutcome::Reset,
            generation: cycle.generation,
        });
    }
}

impl Drop for ListLoader {
    fn drop(&mut self) {
        lock(&self.cycle).cancel.cancel();
    }
}

impl ListReceiver {
    pub async fn recv(&mut self) -> Option<ListDelivery> {
        loop {
            let delivery = self.rx.recv().await?;
            if let Some(delivery) = self.accept(delivery) {
                return Some(delivery);
            }
        }
    }

    fn accept(&self, delivery: ListDelivery) -> Option<ListDelivery> {
        let mut cycle = lock(&self.cycle);
        if delivery.generation != cycle.generation {
            debug!("Dropping stale delivery from cycle {}", delivery.generation);
            return None;
        }
        if delivery.outcome != ListOutcome::Reset {
            cycle.state = LoadState::Idle;
        }
        Some(delivery)
    }
}
