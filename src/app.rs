use crate::client::{CatalogApi, HttpCatalogClient};
use crate::config::{prefs_path_from_env, CatalogConfig};
use crate::decode;
use crate::extras::ExtrasLoader;
use crate::favorites::{toggle_favorite, FavoritesStore, PreferenceFile, SortPreference};
use crate::loader::{ListLoader, ListOutcome};
use crate::models::{Movie, MovieExtras, SortMode};
use crate::planner;
use anyhow::{anyhow, bail, Context, Result};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{info, warn};

pub const USAGE: &str = "usage: marquee <command>
  list [popular|top-rated|favorites]   print the movie list (mode is remembered)
  show <movie_id>                      print details, trailers and reviews
  favorite <movie_id>                  add or remove a favorite
  favorites                            print favorite ids
  sort [popular|top-rated|favorites]   print or change the sort mode";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List(Option<SortMode>),
    Show(String),
    Favorite(String),
    Favorites,
    Sort(Option<SortMode>),
}

impl Command {
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let mut args = args.iter().map(AsRef::<str>::as_ref);
        let command = args.next().unwrap_or("list");
        let rest: Vec<&str> = args.collect();
        let mode = |rest: &[&str]| -> Result<Option<SortMode>> {
            match rest {
                [] => Ok(None),
                parts => parts.join(" ").parse().map(Some),
            }
        };
        let movie_id = |rest: &[&str]| -> Result<String> {
            match rest {
                [id] if !id.trim().is_empty() => Ok(id.trim().to_string()),
                _ => Err(anyhow!("expected exactly one movie id\n{}", USAGE)),
            }
        };
        match command {
            "list" => Ok(Command::List(mode(rest.as_slice())?)),
            "show" => Ok(Command::Show(movie_id(rest.as_slice())?)),
            "favorite" | "fav" => Ok(Command::Favorite(movie_id(rest.as_slice())?)),
            "favorites" => Ok(Command::Favorites),
            "sort" => Ok(Command::Sort(mode(rest.as_slice())?)),
            other => bail!("unknown command '{}'\n{}", other, USAGE),
        }
    }
}

pub struct App<P> {
    catalog: Arc<dyn CatalogApi>,
    prefs: Arc<P>,
    config: Arc<CatalogConfig>,
}

impl App<PreferenceFile> {
    pub fn from_env() -> Result<Self> {
        let config = CatalogConfig::from_env()?;
        let catalog: Arc<dyn CatalogApi> = Arc::new(HttpCatalogClient::new()?);
        let prefs = PreferenceFile::new(prefs_path_from_env());
        info!("Using preferences at {}", prefs.path().display());
        Ok(Self::new(catalog, Arc::new(prefs), config))
    }
}

impl<P> App<P>
where
    P: FavoritesStore + SortPreference + 'static,
{
    pub fn new(catalog: Arc<dyn CatalogApi>, prefs: Arc<P>, config: CatalogConfig) -> Self {
        Self {
            catalog,
            prefs,
            config: Arc::new(config),
        }
    }

    pub async fn run(&self, command: Command) -> Result<String> {
        match command {
            Command::List(mode) => self.list(mode).await,
            Command::Show(id) => self.show(&id).await,
            Command::Favorite(id) => {
                let now_favorite = toggle_favorite(self.prefs.as_ref(), &id)?;
                Ok(if now_favorite {
                    format!("{id} has been added to your favorites")
                } else {
                    format!("{id} has been removed from your favorites")
                })
            }
            Command::Favorites => {
                let favorites = self.prefs.get_all();
                if favorites.is_empty() {
                    return Ok("No favorites yet.".to_string());
                }
                Ok(favorites.into_iter().collect::<Vec<_>>().join("\n"))
            }
            Command::Sort(None) => Ok(self.prefs.sort_mode().to_string()),
            Command::Sort(Some(mode)) => {
                self.prefs.set_sort_mode(mode)?;
                Ok(format!("Sorting by {mode}"))
            }
        }
    }

    async fn list(&self, mode: Option<SortMode>) -> Result<String> {
        let mode = match mode {
            Some(mode) => {
                self.prefs.set_sort_mode(mode)?;
                mode
            }
            None => self.prefs.sort_mode(),
        };
        let favorites: Arc<dyn FavoritesStore> = self.prefs.clone();
        let (loader, mut deliveries) =
            ListLoader::new(self.catalog.clone(), favorites, self.config.clone());
        loader.start(mode);
        let delivery = deliveries
            .recv()
            .await
            .context("list loader stopped without delivering")?;
        if delivery.outcome == ListOutcome::Failed {
            warn!("Showing empty {} list after a failed load", mode);
        }
        Ok(render_list(&delivery.movies, &self.config.image_base))
    }

    async fn show(&self, movie_id: &str) -> Result<String> {
        let url = planner::movie_url(&self.config, movie_id);
        let extras = ExtrasLoader::new(
            self.catalog.clone(),
            self.config.clone(),
            Some(movie_id.to_string()),
        );
        let (detail, extras) = tokio::join!(self.catalog.fetch(Some(&url)), extras.load());
        let movie = match detail {
            Ok(body) => decode::decode_movie(&body, Some(movie_id)),
            Err(e) => {
                warn!("Fetching movie {} failed: {}", movie_id, e);
                None
            }
        };
        let Some(movie) = movie else {
            return Ok(format!("Movie {movie_id} could not be loaded."));
        };
        let is_favorite = self.prefs.is_favorite(movie_id);
        Ok(render_details(
            &movie,
            &extras.unwrap_or_default(),
            is_favorite,
            &self.config.image_base,
        ))
    }
}

pub fn render_list(movies: &[Movie], image_base: &str) -> String {
    if movies.is_empty() {
        return "No movies found.".to_string();
    }
    let mut out = String::new();
    for movie in movies {
        let _ = writeln!(
            out,
            "{:>8}  {} ({})  {}  {}",
            movie.id,
            movie.title,
            movie.year().unwrap_or("----"),
            movie.rating_display(),
            movie.poster_url(image_base).unwrap_or_default()
        );
    }
    out.trim_end().to_string()
}

pub fn render_details(
    movie: &Movie,
    extras: &MovieExtras,
    is_favorite: bool,
    image_base: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", movie.title);
    let _ = writeln!(
        out,
        "{} · {}{}",
        movie.year().unwrap_or("----"),
        movie.rating_display(),
        if is_favorite { " · ★ favorite" } else { "" }
    );
    if let Some(poster) = movie.poster_url(image_base) {
        let _ = writeln!(out, "{poster}");
    }
    let _ = writeln!(out, "\n{}", movie.synopsis);

    let _ = writeln!(out, "\nTrailers:");
    if extras.trailers.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for trailer in &extras.trailers {
        let _ = writeln!(out, "  {}  {}", trailer.name, trailer.playback_url());
    }

    let _ = writeln!(out, "\nReviews:");
    if extras.reviews.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for review in &extras.reviews {
        let _ = writeln!(out, "  {}:\n    {}", review.author, review.content);
    }
    out.trim_end().to_string()
}
