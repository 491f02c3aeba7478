use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub const CATALOG_BASE: &str = "https://api.themoviedb.org/3/movie";
pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w185";
pub const DEFAULT_PREFS_PATH: &str = "marquee-prefs.json";

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub api_key: String,
    pub catalog_base: String,
    pub image_base: String,
}

impl CatalogConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            catalog_base: CATALOG_BASE.to_string(),
            image_base: IMAGE_BASE.to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = env::var("TMDB_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .context("TMDB_API_KEY not set")?;
        let mut config = Self::new(api_key);
        if let Some(base) = non_empty_var("MARQUEE_CATALOG_BASE") {
            config.catalog_base = base;
        }
        if let Some(base) = non_empty_var("MARQUEE_IMAGE_BASE") {
            config.image_base = base;
        }
        Ok(config)
    }

    pub fn with_catalog_base(mut self, base: impl Into<String>) -> Self {
        self.catalog_base = base.into().trim_end_matches('/').to_string();
        self
    }
}

pub fn prefs_path_from_env() -> PathBuf {
    non_empty_var("MARQUEE_PREFS")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFS_PATH))
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
