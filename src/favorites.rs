use crate::models::SortMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

pub const PREF_SORT_KEY: &str = "sort_by";
pub const PREF_FAV_KEY: &str = "favorites";

pub trait FavoritesStore: Send + Sync {
    fn get_all(&self) -> BTreeSet<String>;
    fn save(&self, favorites: &BTreeSet<String>) -> Result<()>;

    fn is_favorite(&self, movie_id: &str) -> bool {
        self.get_all().contains(movie_id)
    }
}

pub trait SortPreference: Send + Sync {
    fn sort_mode(&self) -> SortMode;
    fn set_sort_mode(&self, mode: SortMode) -> Result<()>;
}

pub fn toggle_favorite(store: &dyn FavoritesStore, movie_id: &str) -> Result<bool> {
    let mut favorites = store.get_all();
    let now_favorite = if favorites.remove(movie_id) {
        false
    } else {
        favorites.insert(movie_id.to_string());
        true
    };
    store.save(&favorites)?;
    info!(
        "{} {} favorites",
        movie_id,
        if now_favorite { "added to" } else { "removed from" }
    );
    Ok(now_favorite)
}

// Field names are the preference keys above.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Prefs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sort_by: Option<String>,
    #[serde(default)]
    favorites: BTreeSet<String>,
}

impl Prefs {
    fn sort_mode(&self) -> SortMode {
        match self.sort_by.as_deref() {
            None => SortMode::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("Ignoring stored {} value: {}", PREF_SORT_KEY, e);
                SortMode::default()
            }),
        }
    }
}

#[derive(Debug)]
pub struct PreferenceFile {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl PreferenceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_text(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(None),
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }

    fn parse(&self, text: Option<String>) -> Prefs {
        let Some(text) = text else {
            return Prefs::default();
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!(
                "Falling back to default preferences: parsing {}: {}",
                self.path.display(),
                e
            );
            Prefs::default()
        })
    }

    fn read_or_default(&self) -> Prefs {
        match self.read_text() {
            Ok(text) => self.parse(text),
            Err(e) => {
                warn!("Falling back to default preferences: {:#}", e);
                Prefs::default()
            }
        }
    }

    fn update(&self, apply: impl FnOnce(&mut Prefs)) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("preference lock poisoned"))?;
        let mut prefs = self.parse(self.read_text()?);
        apply(&mut prefs);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(&prefs)?;
        // Readers don't take the lock, so they must never see a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))
    }
}

impl FavoritesStore for PreferenceFile {
    fn get_all(&self) -> BTreeSet<String> {
        self.read_or_default().favorites
    }

    fn save(&self, favorites: &BTreeSet<String>) -> Result<()> {
        let favorites = favorites.clone();
        self.update(|p| p.favorites = favorites)
    }
}

impl SortPreference for PreferenceFile {
    fn sort_mode(&self) -> SortMode {
        self.read_or_default().sort_mode()
    }

    fn set_sort_mode(&self, mode: SortMode) -> Result<()> {
        self.update(|p| p.sort_by = Some(mode.as_pref_str().to_string()))
    }
}

#[derive(Debug, Default)]
pub struct MemoryPreferences {
    prefs: Mutex<Prefs>,
}

impl MemoryPreferences {
    pub fn with_favorites<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefs = Prefs {
            sort_by: None,
            favorites: ids.into_iter().map(Into::into).collect(),
        };
        Self {
            prefs: Mutex::new(prefs),
        }
    }

    fn snapshot(&self) -> Prefs {
        match self.prefs.lock() {
            Ok(p) => p.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut Prefs)) -> Result<()> {
        let mut prefs = self
            .prefs
            .lock()
            .map_err(|_| anyhow::anyhow!("preference lock poisoned"))?;
        apply(&mut prefs);
        Ok(())
    }
}

impl FavoritesStore for MemoryPreferences {
    fn get_all(&self) -> BTreeSet<String> {
        self.snapshot().favorites
    }

    fn save(&self, favorites: &BTreeSet<String>) -> Result<()> {
        let favorites = favorites.clone();
        self.update(|p| p.favorites = favorites)
    }
}

impl SortPreference for MemoryPreferences {
    fn sort_mode(&self) -> SortMode {
        self.snapshot().sort_mode()
    }

    fn set_sort_mode(&self, mode: SortMode) -> Result<()> {
        self.update(|p| p.sort_by = Some(mode.as_pref_str().to_string()))
    }
}
