use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const TRAILER_BASE: &str = "https://www.youtube.com/watch?v=";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub poster_path: String,
    pub synopsis: String,
    pub release_date: String,
    pub user_rating: f64,
}

impl Movie {
    pub fn poster_url(&self, image_base: &str) -> Option<String> {
        if self.poster_path.is_empty() {
            return None;
        }
        Some(format!("{image_base}{}", self.poster_path))
    }

    pub fn year(&self) -> Option<&str> {
        self.release_date.get(0..4)
    }

    pub fn rating_display(&self) -> String {
        format!("{:.1}/10", self.user_rating)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Trailer {
    pub name: String,
    pub video_key: String,
}

impl Trailer {
    pub fn playback_url(&self) -> String {
        format!("{TRAILER_BASE}{}", self.video_key)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Review {
    pub author: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct MovieExtras {
    pub trailers: Vec<Trailer>,
    pub reviews: Vec<Review>,
}

impl MovieExtras {
    pub fn primary_trailer(&self) -> Option<&Trailer> {
        self.trailers.first()
    }

    pub fn is_empty(&self) -> bool {
        self.trailers.is_empty() && self.reviews.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    Popular,
    TopRated,
    Favorites,
}

impl SortMode {
    pub fn as_pref_str(&self) -> &'static str {
        match self {
            SortMode::Popular => "popular",
            SortMode::TopRated => "top rated",
            SortMode::Favorites => "favorites",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_pref_str())
    }
}

impl FromStr for SortMode {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "popular" => Ok(SortMode::Popular),
            "top rated" | "top_rated" | "top-rated" => Ok(SortMode::TopRated),
            "favorites" | "favourites" => Ok(SortMode::Favorites),
            other => Err(anyhow::anyhow!(
                "sort mode must be 'popular', 'top-rated' or 'favorites' (got '{}')",
                other
            )),
        }
    }
}
