use crate::models::{Movie, Review, Trailer};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed catalog JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("catalog JSON has no `results` array")]
    MissingResults,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    results: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawMovie {
    id: Option<RawId>,
    original_title: String,
    poster_path: Option<String>,
    overview: String,
    release_date: String,
    vote_average: f64,
}

impl RawMovie {
    fn into_movie(self, fallback_id: Option<&str>) -> Option<Movie> {
        let id = match self.id {
            Some(RawId::Number(n)) => n.to_string(),
            Some(RawId::Text(s)) if !s.is_empty() => s,
            _ => fallback_id?.to_string(),
        };
        Some(Movie {
            id,
            title: self.original_title,
            poster_path: self.poster_path.unwrap_or_default(),
            synopsis: self.overview,
            release_date: self.release_date,
            user_rating: self.vote_average,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawVideo {
    name: String,
    key: String,
}

pub fn try_decode_movies(body: &str) -> Result<Vec<Movie>, DecodeError> {
    let raw: Vec<RawMovie> = decode_results(body, "movie")?;
    let movies = raw
        .into_iter()
        .filter_map(|m| {
            let title = m.original_title.clone();
            let movie = m.into_movie(None);
            if movie.is_none() {
                debug!("Skipping movie without id: {}", title);
            }
            movie
        })
        .collect();
    Ok(movies)
}

pub fn decode_movies(body: &str) -> Vec<Movie> {
    try_decode_movies(body).unwrap_or_else(|e| {
        warn!("Problem parsing the movie JSON results: {}", e);
        Vec::new()
    })
}

pub fn try_decode_movie(
    body: &str,
    fallback_id: Option<&str>,
) -> Result<Option<Movie>, DecodeError> {
    let raw: RawMovie = serde_json::from_str(body)?;
    Ok(raw.into_movie(fallback_id))
}

pub fn decode_movie(body: &str, fallback_id: Option<&str>) -> Option<Movie> {
    try_decode_movie(body, fallback_id).unwrap_or_else(|e| {
        warn!("Problem parsing the movie JSON: {}", e);
        None
    })
}

pub fn try_decode_trailers(body: &str) -> Result<Vec<Trailer>, DecodeError> {
    let raw: Vec<RawVideo> = decode_results(body, "video")?;
    Ok(raw
        .into_iter()
        .map(|v| Trailer {
            name: v.name,
            video_key: v.key,
        })
        .collect())
}

pub fn decode_trailers(body: &str) -> Vec<Trailer> {
    try_decode_trailers(body).unwrap_or_else(|e| {
        warn!("Problem parsing the video JSON results: {}", e);
        Vec::new()
    })
}

pub fn try_decode_reviews(body: &str) -> Result<Vec<Review>, DecodeError> {
    decode_results(body, "review")
}

pub fn decode_reviews(body: &str) -> Vec<Review> {
    try_decode_reviews(body).unwrap_or_else(|e| {
        warn!("Problem parsing the review JSON results: {}", e);
        Vec::new()
    })
}

// Elements that don't fit `T` are dropped; the rest keep their source order.
fn decode_results<T: DeserializeOwned>(body: &str, kind: &str) -> Result<Vec<T>, DecodeError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    let results = envelope.results.ok_or(DecodeError::MissingResults)?;
    Ok(results
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value::<T>(item) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!("Skipping {} result {}: {}", kind, idx, e);
                None
            }
        })
        .collect())
}
