use crate::config::CatalogConfig;
use crate::models::SortMode;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRequest {
    pub movie_id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPlan {
    Bulk { url: String },
    PerId(Vec<MovieRequest>),
}

impl RequestPlan {
    pub fn len(&self) -> usize {
        match self {
            RequestPlan::Bulk { .. } => 1,
            RequestPlan::PerId(requests) => requests.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn plan(
    sort_mode: SortMode,
    config: &CatalogConfig,
    favorite_ids: &BTreeSet<String>,
) -> RequestPlan {
    let base = &config.catalog_base;
    let key = &config.api_key;
    match sort_mode {
        SortMode::Popular => RequestPlan::Bulk {
            url: format!("{base}/popular?api_key={key}"),
        },
        SortMode::TopRated => RequestPlan::Bulk {
            url: format!("{base}/top_rated?api_key={key}"),
        },
        SortMode::Favorites => RequestPlan::PerId(
            favorite_ids
                .iter()
                .map(|id| MovieRequest {
                    movie_id: id.clone(),
                    url: movie_url(config, id),
                })
                .collect(),
        ),
    }
}

pub fn movie_url(config: &CatalogConfig, movie_id: &str) -> String {
    format!(
        "{}/{}?api_key={}",
        config.catalog_base,
        urlencoding::encode(movie_id),
        config.api_key
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtrasUrls {
    pub videos: String,
    pub reviews: String,
}

pub fn extras_urls(config: &CatalogConfig, movie_id: &str) -> ExtrasUrls {
    let base = &config.catalog_base;
    let key = &config.api_key;
    let id = urlencoding::encode(movie_id);
    ExtrasUrls {
        videos: format!("{base}/{id}/videos?api_key={key}&language=en-US"),
        reviews: format!("{base}/{id}/reviews?api_key={key}&language=en-US"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CatalogConfig {
        CatalogConfig::new("KEY").with_catalog_base("https://api.example/3/movie")
    }

    fn ids(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bulk_modes_ignore_favorites() {
        let favs = ids(&["1"]);
        assert_eq!(
            plan(SortMode::Popular, &config(), &favs),
            RequestPlan::Bulk {
                url: "https://api.example/3/movie/popular?api_key=KEY".to_string()
            }
        );
        assert_eq!(
            plan(SortMode::TopRated, &config(), &favs),
            RequestPlan::Bulk {
                url: "https://api.example/3/movie/top_rated?api_key=KEY".to_string()
            }
        );
    }

    #[test]
    fn empty_favorites_plan_no_requests() {
        let plan = plan(SortMode::Favorites, &config(), &BTreeSet::new());
        assert!(plan.is_empty());
        assert_eq!(plan, RequestPlan::PerId(vec![]));
    }

    #[test]
    fn favorites_plan_one_request_per_id_in_order() {
        let plan = plan(SortMode::Favorites, &config(), &ids(&["3", "1", "2"]));
        let RequestPlan::PerId(requests) = plan else {
            panic!("expected per-id plan");
        };
        let urls: Vec<_> = requests.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://api.example/3/movie/1?api_key=KEY",
                "https://api.example/3/movie/2?api_key=KEY",
                "https://api.example/3/movie/3?api_key=KEY",
            ]
        );
        assert_eq!(requests[0].movie_id, "1");
    }

    #[test]
    fn extras_urls_carry_language() {
        let urls = extras_urls(&config(), "550");
        assert_eq!(
            urls.videos,
            "https://api.example/3/movie/550/videos?api_key=KEY&language=en-US"
        );
        assert_eq!(
            urls.reviews,
            "https://api.example/3/movie/550/reviews?api_key=KEY&language=en-US"
        );
    }

    #[test]
    fn ids_are_encoded_as_path_segments() {
        assert_eq!(
            movie_url(&config(), "a/b"),
            "https://api.example/3/movie/a%2Fb?api_key=KEY"
        );
    }
}
