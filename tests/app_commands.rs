mod common;

use common::{bulk_body, config, extras_url, movie_body, url, FakeCatalog};
use marquee::app::{App, Command};
use marquee::favorites::{FavoritesStore, MemoryPreferences, SortPreference};
use marquee::models::SortMode;
use std::sync::Arc;

fn app(catalog: FakeCatalog, prefs: &Arc<MemoryPreferences>) -> App<MemoryPreferences> {
    App::new(Arc::new(catalog), prefs.clone(), config())
}

#[tokio::test]
async fn list_uses_and_remembers_sort_mode() {
    let prefs = Arc::new(MemoryPreferences::default());
    let catalog = FakeCatalog::new()
        .body(url("popular"), bulk_body(&[(1, "Popular One")]))
        .body(url("top_rated"), bulk_body(&[(2, "Top One")]));
    let app = app(catalog, &prefs);

    let out = app.run(Command::List(None)).await.unwrap();
    assert!(out.contains("Popular One (2010)  7.5/10"));

    let out = app
        .run(Command::List(Some(SortMode::TopRated)))
        .await
        .unwrap();
    assert!(out.contains("Top One"));
    assert_eq!(prefs.sort_mode(), SortMode::TopRated);
}

#[tokio::test]
async fn favorites_flow_through_toggle_and_list() {
    let prefs = Arc::new(MemoryPreferences::default());
    let catalog = FakeCatalog::new().body(url("550"), movie_body(550, "Fight Club"));
    let app = app(catalog, &prefs);

    assert_eq!(
        app.run(Command::List(Some(SortMode::Favorites)))
            .await
            .unwrap(),
        "No movies found."
    );
    assert_eq!(
        app.run(Command::Favorite("550".into())).await.unwrap(),
        "550 has been added to your favorites"
    );
    assert!(prefs.is_favorite("550"));
    assert_eq!(app.run(Command::Favorites).await.unwrap(), "550");

    let out = app.run(Command::List(None)).await.unwrap();
    assert!(out.contains("Fight Club"));

    assert_eq!(
        app.run(Command::Favorite("550".into())).await.unwrap(),
        "550 has been removed from your favorites"
    );
    assert_eq!(app.run(Command::Favorites).await.unwrap(), "No favorites yet.");
}

#[tokio::test]
async fn show_combines_detail_and_extras() {
    let prefs = Arc::new(MemoryPreferences::with_favorites(["550"]));
    let catalog = FakeCatalog::new()
        .body(url("550"), movie_body(550, "Fight Club"))
        .body(
            extras_url("550", "videos"),
            r#"{"results":[{"name":"Trailer","key":"abc"}]}"#,
        )
        .body(
            extras_url("550", "reviews"),
            r#"{"results":[{"author":"A","content":"C"}]}"#,
        );
    let out = app(catalog, &prefs)
        .run(Command::Show("550".into()))
        .await
        .unwrap();
    assert!(out.starts_with("Fight Club\n2010 · 7.5/10 · ★ favorite"));
    assert!(out.contains("https://www.youtube.com/watch?v=abc"));
    assert!(out.contains("A:\n    C"));
}

#[tokio::test]
async fn show_reports_unknown_movie() {
    let prefs = Arc::new(MemoryPreferences::default());
    let out = app(FakeCatalog::new(), &prefs)
        .run(Command::Show("999".into()))
        .await
        .unwrap();
    assert_eq!(out, "Movie 999 could not be loaded.");
}

#[tokio::test]
async fn sort_command_reads_and_writes_preference() {
    let prefs = Arc::new(MemoryPreferences::default());
    let app = app(FakeCatalog::new(), &prefs);
    assert_eq!(app.run(Command::Sort(None)).await.unwrap(), "popular");
    app.run(Command::Sort(Some(SortMode::Favorites)))
        .await
        .unwrap();
    assert_eq!(app.run(Command::Sort(None)).await.unwrap(), "favorites");
}
