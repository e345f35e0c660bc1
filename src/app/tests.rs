use super::*;
use crate::catalog::{Catalog, Track};

fn catalog() -> Catalog {
    let local = vec![
        Track::local("karera", "Karera", Some("Infraction".into()), "tracks/Karera.mp3", None),
        Track::local("multo", "Multo", Some("Slushii".into()), "tracks/Multo.mp3", None),
    ];
    let mut catalog = Catalog::new(local);
    catalog.set_remote(vec![Track::remote(
        "api-7",
        "Pop Song",
        Some("Somebody".into()),
        "https://cdn.example.com/p.m4a",
        None,
    )]);
    catalog
}

fn app() -> App {
    App::new(catalog(), false, false)
}

#[test]
fn library_view_shows_the_merged_catalog() {
    let mut app = app();
    app.set_view(View::Library);
    let ids: Vec<&str> = app.visible_tracks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["karera", "multo", "api-7"]);
}

#[test]
fn profile_view_shows_local_tracks_only() {
    let mut app = app();
    app.set_view(View::Profile);
    let ids: Vec<&str> = app.visible_tracks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["karera", "multo"]);
}

#[test]
fn filter_is_a_case_insensitive_substring_match() {
    let mut app = app();
    app.set_view(View::Library);
    app.enter_filter_mode();
    for c in "KAR".chars() {
        app.push_filter_char(c);
    }
    let ids: Vec<&str> = app.visible_tracks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["karera"]);

    // Matches authors through the display line as well.
    app.clear_filter();
    for c in "slush".chars() {
        app.push_filter_char(c);
    }
    let ids: Vec<&str> = app.visible_tracks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["multo"]);
}

#[test]
fn narrowing_the_filter_clamps_the_selection() {
    let mut app = app();
    app.set_view(View::Library);
    app.selected = 2;
    app.push_filter_char('u');
    assert!(app.selected < app.visible_tracks().len());
    assert_eq!(app.selected_track().unwrap().id, "multo");
}

#[test]
fn selection_wraps_in_both_directions() {
    let mut app = app();
    app.set_view(View::Library);

    app.select_prev();
    assert_eq!(app.selected_track().unwrap().id, "api-7");
    app.select_next();
    assert_eq!(app.selected_track().unwrap().id, "karera");
}

#[test]
fn selection_on_an_empty_catalog_stays_put() {
    let mut app = App::new(Catalog::new(Vec::new()), false, false);
    app.set_view(View::Library);
    app.select_next();
    assert_eq!(app.selected, 0);
    assert!(app.selected_track().is_none());
}

#[test]
fn advance_follows_catalog_order_without_shuffle() {
    let app = app();
    assert_eq!(app.advance_from("multo").unwrap().id, "api-7");
    // Cyclic wrap at the end of the merged list.
    assert_eq!(app.advance_from("api-7").unwrap().id, "karera");
}

#[test]
fn advance_with_shuffle_stays_inside_the_catalog() {
    let mut app = app();
    app.toggle_shuffle();
    let pick = app.advance_from("karera").unwrap();
    assert!(["karera", "multo", "api-7"].contains(&pick.id.as_str()));
}

#[test]
fn previous_ignores_shuffle() {
    let mut app = app();
    app.toggle_shuffle();
    assert_eq!(app.previous_from("multo").unwrap().id, "karera");
    assert_eq!(app.previous_from("karera").unwrap().id, "api-7");
}

#[test]
fn clear_filter_restores_the_full_view() {
    let mut app = app();
    app.set_view(View::Library);
    app.enter_filter_mode();
    app.push_filter_char('z');
    assert!(app.visible_tracks().is_empty());

    app.clear_filter();
    assert!(!app.filter_mode);
    assert_eq!(app.visible_tracks().len(), 3);
}
