use lineupcli::{
    lineup::*,
    types::{SavedTrack, Track, TrackArtist},
};
use serde_json::json;

// Helper function to create a saved track with the given artists
fn create_saved_track(id: &str, name: &str, artists: &[&str]) -> SavedTrack {
    SavedTrack {
        added_at: "2025-02-01T10:00:00Z".to_string(),
        track: Track {
            id: Some(id.to_string()),
            name: name.to_string(),
            uri: format!("spotify:track:{}", id),
            artists: artists
                .iter()
                .map(|artist| TrackArtist {
                    id: None,
                    name: artist.to_string(),
                })
                .collect(),
        },
    }
}

fn lineup(artists: &[&str]) -> Vec<String> {
    artists.iter().map(|a| a.to_string()).collect()
}

#[test]
fn test_parse_lineup_sorts_titles() {
    let document = json!({
        "1021": { "title": "Bicep", "day": "Friday" },
        "1022": { "title": "Aurora" },
        "1023": { "title": "  Caribou  ", "stage": "Main" }
    });

    assert_eq!(parse_lineup(&document), lineup(&["Aurora", "Bicep", "Caribou"]));
}

#[test]
fn test_parse_lineup_skips_entries_without_title() {
    let document = json!({
        "1": { "title": "Aurora" },
        "2": { "name": "No Title" },
        "3": { "title": 42 },
        "4": "Bicep"
    });

    assert_eq!(parse_lineup(&document), lineup(&["Aurora"]));
}

#[test]
fn test_parse_lineup_rejects_non_objects() {
    assert!(parse_lineup(&json!([{ "title": "Aurora" }])).is_empty());
    assert!(parse_lineup(&json!("Aurora")).is_empty());
    assert!(parse_lineup(&json!(null)).is_empty());
    assert!(parse_lineup(&json!({})).is_empty());
}

#[test]
fn test_match_tracks_by_artists() {
    let saved = vec![
        create_saved_track("a1", "Glue", &["Bicep"]),
        create_saved_track("b2", "Unrelated", &["Someone Else"]),
        create_saved_track("c3", "Runaway", &["AURORA"]),
        create_saved_track("d4", "Collab", &["Nobody", "Caribou"]),
    ];

    let matched = match_tracks_by_artists(&saved, &lineup(&["aurora", "Bicep", "Caribou"]));
    let uris: Vec<&str> = matched.iter().map(|t| t.uri.as_str()).collect();

    // library order, case-insensitive, any artist on the track counts
    assert_eq!(
        uris,
        vec!["spotify:track:a1", "spotify:track:c3", "spotify:track:d4"]
    );
}

#[test]
fn test_match_tracks_by_artists_empty_inputs() {
    let saved = vec![create_saved_track("a1", "Glue", &["Bicep"])];

    assert!(match_tracks_by_artists(&saved, &[]).is_empty());
    assert!(match_tracks_by_artists(&[], &lineup(&["Bicep"])).is_empty());
}

#[test]
fn test_track_artist_names() {
    let saved = create_saved_track("d4", "Collab", &["Nobody", "Caribou"]);
    assert_eq!(saved.track.artist_names(), "Nobody, Caribou");
}
