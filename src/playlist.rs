use serde::Serialize;
use url::Url;
use utoipa::ToSchema;

use crate::error::ConvertError;
use crate::youtube::PlaylistItem;

pub const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// One entry of the player's import format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Track {
    pub mode: i64,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ConvertedPlaylist {
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// Reverse the order the API returned the items in.
    pub ascending: bool,
    pub mode: i64,
}

/// Pulls the `list` query parameter out of a playlist or watch URL.
pub fn extract_playlist_id(playlist_url: &str) -> Result<String, ConvertError> {
    let playlist_url = playlist_url.trim();
    if playlist_url.is_empty() {
        return Err(ConvertError::missing_url());
    }

    let parsed = Url::parse(playlist_url).map_err(|_| ConvertError::invalid_playlist_url())?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "list")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
        .ok_or_else(ConvertError::invalid_playlist_url)
}

pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL_PREFIX, video_id)
}

pub fn convert(mut items: Vec<PlaylistItem>, options: ConvertOptions) -> ConvertedPlaylist {
    if options.ascending {
        items.reverse();
    }

    let tracks = items
        .iter()
        .map(|item| Track {
            mode: options.mode,
            title: item.title().to_string(),
            url: watch_url(item.video_id()),
        })
        .collect();

    ConvertedPlaylist { tracks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::{PlaylistItemSnippet, ResourceId};

    fn item(title: &str, video_id: &str) -> PlaylistItem {
        PlaylistItem {
            snippet: PlaylistItemSnippet {
                title: title.to_string(),
                resource_id: ResourceId {
                    video_id: video_id.to_string(),
                },
            },
        }
    }

    #[test]
    fn extracts_list_parameter_verbatim() {
        let id = extract_playlist_id("https://www.youtube.com/playlist?list=PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf")
            .unwrap();
        assert_eq!(id, "PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf");
    }

    #[test]
    fn extracts_list_from_watch_url() {
        let id = extract_playlist_id("https://www.youtube.com/watch?v=abc123&list=PL123&index=4").unwrap();
        assert_eq!(id, "PL123");
    }

    #[test]
    fn empty_url_is_missing_parameter() {
        for input in ["", "   "] {
            match extract_playlist_id(input) {
                Err(ConvertError::InvalidInput(msg)) => {
                    assert_eq!(msg, "URLパラメータが指定されていません")
                }
                other => panic!("unexpected result {:?}", other),
            }
        }
    }

    #[test]
    fn malformed_url_is_invalid_input() {
        let err = extract_playlist_id("not a url").unwrap_err();
        assert!(matches!(err, ConvertError::InvalidInput(_)));
        assert_eq!(err.to_string(), "無効なプレイリストURLです");
    }

    #[test]
    fn url_without_list_is_invalid_input() {
        let err = extract_playlist_id("https://www.youtube.com/watch?v=abc123").unwrap_err();
        assert!(matches!(err, ConvertError::InvalidInput(_)));

        let err = extract_playlist_id("https://www.youtube.com/playlist?list=").unwrap_err();
        assert!(matches!(err, ConvertError::InvalidInput(_)));
    }

    #[test]
    fn builds_watch_url() {
        let playlist = convert(vec![item("T", "abc123")], ConvertOptions::default());
        assert_eq!(playlist.tracks[0].url, "https://www.youtube.com/watch?v=abc123");
    }

    #[test]
    fn stamps_mode_on_every_track() {
        let items = vec![item("A", "a"), item("B", "b"), item("C", "c")];
        let playlist = convert(items, ConvertOptions { ascending: false, mode: 7 });
        assert!(playlist.tracks.iter().all(|t| t.mode == 7));
    }

    #[test]
    fn ascending_reverses_fetch_order() {
        let items = vec![item("1", "a"), item("2", "b"), item("3", "c")];
        let playlist = convert(items, ConvertOptions { ascending: true, mode: 0 });
        let titles: Vec<&str> = playlist.tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["3", "2", "1"]);
    }

    #[test]
    fn descending_keeps_fetch_order() {
        let items = vec![item("1", "a"), item("2", "b")];
        let playlist = convert(items, ConvertOptions::default());
        let titles: Vec<&str> = playlist.tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["1", "2"]);
    }

    #[test]
    fn serializes_in_import_format() {
        let playlist = convert(vec![item("A", "v1")], ConvertOptions { ascending: false, mode: 1 });
        let value = serde_json::to_value(&playlist).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "tracks": [{ "mode": 1, "title": "A", "url": "https://www.youtube.com/watch?v=v1" }]
            })
        );
    }
}
