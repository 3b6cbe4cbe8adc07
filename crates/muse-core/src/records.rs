//! Typed record model for untrusted third-party catalog data.
//!
//! Upstream search APIs return loosely-shaped JSON. Before anything reaches
//! the safety filter, each raw object is mapped into a [`CandidateRecord`]
//! by an explicit per-kind extraction step; records that lack a display
//! name are invalid and never produce a candidate.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Category tag determining which fields are extracted from a raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Playlist,
    Album,
    Track,
    Artist,
    Artwork,
}

impl RecordKind {
    /// All supported kinds, in declaration order.
    pub const ALL: [RecordKind; 5] = [
        RecordKind::Playlist,
        RecordKind::Album,
        RecordKind::Track,
        RecordKind::Artist,
        RecordKind::Artwork,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Playlist => "playlist",
            RecordKind::Album => "album",
            RecordKind::Track => "track",
            RecordKind::Artist => "artist",
            RecordKind::Artwork => "artwork",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "playlist" => Ok(RecordKind::Playlist),
            "album" => Ok(RecordKind::Album),
            "track" => Ok(RecordKind::Track),
            "artist" => Ok(RecordKind::Artist),
            "artwork" => Ok(RecordKind::Artwork),
            other => Err(Error::InvalidInput(format!(
                "unsupported record kind: {other}"
            ))),
        }
    }
}

/// Typed extraction of one raw third-party record.
///
/// `name` is always present (extraction fails without it). Everything else
/// is kind-dependent and passes through the filter unmodified.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
    pub kind: RecordKind,
    pub name: String,
    /// Secondary display text (playlist descriptions). Moderated like `name`.
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Link back to the source item.
    pub url: String,
    pub creator: Option<String>,
    pub track_count: Option<u32>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub release_year: Option<String>,
    pub preview_url: Option<String>,
    pub followers: Option<u64>,
    pub genres: Option<Vec<String>>,
    pub popularity: Option<u32>,
    pub object_date: Option<String>,
    pub public_domain: Option<bool>,
}

impl CandidateRecord {
    /// Extract a candidate from a raw JSON object for the given kind.
    ///
    /// Returns `None` when the record has no usable display name; such
    /// records are dropped before filtering.
    pub fn from_value(kind: RecordKind, raw: &Value) -> Option<Self> {
        let name_field = match kind {
            RecordKind::Artwork => "title",
            _ => "name",
        };
        let name = raw.get(name_field)?.as_str()?.trim();
        if name.is_empty() {
            return None;
        }

        let mut record = CandidateRecord {
            kind,
            name: name.to_string(),
            description: None,
            image_url: None,
            url: str_field(raw, &["external_urls", "spotify"])
                .or_else(|| raw.get("objectURL").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| "#".to_string()),
            creator: None,
            track_count: None,
            artist: None,
            album: None,
            release_year: None,
            preview_url: None,
            followers: None,
            genres: None,
            popularity: None,
            object_date: None,
            public_domain: None,
        };

        match kind {
            RecordKind::Playlist => {
                record.image_url = first_image(raw);
                record.description = raw
                    .get("description")
                    .and_then(Value::as_str)
                    .filter(|s| !s.trim().is_empty())
                    .map(String::from);
                record.creator = Some(
                    str_field(raw, &["owner", "display_name"])
                        .unwrap_or_else(|| "Unknown Creator".to_string()),
                );
                record.track_count = raw
                    .pointer("/tracks/total")
                    .and_then(Value::as_u64)
                    .map(|n| n as u32);
                record.followers = raw.pointer("/followers/total").and_then(Value::as_u64);
            }
            RecordKind::Album => {
                record.image_url = first_image(raw);
                record.artist = Some(joined_artists(raw));
                record.release_year = release_year(raw.get("release_date"));
                record.popularity = raw.get("popularity").and_then(Value::as_u64).map(|n| n as u32);
            }
            RecordKind::Track => {
                record.image_url = raw.get("album").and_then(first_image);
                record.artist = Some(joined_artists(raw));
                record.album = Some(
                    str_field(raw, &["album", "name"])
                        .unwrap_or_else(|| "Unknown Album".to_string()),
                );
                record.preview_url = raw
                    .get("preview_url")
                    .and_then(Value::as_str)
                    .map(String::from);
                record.release_year = release_year(raw.pointer("/album/release_date"));
                record.popularity = raw.get("popularity").and_then(Value::as_u64).map(|n| n as u32);
            }
            RecordKind::Artist => {
                record.image_url = first_image(raw);
                record.followers = raw.pointer("/followers/total").and_then(Value::as_u64);
                record.genres = raw.get("genres").and_then(Value::as_array).map(|gs| {
                    gs.iter()
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect()
                });
                record.popularity = raw.get("popularity").and_then(Value::as_u64).map(|n| n as u32);
            }
            RecordKind::Artwork => {
                record.image_url = raw
                    .get("primaryImageSmall")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(String::from);
                record.creator = raw
                    .get("artistDisplayName")
                    .and_then(Value::as_str)
                    .filter(|s| !s.trim().is_empty())
                    .map(String::from);
                record.object_date = raw
                    .get("objectDate")
                    .and_then(Value::as_str)
                    .map(String::from);
                record.public_domain = raw.get("isPublicDomain").and_then(Value::as_bool);
            }
        }

        Some(record)
    }

    /// Finalize into an output item with the resolved display image.
    pub fn into_item(self, image: String) -> FilteredItem {
        FilteredItem {
            name: self.name,
            image,
            kind: self.kind,
            url: self.url,
            creator: self.creator,
            description: self.description,
            track_count: self.track_count,
            artist: self.artist,
            album: self.album,
            release_year: self.release_year,
            preview_url: self.preview_url,
            followers: self.followers,
            genres: self.genres,
            popularity: self.popularity,
            object_date: self.object_date,
            public_domain: self.public_domain,
        }
    }
}

/// Display-ready item that passed every moderation stage.
///
/// `image` is always a concrete displayable URL — the original when safe,
/// the placeholder otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredItem {
    pub name: String,
    pub image: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_domain: Option<bool>,
}

fn str_field(raw: &Value, path: &[&str]) -> Option<String> {
    let mut cur = raw;
    for key in path {
        cur = cur.get(key)?;
    }
    cur.as_str().map(String::from)
}

/// First entry of an `images` array, the display thumbnail.
fn first_image(raw: &Value) -> Option<String> {
    raw.pointer("/images/0/url")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn joined_artists(raw: &Value) -> String {
    let names: Vec<&str> = raw
        .get("artists")
        .and_then(Value::as_array)
        .map(|artists| {
            artists
                .iter()
                .filter_map(|a| a.get("name").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    if names.is_empty() {
        "Unknown Artist".to_string()
    } else {
        names.join(", ")
    }
}

/// Year prefix of a `YYYY-MM-DD` release date.
fn release_year(date: Option<&Value>) -> Option<String> {
    date.and_then(Value::as_str)
        .and_then(|d| d.split('-').next())
        .filter(|y| !y.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_round_trip() {
        for kind in RecordKind::ALL {
            assert_eq!(kind.as_str().parse::<RecordKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_parse_case_insensitive() {
        assert_eq!("Playlist".parse::<RecordKind>().unwrap(), RecordKind::Playlist);
        assert_eq!("ARTWORK".parse::<RecordKind>().unwrap(), RecordKind::Artwork);
    }

    #[test]
    fn test_kind_parse_unknown() {
        let err = "podcast".parse::<RecordKind>().unwrap_err();
        assert!(err.to_string().contains("unsupported record kind"));
    }

    #[test]
    fn test_kind_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&RecordKind::Playlist).unwrap(),
            "\"playlist\""
        );
    }

    #[test]
    fn test_playlist_extraction() {
        let raw = json!({
            "name": "Lofi Beats",
            "description": "beats to study to",
            "external_urls": {"spotify": "https://open.spotify.com/playlist/1"},
            "images": [{"url": "https://img.example/1.jpg"}],
            "owner": {"display_name": "DJ Example"},
            "tracks": {"total": 42},
            "followers": {"total": 1000}
        });

        let record = CandidateRecord::from_value(RecordKind::Playlist, &raw).unwrap();
        assert_eq!(record.name, "Lofi Beats");
        assert_eq!(record.description.as_deref(), Some("beats to study to"));
        assert_eq!(record.image_url.as_deref(), Some("https://img.example/1.jpg"));
        assert_eq!(record.url, "https://open.spotify.com/playlist/1");
        assert_eq!(record.creator.as_deref(), Some("DJ Example"));
        assert_eq!(record.track_count, Some(42));
        assert_eq!(record.followers, Some(1000));
    }

    #[test]
    fn test_playlist_defaults_when_absent() {
        let raw = json!({"name": "Bare"});
        let record = CandidateRecord::from_value(RecordKind::Playlist, &raw).unwrap();
        assert_eq!(record.creator.as_deref(), Some("Unknown Creator"));
        assert_eq!(record.url, "#");
        assert!(record.image_url.is_none());
        assert!(record.description.is_none());
        assert!(record.track_count.is_none());
    }

    #[test]
    fn test_missing_name_dropped() {
        let raw = json!({"description": "no name here"});
        assert!(CandidateRecord::from_value(RecordKind::Playlist, &raw).is_none());
    }

    #[test]
    fn test_blank_name_dropped() {
        let raw = json!({"name": "   "});
        assert!(CandidateRecord::from_value(RecordKind::Track, &raw).is_none());
    }

    #[test]
    fn test_non_string_name_dropped() {
        let raw = json!({"name": 7});
        assert!(CandidateRecord::from_value(RecordKind::Album, &raw).is_none());
    }

    #[test]
    fn test_track_extraction_uses_album_image() {
        let raw = json!({
            "name": "Song",
            "album": {
                "name": "Record",
                "release_date": "1999-03-01",
                "images": [{"url": "https://img.example/cover.jpg"}]
            },
            "artists": [{"name": "A"}, {"name": "B"}],
            "preview_url": "https://audio.example/clip.mp3",
            "popularity": 61
        });

        let record = CandidateRecord::from_value(RecordKind::Track, &raw).unwrap();
        assert_eq!(record.image_url.as_deref(), Some("https://img.example/cover.jpg"));
        assert_eq!(record.artist.as_deref(), Some("A, B"));
        assert_eq!(record.album.as_deref(), Some("Record"));
        assert_eq!(record.release_year.as_deref(), Some("1999"));
        assert_eq!(record.preview_url.as_deref(), Some("https://audio.example/clip.mp3"));
        assert_eq!(record.popularity, Some(61));
    }

    #[test]
    fn test_track_unknown_artist_default() {
        let raw = json!({"name": "Song", "artists": []});
        let record = CandidateRecord::from_value(RecordKind::Track, &raw).unwrap();
        assert_eq!(record.artist.as_deref(), Some("Unknown Artist"));
        assert_eq!(record.album.as_deref(), Some("Unknown Album"));
    }

    #[test]
    fn test_artist_extraction() {
        let raw = json!({
            "name": "Band",
            "images": [{"url": "https://img.example/band.jpg"}],
            "genres": ["rock", "indie"],
            "followers": {"total": 123456},
            "popularity": 80
        });

        let record = CandidateRecord::from_value(RecordKind::Artist, &raw).unwrap();
        assert_eq!(record.genres, Some(vec!["rock".to_string(), "indie".to_string()]));
        assert_eq!(record.followers, Some(123456));
    }

    #[test]
    fn test_artwork_extraction() {
        let raw = json!({
            "title": "Wheat Field",
            "artistDisplayName": "Vincent van Gogh",
            "primaryImageSmall": "https://images.example/wheat.jpg",
            "objectDate": "1889",
            "isPublicDomain": true,
            "objectURL": "https://museum.example/objects/1"
        });

        let record = CandidateRecord::from_value(RecordKind::Artwork, &raw).unwrap();
        assert_eq!(record.name, "Wheat Field");
        assert_eq!(record.creator.as_deref(), Some("Vincent van Gogh"));
        assert_eq!(record.image_url.as_deref(), Some("https://images.example/wheat.jpg"));
        assert_eq!(record.object_date.as_deref(), Some("1889"));
        assert_eq!(record.public_domain, Some(true));
        assert_eq!(record.url, "https://museum.example/objects/1");
    }

    #[test]
    fn test_artwork_requires_title_not_name() {
        let raw = json!({"name": "wrong field"});
        assert!(CandidateRecord::from_value(RecordKind::Artwork, &raw).is_none());
    }

    #[test]
    fn test_empty_image_url_treated_as_absent() {
        let raw = json!({"title": "Untitled", "primaryImageSmall": ""});
        let record = CandidateRecord::from_value(RecordKind::Artwork, &raw).unwrap();
        assert!(record.image_url.is_none());
    }

    #[test]
    fn test_into_item_carries_fields() {
        let raw = json!({
            "name": "Lofi Beats",
            "description": "beats",
            "owner": {"display_name": "DJ"},
            "tracks": {"total": 12}
        });
        let record = CandidateRecord::from_value(RecordKind::Playlist, &raw).unwrap();
        let item = record.into_item("/static/images/censored-image.png".to_string());

        assert_eq!(item.image, "/static/images/censored-image.png");
        assert_eq!(item.kind, RecordKind::Playlist);
        assert_eq!(item.track_count, Some(12));
    }

    #[test]
    fn test_item_serialization_skips_absent_fields() {
        let raw = json!({"name": "Song"});
        let item = CandidateRecord::from_value(RecordKind::Track, &raw)
            .unwrap()
            .into_item("https://img.example/x.jpg".to_string());
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["type"], "track");
        assert_eq!(json["name"], "Song");
        assert!(json.get("followers").is_none());
        assert!(json.get("description").is_none());
    }
}
