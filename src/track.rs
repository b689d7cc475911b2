//! Track data model.
//!
//! Tracks arrive from the Musila API already shaped like this; the player
//! never fetches or mutates them. `id` is the canonical identity: queue
//! lookups match on it and the first match wins.

use serde::{Deserialize, Serialize};

/// Shown in place of the artist line when a track has no author credits.
pub const UNKNOWN_ARTIST: &str = "Unknown artist";

/// Role of a credited author on a track.
///
/// Only `Author` credits appear in the player's artist line; the rest are
/// kept for other surfaces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorRole {
    Author,
    Composer,
    Producer,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub surname: String,
    pub role: AuthorRole,
}

impl Author {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// One playable item.
///
/// `authors` sits last so the serialized form keeps plain values ahead of
/// nested tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    /// Media reference resolvable by the audio output.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    /// Known length in seconds. A hint only; the duration reported by the
    /// output wins once the media is loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    #[serde(default)]
    pub authors: Vec<Author>,
}

impl Track {
    /// The artist line shown under the title: every `Author`-role credit
    /// joined with commas, or [`UNKNOWN_ARTIST`] when there are none.
    pub fn author_line(&self) -> String {
        let names: Vec<String> = self
            .authors
            .iter()
            .filter(|a| a.role == AuthorRole::Author)
            .map(Author::full_name)
            .collect();

        if names.is_empty() {
            UNKNOWN_ARTIST.to_string()
        } else {
            names.join(", ")
        }
    }
}
