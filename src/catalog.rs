use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::client::{self, ChunirecClient};
use crate::de;
use crate::rating::MAX_SCORE;

pub const MUSIC_ENDPOINT: &str = "music/showall.json";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Music {0} is not in the catalog")]
    UnknownMusic(String),
    #[error("Music {id} has no {diff} chart")]
    UnknownChart { id: String, diff: String },
    #[error("{diff} chart has a max combo of 0")]
    NoNotes { diff: String },
}

/// Static song attributes.
#[derive(Debug, Clone, Deserialize)]
pub struct MusicMeta {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub genre: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub artist: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub release: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub bpm: f64,
}

impl MusicMeta {
    /// Release date, when the service sent a `YYYY-MM-DD` string.
    pub fn release_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.release.trim(), "%Y-%m-%d").ok()
    }
}

/// One difficulty of a song.
#[derive(Debug, Clone, Deserialize)]
pub struct MusicChart {
    /// Filled from the key of the `data` object.
    #[serde(skip)]
    pub diff: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub level: f64,
    #[serde(rename = "const", default, deserialize_with = "de::nullable")]
    pub constant: f64,
    #[serde(rename = "maxcombo", default, deserialize_with = "de::nullable")]
    pub max_combo: u32,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_const_unknown: bool,
}

impl MusicChart {
    /// Score worth of a single perfect note.
    pub fn note_score(&self) -> Result<f64, CatalogError> {
        if self.max_combo == 0 {
            return Err(CatalogError::NoNotes {
                diff: self.diff.clone(),
            });
        }
        Ok(f64::from(MAX_SCORE) / f64::from(self.max_combo))
    }
}

/// A song with all of its charts, keyed by difficulty label.
#[derive(Debug, Clone)]
pub struct MusicInfo {
    pub meta: MusicMeta,
    pub charts: HashMap<String, MusicChart>,
}

/// One element of the `music/showall.json` array.
#[derive(Debug, Deserialize)]
pub struct MusicEntry {
    meta: MusicMeta,
    #[serde(default)]
    data: HashMap<String, MusicChart>,
}

impl From<MusicEntry> for MusicInfo {
    fn from(entry: MusicEntry) -> Self {
        let charts = entry
            .data
            .into_iter()
            .map(|(diff, mut chart)| {
                chart.diff = diff.clone();
                (diff, chart)
            })
            .collect();
        MusicInfo {
            meta: entry.meta,
            charts,
        }
    }
}

/// Every song the service knows, keyed by song id.
#[derive(Debug, Default)]
pub struct Catalog {
    musics: HashMap<String, MusicInfo>,
}

impl Catalog {
    /// Fetch the full catalog for the client's region.
    pub fn fetch(client: &ChunirecClient) -> client::Result<Self> {
        let entries: Vec<MusicEntry> = client.get_json(MUSIC_ENDPOINT, None)?;
        let catalog = Self::from_entries(entries);
        log::info!("Catalog: {} songs", catalog.len());
        Ok(catalog)
    }

    pub fn from_entries(entries: Vec<MusicEntry>) -> Self {
        let musics = entries
            .into_iter()
            .map(MusicInfo::from)
            .map(|info| (info.meta.id.clone(), info))
            .collect();
        Self { musics }
    }

    pub fn get(&self, id: &str) -> Result<&MusicInfo, CatalogError> {
        self.musics
            .get(id)
            .ok_or_else(|| CatalogError::UnknownMusic(id.to_string()))
    }

    pub fn chart(&self, id: &str, diff: &str) -> Result<&MusicChart, CatalogError> {
        self.get(id)?
            .charts
            .get(diff)
            .ok_or_else(|| CatalogError::UnknownChart {
                id: id.to_string(),
                diff: diff.to_string(),
            })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.musics.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.musics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.musics.is_empty()
    }
}
