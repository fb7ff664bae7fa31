use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::records::MusicResult;

#[derive(Error, Debug)]
pub enum VideoLinkError {
    #[error("Failed to read video links {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse video links {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Hand-maintained map of `"<title> <diff>"` to a play video URL.
#[derive(Debug, Default)]
pub struct VideoLinks {
    links: HashMap<String, String>,
}

impl VideoLinks {
    pub fn new(links: HashMap<String, String>) -> Self {
        Self { links }
    }

    /// Load a flat JSON object of string keys to URL strings.
    pub fn load(path: &Path) -> Result<Self, VideoLinkError> {
        let contents = std::fs::read_to_string(path).map_err(|source| VideoLinkError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let links: HashMap<String, String> =
            serde_json::from_str(&contents).map_err(|source| VideoLinkError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Loaded {} video links from {}", links.len(), path.display());
        Ok(Self { links })
    }

    /// Lookup key for a result. Exact match on title and diff, no normalization.
    pub fn key_for(result: &MusicResult) -> String {
        format!("{} {}", result.title, result.diff)
    }

    /// URL for the result, or "" when none is recorded.
    pub fn get(&self, result: &MusicResult) -> &str {
        self.links
            .get(&Self::key_for(result))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
