use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::client::{self, ChunirecClient};
use crate::de;
use crate::rating::{score_to_rank_rate, Rank};

pub const RECORDS_ENDPOINT: &str = "records/showall.json";
pub const RATING_DATA_ENDPOINT: &str = "records/rating_data.json";

/// How many records make up the best frame.
pub const BEST_COUNT: usize = 30;

/// One played chart as reported by the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MusicResult {
    pub id: String,
    pub diff: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub level: f64,
    pub title: String,
    #[serde(rename = "const", default, deserialize_with = "de::nullable")]
    pub constant: f64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub score: u32,
    #[serde(default, deserialize_with = "de::nullable")]
    pub rating: f64,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_const_unknown: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_clear: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_fullcombo: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_alljustice: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_fullchain: bool,
    #[serde(default, deserialize_with = "de::nullable")]
    pub genre: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_played: bool,
}

impl MusicResult {
    pub fn key(&self) -> ResultKey {
        ResultKey {
            id: self.id.clone(),
            diff: self.diff.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    pub fn rank(&self) -> Rank {
        score_to_rank_rate(self.score).0
    }

    /// Last update time, when `updated_at` is an RFC 3339 timestamp.
    pub fn played_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(self.updated_at.trim()).ok()
    }

    /// Short lamp label: AJ > FC > CLEAR, empty when none apply.
    pub fn lamp(&self) -> &'static str {
        if self.is_alljustice {
            "AJ"
        } else if self.is_fullcombo {
            "FC"
        } else if self.is_clear {
            "CLEAR"
        } else {
            ""
        }
    }
}

/// Identifies one result independent of its scores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultKey {
    pub id: String,
    pub diff: String,
    pub updated_at: String,
}

/// Membership set for the best frame.
#[derive(Debug, Default)]
pub struct BestSet {
    keys: HashSet<ResultKey>,
}

impl BestSet {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a MusicResult>) -> Self {
        Self {
            keys: results.into_iter().map(MusicResult::key).collect(),
        }
    }

    pub fn contains(&self, result: &MusicResult) -> bool {
        self.keys.contains(&result.key())
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    records: Vec<MusicResult>,
}

/// Every record of a player, in server order.
#[derive(Debug, Default)]
pub struct RecordSet {
    pub records: Vec<MusicResult>,
}

impl RecordSet {
    /// Fetch all records. `user_name` = None fetches the token owner's.
    pub fn fetch(client: &ChunirecClient, user_name: Option<&str>) -> client::Result<Self> {
        let response: RecordsResponse = client.get_json(RECORDS_ENDPOINT, user_name)?;
        log::info!("Records: {}", response.records.len());
        Ok(Self::new(response.records))
    }

    pub fn new(records: Vec<MusicResult>) -> Self {
        Self { records }
    }

    /// The [`BEST_COUNT`] highest-rated records, highest first.
    pub fn bests(&self) -> Vec<&MusicResult> {
        let mut sorted: Vec<&MusicResult> = self.records.iter().collect();
        sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        sorted.truncate(BEST_COUNT);
        sorted
    }

    pub fn best_keys(&self) -> BestSet {
        BestSet::from_results(self.bests())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct Bucket {
    entries: Vec<MusicResult>,
}

#[derive(Debug, Deserialize)]
struct RatingDataResponse {
    best: Bucket,
    recent: Bucket,
    best_candidate: Bucket,
    best_candidate_sss: Bucket,
    best_outside: Bucket,
}

/// Server-side breakdown of a player's rating.
#[derive(Debug, Default)]
pub struct RatingRecordSet {
    pub best: Vec<MusicResult>,
    pub recent: Vec<MusicResult>,
    pub best_candidate: Vec<MusicResult>,
    pub best_candidate_sss: Vec<MusicResult>,
    pub best_outside: Vec<MusicResult>,
}

impl RatingRecordSet {
    pub fn fetch(client: &ChunirecClient, user_name: Option<&str>) -> client::Result<Self> {
        let response: RatingDataResponse = client.get_json(RATING_DATA_ENDPOINT, user_name)?;
        Ok(Self::from_response(response))
    }

    fn from_response(r: RatingDataResponse) -> Self {
        Self {
            best: r.best.entries,
            recent: r.recent.entries,
            best_candidate: r.best_candidate.entries,
            best_candidate_sss: r.best_candidate_sss.entries,
            best_outside: r.best_outside.entries,
        }
    }

    /// Buckets with display names, in a fixed order.
    pub fn buckets(&self) -> [(&'static str, &[MusicResult]); 5] {
        [
            ("best", self.best.as_slice()),
            ("recent", self.recent.as_slice()),
            ("best candidate", self.best_candidate.as_slice()),
            ("best candidate (SSS)", self.best_candidate_sss.as_slice()),
            ("best outside", self.best_outside.as_slice()),
        ]
    }
}

/// Mean rating of the given results, 0 for none.
pub fn average_rating(results: &[MusicResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|r| r.rating).sum::<f64>() / results.len() as f64
}
