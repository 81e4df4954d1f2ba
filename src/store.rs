use crate::analysis::record::MatchRecord;
use crate::config::MAX_MATCH_COUNT;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Profile {
    pub game_name: String,
    pub tag_line: String,
    pub puuid: String,
    pub registered_at: DateTime<Utc>,
}

impl Profile {
    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.game_name, self.tag_line)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CachedMatch {
    pub id: String,
    pub played_at: DateTime<Utc>,
    pub record: MatchRecord,
}

/// The on-disk document: who is registered and which of their matches we
/// already have.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct StoreDocument {
    pub profile: Option<Profile>,
    pub matches: Vec<CachedMatch>,
    /// Ids whose details were fetched but gave no usable record.
    #[serde(default)]
    pub skipped: Vec<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl StoreDocument {
    /// Registering another account drops the previous account's matches.
    pub fn set_profile(&mut self, profile: Profile) {
        let same_player = self
            .profile
            .as_ref()
            .map(|p| p.puuid == profile.puuid)
            .unwrap_or(false);
        if !same_player {
            self.matches.clear();
            self.skipped.clear();
        }
        self.profile = Some(profile);
    }

    pub fn clear(&mut self) {
        self.profile = None;
        self.matches.clear();
        self.skipped.clear();
        self.last_updated = None;
    }

    /// Merges by id; a refetched match replaces the cached copy. Only the
    /// `MAX_MATCH_COUNT` most recent matches are kept.
    pub fn add_matches(&mut self, new_matches: Vec<CachedMatch>) {
        for new_match in new_matches {
            self.skipped.retain(|id| id != &new_match.id);
            match self.matches.iter_mut().find(|m| m.id == new_match.id) {
                Some(existing) => *existing = new_match,
                None => self.matches.push(new_match),
            }
        }

        // Most recent first
        self.matches.sort_by(|a, b| b.played_at.cmp(&a.played_at));
        if self.matches.len() > MAX_MATCH_COUNT {
            tracing::debug!(dropped = self.matches.len() - MAX_MATCH_COUNT, "trimming match cache");
            self.matches.truncate(MAX_MATCH_COUNT);
        }

        self.last_updated = Some(Utc::now());
    }

    /// Remembers a match that has no record for the player, so it is not
    /// requested again.
    pub fn mark_skipped(&mut self, id: &str) {
        if self.skipped.iter().any(|s| s == id) {
            return;
        }
        self.skipped.push(id.to_string());
        if self.skipped.len() > MAX_MATCH_COUNT {
            let excess = self.skipped.len() - MAX_MATCH_COUNT;
            self.skipped.drain(..excess);
        }
    }

    /// Ids that need no fetch: cached matches and skipped ones.
    pub fn cached_ids(&self) -> HashSet<&str> {
        self.matches
            .iter()
            .map(|m| m.id.as_str())
            .chain(self.skipped.iter().map(String::as_str))
            .collect()
    }

    /// Records for `ids`, in the order given. Ids not in the cache are left out.
    pub fn records_for(&self, ids: &[String]) -> Vec<MatchRecord> {
        let by_id: HashMap<&str, &MatchRecord> = self
            .matches
            .iter()
            .map(|m| (m.id.as_str(), &m.record))
            .collect();

        ids.iter()
            .filter_map(|id| by_id.get(id.as_str()))
            .map(|record| (*record).clone())
            .collect()
    }
}

/// JSON file store rooted at the data directory.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn open(data_dir: &Path) -> Result<Self, AppError> {
        fs::create_dir_all(data_dir).map_err(|e| {
            AppError::StoreError(format!("Failed to create {}: {}", data_dir.display(), e))
        })?;

        Ok(Store {
            path: data_dir.join("profile.json"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<StoreDocument, AppError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                AppError::JsonError(format!("Failed to parse {}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no store yet, starting empty");
                Ok(StoreDocument::default())
            }
            Err(e) => Err(AppError::StoreError(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    pub fn save(&self, doc: &StoreDocument) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(doc).map_err(|e| {
            AppError::JsonError(format!("Failed to serialize store: {}", e))
        })?;

        fs::write(&self.path, json).map_err(|e| {
            AppError::StoreError(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }

    pub fn profile(&self) -> Result<Profile, AppError> {
        self.load()?.profile.ok_or(AppError::NotRegistered)
    }
}

pub fn played_at(game_creation_ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(game_creation_ms).unwrap_or_else(Utc::now)
}
