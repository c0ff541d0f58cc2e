//! Observation records as persisted test rows, and their grouping.
//!
//! A record file is either a JSON array of records or JSON lines (one
//! record per line, blank lines ignored). Records are filtered and grouped
//! the way the test-record query does it: rows without a positive failure
//! time are dropped, a missing last inspection time reads as 0, a missing
//! quantity as 1, and each group is ordered by time.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::logging::{event_names, Stage};
use crate::model::{CensoringKind, GroupKey, Observation, ObservationGroup};

/// Errors reading or interpreting observation records.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid record at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid record {index}: {message}")]
    InvalidRecord { index: usize, message: String },

    #[error("group not found: {0}")]
    GroupNotFound(String),
}

/// Group identifier as stored: text or an integer key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// Censoring as stored: the integer code or a kind name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CensoringField {
    Code(i64),
    Name(String),
}

impl CensoringField {
    fn resolve(&self) -> Result<CensoringKind, String> {
        match self {
            CensoringField::Code(code) => CensoringKind::from_code(*code)
                .ok_or_else(|| format!("unknown censoring code {code}")),
            CensoringField::Name(name) => name.parse(),
        }
    }
}

/// One persisted test row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    #[serde(alias = "module_id")]
    pub group_id: RecordId,
    #[serde(default, alias = "module_code")]
    pub group_code: Option<String>,
    #[serde(default, alias = "module_name")]
    pub group_name: Option<String>,
    #[serde(default)]
    pub failure_time: Option<f64>,
    #[serde(default)]
    pub last_inspection_time: Option<f64>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default, alias = "censoring_type")]
    pub censoring: Option<CensoringField>,
    /// Legacy flag: censored rows without a censoring kind are right-censored.
    #[serde(default)]
    pub is_censored: Option<bool>,
}

impl ObservationRecord {
    /// Censoring kind, falling back to `is_censored` when absent.
    pub fn kind(&self) -> Result<CensoringKind, String> {
        match &self.censoring {
            Some(field) => field.resolve(),
            None if self.is_censored == Some(true) => Ok(CensoringKind::RightCensored),
            None => Ok(CensoringKind::Complete),
        }
    }

    /// Whether the row survives the query filter.
    pub fn is_usable(&self) -> bool {
        matches!(self.failure_time, Some(t) if t.is_finite() && t > 0.0)
    }

    /// Convert a usable row into an observation.
    pub fn to_observation(&self) -> Result<Observation, String> {
        let time = self
            .failure_time
            .filter(|t| t.is_finite() && *t > 0.0)
            .ok_or_else(|| "failure_time must be positive".to_string())?;
        let quantity = self.quantity.unwrap_or(1);
        if quantity == 0 {
            return Err("quantity must be at least 1".to_string());
        }
        let last_inspection_time = self.last_inspection_time.unwrap_or(0.0);
        if !last_inspection_time.is_finite() {
            return Err("last_inspection_time must be finite".to_string());
        }
        Ok(Observation {
            time,
            last_inspection_time,
            kind: self.kind()?,
            quantity,
        })
    }

    fn group_key(&self) -> GroupKey {
        GroupKey {
            id: self.group_id.to_string(),
            code: self.group_code.clone(),
            name: self.group_name.clone(),
        }
    }
}

/// Groups built from a record set.
#[derive(Debug, Clone, Default)]
pub struct GroupedInput {
    /// Groups in order of first appearance.
    pub groups: Vec<ObservationGroup>,
    /// Records dropped for a missing or non-positive failure time.
    pub dropped: usize,
}

impl GroupedInput {
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|g| g.observations.len()).sum()
    }

    /// Keep only the group whose id or code equals `selector`.
    pub fn select(self, selector: &str) -> Result<Self, InputError> {
        let groups: Vec<_> = self
            .groups
            .into_iter()
            .filter(|g| g.key.id == selector || g.key.code.as_deref() == Some(selector))
            .collect();
        if groups.is_empty() {
            return Err(InputError::GroupNotFound(selector.to_string()));
        }
        Ok(Self {
            groups,
            dropped: self.dropped,
        })
    }
}

/// Filter, convert and group records.
pub fn group_records(records: &[ObservationRecord]) -> Result<GroupedInput, InputError> {
    let mut grouped = GroupedInput::default();
    let mut index_of: HashMap<String, usize> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        if !record.is_usable() {
            grouped.dropped += 1;
            continue;
        }
        let observation = record
            .to_observation()
            .map_err(|message| InputError::InvalidRecord { index, message })?;

        let key = record.group_key();
        let slot = *index_of.entry(key.id.clone()).or_insert_with(|| {
            grouped.groups.push(ObservationGroup {
                key,
                observations: Vec::new(),
            });
            grouped.groups.len() - 1
        });
        grouped.groups[slot].observations.push(observation);
    }

    for group in &mut grouped.groups {
        group
            .observations
            .sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    if grouped.dropped > 0 {
        debug!(
            event = event_names::INPUT_RECORDS_DROPPED,
            stage = %Stage::Load,
            dropped = grouped.dropped,
            "records without a positive failure time dropped"
        );
    }
    Ok(grouped)
}

/// Parse a JSON array or JSON lines document.
pub fn parse_records(text: &str) -> Result<Vec<ObservationRecord>, InputError> {
    if text.trim_start().starts_with('[') {
        return serde_json::from_str(text).map_err(|e| InputError::Parse {
            line: e.line(),
            message: e.to_string(),
        });
    }

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| InputError::Parse {
                line: i + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Read, parse and group a record file.
pub fn load_records(path: &Path) -> Result<GroupedInput, InputError> {
    let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(&text)?;
    let grouped = group_records(&records)?;
    info!(
        event = event_names::INPUT_LOADED,
        stage = %Stage::Load,
        path = %path.display(),
        records = records.len(),
        groups = grouped.groups.len(),
        dropped = grouped.dropped,
        "observation records loaded"
    );
    Ok(grouped)
}
