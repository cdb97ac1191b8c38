//! Named dataset registry: the live seed plus the five historical ranges.
//!
//! Datasets are supplied by the embedding application, either as already
//! decoded sample vectors or as JSON text in the upstream record shape.

use std::collections::HashMap;

use crate::data::sample::CpuSample;

/// Identifies one of the six selectable datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    /// Seed for the simulated live stream.
    Live,
    TwelveHours,
    OneDay,
    FifteenDays,
    OneMonth,
    FourMonths,
}

impl DatasetKind {
    /// All kinds in button order (live first, then shortest to longest range).
    pub const ALL: [DatasetKind; 6] = [
        DatasetKind::Live,
        DatasetKind::TwelveHours,
        DatasetKind::OneDay,
        DatasetKind::FifteenDays,
        DatasetKind::OneMonth,
        DatasetKind::FourMonths,
    ];

    /// Button caption for this dataset.
    pub fn label(&self) -> &'static str {
        match self {
            DatasetKind::Live => "Live",
            DatasetKind::TwelveHours => "12 hr",
            DatasetKind::OneDay => "1 day",
            DatasetKind::FifteenDays => "15 days",
            DatasetKind::OneMonth => "1 month",
            DatasetKind::FourMonths => "4 months",
        }
    }

    /// Whether selecting this dataset enters live mode.
    pub fn is_live(&self) -> bool {
        matches!(self, DatasetKind::Live)
    }
}

/// Errors raised by [`DatasetStore`] lookups and loading.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset {0:?} is not loaded")]
    Missing(DatasetKind),
    #[error("failed to decode dataset JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Registry mapping each [`DatasetKind`] to its samples.
#[derive(Debug, Default)]
pub struct DatasetStore {
    sets: HashMap<DatasetKind, Vec<CpuSample>>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a dataset.
    pub fn insert(&mut self, kind: DatasetKind, samples: Vec<CpuSample>) {
        self.sets.insert(kind, samples);
    }

    /// Decode a dataset from JSON text (an array of upstream records) and
    /// register it.
    pub fn insert_json(&mut self, kind: DatasetKind, json: &str) -> Result<(), DatasetError> {
        let samples: Vec<CpuSample> = serde_json::from_str(json)?;
        self.sets.insert(kind, samples);
        Ok(())
    }

    pub fn get(&self, kind: DatasetKind) -> Option<&[CpuSample]> {
        self.sets.get(&kind).map(|v| v.as_slice())
    }

    /// Like [`get`](Self::get) but missing datasets are an error.
    pub fn samples(&self, kind: DatasetKind) -> Result<&[CpuSample], DatasetError> {
        self.get(kind).ok_or(DatasetError::Missing(kind))
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
