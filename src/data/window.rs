//! Sliding sample window backing the active dataset.

use std::collections::VecDeque;

use crate::data::sample::CpuSample;

/// The currently displayed sequence of samples.
///
/// Historical datasets replace the contents wholesale and are kept at their
/// full length. While live, the window is bounded: appends evict the oldest
/// sample only while the bound is exceeded, so the length stays constant
/// after the bound is first reached.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: VecDeque<CpuSample>,
    bound: usize,
}

impl SampleWindow {
    pub fn new(bound: usize) -> Self {
        Self {
            samples: VecDeque::new(),
            bound,
        }
    }

    /// Maximum number of samples retained while live.
    pub fn bound(&self) -> usize {
        self.bound
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CpuSample> {
        self.samples.iter()
    }

    pub fn back(&self) -> Option<&CpuSample> {
        self.samples.back()
    }

    /// Replace the contents wholesale with a historical dataset.
    ///
    /// No bound is enforced; historical datasets are displayed in full.
    pub fn replace<I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = CpuSample>,
    {
        self.samples = samples.into_iter().collect();
    }

    /// Replace the contents with the live seed dataset, clamped to the bound.
    ///
    /// When the seed is longer than the bound, the oldest entries are dropped
    /// so the first live append already operates on a full window.
    pub fn seed_live<I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = CpuSample>,
    {
        self.replace(samples);
        while self.samples.len() > self.bound {
            self.samples.pop_front();
        }
    }

    /// Append one live sample, evicting from the front while over the bound.
    pub fn push(&mut self, sample: CpuSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.bound {
            self.samples.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
