//! Series builder: turn an ordered sequence of raw samples into named chart
//! series.
//!
//! The output contains one stacked-column series per distinct non-aggregate
//! core id (in first-seen order) and exactly one line series for the database
//! server CPU, appended last. The transform is pure: no hidden state, and the
//! same input always yields the same output.

use std::collections::HashMap;

use crate::data::sample::{CpuSample, SampleError, AGGREGATE_CORE_ID};

/// Name of the auxiliary line series.
pub const AUX_SERIES_NAME: &str = "Sql Server CPU";
/// Stack group shared by all per-core column series.
pub const CORE_STACK_GROUP: &str = "cores";
/// Stack group of the auxiliary line series.
pub const AUX_STACK_GROUP: &str = "cpu";

/// How a series is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// A column series stacked with the other members of its stack group.
    StackedColumn,
    /// A plain line.
    Line,
}

/// A named, ordered sequence of `(epoch_millis, value)` points destined for
/// chart rendering. Names are unique within one builder output.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    pub name: String,
    pub points: Vec<(i64, f64)>,
    pub kind: SeriesKind,
    pub stack_group: String,
    pub secondary_axis: bool,
}

impl NamedSeries {
    /// A new empty per-core column series for the given core id.
    pub fn stacked_column(core: &str) -> Self {
        Self {
            name: format!("Core {core}"),
            points: Vec::new(),
            kind: SeriesKind::StackedColumn,
            stack_group: CORE_STACK_GROUP.to_string(),
            secondary_axis: false,
        }
    }

    /// The auxiliary database-server CPU line series, empty.
    pub fn aux_line() -> Self {
        Self {
            name: AUX_SERIES_NAME.to_string(),
            points: Vec::new(),
            kind: SeriesKind::Line,
            stack_group: AUX_STACK_GROUP.to_string(),
            secondary_axis: true,
        }
    }
}

/// Build the series set, aborting on the first undecodable sample.
pub fn build_series<'a, I>(samples: I) -> Result<Vec<NamedSeries>, SampleError>
where
    I: IntoIterator<Item = &'a CpuSample>,
{
    let mut builder = Builder::new();
    for sample in samples {
        builder.accumulate(sample)?;
    }
    Ok(builder.finish())
}

/// Build the series set, skipping undecodable samples.
///
/// Skipped samples contribute nothing (not even the auxiliary point); their
/// errors are returned alongside the series so the caller can surface them.
pub fn build_series_lossy<'a, I>(samples: I) -> (Vec<NamedSeries>, Vec<SampleError>)
where
    I: IntoIterator<Item = &'a CpuSample>,
{
    let mut builder = Builder::new();
    let mut errors = Vec::new();
    for sample in samples {
        if let Err(e) = builder.accumulate(sample) {
            errors.push(e);
        }
    }
    (builder.finish(), errors)
}

struct Builder {
    cores: Vec<NamedSeries>,
    core_index: HashMap<String, usize>,
    aux: NamedSeries,
}

impl Builder {
    fn new() -> Self {
        Self {
            cores: Vec::new(),
            core_index: HashMap::new(),
            aux: NamedSeries::aux_line(),
        }
    }

    fn accumulate(&mut self, sample: &CpuSample) -> Result<(), SampleError> {
        // Decode everything before mutating so a bad sample contributes
        // nothing at all.
        let t = sample.timestamp_millis()?;
        let readings = sample.core_readings()?;

        for reading in readings {
            if reading.core == AGGREGATE_CORE_ID {
                continue;
            }
            let cores = &mut self.cores;
            let idx = *self
                .core_index
                .entry(reading.core.clone())
                .or_insert_with(|| {
                    cores.push(NamedSeries::stacked_column(&reading.core));
                    cores.len() - 1
                });
            self.cores[idx].points.push((t, reading.value));
        }
        self.aux.points.push((t, sample.sql_server_cpu));
        Ok(())
    }

    fn finish(self) -> Vec<NamedSeries> {
        let mut out = self.cores;
        out.push(self.aux);
        out
    }
}
