//! Data layer: raw samples, the sliding window, and the dataset registry.

pub mod datasets;
pub mod sample;
pub mod window;

pub use datasets::{DatasetError, DatasetKind, DatasetStore};
pub use sample::{CoreReading, CpuSample, SampleError, AGGREGATE_CORE_ID};
pub use window::SampleWindow;
