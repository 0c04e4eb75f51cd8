//! Operation counters for [`EvictionEngine`](crate::EvictionEngine).
//!
//! Compiled only with the `metrics` feature. Recording is split from reading:
//! the engine writes through [`CoreMetricsRecorder`](traits::CoreMetricsRecorder),
//! callers read via [`MetricsSnapshotProvider`](traits::MetricsSnapshotProvider)
//! and publish with a [`MetricsExporter`](traits::MetricsExporter).

pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use exporter::PrometheusTextExporter;
pub use metrics_impl::EngineMetrics;
pub use snapshot::EngineMetricsSnapshot;
pub use traits::{CoreMetricsRecorder, MetricsExporter, MetricsSnapshotProvider};
