//! Periodic runtime metrics collection.
//!
//! This module owns the sampling/emission loop: on every tick the enabled
//! metric families are read fresh from the runtime and each reading is
//! reported to a [`crate::sink::GaugeSink`] under a fixed dot-separated key.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Collector                            │
//! │   CollectorConfig (interval + family toggles)                │
//! │                            │                                 │
//! │                   ┌────────▼────────┐                        │
//! │                   │  RuntimeSampler │ (trait)                │
//! │                   └────────┬────────┘                        │
//! └────────────────────────────┼─────────────────────────────────┘
//!                              │
//!              ┌───────────────┼───────────────┐
//!              │               │               │
//!       ┌──────▼──────┐ ┌──────▼──────┐ ┌──────▼──────┐
//!       │SystemSampler│ │ MockSampler │ │  (yours)    │
//!       │ jemalloc +  │ │ (testing)   │ │             │
//!       │ /proc/self  │ │             │ │             │
//!       └─────────────┘ └─────────────┘ └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::mpsc;
//! use rstats_core::collector::{Collector, RealFs, SystemSampler};
//! use rstats_core::sink::RecordingSink;
//!
//! let sampler = SystemSampler::new(RealFs::new(), "/proc");
//! let (shutdown_tx, shutdown_rx) = mpsc::channel();
//! let collector = Collector::new(sampler, RecordingSink::new());
//! // blocks until shutdown_tx sends or is dropped, then zeroes all gauges
//! collector.run(shutdown_rx);
//! # drop(shutdown_tx);
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod jemalloc;
pub mod mock;
pub mod procfs;
pub mod sample;
pub mod sampler;
pub mod traits;

pub use collector::{Collector, CollectorConfig};
pub use mock::{MockFs, MockSampler};
pub use procfs::ParseError;
pub use sample::{CpuSample, MemorySample};
pub use sampler::{RuntimeSampler, SystemSampler, record_ffi_call};
pub use traits::{FileSystem, RealFs};
