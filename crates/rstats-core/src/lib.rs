//! rstats-core — in-process runtime telemetry collection.
//!
//! Provides:
//! - `collector` — the sampling/emission loop, its configuration, and the
//!   runtime samplers behind it
//! - `sink` — the gauge sink capability plus an in-memory test double
//!
//! The library deliberately carries no transport of its own: gauges leave
//! the process through whatever [`sink::GaugeSink`] the embedding code
//! supplies. The `rstatsd` binary ships a statsd UDP sink.

pub mod collector;
pub mod sink;

// Run the test suite against jemalloc so the allocator statistics the
// samplers read describe the test process itself.
#[cfg(test)]
#[global_allocator]
static TEST_ALLOC: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;
