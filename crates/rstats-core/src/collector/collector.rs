//! The collector: periodic sampling of process runtime state, emitted as
//! named gauges.
//!
//! The emitted key taxonomy (`cpu.NumGoroutine`, `mem.heap.Alloc`, ...)
//! is kept wire-compatible with the gostats collector so existing statsd
//! dashboards keep working unchanged. Keys are a stable contract; do not
//! rename them.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use tracing::debug;

use crate::collector::sample::{CpuSample, MemorySample};
use crate::collector::sampler::RuntimeSampler;
use crate::sink::GaugeSink;

/// Configuration for a [`Collector`].
///
/// Owned exclusively by the collector and fixed once `run` is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Interval between emission passes. Defaults to 1 second.
    pub interval: Duration,
    /// Emit the `cpu.*` family. Defaults to true.
    pub enable_cpu: bool,
    /// Emit the `mem.sys/com/heap/stack.*` families. Defaults to true.
    pub enable_mem: bool,
    /// Emit the `mem.gc.*` family. Takes effect only while `enable_mem`
    /// is also set; without it the toggle is a silent no-op. Defaults to
    /// true.
    pub enable_gc: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            enable_cpu: true,
            enable_mem: true,
            enable_gc: true,
        }
    }
}

/// Periodically samples the runtime and reports every enabled family to
/// a [`GaugeSink`].
///
/// One collector drives one activation: `run` consumes the instance, so
/// the created → running → stopped lifecycle cannot be re-entered. Run
/// at most one collector per process, or downstream gauges will be fed
/// by conflicting streams; the composition root is expected to enforce
/// this.
pub struct Collector<R: RuntimeSampler, G: GaugeSink> {
    config: CollectorConfig,
    sampler: R,
    sink: G,
}

impl<R: RuntimeSampler, G: GaugeSink> Collector<R, G> {
    /// Creates a collector with default configuration.
    pub fn new(sampler: R, sink: G) -> Self {
        Self {
            config: CollectorConfig::default(),
            sampler,
            sink,
        }
    }

    /// Replaces the configuration. Only callable before `run`, which the
    /// by-value receiver chain enforces.
    pub fn with_config(mut self, config: CollectorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Runs the sampling loop until `shutdown` receives a message or its
    /// sender is dropped.
    ///
    /// One pass is emitted immediately so the first data point does not
    /// wait a full interval, then one pass per interval. Between passes
    /// the loop blocks on whichever of {shutdown, interval} is ready
    /// first. On shutdown, every key a normal pass emits is re-emitted
    /// once with value 0 so downstream dashboards do not freeze at the
    /// last live reading; nothing is emitted after that.
    pub fn run(self, shutdown: Receiver<()>) {
        debug!(interval = ?self.config.interval, "collector started");
        self.emit_stats();

        loop {
            match shutdown.recv_timeout(self.config.interval) {
                Err(RecvTimeoutError::Timeout) => self.emit_stats(),
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        self.zero_stats();
        debug!("collector stopped, gauges zeroed");
    }

    /// One emission pass over the enabled families.
    ///
    /// All memory-derived keys of a pass come from a single snapshot so
    /// the numbers reported together are internally consistent; the GC
    /// family shares the memory family's snapshot and is never sampled
    /// on its own.
    fn emit_stats(&self) {
        if self.config.enable_cpu {
            self.emit_cpu_stats(&self.sampler.cpu());
        }
        if self.config.enable_mem {
            let m = self.sampler.memory();
            self.emit_mem_stats(&m);
            if self.config.enable_gc {
                self.emit_gc_stats(&m);
            }
        }
    }

    /// Re-emits every enabled key from zero-default samples, regardless
    /// of live runtime state. Gauges persist at their last value on the
    /// backend; zeroing on shutdown keeps them from reading stale.
    fn zero_stats(&self) {
        if self.config.enable_cpu {
            self.emit_cpu_stats(&CpuSample::default());
        }
        if self.config.enable_mem {
            let m = MemorySample::default();
            self.emit_mem_stats(&m);
            if self.config.enable_gc {
                self.emit_gc_stats(&m);
            }
        }
    }

    fn emit_cpu_stats(&self, s: &CpuSample) {
        self.sink.gauge("cpu.NumGoroutine", s.threads);
        self.sink.gauge("cpu.NumCgoCall", s.ffi_calls);
    }

    fn emit_mem_stats(&self, m: &MemorySample) {
        // sys
        self.sink.gauge("mem.sys.Sys", m.sys);
        self.sink.gauge("mem.sys.Lookups", m.lookups);
        self.sink.gauge("mem.sys.OtherSys", m.other_sys);

        // common rollup, duplicated under operator-friendly names
        self.sink.gauge("mem.com.Total_VM_Bytes_Reserved", m.sys);
        self.sink.gauge("mem.com.Live_Heap_Bytes_Allocated", m.alloc);
        self.sink
            .gauge("mem.com.Cumulative_Heap_Bytes_Allocated", m.total_alloc);
        self.sink.gauge("mem.com.Total_Stack_Allocation", m.stack_sys);
        self.sink.gauge("mem.com.Other_Bytes_Allocation", m.other_sys);

        // heap
        self.sink.gauge("mem.heap.Alloc", m.alloc);
        self.sink.gauge("mem.heap.TotalAlloc", m.total_alloc);
        self.sink.gauge("mem.heap.Mallocs", m.mallocs);
        self.sink.gauge("mem.heap.Frees", m.frees);
        self.sink.gauge("mem.heap.HeapAlloc", m.heap_alloc);
        self.sink.gauge("mem.heap.HeapSys", m.heap_sys);
        self.sink.gauge("mem.heap.HeapIdle", m.heap_idle);
        self.sink.gauge("mem.heap.HeapInuse", m.heap_inuse);
        self.sink.gauge("mem.heap.HeapReleased", m.heap_released);
        self.sink.gauge("mem.heap.HeapObjects", m.heap_objects);

        // stack and span metadata
        self.sink.gauge("mem.stack.StackSys", m.stack_sys);
        self.sink.gauge("mem.stack.StackInuse", m.stack_inuse);
        self.sink.gauge("mem.stack.MSpanInuse", m.mspan_inuse);
        self.sink.gauge("mem.stack.MSpanSys", m.mspan_sys);
        self.sink.gauge("mem.stack.MCacheInuse", m.mcache_inuse);
        self.sink.gauge("mem.stack.MCacheSys", m.mcache_sys);
    }

    fn emit_gc_stats(&self, m: &MemorySample) {
        self.sink.gauge("mem.gc.GCSys", m.gc_sys);
        self.sink.gauge("mem.gc.NextGC", m.next_gc);
        self.sink.gauge("mem.gc.LastGC", m.last_gc);
        self.sink.gauge("mem.gc.PauseTotalNs", m.pause_total_ns);
        self.sink.gauge("mem.gc.Pause", m.last_pause_ns());
        self.sink.gauge("mem.gc.NumGC", u64::from(m.num_gc));
    }
}
