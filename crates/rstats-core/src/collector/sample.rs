//! Point-in-time samples of process runtime state.
//!
//! Samples are read fresh on every emission pass and never retained
//! between ticks. Zero-default samples double as the payload of the
//! shutdown zeroing pass, so `Default` must produce all-zero values.

/// Number of slots in the GC pause ring buffer.
pub const PAUSE_RING_LEN: usize = 256;

/// Scheduler-level counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuSample {
    /// Live thread count of this process.
    pub threads: u64,
    /// Cumulative foreign-function calls reported by the application.
    pub ffi_calls: u64,
}

/// One allocator/heap/stack snapshot.
///
/// Field names follow the gostats gauge taxonomy this collector stays
/// wire-compatible with; a field without a meaningful source on the
/// current runtime reads zero. All memory-derived gauges of a pass are
/// computed from a single snapshot so the numbers reported together are
/// internally consistent.
#[derive(Debug, Clone, Copy)]
pub struct MemorySample {
    /// Total bytes obtained from the operating system.
    pub sys: u64,
    /// Runtime-internal pointer lookups.
    pub lookups: u64,
    /// Bytes of allocator metadata and other off-heap bookkeeping.
    pub other_sys: u64,

    /// Bytes of live allocated objects.
    pub alloc: u64,
    /// Cumulative bytes allocated over the process lifetime.
    pub total_alloc: u64,
    /// Cumulative allocation count.
    pub mallocs: u64,
    /// Cumulative free count.
    pub frees: u64,

    /// Bytes of live heap objects (same reading as `alloc`).
    pub heap_alloc: u64,
    /// Bytes of heap address space mapped from the operating system.
    pub heap_sys: u64,
    /// Bytes in idle (unused but mapped) heap spans.
    pub heap_idle: u64,
    /// Bytes in actively used heap spans.
    pub heap_inuse: u64,
    /// Bytes returned to the operating system.
    pub heap_released: u64,
    /// Live heap object count.
    pub heap_objects: u64,

    /// Bytes of stack memory obtained from the operating system.
    pub stack_sys: u64,
    /// Bytes of stack memory in use.
    pub stack_inuse: u64,
    /// Bytes of span metadata in use.
    pub mspan_inuse: u64,
    /// Bytes of span metadata obtained from the operating system.
    pub mspan_sys: u64,
    /// Bytes of per-thread allocation cache in use.
    pub mcache_inuse: u64,
    /// Bytes of per-thread allocation cache obtained from the OS.
    pub mcache_sys: u64,

    /// Bytes of garbage-collector metadata.
    pub gc_sys: u64,
    /// Heap size that triggers the next collection cycle.
    pub next_gc: u64,
    /// Timestamp of the last collection, nanoseconds since the epoch.
    pub last_gc: u64,
    /// Cumulative pause time across all cycles, nanoseconds.
    pub pause_total_ns: u64,
    /// Ring buffer of recent pause durations, indexed by cycle count.
    pub pause_ns: [u64; PAUSE_RING_LEN],
    /// Completed collection cycles.
    pub num_gc: u32,
}

impl Default for MemorySample {
    fn default() -> Self {
        Self {
            sys: 0,
            lookups: 0,
            other_sys: 0,
            alloc: 0,
            total_alloc: 0,
            mallocs: 0,
            frees: 0,
            heap_alloc: 0,
            heap_sys: 0,
            heap_idle: 0,
            heap_inuse: 0,
            heap_released: 0,
            heap_objects: 0,
            stack_sys: 0,
            stack_inuse: 0,
            mspan_inuse: 0,
            mspan_sys: 0,
            mcache_inuse: 0,
            mcache_sys: 0,
            gc_sys: 0,
            next_gc: 0,
            last_gc: 0,
            pause_total_ns: 0,
            pause_ns: [0; PAUSE_RING_LEN],
            num_gc: 0,
        }
    }
}

impl MemorySample {
    /// Pause duration of the most recent collection cycle, in nanoseconds.
    ///
    /// The ring is indexed by completed cycle count. With zero completed
    /// cycles this reads slot 255 of an all-zero ring and yields 0, which
    /// the shutdown zeroing pass relies on.
    pub fn last_pause_ns(&self) -> u64 {
        self.pause_ns[(self.num_gc as usize + PAUSE_RING_LEN - 1) % PAUSE_RING_LEN]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sample_last_pause_is_zero() {
        let sample = MemorySample::default();
        assert_eq!(sample.last_pause_ns(), 0);
    }

    #[test]
    fn last_pause_reads_most_recent_cycle_slot() {
        let mut sample = MemorySample::default();
        sample.num_gc = 3;
        sample.pause_ns[2] = 84_000;
        assert_eq!(sample.last_pause_ns(), 84_000);
    }

    #[test]
    fn last_pause_wraps_around_the_ring() {
        let mut sample = MemorySample::default();
        sample.num_gc = 257;
        sample.pause_ns[0] = 12_345;
        assert_eq!(sample.last_pause_ns(), 12_345);

        sample.num_gc = 256;
        sample.pause_ns[255] = 67_890;
        assert_eq!(sample.last_pause_ns(), 67_890);
    }
}
