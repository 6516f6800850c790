//! Allocator statistics read through jemalloc's `mallctl` interface.
//!
//! Requires the `stats` feature of jemalloc, which `tikv-jemalloc-sys`
//! enables here. Reads are best-effort: a statistic jemalloc cannot
//! provide reads as zero rather than failing the sampling pass.

use std::ffi::CStr;
use std::mem;

/// One snapshot of jemalloc's global counters, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocatorStats {
    /// Bytes allocated by the application (`stats.allocated`).
    pub allocated: u64,
    /// Bytes in active pages backing allocations (`stats.active`).
    pub active: u64,
    /// Bytes of allocator metadata (`stats.metadata`).
    pub metadata: u64,
    /// Bytes physically resident (`stats.resident`).
    pub resident: u64,
    /// Bytes of mapped address space (`stats.mapped`).
    pub mapped: u64,
    /// Bytes retained after being unmapped from use (`stats.retained`).
    pub retained: u64,
}

impl AllocatorStats {
    /// Takes one consistent snapshot of the global allocator counters.
    pub fn read() -> Self {
        refresh_epoch();
        Self {
            allocated: read_stat(c"stats.allocated"),
            active: read_stat(c"stats.active"),
            metadata: read_stat(c"stats.metadata"),
            resident: read_stat(c"stats.resident"),
            mapped: read_stat(c"stats.mapped"),
            retained: read_stat(c"stats.retained"),
        }
    }
}

/// Advances jemalloc's statistics epoch so subsequent reads observe
/// current values. jemalloc caches `stats.*` until the epoch is bumped.
fn refresh_epoch() {
    let mut epoch: u64 = 1;
    let mut len = mem::size_of::<u64>();
    // SAFETY: "epoch" reads and writes a uint64_t; both pointers reference
    // live stack variables and the lengths match the value size.
    unsafe {
        tikv_jemalloc_sys::mallctl(
            c"epoch".as_ptr().cast(),
            (&mut epoch as *mut u64).cast(),
            &mut len as *mut usize,
            (&mut epoch as *mut u64).cast(),
            mem::size_of::<u64>(),
        );
    }
}

/// Reads a single `size_t` statistic by mallctl name. Returns 0 when the
/// statistic is unavailable.
fn read_stat(name: &CStr) -> u64 {
    let mut value: usize = 0;
    let mut len = mem::size_of::<usize>();
    // SAFETY: "stats.*" names read a size_t; the pointers reference live
    // stack variables and len matches the destination size.
    let ret = unsafe {
        tikv_jemalloc_sys::mallctl(
            name.as_ptr().cast(),
            (&mut value as *mut usize).cast(),
            &mut len as *mut usize,
            std::ptr::null_mut(),
            0,
        )
    };
    if ret == 0 { value as u64 } else { 0 }
}
