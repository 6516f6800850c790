//! In-memory test doubles: a mock procfs and a fixed-sample sampler.
//!
//! `MockFs` simulates the `/proc` filesystem in memory so sampler tests
//! run on any platform; `MockSampler` returns fixed synthetic samples so
//! collector tests are fully deterministic.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::collector::sample::{CpuSample, MemorySample};
use crate::collector::sampler::RuntimeSampler;
use crate::collector::traits::FileSystem;

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files.insert(path.as_ref().to_path_buf(), content.into());
    }

    /// A steady single-purpose process: 8 threads, modest memory.
    pub fn steady_process() -> Self {
        let mut fs = Self::new();
        fs.add_file(
            "/proc/self/status",
            "\
Name:\trstatsd
Pid:\t4242
PPid:\t1
Threads:\t8
VmPeak:\t   30000 kB
VmSize:\t   25000 kB
VmRSS:\t    8000 kB
VmData:\t    2000 kB
VmStk:\t     136 kB
voluntary_ctxt_switches:\t500
",
        );
        fs
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("mock file not found: {}", path.display()),
            )
        })
    }
}

/// Sampler returning fixed samples.
#[derive(Debug, Clone, Default)]
pub struct MockSampler {
    pub cpu: CpuSample,
    pub memory: MemorySample,
}

impl MockSampler {
    /// Creates a sampler that always returns the given samples.
    pub fn new(cpu: CpuSample, memory: MemorySample) -> Self {
        Self { cpu, memory }
    }

    /// A busy process with every field nonzero, including the pause ring.
    pub fn busy_process() -> Self {
        let mut pause_ns = [0u64; crate::collector::sample::PAUSE_RING_LEN];
        pause_ns[0] = 60_000;
        pause_ns[1] = 96_000;
        pause_ns[2] = 84_000; // most recent completed cycle

        let memory = MemorySample {
            sys: 71_893_240,
            lookups: 1,
            other_sys: 1_030_028,
            alloc: 2_617_248,
            total_alloc: 8_225_912,
            mallocs: 21_326,
            frees: 14_712,
            heap_alloc: 2_617_248,
            heap_sys: 66_781_184,
            heap_idle: 62_521_344,
            heap_inuse: 4_259_840,
            heap_released: 32_768,
            heap_objects: 6_614,
            stack_sys: 655_360,
            stack_inuse: 655_360,
            mspan_inuse: 50_112,
            mspan_sys: 65_536,
            mcache_inuse: 6_912,
            mcache_sys: 16_384,
            gc_sys: 2_240_512,
            next_gc: 4_194_304,
            last_gc: 1_546_300_800_000_000_000,
            pause_total_ns: 240_000,
            pause_ns,
            num_gc: 3,
        };

        Self {
            cpu: CpuSample {
                threads: 12,
                ffi_calls: 7,
            },
            memory,
        }
    }
}

impl RuntimeSampler for MockSampler {
    fn cpu(&self) -> CpuSample {
        self.cpu
    }

    fn memory(&self) -> MemorySample {
        self.memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_fs_returns_added_files() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/self/status", "Threads:\t4\n");
        assert_eq!(
            fs.read_to_string(Path::new("/proc/self/status")).unwrap(),
            "Threads:\t4\n"
        );
        assert!(fs.read_to_string(Path::new("/proc/missing")).is_err());
    }

    #[test]
    fn busy_process_pause_ring_matches_cycle_count() {
        let sampler = MockSampler::busy_process();
        let memory = sampler.memory();
        assert_eq!(memory.num_gc, 3);
        assert_eq!(memory.last_pause_ns(), 84_000);
    }
}
