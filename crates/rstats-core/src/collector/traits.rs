//! Abstraction for filesystem access to enable testing and mocking.
//!
//! The `FileSystem` trait lets samplers read the real `/proc` filesystem
//! on Linux or an in-memory mock in tests and on other platforms.

use std::io;
use std::path::Path;

/// Abstraction for reading virtual filesystem files.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Real filesystem implementation that delegates to `std::fs`.
///
/// Use this in production to read from the actual `/proc` filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn real_fs_reads_existing_file() {
        let fs = RealFs::new();
        // Cargo.toml always exists in the crate root during tests
        let cargo_toml = env::current_dir().unwrap().join("Cargo.toml");
        let content = fs.read_to_string(&cargo_toml).unwrap();
        assert!(content.contains("[package]"));
    }

    #[test]
    fn real_fs_errors_on_missing_file() {
        let fs = RealFs::new();
        assert!(fs.read_to_string(Path::new("/nonexistent/path/12345")).is_err());
    }
}
