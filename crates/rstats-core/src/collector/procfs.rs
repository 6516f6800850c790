//! Parser for the `/proc/self/status` fields the samplers need.
//!
//! Pure functions over file content, designed to be easily testable with
//! string fixtures.

use std::collections::HashMap;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parsed subset of `/proc/self/status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelfStatus {
    /// Number of threads in the process.
    pub threads: u64,
    /// Virtual memory size, kB.
    pub vm_size: u64,
    /// Resident set size, kB.
    pub vm_rss: u64,
    /// Main-thread stack size, kB.
    pub vm_stk: u64,
}

/// Parses `/proc/self/status` content.
///
/// Format is `key:\tvalue` pairs, one per line. Individual missing fields
/// read as zero; the error is reserved for content that is not a status
/// file at all.
pub fn parse_self_status(content: &str) -> Result<SelfStatus, ParseError> {
    let mut fields: HashMap<&str, &str> = HashMap::new();
    for line in content.lines() {
        if let Some((key, value)) = line.split_once(':') {
            fields.insert(key.trim(), value.trim());
        }
    }

    if fields.is_empty() {
        return Err(ParseError::new("no key:value pairs in status content"));
    }

    // Memory fields are in kB format: "12345 kB"
    let parse_kb = |key: &str| -> u64 {
        fields
            .get(key)
            .and_then(|s| s.split_whitespace().next())
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    };

    Ok(SelfStatus {
        threads: fields
            .get("Threads")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
        vm_size: parse_kb("VmSize"),
        vm_rss: parse_kb("VmRSS"),
        vm_stk: parse_kb("VmStk"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_self_status_fixture() {
        let content = "\
Name:\trstatsd
Pid:\t1234
PPid:\t1
Threads:\t8
VmPeak:\t   30000 kB
VmSize:\t   25000 kB
VmRSS:\t    8000 kB
VmData:\t    2000 kB
VmStk:\t     136 kB
voluntary_ctxt_switches:\t500
";
        let status = parse_self_status(content).unwrap();

        assert_eq!(status.threads, 8);
        assert_eq!(status.vm_size, 25000);
        assert_eq!(status.vm_rss, 8000);
        assert_eq!(status.vm_stk, 136);
    }

    #[test]
    fn missing_fields_read_as_zero() {
        let status = parse_self_status("Name:\tbash\n").unwrap();
        assert_eq!(status.threads, 0);
        assert_eq!(status.vm_stk, 0);
    }

    #[test]
    fn rejects_non_status_content() {
        assert!(parse_self_status("").is_err());
        assert!(parse_self_status("not a status file\n").is_err());
    }
}
