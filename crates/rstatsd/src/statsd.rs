//! Thin statsd gauge client over UDP.
//!
//! One gauge per datagram, formatted as `{prefix}{key}:{value}|g`, sent
//! fire-and-forget. The gauge sample weight is 1.0, which statsd encodes
//! by omitting the `@rate` suffix.

use std::io;
use std::net::UdpSocket;

use rstats_core::sink::GaugeSink;
use tracing::trace;

/// Prefix applied when the configured prefix is empty.
const DEFAULT_PREFIX: &str = "go";

/// Normalizes a configured metric prefix.
///
/// An empty prefix falls back to "go", and exactly one trailing `.`
/// separator is guaranteed, so applying the normalization twice yields
/// the same result.
pub fn normalize_prefix(prefix: &str) -> String {
    let base = if prefix.is_empty() {
        DEFAULT_PREFIX
    } else {
        prefix
    };
    let mut normalized = base.trim_end_matches('.').to_string();
    normalized.push('.');
    normalized
}

/// UDP statsd sink.
///
/// The socket is connected once at startup; a statsd daemon that goes
/// away afterwards just swallows datagrams, matching the fire-and-forget
/// model. The only failure surfaced to the caller is the initial dial.
pub struct StatsdSink {
    socket: UdpSocket,
    prefix: String,
}

impl StatsdSink {
    /// Dials the statsd endpoint (host:port).
    ///
    /// Fails only when the local socket cannot be opened or the endpoint
    /// does not resolve; this must be reported before the collection loop
    /// starts.
    pub fn dial(endpoint: &str, prefix: &str) -> io::Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect(endpoint)?;
        Ok(Self {
            socket,
            prefix: normalize_prefix(prefix),
        })
    }

    /// The normalized prefix, trailing separator included.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl GaugeSink for StatsdSink {
    fn gauge(&self, key: &str, value: u64) {
        let datagram = format!("{}{}:{}|g", self.prefix, key, value);
        // Best-effort: a dropped datagram shows up downstream as a stale
        // gauge, not as an error here.
        if let Err(e) = self.socket.send(datagram.as_bytes()) {
            trace!("statsd send failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn empty_prefix_defaults_to_go() {
        assert_eq!(normalize_prefix(""), "go.");
    }

    #[test]
    fn prefix_gets_a_single_trailing_separator() {
        assert_eq!(normalize_prefix("pillar"), "pillar.");
        assert_eq!(normalize_prefix("pillar."), "pillar.");
    }

    #[test]
    fn normalization_is_idempotent() {
        for prefix in ["", "pillar", "pillar.", "a.b"] {
            let once = normalize_prefix(prefix);
            assert_eq!(normalize_prefix(&once), once);
        }
    }

    #[test]
    fn gauge_sends_the_statsd_wire_line() {
        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        server
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let endpoint = server.local_addr().unwrap().to_string();

        let sink = StatsdSink::dial(&endpoint, "pillar").unwrap();
        sink.gauge("cpu.NumGoroutine", 42);

        let mut buf = [0u8; 128];
        let n = server.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"pillar.cpu.NumGoroutine:42|g");
    }

    #[test]
    fn dial_fails_on_unresolvable_endpoint() {
        assert!(StatsdSink::dial("statsd.invalid:8125", "pillar").is_err());
    }
}
