//! Configurable limits for bounded decoding.

/// Wire-level limits for packet decoding.
///
/// These limits are enforced during decoding to prevent resource exhaustion
/// and keep memory bounded per packet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Limits {
    /// Maximum packet size in bytes, header included.
    pub max_packet_bytes: usize,

    /// Maximum size of a game-message payload in bytes.
    pub max_payload_bytes: usize,

    /// Limits for embedded LDF payloads.
    pub ldf: ldf::Limits,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // The transport reassembles split packets, so this is above MTU.
            max_packet_bytes: 1024 * 1024,
            max_payload_bytes: 64 * 1024,
            ldf: ldf::Limits::default(),
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_packet_bytes: 16 * 1024,
            max_payload_bytes: 1024,
            ldf: ldf::Limits::for_testing(),
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_packet_bytes: usize::MAX,
            max_payload_bytes: usize::MAX,
            ldf: ldf::Limits::unlimited(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testing_limits_smaller() {
        let test_limits = Limits::for_testing();
        let default_limits = Limits::default();

        assert!(test_limits.max_packet_bytes < default_limits.max_packet_bytes);
        assert!(test_limits.max_payload_bytes < default_limits.max_payload_bytes);
    }

    #[test]
    fn unlimited_is_max() {
        let limits = Limits::unlimited();
        assert_eq!(limits.max_packet_bytes, usize::MAX);
        assert_eq!(limits.ldf.max_entries, usize::MAX);
    }
}
