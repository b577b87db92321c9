//! Configurable limits for bounded LDF decoding.

/// Limits enforced while decoding LDF payloads.
///
/// Entry counts and value lengths come straight off the wire, so they are
/// validated before any allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Limits {
    /// Maximum number of entries in one payload.
    pub max_entries: usize,

    /// Maximum key length in bytes (the wire prefix is a single byte).
    pub max_key_bytes: usize,

    /// Maximum length in bytes of one string or blob value.
    pub max_value_bytes: usize,

    /// Maximum size of a framed payload, header included.
    pub max_framed_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_entries: 1024,
            max_key_bytes: 255,
            // Character XML is the largest value carried in practice.
            max_value_bytes: 256 * 1024,
            max_framed_bytes: 1024 * 1024,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_entries: 32,
            max_key_bytes: 64,
            max_value_bytes: 4096,
            max_framed_bytes: 16 * 1024,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_entries: usize::MAX,
            max_key_bytes: usize::MAX,
            max_value_bytes: usize::MAX,
            max_framed_bytes: usize::MAX,
        }
    }
}
