//! Server configuration.

use std::collections::BTreeMap;

/// Properties every player starts with in the character save document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlayerDefaults {
    pub inventory_space: u32,
    pub currency: i64,
    pub level: u32,
    pub reputation: i64,
}

impl Default for PlayerDefaults {
    fn default() -> Self {
        Self {
            inventory_space: 8,
            currency: 0,
            level: 1,
            reputation: 100,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ServerConfig {
    /// Decode limits for inbound packets.
    pub limits: wire::Limits,

    /// Zone file checksums the client verifies before loading.
    pub zone_checksums: BTreeMap<u16, u32>,

    /// Where players appear after joining a world.
    pub spawn_position: [f32; 3],

    pub player: PlayerDefaults,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            limits: wire::Limits::default(),
            zone_checksums: BTreeMap::from([
                (1000, 0x20b8_087c),
                (1100, 0x4952_5511),
                (1200, 0xda1e_6b30),
                (1300, 0x12ea_c290),
            ]),
            spawn_position: [0.0, 1.0, 0.0],
            player: PlayerDefaults::default(),
        }
    }
}

impl ServerConfig {
    /// Small decode limits; zone table as default.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            limits: wire::Limits::for_testing(),
            ..Self::default()
        }
    }

    /// Returns the checksum for `zone_id`, if configured.
    #[must_use]
    pub fn zone_checksum(&self, zone_id: u16) -> Option<u32> {
        self.zone_checksums.get(&zone_id).copied()
    }
}
