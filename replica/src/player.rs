//! The player replica.

use bitstream::BitWriter;

use crate::character::Character;
use crate::component::{Component, ComponentKind};
use crate::error::ReplicaResult;
use crate::inventory::Inventory;
use crate::object::Replica;
use crate::physics::ControllablePhysics;
use crate::simple::{Component107, Destructible, Render, Script, Skill};
use crate::stats::Stats;

/// Object type template of player minifigures.
pub const PLAYER_LOT: i32 = 1;

/// Reported age of a freshly constructed object, in milliseconds.
pub const TIME_SINCE_CREATED: u32 = 25;

/// Component order shared by construction and update encodings.
pub const PLAYER_COMPONENT_ORDER: [ComponentKind; 9] = [
    ComponentKind::ControllablePhysics,
    ComponentKind::Destructible,
    ComponentKind::Stats,
    ComponentKind::Character,
    ComponentKind::Inventory,
    ComponentKind::Script,
    ComponentKind::Skill,
    ComponentKind::Render,
    ComponentKind::Component107,
];

/// A player-controlled minifigure.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub physics: ControllablePhysics,
    pub destructible: Destructible,
    pub stats: Stats,
    pub character: Character,
    pub inventory: Inventory,
    pub script: Script,
    pub skill: Skill,
    pub render: Render,
    pub component107: Component107,
}

impl Player {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            physics: ControllablePhysics::new(true),
            destructible: Destructible,
            stats: Stats::default(),
            character: Character::new(0, 1),
            inventory: Inventory::new(),
            script: Script,
            skill: Skill,
            render: Render::default(),
            component107: Component107::default(),
        }
    }

    /// Components in [`PLAYER_COMPONENT_ORDER`].
    #[must_use]
    pub fn components(&self) -> [&dyn Component; 9] {
        [
            &self.physics,
            &self.destructible,
            &self.stats,
            &self.character,
            &self.inventory,
            &self.script,
            &self.skill,
            &self.render,
            &self.component107,
        ]
    }

    fn components_mut(&mut self) -> [&mut dyn Component; 9] {
        [
            &mut self.physics,
            &mut self.destructible,
            &mut self.stats,
            &mut self.character,
            &mut self.inventory,
            &mut self.script,
            &mut self.skill,
            &mut self.render,
            &mut self.component107,
        ]
    }
}

/// Component data present, no parent link, no child links.
fn write_group_bits(writer: &mut BitWriter) {
    writer.write_bool(true);
    writer.write_bool(false);
    writer.write_bool(false);
}

impl Replica for Player {
    fn object_id(&self) -> i64 {
        self.id
    }

    fn write_construction(&self, writer: &mut BitWriter) -> ReplicaResult<()> {
        writer.write_i64(self.id);
        writer.write_i32(PLAYER_LOT);

        // Empty name; the client takes the display name from DetailedUserInfo.
        writer.write_u8(0);
        writer.write_u32(TIME_SINCE_CREATED);

        // Config data, trigger, spawner id, spawner node, scale, world state, gm level.
        for _ in 0..7 {
            writer.write_bool(false);
        }

        write_group_bits(writer);
        for component in self.components() {
            component.write_construction(writer)?;
        }
        Ok(())
    }

    fn write_update(&self, writer: &mut BitWriter) -> ReplicaResult<()> {
        write_group_bits(writer);
        for component in self.components() {
            component.write_update(writer)?;
        }
        Ok(())
    }

    fn clear_dirty(&mut self) {
        for component in self.components_mut() {
            component.clear_dirty();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_follow_declared_order() {
        let player = Player::new(1, "a");
        let kinds: Vec<_> = player.components().iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, PLAYER_COMPONENT_ORDER);
    }

    #[test]
    fn construction_prefix_layout() {
        let player = Player::new(0x1122, "Ab");
        let mut writer = BitWriter::new();
        player.write_construction(&mut writer).unwrap();
        let bytes = writer.finish();
        assert_eq!(&bytes[0..8], &0x1122i64.to_le_bytes());
        assert_eq!(&bytes[8..12], &1i32.to_le_bytes());
        assert_eq!(bytes[12], 0);
        assert_eq!(&bytes[13..17], &25u32.to_le_bytes());
        // 7 metadata bits clear, then the component-data bit.
        assert_eq!(bytes[17], 0b0000_0001);
    }

    #[test]
    fn long_name_does_not_reach_construction() {
        let short = Player::new(1, "a");
        let long = Player::new(1, "x".repeat(300));
        let mut a = BitWriter::new();
        short.write_construction(&mut a).unwrap();
        let mut b = BitWriter::new();
        long.write_construction(&mut b).unwrap();
        assert_eq!(a.finish(), b.finish());
    }

    #[test]
    fn clear_dirty_reaches_every_component() {
        let mut player = Player::new(1, "a");
        player.stats.set_health(1);
        player.character.set_level(3);
        player.physics.set_position([1.0, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0]);

        let mut dirty = BitWriter::new();
        player.write_update(&mut dirty).unwrap();
        player.clear_dirty();
        let mut clean = BitWriter::new();
        player.write_update(&mut clean).unwrap();
        assert!(clean.bits_written() < dirty.bits_written());
    }
}
