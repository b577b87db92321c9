//! Controllable physics: the position block of player-driven objects.

use bitstream::BitWriter;

use crate::component::{write_group, Component, ComponentKind};
use crate::error::ReplicaResult;

/// Position, rotation and ground state of a controllable object.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllablePhysics {
    /// Players carry an extra jetpack/immunity prefix on construction.
    pub player: bool,
    pub position: [f32; 3],
    /// Quaternion as x, y, z, w.
    pub rotation: [f32; 4],
    pub on_ground: bool,
    pub on_rail: bool,
    pub velocity: Option<[f32; 3]>,
    pub angular_velocity: Option<[f32; 3]>,
    position_dirty: bool,
}

impl ControllablePhysics {
    #[must_use]
    pub fn new(player: bool) -> Self {
        Self {
            player,
            position: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
            on_ground: true,
            on_rail: false,
            velocity: None,
            angular_velocity: None,
            position_dirty: false,
        }
    }

    /// Moves the object and marks the position group dirty.
    pub fn set_position(&mut self, position: [f32; 3], rotation: [f32; 4]) {
        self.position = position;
        self.rotation = rotation;
        self.position_dirty = true;
    }

    /// Returns `true` if the position group will go out on the next update.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.position_dirty
    }

    fn write_groups(&self, writer: &mut BitWriter, position: bool) -> ReplicaResult<()> {
        // Cheat and equipped-item groups.
        writer.write_bool(false);
        writer.write_bool(false);
        // Gravity and speed multipliers.
        writer.write_bool(false);
        // Bubble.
        writer.write_bool(false);
        write_group(writer, position, |w| {
            for axis in self.position {
                w.write_f32(axis);
            }
            for axis in self.rotation {
                w.write_f32(axis);
            }
            w.write_bool(self.on_ground);
            w.write_bool(self.on_rail);
            write_vector(w, self.velocity)?;
            write_vector(w, self.angular_velocity)?;
            // Moving platform.
            w.write_bool(false);
            Ok(())
        })
    }
}

fn write_vector(writer: &mut BitWriter, vector: Option<[f32; 3]>) -> ReplicaResult<()> {
    write_group(writer, vector.is_some(), |w| {
        for axis in vector.unwrap_or_default() {
            w.write_f32(axis);
        }
        Ok(())
    })
}

impl Component for ControllablePhysics {
    fn kind(&self) -> ComponentKind {
        ComponentKind::ControllablePhysics
    }

    fn write_construction(&self, writer: &mut BitWriter) -> ReplicaResult<()> {
        if self.player {
            // Jetpack, then stun immunity.
            writer.write_bool(false);
            writer.write_bool(false);
        }
        self.write_groups(writer, true)
    }

    fn write_update(&self, writer: &mut BitWriter) -> ReplicaResult<()> {
        self.write_groups(writer, self.position_dirty)?;
        // Teleport.
        writer.write_bool(false);
        Ok(())
    }

    fn clear_dirty(&mut self) {
        self.position_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(f: impl FnOnce(&mut BitWriter) -> ReplicaResult<()>) -> usize {
        let mut writer = BitWriter::new();
        f(&mut writer).unwrap();
        writer.bits_written()
    }

    #[test]
    fn player_construction_has_prefix() {
        let player = ControllablePhysics::new(true);
        let npc = ControllablePhysics::new(false);
        let with = bits(|w| player.write_construction(w));
        let without = bits(|w| npc.write_construction(w));
        assert_eq!(with, without + 2);
    }

    #[test]
    fn clean_update_skips_position() {
        let physics = ControllablePhysics::new(true);
        // Four empty groups, empty position group, teleport.
        assert_eq!(bits(|w| physics.write_update(w)), 6);
    }

    #[test]
    fn dirty_update_carries_position() {
        let mut physics = ControllablePhysics::new(true);
        physics.set_position([1.0, 2.0, 3.0], [0.0, 0.0, 0.0, 1.0]);
        // Position group: 7 floats, 2 flags, 2 empty vectors, platform.
        assert_eq!(bits(|w| physics.write_update(w)), 6 + 7 * 32 + 5);
        physics.clear_dirty();
        assert!(!physics.is_dirty());
    }
}
