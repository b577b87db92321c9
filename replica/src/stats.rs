//! Health, armor and imagination pools.

use bitstream::BitWriter;

use crate::component::{write_group, write_len, Component, ComponentKind};
use crate::error::ReplicaResult;

/// Combat pools and faction membership.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub health: u32,
    pub max_health: f32,
    pub armor: u32,
    pub max_armor: f32,
    pub imagination: u32,
    pub max_imagination: f32,
    pub damage_absorption: u32,
    pub immune: bool,
    pub gm_immune: bool,
    pub shielded: bool,
    pub factions: Vec<i32>,
    pub smashable: bool,
    dirty: bool,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            health: 4,
            max_health: 4.0,
            armor: 0,
            max_armor: 0.0,
            imagination: 0,
            max_imagination: 0.0,
            damage_absorption: 0,
            immune: false,
            gm_immune: false,
            shielded: false,
            factions: vec![1],
            smashable: false,
            dirty: false,
        }
    }
}

impl Stats {
    /// Sets the current health and marks the pools dirty.
    pub fn set_health(&mut self, health: u32) {
        self.health = health;
        self.dirty = true;
    }

    /// Sets the current imagination and marks the pools dirty.
    pub fn set_imagination(&mut self, imagination: u32) {
        self.imagination = imagination;
        self.dirty = true;
    }

    fn write_pools(&self, writer: &mut BitWriter) -> ReplicaResult<()> {
        writer.write_u32(self.health);
        writer.write_f32(self.max_health);
        writer.write_u32(self.armor);
        writer.write_f32(self.max_armor);
        writer.write_u32(self.imagination);
        writer.write_f32(self.max_imagination);
        writer.write_u32(self.damage_absorption);
        writer.write_bool(self.immune);
        writer.write_bool(self.gm_immune);
        writer.write_bool(self.shielded);
        writer.write_f32(self.max_health);
        writer.write_f32(self.max_armor);
        writer.write_f32(self.max_imagination);
        write_len(writer, "factions", self.factions.len())?;
        for faction in &self.factions {
            writer.write_i32(*faction);
        }
        writer.write_bool(self.smashable);
        Ok(())
    }
}

impl Component for Stats {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Stats
    }

    fn write_construction(&self, writer: &mut BitWriter) -> ReplicaResult<()> {
        // Immunity timers.
        writer.write_bool(false);
        write_group(writer, true, |w| self.write_pools(w))?;
        if self.smashable {
            // Smashable group: no explicit owner, no explode factor.
            writer.write_bool(false);
            writer.write_bool(false);
        }
        Ok(())
    }

    fn write_update(&self, writer: &mut BitWriter) -> ReplicaResult<()> {
        write_group(writer, self.dirty, |w| self.write_pools(w))?;
        // Status flags.
        writer.write_bool(false);
        Ok(())
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
