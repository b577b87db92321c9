//! Character appearance, level and account flags.

use bitstream::BitWriter;

use crate::component::{write_group, Component, ComponentKind};
use crate::error::ReplicaResult;

/// Minifigure appearance, sent once on construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Appearance {
    pub hair_color: u32,
    pub hair_style: u32,
    pub head: u32,
    pub shirt_color: u32,
    pub pants_color: u32,
    pub shirt_style: u32,
    pub head_color: u32,
    pub eyebrows: u32,
    pub eyes: u32,
    pub mouth: u32,
}

impl Appearance {
    fn write(&self, writer: &mut BitWriter) {
        for part in [
            self.hair_color,
            self.hair_style,
            self.head,
            self.shirt_color,
            self.pants_color,
            self.shirt_style,
            self.head_color,
            self.eyebrows,
            self.eyes,
            self.mouth,
        ] {
            writer.write_u32(part);
        }
    }
}

/// Per-character state that is not combat or inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Character {
    pub appearance: Appearance,
    pub account_id: i64,
    pub level: u32,
    pub universe_score: i64,
    pub pvp_enabled: bool,
    pub gm_level: u8,
    pub editor_enabled: bool,
    pub editor_level: u8,
    level_dirty: bool,
    flags_dirty: bool,
}

impl Character {
    #[must_use]
    pub fn new(account_id: i64, level: u32) -> Self {
        Self {
            account_id,
            level,
            ..Self::default()
        }
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level;
        self.level_dirty = true;
    }

    pub fn set_pvp(&mut self, enabled: bool) {
        self.pvp_enabled = enabled;
        self.flags_dirty = true;
    }

    fn write_flags(&self, writer: &mut BitWriter) {
        writer.write_bool(self.pvp_enabled);
        writer.write_bool(self.gm_level > 0);
        writer.write_u8(self.gm_level);
        writer.write_bool(self.editor_enabled);
        writer.write_u8(self.editor_level);
    }
}

impl Component for Character {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Character
    }

    fn write_construction(&self, writer: &mut BitWriter) -> ReplicaResult<()> {
        // Vehicle.
        writer.write_bool(false);
        write_group(writer, true, |w| {
            w.write_u32(self.level);
            Ok(())
        })?;
        // Speed boost.
        writer.write_bool(false);

        // Save-data flags.
        writer.write_bool(false);
        writer.write_bool(false);
        writer.write_bool(false);
        writer.write_bool(false);
        self.appearance.write(writer);
        writer.write_i64(self.account_id);
        // Last login, property moderation.
        writer.write_u64(0);
        writer.write_u64(0);
        writer.write_i64(self.universe_score);
        // Free trial.
        writer.write_bool(false);
        // Activity statistics.
        writer.write_u32(0);
        // World transition.
        writer.write_bool(false);

        write_group(writer, true, |w| {
            self.write_flags(w);
            Ok(())
        })?;
        // Guild.
        writer.write_bool(false);
        Ok(())
    }

    fn write_update(&self, writer: &mut BitWriter) -> ReplicaResult<()> {
        writer.write_bool(false);
        write_group(writer, self.level_dirty, |w| {
            w.write_u32(self.level);
            Ok(())
        })?;
        writer.write_bool(false);
        write_group(writer, self.flags_dirty, |w| {
            self.write_flags(w);
            Ok(())
        })?;
        writer.write_bool(false);
        Ok(())
    }

    fn clear_dirty(&mut self) {
        self.level_dirty = false;
        self.flags_dirty = false;
    }
}
