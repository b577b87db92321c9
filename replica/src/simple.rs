//! Components whose networked state is a flag or two.

use bitstream::BitWriter;

use crate::component::{write_group, write_len, Component, ComponentKind};
use crate::error::ReplicaResult;

/// Destructible shell; the pools themselves live in [`crate::Stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Destructible;

impl Component for Destructible {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Destructible
    }

    fn write_construction(&self, writer: &mut BitWriter) -> ReplicaResult<()> {
        // Status effects, then death behavior.
        writer.write_bool(false);
        writer.write_bool(false);
        Ok(())
    }

    fn write_update(&self, _writer: &mut BitWriter) -> ReplicaResult<()> {
        Ok(())
    }
}

/// Server-side script hook; no network variables are exposed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Script;

impl Component for Script {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Script
    }

    fn write_construction(&self, writer: &mut BitWriter) -> ReplicaResult<()> {
        writer.write_bool(false);
        Ok(())
    }

    fn write_update(&self, _writer: &mut BitWriter) -> ReplicaResult<()> {
        Ok(())
    }
}

/// Skill slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Skill;

impl Component for Skill {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Skill
    }

    fn write_construction(&self, writer: &mut BitWriter) -> ReplicaResult<()> {
        writer.write_bool(false);
        Ok(())
    }

    fn write_update(&self, _writer: &mut BitWriter) -> ReplicaResult<()> {
        Ok(())
    }
}

/// Visual effects attached to the object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Render {
    pub effects: Vec<u32>,
}

impl Component for Render {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Render
    }

    fn write_construction(&self, writer: &mut BitWriter) -> ReplicaResult<()> {
        write_len(writer, "render effects", self.effects.len())?;
        for effect in &self.effects {
            writer.write_u32(*effect);
        }
        Ok(())
    }

    fn write_update(&self, _writer: &mut BitWriter) -> ReplicaResult<()> {
        Ok(())
    }
}

/// Component type 107: a link to another object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Component107 {
    pub linked_object: i64,
    dirty: bool,
}

impl Component107 {
    pub fn set_linked_object(&mut self, object_id: i64) {
        self.linked_object = object_id;
        self.dirty = true;
    }
}

impl Component for Component107 {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Component107
    }

    fn write_construction(&self, writer: &mut BitWriter) -> ReplicaResult<()> {
        write_group(writer, true, |w| {
            w.write_i64(self.linked_object);
            Ok(())
        })
    }

    fn write_update(&self, writer: &mut BitWriter) -> ReplicaResult<()> {
        write_group(writer, self.dirty, |w| {
            w.write_i64(self.linked_object);
            Ok(())
        })
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
