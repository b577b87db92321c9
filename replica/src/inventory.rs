//! Equipped items.

use bitstream::BitWriter;

use crate::component::{write_group, write_len, Component, ComponentKind};
use crate::error::ReplicaResult;

/// One equipped item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquippedItem {
    pub object_id: i64,
    pub lot: i32,
    pub count: u32,
    pub slot: u16,
}

/// Items the object visibly wears.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: Vec<EquippedItem>,
    dirty: bool,
}

impl Inventory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Equips an item and marks the list dirty.
    pub fn equip(&mut self, item: EquippedItem) {
        self.items.push(item);
        self.dirty = true;
    }

    /// Removes an item by object id. Returns `false` if it was not equipped.
    pub fn unequip(&mut self, object_id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.object_id != object_id);
        let removed = self.items.len() != before;
        self.dirty |= removed;
        removed
    }

    #[must_use]
    pub fn items(&self) -> &[EquippedItem] {
        &self.items
    }

    fn write_items(&self, writer: &mut BitWriter) -> ReplicaResult<()> {
        write_len(writer, "equipped items", self.items.len())?;
        for item in &self.items {
            writer.write_i64(item.object_id);
            writer.write_i32(item.lot);
            // Subkey.
            writer.write_bool(false);
            write_group(writer, item.count > 1, |w| {
                w.write_u32(item.count);
                Ok(())
            })?;
            write_group(writer, item.slot != 0, |w| {
                w.write_u16(item.slot);
                Ok(())
            })?;
            // Inventory type, extra info.
            writer.write_bool(false);
            writer.write_bool(false);
            // Bound.
            writer.write_bool(true);
        }
        Ok(())
    }
}

impl Component for Inventory {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Inventory
    }

    fn write_construction(&self, writer: &mut BitWriter) -> ReplicaResult<()> {
        write_group(writer, true, |w| self.write_items(w))?;
        // Equipped models.
        writer.write_bool(false);
        Ok(())
    }

    fn write_update(&self, writer: &mut BitWriter) -> ReplicaResult<()> {
        write_group(writer, self.dirty, |w| self.write_items(w))?;
        writer.write_bool(false);
        Ok(())
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
