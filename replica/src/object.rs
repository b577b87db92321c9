//! The replica seam used by the replica manager.

use bitstream::BitWriter;

use crate::error::ReplicaResult;

/// A networked object that can be constructed on and updated for observers.
pub trait Replica {
    /// Stable 64-bit object id.
    fn object_id(&self) -> i64;

    /// Writes the construction encoding: identity, metadata, then every
    /// component's construction encoding in fixed order.
    fn write_construction(&self, writer: &mut BitWriter) -> ReplicaResult<()>;

    /// Writes the update encoding: group bits, then every component's update
    /// encoding in the same order as construction.
    fn write_update(&self, writer: &mut BitWriter) -> ReplicaResult<()>;

    /// Marks all component state clean after an update pass.
    fn clear_dirty(&mut self);
}
