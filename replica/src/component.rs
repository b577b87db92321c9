//! The component seam shared by every replica.

use bitstream::BitWriter;

use crate::error::ReplicaResult;

/// Component kinds a replica can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    ControllablePhysics,
    Destructible,
    Stats,
    Character,
    Inventory,
    Script,
    Skill,
    Render,
    /// Component type 107; carries a linked object id.
    Component107,
}

/// One slice of a replica's networked state.
///
/// Construction encodings carry every group. Update encodings start with the
/// component's own group-presence bits and carry only dirty groups; a
/// component with nothing to update writes nothing.
pub trait Component {
    /// The component's kind.
    fn kind(&self) -> ComponentKind;

    /// Writes the full state sent when the replica is first constructed.
    fn write_construction(&self, writer: &mut BitWriter) -> ReplicaResult<()>;

    /// Writes the incremental state sent on serialization.
    fn write_update(&self, writer: &mut BitWriter) -> ReplicaResult<()>;

    /// Marks every group clean after an update has gone out.
    fn clear_dirty(&mut self) {}
}

/// Writes a group-presence bit, then the group body when present.
pub(crate) fn write_group(
    writer: &mut BitWriter,
    present: bool,
    body: impl FnOnce(&mut BitWriter) -> ReplicaResult<()>,
) -> ReplicaResult<()> {
    writer.write_bool(present);
    if present {
        body(writer)?;
    }
    Ok(())
}

/// Writes a `u32` list length.
pub(crate) fn write_len(
    writer: &mut BitWriter,
    kind: &'static str,
    count: usize,
) -> ReplicaResult<()> {
    let len = u32::try_from(count)
        .map_err(|_| crate::ReplicaError::TooManyEntries { kind, count })?;
    writer.write_u32(len);
    Ok(())
}
