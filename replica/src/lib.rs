//! Replica construction and update encoding for the lunet game protocol.
//!
//! A replica is a networked object made of an ordered, fixed list of
//! components. Observers first receive its construction encoding, then any
//! number of update encodings, then a destruction. The component order is
//! data ([`PLAYER_COMPONENT_ORDER`]) and is identical for construction and
//! update; the client parses positionally, so no component may be skipped.
//!
//! [`ReplicaManager`] assigns `u16` network ids, tracks which participants
//! have received each construction, and only sends updates to those.

mod character;
mod component;
mod error;
mod inventory;
mod manager;
mod object;
mod physics;
mod player;
mod simple;
mod stats;

pub use character::{Appearance, Character};
pub use component::{Component, ComponentKind};
pub use error::{ReplicaError, ReplicaResult};
pub use inventory::{EquippedItem, Inventory};
pub use manager::{
    ReplicaManager, REPLICA_CONSTRUCTION, REPLICA_DESTRUCTION, REPLICA_SERIALIZE,
};
pub use object::Replica;
pub use physics::ControllablePhysics;
pub use player::{Player, PLAYER_COMPONENT_ORDER, PLAYER_LOT, TIME_SINCE_CREATED};
pub use simple::{Component107, Destructible, Render, Script, Skill};
pub use stats::Stats;
