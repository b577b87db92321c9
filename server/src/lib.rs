//! Packet routing and game-message dispatch for the lunet game protocol.
//!
//! [`Server`] owns a [`Backend`] (sessions, characters, missions, worlds), a
//! [`wire::Transport`] and a [`replica::ReplicaManager`]. Each inbound packet
//! is decoded, routed by kind through the [`PacketRouter`], and game messages
//! are dispatched by inner id through the [`GameMessageDispatcher`]. Every
//! error ends the current packet only and is logged by [`Server::receive`].

mod backend;
mod config;
mod dispatch;
mod error;
mod join_world;
mod missions;
mod router;
mod server;

pub use backend::{
    Backend, CharacterRecord, CharacterStore, MemoryBackend, MissionCatalog, Session,
    SessionLookup, WorldClone, WorldLookup, WorldObject,
};
pub use config::{PlayerDefaults, ServerConfig};
pub use dispatch::{GameMessageDispatcher, GameMessageHandler};
pub use error::{ServerError, ServerResult};
pub use join_world::{client_load_complete, join_world_request};
pub use missions::{
    mission_dialogue_ok, ready_for_updates, request_linked_mission, request_use,
    MISSION_TASK_FLAG,
};
pub use router::{PacketHandler, PacketRouter};
pub use server::Server;
