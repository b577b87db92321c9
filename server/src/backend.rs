//! Collaborator interfaces for sessions, characters, missions and worlds,
//! plus an in-memory implementation.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::net::SocketAddr;

/// An authenticated connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub account_id: i64,
    /// World clone the session is in.
    pub clone_id: u32,
}

/// A stored character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterRecord {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    pub last_zone: u16,
}

/// An object placed in a world clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldObject {
    pub object_id: i64,
    /// Object type template.
    pub lot: i32,
}

/// A running instance of a zone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldClone {
    pub clone_id: u32,
    pub zone_id: u16,
    pub objects: Vec<WorldObject>,
}

impl WorldClone {
    /// Returns the first object with `object_id`.
    #[must_use]
    pub fn find_object(&self, object_id: i64) -> Option<&WorldObject> {
        self.objects.iter().find(|obj| obj.object_id == object_id)
    }
}

/// Resolves the session bound to a remote address.
pub trait SessionLookup {
    fn get_session(&self, addr: SocketAddr) -> Option<Session>;
}

/// Character storage.
pub trait CharacterStore {
    fn get_character(&self, character_id: i64) -> Option<CharacterRecord>;

    /// Characters of an account, in slot order.
    fn characters_for_account(&self, account_id: i64) -> Vec<CharacterRecord>;

    /// Index into [`CharacterStore::characters_for_account`] of the
    /// character the account last played.
    fn front_character_index(&self, account_id: i64) -> Option<usize>;

    /// Records a completed mission. Returns `false` if the store refused.
    fn complete_mission(&mut self, character_id: i64, mission_id: i32) -> bool;
}

/// Mission definitions.
pub trait MissionCatalog {
    /// Mission ids offered by objects of type `lot`, in priority order.
    fn missions_for_object_type(&self, lot: i32) -> Vec<i32>;
}

/// Running world clones.
pub trait WorldLookup {
    fn get_world_clone(&self, clone_id: u32) -> Option<&WorldClone>;
}

/// Everything the server needs from the outside world.
pub trait Backend: SessionLookup + CharacterStore + MissionCatalog + WorldLookup {}

impl<T> Backend for T where T: SessionLookup + CharacterStore + MissionCatalog + WorldLookup {}

/// In-memory backend for tests and tooling.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    sessions: HashMap<SocketAddr, Session>,
    characters: BTreeMap<i64, CharacterRecord>,
    front_characters: HashMap<i64, usize>,
    missions: HashMap<i32, Vec<i32>>,
    clones: HashMap<u32, WorldClone>,
    completed: BTreeSet<(i64, i32)>,
    /// Missions `complete_mission` refuses.
    refused: BTreeSet<i32>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_session(&mut self, addr: SocketAddr, session: Session) {
        self.sessions.insert(addr, session);
    }

    pub fn add_character(&mut self, character: CharacterRecord) {
        self.characters.insert(character.id, character);
    }

    pub fn set_front_character(&mut self, account_id: i64, index: usize) {
        self.front_characters.insert(account_id, index);
    }

    pub fn add_missions(&mut self, lot: i32, missions: Vec<i32>) {
        self.missions.entry(lot).or_default().extend(missions);
    }

    pub fn add_clone(&mut self, clone: WorldClone) {
        self.clones.insert(clone.clone_id, clone);
    }

    /// Makes `complete_mission` fail for `mission_id`.
    pub fn refuse_mission(&mut self, mission_id: i32) {
        self.refused.insert(mission_id);
    }

    #[must_use]
    pub fn has_completed(&self, character_id: i64, mission_id: i32) -> bool {
        self.completed.contains(&(character_id, mission_id))
    }
}

impl SessionLookup for MemoryBackend {
    fn get_session(&self, addr: SocketAddr) -> Option<Session> {
        self.sessions.get(&addr).cloned()
    }
}

impl CharacterStore for MemoryBackend {
    fn get_character(&self, character_id: i64) -> Option<CharacterRecord> {
        self.characters.get(&character_id).cloned()
    }

    fn characters_for_account(&self, account_id: i64) -> Vec<CharacterRecord> {
        self.characters
            .values()
            .filter(|c| c.account_id == account_id)
            .cloned()
            .collect()
    }

    fn front_character_index(&self, account_id: i64) -> Option<usize> {
        self.front_characters.get(&account_id).copied()
    }

    fn complete_mission(&mut self, character_id: i64, mission_id: i32) -> bool {
        if self.refused.contains(&mission_id) || !self.characters.contains_key(&character_id) {
            return false;
        }
        self.completed.insert((character_id, mission_id));
        true
    }
}

impl MissionCatalog for MemoryBackend {
    fn missions_for_object_type(&self, lot: i32) -> Vec<i32> {
        self.missions.get(&lot).cloned().unwrap_or_default()
    }
}

impl WorldLookup for MemoryBackend {
    fn get_world_clone(&self, clone_id: u32) -> Option<&WorldClone> {
        self.clones.get(&clone_id)
    }
}
