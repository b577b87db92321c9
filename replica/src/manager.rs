//! Replica manager: network ids, observers, and construction/update/destruct packets.

use std::collections::{BTreeMap, BTreeSet};
use std::net::SocketAddr;

use bitstream::BitWriter;
use tracing::debug;
use wire::Transport;

use crate::error::{ReplicaError, ReplicaResult};
use crate::object::Replica;

/// Leading byte of a construction packet.
pub const REPLICA_CONSTRUCTION: u8 = 0x24;
/// Leading byte of a destruction packet.
pub const REPLICA_DESTRUCTION: u8 = 0x25;
/// Leading byte of a serialization (update) packet.
pub const REPLICA_SERIALIZE: u8 = 0x27;

#[derive(Debug)]
struct Entry<R> {
    replica: R,
    /// Participants that received this replica's construction.
    observers: BTreeSet<SocketAddr>,
}

/// Tracks live replicas and the participants observing them.
///
/// Every operation takes `&mut self`, so at most one serialization pass per
/// replica can be in flight.
#[derive(Debug)]
pub struct ReplicaManager<R> {
    participants: BTreeSet<SocketAddr>,
    replicas: BTreeMap<u16, Entry<R>>,
    next_id: u16,
}

impl<R> Default for ReplicaManager<R> {
    fn default() -> Self {
        Self {
            participants: BTreeSet::new(),
            replicas: BTreeMap::new(),
            next_id: 0,
        }
    }
}

impl<R: Replica> ReplicaManager<R> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer and constructs every live replica for it.
    pub fn add_participant(
        &mut self,
        addr: SocketAddr,
        transport: &mut impl Transport,
    ) -> ReplicaResult<()> {
        if !self.participants.insert(addr) {
            return Ok(());
        }
        debug!(%addr, replicas = self.replicas.len(), "participant added");
        for (&network_id, entry) in &mut self.replicas {
            let bytes = construction_packet(network_id, &entry.replica)?;
            entry.observers.insert(addr);
            transport.send(addr, bytes);
        }
        Ok(())
    }

    /// Forgets an observer. Replicas it observed stay live for others.
    pub fn remove_participant(&mut self, addr: SocketAddr) {
        if self.participants.remove(&addr) {
            for entry in self.replicas.values_mut() {
                entry.observers.remove(&addr);
            }
            debug!(%addr, "participant removed");
        }
    }

    /// Stores `replica`, assigns it a network id and constructs it for every
    /// participant.
    pub fn construct(&mut self, replica: R, transport: &mut impl Transport) -> ReplicaResult<u16> {
        let network_id = self.allocate_id()?;
        let bytes = construction_packet(network_id, &replica)?;
        for &addr in &self.participants {
            transport.send(addr, bytes.clone());
        }
        debug!(
            network_id,
            object_id = replica.object_id(),
            observers = self.participants.len(),
            "replica constructed"
        );
        self.replicas.insert(
            network_id,
            Entry {
                replica,
                observers: self.participants.clone(),
            },
        );
        Ok(network_id)
    }

    /// Sends the replica's update encoding to participants that have
    /// received its construction, then marks it clean.
    pub fn serialize(&mut self, network_id: u16, transport: &mut impl Transport) -> ReplicaResult<()> {
        let entry = self
            .replicas
            .get_mut(&network_id)
            .ok_or(ReplicaError::UnknownNetworkId { network_id })?;

        let mut writer = BitWriter::new();
        writer.write_u8(REPLICA_SERIALIZE);
        writer.write_u16(network_id);
        entry.replica.write_update(&mut writer)?;
        let bytes = writer.finish();

        for &addr in &entry.observers {
            transport.send(addr, bytes.clone());
        }
        entry.replica.clear_dirty();
        Ok(())
    }

    /// Destroys the replica on every observer and forgets it.
    pub fn destruct(&mut self, network_id: u16, transport: &mut impl Transport) -> ReplicaResult<R> {
        let entry = self
            .replicas
            .remove(&network_id)
            .ok_or(ReplicaError::UnknownNetworkId { network_id })?;

        let mut writer = BitWriter::new();
        writer.write_u8(REPLICA_DESTRUCTION);
        writer.write_u16(network_id);
        let bytes = writer.finish();
        for &addr in &entry.observers {
            transport.send(addr, bytes.clone());
        }
        debug!(network_id, "replica destructed");
        Ok(entry.replica)
    }

    /// Returns the replica registered under `network_id`.
    #[must_use]
    pub fn get(&self, network_id: u16) -> Option<&R> {
        self.replicas.get(&network_id).map(|entry| &entry.replica)
    }

    /// Returns the replica registered under `network_id` for mutation.
    /// Call [`ReplicaManager::serialize`] afterwards to publish changes.
    pub fn get_mut(&mut self, network_id: u16) -> Option<&mut R> {
        self.replicas
            .get_mut(&network_id)
            .map(|entry| &mut entry.replica)
    }

    /// Finds the network id of the replica with `object_id`.
    #[must_use]
    pub fn network_id_of(&self, object_id: i64) -> Option<u16> {
        self.replicas
            .iter()
            .find(|(_, entry)| entry.replica.object_id() == object_id)
            .map(|(&id, _)| id)
    }

    /// Returns `true` if `addr` has received the construction of `network_id`.
    #[must_use]
    pub fn is_observing(&self, network_id: u16, addr: SocketAddr) -> bool {
        self.replicas
            .get(&network_id)
            .is_some_and(|entry| entry.observers.contains(&addr))
    }

    /// Number of live replicas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.replicas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replicas.is_empty()
    }

    fn allocate_id(&mut self) -> ReplicaResult<u16> {
        if self.replicas.len() > usize::from(u16::MAX) {
            return Err(ReplicaError::NetworkIdsExhausted);
        }
        while self.replicas.contains_key(&self.next_id) {
            self.next_id = self.next_id.wrapping_add(1);
        }
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        Ok(id)
    }
}

fn construction_packet(network_id: u16, replica: &impl Replica) -> ReplicaResult<Vec<u8>> {
    let mut writer = BitWriter::new();
    writer.write_u8(REPLICA_CONSTRUCTION);
    writer.write_bool(true);
    writer.write_u16(network_id);
    replica.write_construction(&mut writer)?;
    Ok(writer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Player;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn ids_are_sequential() {
        let mut sent: Vec<(SocketAddr, Vec<u8>)> = Vec::new();
        let mut manager = ReplicaManager::new();
        assert_eq!(manager.construct(Player::new(1, "a"), &mut sent).unwrap(), 0);
        assert_eq!(manager.construct(Player::new(2, "b"), &mut sent).unwrap(), 1);
        assert_eq!(manager.network_id_of(2), Some(1));
        assert!(sent.is_empty());
    }

    #[test]
    fn late_participant_receives_existing_replicas() {
        let mut sent: Vec<(SocketAddr, Vec<u8>)> = Vec::new();
        let mut manager = ReplicaManager::new();
        manager.construct(Player::new(1, "a"), &mut sent).unwrap();
        manager.add_participant(addr(1), &mut sent).unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1[0], REPLICA_CONSTRUCTION);
        assert!(manager.is_observing(0, addr(1)));

        // Re-adding is a no-op.
        manager.add_participant(addr(1), &mut sent).unwrap();
        assert_eq!(sent.len(), 1);
    }

    #[test]
    fn unknown_ids_are_errors() {
        let mut sent: Vec<(SocketAddr, Vec<u8>)> = Vec::new();
        let mut manager: ReplicaManager<Player> = ReplicaManager::new();
        assert_eq!(
            manager.serialize(3, &mut sent),
            Err(ReplicaError::UnknownNetworkId { network_id: 3 })
        );
        assert!(manager.destruct(3, &mut sent).is_err());
    }

    #[test]
    fn destruct_reaches_observers_and_forgets() {
        let mut sent: Vec<(SocketAddr, Vec<u8>)> = Vec::new();
        let mut manager = ReplicaManager::new();
        manager.add_participant(addr(1), &mut sent).unwrap();
        let id = manager.construct(Player::new(1, "a"), &mut sent).unwrap();
        sent.clear();

        let player = manager.destruct(id, &mut sent).unwrap();
        assert_eq!(player.id, 1);
        assert_eq!(sent, vec![(addr(1), vec![REPLICA_DESTRUCTION, 0, 0])]);
        assert!(manager.is_empty());
    }

    #[test]
    fn removed_participant_gets_no_updates() {
        let mut sent: Vec<(SocketAddr, Vec<u8>)> = Vec::new();
        let mut manager = ReplicaManager::new();
        manager.add_participant(addr(1), &mut sent).unwrap();
        manager.add_participant(addr(2), &mut sent).unwrap();
        let id = manager.construct(Player::new(1, "a"), &mut sent).unwrap();
        manager.remove_participant(addr(2));
        sent.clear();

        manager.serialize(id, &mut sent).unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, addr(1));
    }
}
