//! Game-message dispatch: inner message id to handler.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use bitstream::BitReader;
use tracing::debug;
use wire::{ClientGameMessage, GameMessageId, Transport};

use crate::backend::{Backend, Session};
use crate::error::{ServerError, ServerResult};
use crate::server::Server;

/// Handles one game message. The reader is positioned at the start of the
/// inner payload.
pub type GameMessageHandler<B, T> = fn(
    &mut Server<B, T>,
    &ClientGameMessage,
    SocketAddr,
    &Session,
    &mut BitReader<'_>,
) -> ServerResult<()>;

/// Maps inner message ids to their handlers.
pub struct GameMessageDispatcher<B, T> {
    handlers: BTreeMap<GameMessageId, GameMessageHandler<B, T>>,
}

impl<B, T> Default for GameMessageDispatcher<B, T> {
    fn default() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }
}

impl<B, T> GameMessageDispatcher<B, T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `id`, returning the handler it replaces.
    pub fn register(
        &mut self,
        id: GameMessageId,
        handler: GameMessageHandler<B, T>,
    ) -> Option<GameMessageHandler<B, T>> {
        self.handlers.insert(id, handler)
    }

    /// Returns the handler for a raw inner id.
    #[must_use]
    pub fn get(&self, raw: u16) -> Option<GameMessageHandler<B, T>> {
        GameMessageId::from_raw(raw).and_then(|id| self.handlers.get(&id).copied())
    }

    /// Message ids with a handler, in id order.
    pub fn registered(&self) -> impl Iterator<Item = GameMessageId> + '_ {
        self.handlers.keys().copied()
    }
}

impl<B: Backend, T: Transport> Server<B, T> {
    /// Dispatches a game message to the handler for its inner id.
    ///
    /// Ids without a handler are logged and ignored. The session is resolved
    /// only once a handler is known to exist.
    pub fn handle_game_message(
        &mut self,
        message: &ClientGameMessage,
        addr: SocketAddr,
    ) -> ServerResult<()> {
        let Some(handler) = self.dispatcher.get(message.message_id) else {
            debug!(%addr, message_id = message.message_id, "unhandled game message");
            return Ok(());
        };
        let session = self
            .backend
            .get_session(addr)
            .ok_or(ServerError::SessionNotFound { addr })?;
        let mut reader = message.payload_reader();
        handler(self, message, addr, &session, &mut reader)
    }
}
