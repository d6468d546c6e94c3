use crate::net::{PeerId, SERVER_PEER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetRole {
    /// No session: local application is the entire protocol.
    Offline,
    /// The single ordering authority.
    Server,
    Client,
}

/// Per-process network identity, constructed once and threaded through the
/// relay and sync layers instead of being reached statically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetContext {
    pub local_peer: PeerId,
    pub role: NetRole,
}

impl NetContext {
    pub fn offline() -> Self {
        Self {
            local_peer: SERVER_PEER,
            role: NetRole::Offline,
        }
    }

    pub fn server() -> Self {
        Self {
            local_peer: SERVER_PEER,
            role: NetRole::Server,
        }
    }

    pub fn client(local_peer: PeerId) -> Self {
        Self {
            local_peer,
            role: NetRole::Client,
        }
    }

    pub fn is_server(&self) -> bool {
        self.role == NetRole::Server
    }

    pub fn net_active(&self) -> bool {
        self.role != NetRole::Offline
    }
}
