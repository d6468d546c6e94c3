use rkyv::{rancor, Archive, Deserialize, Serialize};

use crate::actor::ActorId;
use crate::relay::Action;

pub type PeerId = u16;

/// The server/host always occupies peer 1.
pub const SERVER_PEER: PeerId = 1;
pub const DEFAULT_TICK_RATE: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub enum Channel {
    /// Ordered and lossless; carries discrete actions.
    Reliable,
    /// Fire-and-forget; a dropped update is superseded by the next one.
    Unreliable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Server,
    Peer(PeerId),
    AllExcept(PeerId),
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub enum Message {
    /// Client-to-server: act on my behalf and fan out to everyone else.
    ActionRequest {
        actor: ActorId,
        action: Action,
        originator: PeerId,
    },
    /// Server-to-peers: apply locally, never re-forward.
    ActionBroadcast {
        actor: ActorId,
        action: Action,
        originator: PeerId,
    },
    Position {
        actor: ActorId,
        x: f32,
        y: f32,
        z: f32,
    },
    Rotation {
        actor: ActorId,
        body_yaw: f32,
        head_pitch: f32,
    },
}

impl Message {
    pub fn channel(&self) -> Channel {
        match self {
            Message::ActionRequest { .. } | Message::ActionBroadcast { .. } => Channel::Reliable,
            Message::Position { .. } | Message::Rotation { .. } => Channel::Unreliable,
        }
    }

    pub fn serialize(&self) -> Result<Vec<u8>, WireError> {
        rkyv::to_bytes::<rancor::Error>(self)
            .map(|aligned| aligned.into_vec())
            .map_err(WireError::Encode)
    }

    pub fn deserialize(data: &[u8]) -> Result<Self, WireError> {
        rkyv::from_bytes::<Self, rancor::Error>(data).map_err(WireError::Decode)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("message encode failed: {0}")]
    Encode(rancor::Error),
    #[error("message decode failed: {0}")]
    Decode(rancor::Error),
}

/// A message the relay or sync layer wants delivered. The channel is implied
/// by the message kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Outgoing {
    pub to: Recipient,
    pub message: Message,
}

impl Outgoing {
    pub fn new(to: Recipient, message: Message) -> Self {
        Self { to, message }
    }

    pub fn channel(&self) -> Channel {
        self.message.channel()
    }
}
