mod loopback;
mod protocol;

pub use loopback::{LoopbackNetwork, LoopbackStats, LossConfig};
pub use protocol::{
    Channel, Message, Outgoing, PeerId, Recipient, WireError, DEFAULT_TICK_RATE, SERVER_PEER,
};
