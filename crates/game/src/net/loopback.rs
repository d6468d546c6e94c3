use std::collections::{HashMap, VecDeque};

use super::protocol::{Channel, Message, Outgoing, PeerId, Recipient, WireError, SERVER_PEER};

/// Unreliable-channel loss knob for tests and hosted sessions. Reliable
/// traffic is never dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct LossConfig {
    pub enabled: bool,
    pub loss_percent: f32,
}

impl LossConfig {
    pub fn should_drop(&self) -> bool {
        if !self.enabled || self.loss_percent <= 0.0 {
            return false;
        }
        rand_percent() * 100.0 < self.loss_percent
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoopbackStats {
    pub packets_sent: u64,
    pub packets_dropped: u64,
    pub bytes_sent: u64,
}

/// In-process stand-in for the two channels the engine assumes: per-peer
/// ordered lossless inboxes for reliable traffic and droppable inboxes for
/// unreliable traffic. Every message still round-trips through the wire
/// encoding.
#[derive(Debug, Default)]
pub struct LoopbackNetwork {
    peers: Vec<PeerId>,
    inboxes: HashMap<PeerId, VecDeque<Message>>,
    loss: LossConfig,
    stats: LoopbackStats,
}

impl LoopbackNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, peer: PeerId) {
        if !self.peers.contains(&peer) {
            self.peers.push(peer);
            self.inboxes.insert(peer, VecDeque::new());
        }
    }

    pub fn set_loss(&mut self, loss: LossConfig) {
        self.loss = loss;
    }

    pub fn stats(&self) -> LoopbackStats {
        self.stats
    }

    /// Routes one outgoing message from `from` to its recipients. Sends are
    /// fire-and-forget: a dropped unreliable packet is not an error.
    pub fn send(&mut self, from: PeerId, outgoing: Outgoing) -> Result<(), WireError> {
        let bytes = outgoing.message.serialize()?;

        for target in self.resolve(from, outgoing.to) {
            if outgoing.channel() == Channel::Unreliable && self.loss.should_drop() {
                self.stats.packets_dropped += 1;
                continue;
            }
            let message = Message::deserialize(&bytes)?;
            if let Some(inbox) = self.inboxes.get_mut(&target) {
                self.stats.packets_sent += 1;
                self.stats.bytes_sent += bytes.len() as u64;
                inbox.push_back(message);
            }
        }
        Ok(())
    }

    pub fn send_all(&mut self, from: PeerId, outgoing: Vec<Outgoing>) -> Result<(), WireError> {
        for message in outgoing {
            self.send(from, message)?;
        }
        Ok(())
    }

    /// Drains everything queued for `peer`, in delivery order.
    pub fn recv(&mut self, peer: PeerId) -> Vec<Message> {
        match self.inboxes.get_mut(&peer) {
            Some(inbox) => inbox.drain(..).collect(),
            None => Vec::new(),
        }
    }

    fn resolve(&self, from: PeerId, to: Recipient) -> Vec<PeerId> {
        match to {
            Recipient::Server => vec![SERVER_PEER],
            Recipient::Peer(peer) => vec![peer],
            Recipient::AllExcept(excluded) => self
                .peers
                .iter()
                .copied()
                .filter(|p| *p != excluded && *p != from)
                .collect(),
        }
    }
}

fn rand_percent() -> f32 {
    rand_u64() as f32 / u64::MAX as f32
}

fn rand_u64() -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use std::time::Instant;

    let mut hasher = DefaultHasher::new();
    Instant::now().hash(&mut hasher);
    hasher.finish()
}
