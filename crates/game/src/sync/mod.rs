use crate::actor::clamp_pitch;
use crate::net::{Message, Outgoing, Recipient};
use crate::relay::NetContext;
use crate::session::World;

/// Periodic unreliable broadcast of position and orientation for the actors
/// this peer owns. Independent of the action relay: no acks, no retries, a
/// dropped update is superseded by the next tick's.
#[derive(Debug)]
pub struct MovementSync {
    send_interval: u32,
    counter: u32,
}

impl MovementSync {
    pub const DEFAULT_INTERVAL: u32 = 3;

    pub fn new(send_interval: u32) -> Self {
        Self {
            send_interval: send_interval.max(1),
            counter: 0,
        }
    }

    /// Called once per simulation tick; emits on every `send_interval`-th.
    pub fn tick(&mut self, world: &World, ctx: &NetContext) -> Vec<Outgoing> {
        if !ctx.net_active() {
            return Vec::new();
        }

        self.counter += 1;
        if self.counter < self.send_interval {
            return Vec::new();
        }
        self.counter = 0;

        let mut out = Vec::new();
        for actor in world.actors() {
            if actor.owner != ctx.local_peer || actor.is_dead() {
                continue;
            }
            out.push(Outgoing::new(
                Recipient::AllExcept(ctx.local_peer),
                Message::Position {
                    actor: actor.id,
                    x: actor.position.x,
                    y: actor.position.y,
                    z: actor.position.z,
                },
            ));
            out.push(Outgoing::new(
                Recipient::AllExcept(ctx.local_peer),
                Message::Rotation {
                    actor: actor.id,
                    body_yaw: actor.body_yaw(),
                    head_pitch: clamp_pitch(actor.head_pitch()),
                },
            ));
        }
        out
    }
}

impl Default for MovementSync {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}
