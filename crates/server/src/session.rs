use std::time::{Duration, Instant};

use glam::Vec3;

use skirmish::{
    handle_message, submit, Action, ActorId, ItemKind, ItemRecord, LoopbackNetwork, LoopbackStats,
    MovementSync, NetContext, PeerId, SessionEvent, UseKind, World, SERVER_PEER,
};

use crate::config::HostConfig;

struct PeerSim {
    ctx: NetContext,
    world: World,
    sync: MovementSync,
}

impl PeerSim {
    fn new(ctx: NetContext, sync_interval: u32) -> Self {
        Self {
            ctx,
            world: World::new(ctx.local_peer),
            sync: MovementSync::new(sync_interval),
        }
    }

    fn pump_inbox(&mut self, net: &mut LoopbackNetwork) {
        for message in net.recv(self.ctx.local_peer) {
            let out = handle_message(&mut self.world, &self.ctx, message);
            if let Err(err) = net.send_all(self.ctx.local_peer, out) {
                log::warn!("peer {}: send failed: {}", self.ctx.local_peer, err);
            }
        }
    }

    fn drain_events(&mut self) {
        let peer = self.ctx.local_peer;
        for event in self.world.events.drain() {
            match event {
                SessionEvent::ActorDied { actor_path, killer } => match killer {
                    Some(killer) => {
                        log::info!("peer {}: {} died to {}", peer, actor_path, killer)
                    }
                    None => log::info!("peer {}: {} died", peer, actor_path),
                },
                SessionEvent::ItemDiscarded { actor_path } => {
                    log::info!("peer {}: {} discarded an item", peer, actor_path)
                }
            }
        }
    }
}

/// An authoritative session plus its client replicas, wired over the
/// loopback router. Clients run a small action script so the full relay
/// round-trip is exercised without any real input devices.
pub struct HostedSession {
    config: HostConfig,
    net: LoopbackNetwork,
    server: PeerSim,
    clients: Vec<PeerSim>,
    avatars: Vec<(PeerId, ActorId)>,
    tick: u64,
}

impl HostedSession {
    pub fn new(config: HostConfig) -> Self {
        let mut net = LoopbackNetwork::new();
        net.set_loss(skirmish::LossConfig {
            enabled: config.loss_percent > 0.0,
            loss_percent: config.loss_percent,
        });

        net.register(SERVER_PEER);
        let mut server = PeerSim::new(NetContext::server(), config.sync_interval);

        let mut clients = Vec::new();
        for i in 0..config.client_peers {
            let peer = SERVER_PEER + 1 + i;
            net.register(peer);
            clients.push(PeerSim::new(NetContext::client(peer), config.sync_interval));
        }

        // Every replica performs the same spawn sequence so ids agree.
        let client_peers: Vec<PeerId> = clients.iter().map(|c| c.ctx.local_peer).collect();
        let avatars = spawn_avatars(&mut server.world, &client_peers);
        for client in &mut clients {
            let replica = spawn_avatars(&mut client.world, &client_peers);
            debug_assert_eq!(replica, avatars);
        }

        Self {
            config,
            net,
            server,
            clients,
            avatars,
            tick: 0,
        }
    }

    pub fn run(&mut self) {
        let tick_duration = Duration::from_secs_f64(1.0 / self.config.tick_rate as f64);
        let mut last = Instant::now();

        while self.tick < self.config.run_ticks {
            if self.config.realtime {
                let elapsed = last.elapsed();
                if elapsed < tick_duration {
                    std::thread::sleep(tick_duration - elapsed);
                }
                last = Instant::now();
            }
            self.tick_once();
        }
    }

    pub fn tick_once(&mut self) {
        let dt = 1.0 / self.config.tick_rate as f32;

        // Scripted client inputs go through the relay like any other input.
        for (i, client) in self.clients.iter_mut().enumerate() {
            let (_, actor) = self.avatars[i];
            if let Some(action) = scripted_action(self.tick, i as u64) {
                log::debug!(
                    "peer {} submits {} on actor {}",
                    client.ctx.local_peer,
                    action.kind_name(),
                    actor
                );
                let out = submit(&mut client.world, &client.ctx, actor, action);
                if let Err(err) = net_send(&mut self.net, client.ctx.local_peer, out) {
                    log::warn!("peer {}: send failed: {}", client.ctx.local_peer, err);
                }
            }
            if self.tick % 240 == 200 + i as u64 {
                client.world.jump(actor);
            }
        }

        // Requests reach the server, rebroadcasts fan back out.
        self.server.pump_inbox(&mut self.net);
        for client in &mut self.clients {
            client.pump_inbox(&mut self.net);
        }

        // Simulation advances everywhere, then owners publish movement.
        self.server.world.step(dt);
        for client in &mut self.clients {
            client.world.step(dt);
        }

        let out = self.server.sync.tick(&self.server.world, &self.server.ctx);
        let _ = net_send(&mut self.net, SERVER_PEER, out);
        for client in &mut self.clients {
            let out = client.sync.tick(&client.world, &client.ctx);
            let _ = net_send(&mut self.net, client.ctx.local_peer, out);
        }

        self.server.drain_events();
        for client in &mut self.clients {
            client.drain_events();
        }

        self.tick += 1;
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn net_stats(&self) -> LoopbackStats {
        self.net.stats()
    }

    pub fn server_world(&self) -> &World {
        &self.server.world
    }
}

fn net_send(
    net: &mut LoopbackNetwork,
    from: PeerId,
    out: Vec<skirmish::Outgoing>,
) -> Result<(), skirmish::WireError> {
    net.send_all(from, out)
}

fn spawn_avatars(world: &mut World, client_peers: &[PeerId]) -> Vec<(PeerId, ActorId)> {
    let mut avatars = Vec::new();
    for (i, &peer) in client_peers.iter().enumerate() {
        let id = world.spawn_actor(
            format!("avatar_{}", peer),
            peer,
            Vec3::new(i as f32 * 2.0, 1.0, 0.0),
        );
        if let Some(actor) = world.actor_mut(id) {
            actor
                .inventory_mut()
                .store(ItemRecord::new(1, ItemKind::MeleeWeapon, "sword"));
            actor
                .inventory_mut()
                .store(ItemRecord::new(2, ItemKind::Ammo, "bullet"));
        }
        avatars.push((peer, id));
    }
    avatars
}

/// Equip early, swing periodically, drop the ammo late. Offset per client so
/// actions interleave at the server.
fn scripted_action(tick: u64, client_index: u64) -> Option<Action> {
    let t = tick.saturating_sub(client_index * 7);
    match t {
        30 => Some(Action::equip(0)),
        300 => Some(Action::discard(Some(1))),
        420 => Some(Action::Stash),
        t if t > 30 && t % 120 == 0 => Some(Action::use_item(UseKind::Primary, false)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosted_session_converges_across_replicas() {
        let config = HostConfig {
            run_ticks: 360,
            ..Default::default()
        };
        let mut session = HostedSession::new(config);
        session.run();

        // Everyone scripted an equip at tick 30; the server copy must agree.
        for (_, actor_id) in &session.avatars {
            assert!(session.server_world().actor(*actor_id).unwrap().is_armed());
        }
    }
}
