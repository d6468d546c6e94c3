use glam::Vec3;

use skirmish::{
    handle_message, submit, Action, ActorId, ItemKind, ItemRecord, LoopbackNetwork, Message,
    MovementSync, NetContext, SessionEvent, UseKind, World, SERVER_PEER,
};

struct Peer {
    ctx: NetContext,
    world: World,
}

impl Peer {
    fn new(ctx: NetContext) -> Self {
        let world = World::new(ctx.local_peer);
        Self { ctx, world }
    }

    fn handle_inbox(&mut self, net: &mut LoopbackNetwork) -> bool {
        let inbox = net.recv(self.ctx.local_peer);
        let had_any = !inbox.is_empty();
        for message in inbox {
            let out = handle_message(&mut self.world, &self.ctx, message);
            net.send_all(self.ctx.local_peer, out).unwrap();
        }
        had_any
    }

    fn actor(&self, id: ActorId) -> &skirmish::Actor {
        self.world.actor(id).unwrap()
    }
}

/// Every replica runs the same spawn sequence, so ids and slots agree
/// everywhere. A lobby load makes the same assumption.
fn spawn_loadout(world: &mut World) -> ActorId {
    let id = world.spawn_actor("hero", 2, Vec3::new(0.0, 1.0, 0.0));
    let actor = world.actor_mut(id).unwrap();
    actor
        .inventory_mut()
        .store(ItemRecord::new(1, ItemKind::MeleeWeapon, "sword"));
    actor
        .inventory_mut()
        .store(ItemRecord::new(2, ItemKind::Ammo, "bullet"));
    id
}

/// Server (peer 1) plus clients 2 and 3, identical replicas.
fn star_session() -> (LoopbackNetwork, Peer, Peer, Peer, ActorId) {
    let mut net = LoopbackNetwork::new();
    for peer in [1, 2, 3] {
        net.register(peer);
    }

    let mut server = Peer::new(NetContext::server());
    let mut client2 = Peer::new(NetContext::client(2));
    let mut client3 = Peer::new(NetContext::client(3));

    let id = spawn_loadout(&mut server.world);
    assert_eq!(spawn_loadout(&mut client2.world), id);
    assert_eq!(spawn_loadout(&mut client3.world), id);

    (net, server, client2, client3, id)
}

fn pump(net: &mut LoopbackNetwork, peers: &mut [&mut Peer]) {
    loop {
        let mut any = false;
        for peer in peers.iter_mut() {
            any |= peer.handle_inbox(net);
        }
        if !any {
            break;
        }
    }
}

#[test]
fn client_equip_propagates_to_all_peers_exactly_once() {
    let (mut net, mut server, mut client2, mut client3, id) = star_session();

    // Prediction: the acting peer applies immediately.
    let out = submit(&mut client2.world, &client2.ctx, id, Action::equip(0));
    assert!(client2.actor(id).is_armed());
    assert!(!server.actor(id).is_armed());
    net.send_all(client2.ctx.local_peer, out).unwrap();

    // Server validates, applies, rebroadcasts to peer 3 only.
    assert!(server.handle_inbox(&mut net));
    assert!(server.actor(id).is_armed());
    assert!(net.recv(2).is_empty(), "originator must not hear its own action");

    assert!(client3.handle_inbox(&mut net));
    assert!(client3.actor(id).is_armed());

    // No double removal anywhere: one sword left everyone's inventory once.
    for peer in [&server, &client2, &client3] {
        assert_eq!(peer.actor(id).inventory().count(), 1);
        assert_eq!(peer.actor(id).active_item().unwrap().name, "sword");
    }
}

#[test]
fn use_action_reaches_remote_replicas() {
    let (mut net, mut server, mut client2, mut client3, id) = star_session();

    let out = submit(&mut client2.world, &client2.ctx, id, Action::equip(0));
    net.send_all(2, out).unwrap();
    pump(&mut net, &mut [&mut server, &mut client2, &mut client3]);

    let out = submit(
        &mut client2.world,
        &client2.ctx,
        id,
        Action::use_item(UseKind::Primary, false),
    );
    net.send_all(2, out).unwrap();
    pump(&mut net, &mut [&mut server, &mut client2, &mut client3]);

    for peer in [&server, &client2, &client3] {
        assert!(peer.actor(id).is_busy(), "swing should replicate");
    }
}

#[test]
fn competing_discards_leave_one_world_item_on_the_server() {
    let (mut net, mut server, mut client2, mut client3, id) = star_session();

    // Both clients predict a discard of the same slot.
    let out2 = submit(&mut client2.world, &client2.ctx, id, Action::discard(Some(0)));
    let out3 = submit(&mut client3.world, &client3.ctx, id, Action::discard(Some(0)));
    net.send_all(2, out2).unwrap();
    net.send_all(3, out3).unwrap();

    // The server applies whichever request lands first and silently drops
    // the stale one; nobody crashes and no extra item appears.
    pump(&mut net, &mut [&mut server, &mut client2, &mut client3]);

    assert_eq!(server.world.items.len(), 1);
    assert_eq!(server.actor(id).inventory().count(), 1);
}

#[test]
fn single_player_discard_needs_no_session() {
    let mut world = World::new(SERVER_PEER);
    let id = spawn_loadout(&mut world);

    let out = submit(&mut world, &NetContext::offline(), id, Action::discard(Some(0)));
    assert!(out.is_empty());

    assert_eq!(world.items.len(), 1);
    let dropped = world.items.iter().next().unwrap();
    assert_eq!(dropped.record.name, "item_1_0");

    let events: Vec<_> = world.events.drain().collect();
    assert_eq!(
        events,
        vec![SessionEvent::ItemDiscarded {
            actor_path: format!("/actors/{}", id),
        }]
    );
}

#[test]
fn discarding_the_active_item_drops_it_and_unarms() {
    let mut world = World::new(SERVER_PEER);
    let id = spawn_loadout(&mut world);
    let ctx = NetContext::offline();

    submit(&mut world, &ctx, id, Action::equip(0));
    assert!(world.actor(id).unwrap().is_armed());

    submit(&mut world, &ctx, id, Action::discard(None));

    let actor = world.actor(id).unwrap();
    assert!(!actor.is_armed());
    assert_eq!(actor.inventory().count(), 1);
    assert_eq!(world.items.len(), 1);
    assert_eq!(world.items.iter().next().unwrap().record.name, "item_1_0");
}

#[test]
fn movement_sync_updates_remote_replicas() {
    let (mut net, mut server, mut client2, mut client3, id) = star_session();

    let moved = Vec3::new(4.0, 1.0, -2.0);
    client2.world.actor_mut(id).unwrap().set_position(moved);
    client2.world.actor_mut(id).unwrap().set_rotation(90.0, 30.0);

    let mut sync = MovementSync::new(1);
    let out = sync.tick(&client2.world, &client2.ctx);
    assert_eq!(out.len(), 2);
    net.send_all(2, out).unwrap();
    pump(&mut net, &mut [&mut server, &mut client2, &mut client3]);

    for peer in [&server, &client3] {
        let actor = peer.actor(id);
        assert_eq!(actor.position, moved);
        assert_eq!(actor.body_yaw(), 90.0);
        assert_eq!(actor.head_pitch(), 30.0);
    }
}

#[test]
fn stale_position_for_unknown_actor_is_ignored() {
    let mut world = World::new(3);
    let ctx = NetContext::client(3);

    // An update for an actor this replica never spawned must be a no-op.
    let out = handle_message(
        &mut world,
        &ctx,
        Message::Position {
            actor: 99,
            x: 1.0,
            y: 2.0,
            z: 3.0,
        },
    );
    assert!(out.is_empty());
    assert_eq!(world.actor_count(), 0);
}
