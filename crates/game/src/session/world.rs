use std::collections::HashMap;

use glam::Vec3;

use super::{DroppedItems, EventBus, NameAllocator};
use crate::actor::{
    ActionError, Actor, ActorId, Capabilities, CollisionQuery, Contact, DamageEvent, FlatGround,
};
use crate::item::UseKind;
use crate::net::PeerId;

/// How far a melee strike reaches from the wielder.
const MELEE_REACH: f32 = 2.0;

const BODY_RADIUS: f32 = 0.5;
const BODY_HEIGHT: f32 = 1.8;

/// Collision surface for one mover: the ground plane plus every other
/// collidable body, reported as entity contacts so collide hooks can fire.
struct Terrain<'a> {
    ground: FlatGround,
    bodies: &'a [(ActorId, Vec3)],
}

impl CollisionQuery for Terrain<'_> {
    fn sweep(&self, from: Vec3, delta: Vec3) -> Option<Contact> {
        let mut best = self.ground.sweep(from, delta);
        if delta.y >= 0.0 {
            return best;
        }

        let to = from + delta;
        for &(id, pos) in self.bodies {
            let top = pos.y + BODY_HEIGHT;
            let lateral = Vec3::new(from.x - pos.x, 0.0, from.z - pos.z).length();
            if lateral > BODY_RADIUS || from.y < top || to.y > top {
                continue;
            }
            // Land on the highest surface the sweep crosses.
            if best.is_none_or(|b| top > b.position.y) {
                best = Some(Contact {
                    position: Vec3::new(to.x, top, to.z),
                    entity: Some(id),
                });
            }
        }
        best
    }
}

/// One process's view of the simulation: every actor it knows about, the
/// pickups lying around, and the outbound session events. Each peer holds its
/// own replica; the server's is canonical.
pub struct World {
    actors: HashMap<ActorId, Actor>,
    pub items: DroppedItems,
    pub ground: FlatGround,
    pub events: EventBus,
    pub names: NameAllocator,
    next_actor_id: ActorId,
}

impl World {
    pub fn new(local_peer: PeerId) -> Self {
        Self {
            actors: HashMap::new(),
            items: DroppedItems::new(),
            ground: FlatGround::default(),
            events: EventBus::new(),
            names: NameAllocator::new(local_peer),
            next_actor_id: 1,
        }
    }

    /// Ids are handed out sequentially so replicas performing the same spawn
    /// sequence agree on them.
    pub fn spawn_actor(&mut self, name: impl Into<String>, owner: PeerId, at: Vec3) -> ActorId {
        let id = self.next_actor_id;
        self.next_actor_id += 1;
        self.actors
            .insert(id, Actor::new(id, name, owner).with_position(at));
        id
    }

    pub fn despawn_actor(&mut self, id: ActorId) -> Option<Actor> {
        self.actors.remove(&id)
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Advances every live actor by one simulation tick, sweeping each one
    /// against the ground and every other collidable body. A contact with an
    /// entity invokes that entity's collide hook against the mover.
    pub fn step(&mut self, dt: f32) {
        let mut ids: Vec<ActorId> = self.actors.keys().copied().collect();
        ids.sort_unstable();

        for id in ids {
            let bodies: Vec<(ActorId, Vec3)> = self
                .actors
                .values()
                .filter(|a| {
                    a.id != id && !a.is_dead() && a.caps().contains(Capabilities::COLLIDABLE)
                })
                .map(|a| (a.id, a.position))
                .collect();
            let surface = Terrain {
                ground: self.ground,
                bodies: &bodies,
            };

            let Some(actor) = self.actors.get_mut(&id) else {
                continue;
            };
            let contact = actor.update(dt, &surface, &mut self.events);
            if let Some(touched) = contact.and_then(|c| c.entity) {
                self.dispatch_collide(touched, id);
            }
        }
    }

    /// The touched entity answers the collision; a mid-swing weapon strikes
    /// the mover.
    fn dispatch_collide(&mut self, touched: ActorId, mover: ActorId) {
        let Some(event) = self.actors.get_mut(&touched).and_then(|a| a.on_collide(mover)) else {
            return;
        };
        if let Some(mover) = self.actors.get_mut(&mover) {
            let _ = mover.receive_damage(&event, &mut self.events);
        }
    }

    pub fn equip(
        &mut self,
        id: ActorId,
        index: usize,
        world_name: Option<String>,
    ) -> Result<(), ActionError> {
        let actor = self.actors.get_mut(&id).ok_or(ActionError::NotFound)?;
        actor.equip(index, world_name, &mut self.items)
    }

    pub fn stash(&mut self, id: ActorId) -> Result<(), ActionError> {
        self.actors
            .get_mut(&id)
            .ok_or(ActionError::NotFound)?
            .stash()
    }

    /// Forwards a use to the actor's active item. A strike the use starts is
    /// resolved here: the nearest damageable actor within reach takes it.
    pub fn use_item(
        &mut self,
        id: ActorId,
        kind: UseKind,
        released: bool,
    ) -> Result<(), ActionError> {
        let attacker = self.actors.get_mut(&id).ok_or(ActionError::NotFound)?;
        let Some(event) = attacker.use_item(kind, released)? else {
            return Ok(());
        };
        let origin = attacker.position;

        if let Some(target) = self.melee_target(id, origin) {
            if let Some(target) = self.actors.get_mut(&target) {
                let _ = target.receive_damage(&event, &mut self.events);
            }
        }
        Ok(())
    }

    /// Nearest living damageable actor within melee reach, ties broken by id
    /// so every replica resolves the same target.
    fn melee_target(&self, attacker: ActorId, origin: Vec3) -> Option<ActorId> {
        self.actors
            .values()
            .filter(|a| {
                a.id != attacker
                    && !a.is_dead()
                    && a.caps().contains(Capabilities::DAMAGEABLE)
                    && a.position.distance(origin) <= MELEE_REACH
            })
            .map(|a| (a.position.distance(origin), a.id))
            .min_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)))
            .map(|(_, id)| id)
    }

    pub fn discard(
        &mut self,
        id: ActorId,
        index: Option<usize>,
        name: String,
    ) -> Result<(), ActionError> {
        let actor = self.actors.get_mut(&id).ok_or(ActionError::NotFound)?;
        actor.discard(index, name, &mut self.items, &mut self.events)
    }

    /// Grabs an interactable pickup off the ground and arms it directly.
    pub fn pick_up(&mut self, id: ActorId, item_index: usize) -> Result<(), ActionError> {
        let caps = self
            .items
            .get(item_index)
            .ok_or(ActionError::NotFound)?
            .caps;
        if !caps.contains(Capabilities::INTERACTABLE) {
            return Err(ActionError::InvalidTransition);
        }

        let actor = self.actors.get_mut(&id).ok_or(ActionError::NotFound)?;
        if actor.is_dead() {
            return Err(ActionError::AlreadyDead);
        }

        let item = self.items.take(item_index).ok_or(ActionError::NotFound)?;
        actor.pick_up_and_equip(item.record, &mut self.items)
    }

    pub fn apply_damage(&mut self, id: ActorId, event: &DamageEvent) -> Result<i32, ActionError> {
        let actor = self.actors.get_mut(&id).ok_or(ActionError::NotFound)?;
        actor.receive_damage(event, &mut self.events)
    }

    pub fn jump(&mut self, id: ActorId) -> bool {
        match self.actors.get_mut(&id) {
            Some(actor) => actor.jump(&mut self.events),
            None => false,
        }
    }
}
