use glam::{Quat, Vec3};

use super::equipment::{EquippedItem, Equipment};
use super::motion::{clamp_pitch, CollisionQuery, Contact, MotionState, KILL_FLOOR_Y};
use super::vitality::{DamageEvent, Vitality};
use super::{ActionError, ActorId, Capabilities};
use crate::item::{Inventory, ItemKind, ItemRecord, UseKind};
use crate::net::PeerId;
use crate::session::{EventBus, SessionEvent, WorldHook};

pub const JUMP_STAMINA_COST: i32 = 10;

const DEFAULT_HEALTH: i32 = 100;
const DEFAULT_STAMINA: i32 = 100;
const HAND_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -1.5);

/// A simulated entity with position, inventory, equipment and health. All
/// mutation funnels through the relay entry points; nothing else touches the
/// containers directly.
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub owner: PeerId,
    pub position: Vec3,
    body_yaw: f32,
    head_pitch: f32,
    caps: Capabilities,
    inventory: Inventory,
    equipment: Equipment,
    vitality: Vitality,
    motion: MotionState,
    dead: bool,
}

impl Actor {
    pub fn new(id: ActorId, name: impl Into<String>, owner: PeerId) -> Self {
        Self {
            id,
            name: name.into(),
            owner,
            position: Vec3::ZERO,
            body_yaw: 0.0,
            head_pitch: 0.0,
            caps: Capabilities::DAMAGEABLE | Capabilities::COLLIDABLE,
            inventory: Inventory::new(),
            equipment: Equipment::new(ItemRecord::new(0, ItemKind::Hand, "hand")),
            vitality: Vitality::new(DEFAULT_HEALTH, DEFAULT_STAMINA),
            motion: MotionState::new(),
            dead: false,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_vitality(mut self, health_max: i32, stamina_max: i32) -> Self {
        self.vitality = Vitality::new(health_max, stamina_max);
        self
    }

    /// Stable path used by session events for attribution.
    pub fn path(&self) -> String {
        format!("/actors/{}", self.id)
    }

    pub fn caps(&self) -> Capabilities {
        self.caps
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn health(&self) -> i32 {
        self.vitality.health()
    }

    pub fn health_max(&self) -> i32 {
        self.vitality.health_max()
    }

    pub fn stamina(&self) -> i32 {
        self.vitality.stamina()
    }

    pub fn body_yaw(&self) -> f32 {
        self.body_yaw
    }

    pub fn head_pitch(&self) -> f32 {
        self.head_pitch
    }

    pub fn is_armed(&self) -> bool {
        self.equipment.is_armed()
    }

    pub fn is_busy(&self) -> bool {
        self.equipment.is_busy()
    }

    pub fn active_item(&self) -> Option<&ItemRecord> {
        self.equipment.active().map(|i| &i.record)
    }

    pub fn grounded(&self) -> bool {
        self.motion.grounded
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Quantity of named ammo, capped at `max` when `max > 0`.
    pub fn check_ammo(&self, name: &str, max: usize) -> usize {
        let quantity = self.inventory.quantity(ItemKind::Ammo, name);
        if max > 0 { quantity.min(max) } else { quantity }
    }

    /// Removes and returns up to `max` rounds of named ammo.
    pub fn request_ammo(&mut self, name: &str, max: usize) -> Vec<ItemRecord> {
        self.inventory.retrieve_by_query(ItemKind::Ammo, name, max)
    }

    pub fn store_items(&mut self, items: Vec<ItemRecord>) {
        for item in items {
            self.inventory.store(item);
        }
    }

    /// Arms the item at `index`. The displaced active item, if any, goes back
    /// to inventory, or to the world under `world_name` when it was picked up
    /// from there.
    pub fn equip(
        &mut self,
        index: usize,
        world_name: Option<String>,
        hook: &mut dyn WorldHook,
    ) -> Result<(), ActionError> {
        if self.dead {
            return Err(ActionError::AlreadyDead);
        }
        let record = self.inventory.retrieve(index).ok_or(ActionError::NotFound)?;
        log::debug!("{} equips {}", self.name, record.name);

        let displaced = self.equipment.arm(record, false, self.id);
        if let Some(item) = displaced {
            self.release_displaced(item, world_name, hook);
        }
        Ok(())
    }

    /// Arms an item grabbed straight from the world, bypassing inventory.
    pub fn pick_up_and_equip(
        &mut self,
        record: ItemRecord,
        hook: &mut dyn WorldHook,
    ) -> Result<(), ActionError> {
        if self.dead {
            return Err(ActionError::AlreadyDead);
        }
        log::debug!("{} picks up {}", self.name, record.name);

        let displaced = self.equipment.arm(record, true, self.id);
        if let Some(item) = displaced {
            self.release_displaced(item, None, hook);
        }
        Ok(())
    }

    fn release_displaced(
        &mut self,
        item: EquippedItem,
        world_name: Option<String>,
        hook: &mut dyn WorldHook,
    ) {
        let from_world = item.from_world;
        let record = item.into_record();
        if from_world {
            let name = world_name.unwrap_or_else(|| record.name.clone());
            hook.insert_item(record, name, self.drop_position());
        } else {
            self.inventory.store(record);
        }
    }

    /// Detaches the active item back into inventory, re-arming the fallback.
    pub fn stash(&mut self) -> Result<(), ActionError> {
        if self.dead {
            return Err(ActionError::AlreadyDead);
        }
        let record = self.equipment.stash()?;
        log::debug!("{} stashes {}", self.name, record.name);
        self.inventory.store(record);
        Ok(())
    }

    /// Forwards a use to the active behavior. A started strike comes back as
    /// a damage event stamped with this actor's path for attribution; the
    /// caller resolves the target and applies it.
    pub fn use_item(
        &mut self,
        kind: UseKind,
        released: bool,
    ) -> Result<Option<DamageEvent>, ActionError> {
        if self.dead {
            return Err(ActionError::AlreadyDead);
        }
        let event = self.equipment.use_item(kind, released)?;
        Ok(event.map(|e| e.from_sender(self.path())))
    }

    /// Collide hook: a body touched this actor. A mid-swing weapon answers
    /// with a strike against the toucher.
    pub fn on_collide(&mut self, other: ActorId) -> Option<DamageEvent> {
        if self.dead {
            return None;
        }
        let event = self.equipment.on_collide(other)?;
        Some(event.from_sender(self.path()))
    }

    /// Drops the item at `index` (or the active item when `index` is `None`)
    /// into the world as a freestanding pickup named `name`.
    pub fn discard(
        &mut self,
        index: Option<usize>,
        name: String,
        hook: &mut dyn WorldHook,
        bus: &mut EventBus,
    ) -> Result<(), ActionError> {
        if self.dead {
            return Err(ActionError::AlreadyDead);
        }
        let record = match index {
            Some(i) => self.inventory.retrieve(i).ok_or(ActionError::NotFound)?,
            None => self.equipment.stash()?,
        };
        log::debug!("{} discards {} as {}", self.name, record.name, name);

        hook.insert_item(record, name, self.drop_position());
        bus.emit(SessionEvent::ItemDiscarded {
            actor_path: self.path(),
        });
        Ok(())
    }

    fn drop_position(&self) -> Vec3 {
        self.position + Quat::from_rotation_y(self.body_yaw.to_radians()) * HAND_OFFSET
    }

    /// Applies one damage event and fires the death transition the moment
    /// health crosses to zero.
    pub fn receive_damage(
        &mut self,
        event: &DamageEvent,
        bus: &mut EventBus,
    ) -> Result<i32, ActionError> {
        if self.dead {
            return Err(ActionError::AlreadyDead);
        }
        if !self.caps.contains(Capabilities::DAMAGEABLE) {
            return Err(ActionError::InvalidTransition);
        }

        let delta = self.vitality.apply_damage(event)?;
        if self.vitality.is_dead() {
            self.die(event.sender.clone(), bus);
        }
        Ok(delta)
    }

    /// One-way death transition. Idempotent; broadcasts attribution on the
    /// session bus and touches no other actor.
    pub fn die(&mut self, killer: Option<String>, bus: &mut EventBus) {
        if self.dead {
            return;
        }
        self.dead = true;
        log::info!("{} died", self.name);
        bus.emit(SessionEvent::ActorDied {
            actor_path: self.path(),
            killer,
        });
    }

    /// Per-tick integration: gravity, item cooldowns, passive resource
    /// movement, and the out-of-bounds kill floor. Reports the motion contact
    /// so the world can dispatch collide hooks on touched entities.
    pub fn update(
        &mut self,
        dt: f32,
        surface: &dyn CollisionQuery,
        bus: &mut EventBus,
    ) -> Option<Contact> {
        if self.dead {
            return None;
        }

        let contact = self.motion.step(&mut self.position, dt, surface);
        self.equipment.tick(dt);

        let before = self.vitality.health();
        self.vitality.update(dt);
        if before > 0 && self.vitality.health() <= 0 {
            self.die(None, bus);
        }

        if self.position.y < KILL_FLOOR_Y {
            log::debug!("{} fell out of the map", self.name);
            self.die(None, bus);
        }

        contact
    }

    /// Upward launch; costs stamina through the damage pipeline.
    pub fn jump(&mut self, bus: &mut EventBus) -> bool {
        if self.dead || !self.motion.jump() {
            return false;
        }
        let _ = self.receive_damage(&DamageEvent::stamina(JUMP_STAMINA_COST), bus);
        true
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Absolute orientation, head pitch clamped before application.
    pub fn set_rotation(&mut self, body_yaw: f32, head_pitch: f32) {
        self.body_yaw = body_yaw;
        self.head_pitch = clamp_pitch(head_pitch);
    }

    /// Relative look input, same clamp as absolute application.
    pub fn turn(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.body_yaw += yaw_delta;
        self.head_pitch = clamp_pitch(self.head_pitch + pitch_delta);
    }
}
