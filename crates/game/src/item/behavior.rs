use rkyv::{rancor, Archive, Deserialize, Serialize};

use super::record::{ItemKind, ItemRecord};
use crate::actor::{ActorId, DamageEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub enum UseKind {
    Primary,
    Secondary,
}

/// Behavior attached to an equipped item. Cooldowns are the behavior's own
/// concern: `use_item` while busy must be rejected here, not by the caller.
/// A use or a collision may produce a damage event; the world routes it to
/// the struck actor.
pub trait ItemBehavior {
    fn on_equip(&mut self, owner: ActorId);
    fn on_unequip(&mut self);
    fn use_item(&mut self, kind: UseKind, released: bool) -> Option<DamageEvent>;
    fn is_busy(&self) -> bool;
    fn on_collide(&mut self, _other: ActorId) -> Option<DamageEvent> {
        None
    }
    fn tick(&mut self, _dt: f32) {}
    fn serialize_state(&self) -> Vec<u8> {
        Vec::new()
    }
    fn deserialize_state(&mut self, _blob: &[u8]) {}
}

/// Restores a behavior instance for a record, replaying its state blob.
pub fn behavior_for(record: &ItemRecord) -> Box<dyn ItemBehavior> {
    let mut behavior: Box<dyn ItemBehavior> = match record.kind {
        ItemKind::Hand => Box::new(MeleeWeapon::hand()),
        ItemKind::MeleeWeapon => Box::new(MeleeWeapon::default()),
        ItemKind::Ammo => Box::new(Inert),
    };
    if !record.state.is_empty() {
        behavior.deserialize_state(&record.state);
    }
    behavior
}

/// Items with no active use, e.g. ammo stacks.
pub struct Inert;

impl ItemBehavior for Inert {
    fn on_equip(&mut self, _owner: ActorId) {}
    fn on_unequip(&mut self) {}
    fn use_item(&mut self, _kind: UseKind, _released: bool) -> Option<DamageEvent> {
        None
    }
    fn is_busy(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
struct MeleeWeaponState {
    damage: i32,
}

/// Swings forward on use, damaging the first thing it hits, then draws back
/// after a fixed busy delay. Also backs the unarmed hand with a weaker
/// strike.
pub struct MeleeWeapon {
    damage: i32,
    busy_remaining: f32,
    swinging: bool,
    wielder: Option<ActorId>,
}

impl MeleeWeapon {
    pub const DEFAULT_DAMAGE: i32 = 10;
    pub const HAND_DAMAGE: i32 = 3;
    pub const SWING_DELAY: f32 = 0.5;

    pub fn new(damage: i32) -> Self {
        Self {
            damage,
            busy_remaining: 0.0,
            swinging: false,
            wielder: None,
        }
    }

    pub fn hand() -> Self {
        Self::new(Self::HAND_DAMAGE)
    }

    pub fn damage(&self) -> i32 {
        self.damage
    }

    pub fn is_swinging(&self) -> bool {
        self.swinging
    }

    fn swing(&mut self) -> Option<DamageEvent> {
        if self.is_busy() {
            return None;
        }
        self.swinging = true;
        self.busy_remaining = Self::SWING_DELAY;
        Some(DamageEvent::new(self.damage))
    }
}

impl Default for MeleeWeapon {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DAMAGE)
    }
}

impl ItemBehavior for MeleeWeapon {
    fn on_equip(&mut self, owner: ActorId) {
        self.wielder = Some(owner);
    }

    fn on_unequip(&mut self) {
        self.wielder = None;
        self.swinging = false;
        self.busy_remaining = 0.0;
    }

    fn use_item(&mut self, kind: UseKind, released: bool) -> Option<DamageEvent> {
        if released || kind != UseKind::Primary {
            return None;
        }
        self.swing()
    }

    fn is_busy(&self) -> bool {
        self.busy_remaining > 0.0
    }

    /// A body running into a mid-swing weapon takes the strike; the first hit
    /// ends the swing while the busy delay keeps running.
    fn on_collide(&mut self, _other: ActorId) -> Option<DamageEvent> {
        if !self.swinging {
            return None;
        }
        self.swinging = false;
        Some(DamageEvent::new(self.damage))
    }

    fn tick(&mut self, dt: f32) {
        if self.busy_remaining > 0.0 {
            self.busy_remaining -= dt;
            if self.busy_remaining <= 0.0 {
                self.busy_remaining = 0.0;
                self.swinging = false;
            }
        }
    }

    fn serialize_state(&self) -> Vec<u8> {
        let state = MeleeWeaponState {
            damage: self.damage,
        };
        match rkyv::to_bytes::<rancor::Error>(&state) {
            Ok(bytes) => bytes.into_vec(),
            Err(err) => {
                log::warn!("melee weapon state encode failed: {}", err);
                Vec::new()
            }
        }
    }

    fn deserialize_state(&mut self, blob: &[u8]) {
        match rkyv::from_bytes::<MeleeWeaponState, rancor::Error>(blob) {
            Ok(state) => self.damage = state.damage,
            Err(err) => log::warn!("melee weapon state decode failed: {}", err),
        }
    }
}
