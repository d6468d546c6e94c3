mod world;

pub use world::World;

use std::collections::VecDeque;

use glam::Vec3;

use crate::actor::Capabilities;
use crate::item::ItemRecord;
use crate::net::PeerId;

/// Events the core raises for the surrounding game layer (scoring, audio,
/// respawn flows). The core consumes nothing from this bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ActorDied {
        actor_path: String,
        killer: Option<String>,
    },
    ItemDiscarded {
        actor_path: String,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    pending: VecDeque<SessionEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: SessionEvent) {
        self.pending.push_back(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Mints display names for items freed into the world. Names are scoped by
/// the minting peer so a predicted name can never collide with one minted
/// concurrently elsewhere.
#[derive(Debug, Clone)]
pub struct NameAllocator {
    peer: PeerId,
    next: u32,
}

impl NameAllocator {
    pub fn new(peer: PeerId) -> Self {
        Self { peer, next: 0 }
    }

    pub fn next_item_name(&mut self) -> String {
        let n = self.next;
        self.next += 1;
        format!("item_{}_{}", self.peer, n)
    }
}

/// Places a freestanding item at a world transform under a caller-supplied
/// display name.
pub trait WorldHook {
    fn insert_item(&mut self, record: ItemRecord, name: String, at: Vec3);
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorldItem {
    pub record: ItemRecord,
    pub position: Vec3,
    pub caps: Capabilities,
}

/// Freestanding pickups lying in the world.
#[derive(Debug, Default)]
pub struct DroppedItems {
    items: Vec<WorldItem>,
}

impl DroppedItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&WorldItem> {
        self.items.get(index)
    }

    pub fn take(&mut self, index: usize) -> Option<WorldItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorldItem> {
        self.items.iter()
    }
}

impl WorldHook for DroppedItems {
    fn insert_item(&mut self, mut record: ItemRecord, name: String, at: Vec3) {
        record.name = name;
        self.items.push(WorldItem {
            record,
            position: at,
            caps: Capabilities::INTERACTABLE | Capabilities::COLLIDABLE,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;

    #[test]
    fn name_allocator_scopes_by_peer() {
        let mut server = NameAllocator::new(1);
        let mut client = NameAllocator::new(2);

        assert_eq!(server.next_item_name(), "item_1_0");
        assert_eq!(server.next_item_name(), "item_1_1");
        assert_eq!(client.next_item_name(), "item_2_0");
    }

    #[test]
    fn event_bus_drains_in_order() {
        let mut bus = EventBus::new();
        bus.emit(SessionEvent::ItemDiscarded {
            actor_path: "/actors/1".into(),
        });
        bus.emit(SessionEvent::ActorDied {
            actor_path: "/actors/1".into(),
            killer: None,
        });

        let events: Vec<_> = bus.drain().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SessionEvent::ItemDiscarded { .. }));
        assert!(bus.is_empty());
    }

    #[test]
    fn inserted_items_are_interactable() {
        let mut items = DroppedItems::new();
        items.insert_item(
            ItemRecord::new(1, ItemKind::MeleeWeapon, "sword"),
            "item_1_0".into(),
            Vec3::ZERO,
        );

        let item = items.get(0).unwrap();
        assert_eq!(item.record.name, "item_1_0");
        assert!(item.caps.contains(Capabilities::INTERACTABLE));
    }
}
