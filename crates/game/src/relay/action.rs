use rkyv::{Archive, Deserialize, Serialize};

use crate::item::UseKind;

/// One discrete, relayable state change. Continuous motion never travels as
/// an action; it has its own unreliable path.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub enum Action {
    /// Arm the inventory item at `index`. `world_name` is minted by the
    /// originating authority for an item this displaces into the world.
    Equip {
        index: u32,
        world_name: Option<String>,
    },
    /// Detach the active item back to inventory.
    Stash,
    /// Forward a use to the active item's behavior.
    Use { kind: UseKind, released: bool },
    /// Drop the item at `index` (active item when `None`) into the world
    /// under the minted `world_name`.
    Discard {
        index: Option<u32>,
        world_name: Option<String>,
    },
}

impl Action {
    pub fn equip(index: u32) -> Self {
        Action::Equip {
            index,
            world_name: None,
        }
    }

    pub fn discard(index: Option<u32>) -> Self {
        Action::Discard {
            index,
            world_name: None,
        }
    }

    pub fn use_item(kind: UseKind, released: bool) -> Self {
        Action::Use { kind, released }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Action::Equip { .. } => "equip",
            Action::Stash => "stash",
            Action::Use { .. } => "use",
            Action::Discard { .. } => "discard",
        }
    }
}
