use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

pub type ItemId = u32;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Archive,
    Serialize,
    Deserialize,
    SerdeSerialize,
    SerdeDeserialize,
)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub enum ItemKind {
    Hand,
    MeleeWeapon,
    Ammo,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Hand => "hand",
            ItemKind::MeleeWeapon => "melee_weapon",
            ItemKind::Ammo => "ammo",
        }
    }
}

/// A flat item. Behavior state rides along as an opaque blob so records can
/// cross the wire and containers without knowing the concrete behavior type.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize)]
#[rkyv(derive(Debug))]
pub struct ItemRecord {
    pub id: ItemId,
    pub kind: ItemKind,
    pub name: String,
    pub state: Vec<u8>,
}

impl ItemRecord {
    pub fn new(id: ItemId, kind: ItemKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            state: Vec::new(),
        }
    }

    pub fn with_state(mut self, state: Vec<u8>) -> Self {
        self.state = state;
        self
    }

    pub fn matches(&self, kind: ItemKind, name: &str) -> bool {
        self.kind == kind && self.name == name
    }
}
