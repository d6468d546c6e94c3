mod behavior;
mod inventory;
mod record;

pub use behavior::{behavior_for, Inert, ItemBehavior, MeleeWeapon, UseKind};
pub use inventory::Inventory;
pub use record::{ItemId, ItemKind, ItemRecord};
