pub mod actor;
pub mod item;
pub mod net;
pub mod relay;
pub mod session;
pub mod sync;

pub use actor::{
    ActionError, Actor, ActorId, Capabilities, DamageEvent, Equipment, FlatGround, MotionState,
    Vitality, JUMP_STAMINA_COST, KILL_FLOOR_Y,
};
pub use item::{
    behavior_for, Inventory, ItemBehavior, ItemId, ItemKind, ItemRecord, MeleeWeapon, UseKind,
};
pub use net::{
    Channel, LoopbackNetwork, LoopbackStats, LossConfig, Message, Outgoing, PeerId, Recipient,
    WireError, DEFAULT_TICK_RATE, SERVER_PEER,
};
pub use relay::{apply_local, handle_message, submit, Action, NetContext, NetRole};
pub use session::{
    DroppedItems, EventBus, NameAllocator, SessionEvent, World, WorldHook, WorldItem,
};
pub use sync::MovementSync;
