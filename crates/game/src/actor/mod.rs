mod actor;
mod equipment;
mod motion;
mod vitality;

pub use actor::{Actor, JUMP_STAMINA_COST};
pub use equipment::{EquippedItem, Equipment};
pub use motion::{
    clamp_pitch, CollisionQuery, Contact, FlatGround, MotionState, GRAVITY_ACCELERATION,
    JUMP_FORCE, KILL_FLOOR_Y, PITCH_MAX_DEG, PITCH_MIN_DEG, TERMINAL_VELOCITY,
};
pub use vitality::{DamageEvent, Vitality};

pub type ActorId = u32;

/// Capability set fixed at construction. Replaces per-call downcast probing:
/// an entity either declares a capability or the interaction is a no-op.
bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        const DAMAGEABLE = 1 << 0;
        const INTERACTABLE = 1 << 1;
        const COLLIDABLE = 1 << 2;
    }
}

/// Failure taxonomy for actor mutations. None of these are fatal: the relay
/// absorbs them, logs, and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("item or index not found")]
    NotFound,
    #[error("transition not legal from current state")]
    InvalidTransition,
    #[error("reference went stale before server validation")]
    StaleReference,
    #[error("actor is already dead")]
    AlreadyDead,
}
