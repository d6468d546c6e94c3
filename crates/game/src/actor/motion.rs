use glam::Vec3;

use super::ActorId;

pub const GRAVITY_ACCELERATION: f32 = -9.81;
pub const TERMINAL_VELOCITY: f32 = -53.0;
pub const JUMP_FORCE: f32 = 10.0;
/// Anything below this y is outside the playable volume and dies outright.
pub const KILL_FLOOR_Y: f32 = -10.0;

pub const PITCH_MIN_DEG: f32 = -40.0;
pub const PITCH_MAX_DEG: f32 = 90.0;

pub fn clamp_pitch(pitch_deg: f32) -> f32 {
    pitch_deg.clamp(PITCH_MIN_DEG, PITCH_MAX_DEG)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub position: Vec3,
    pub entity: Option<ActorId>,
}

/// Swept movement query against whatever static geometry the world carries.
pub trait CollisionQuery {
    fn sweep(&self, from: Vec3, delta: Vec3) -> Option<Contact>;
}

/// Infinite horizontal plane, the only static geometry the engine needs.
#[derive(Debug, Clone, Copy)]
pub struct FlatGround {
    pub height: f32,
}

impl Default for FlatGround {
    fn default() -> Self {
        Self { height: 0.0 }
    }
}

impl CollisionQuery for FlatGround {
    fn sweep(&self, from: Vec3, delta: Vec3) -> Option<Contact> {
        let to = from + delta;
        if delta.y < 0.0 && from.y >= self.height && to.y <= self.height {
            Some(Contact {
                position: Vec3::new(to.x, self.height, to.z),
                entity: None,
            })
        } else {
            None
        }
    }
}

/// Gravity and ground-contact state for one actor.
#[derive(Debug, Clone, Copy)]
pub struct MotionState {
    pub gravity_velocity: f32,
    pub grounded: bool,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            gravity_velocity: 0.0,
            grounded: false,
        }
    }
}

impl MotionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulates gravity and sweeps the actor down by the resulting
    /// displacement. Downward contact zeroes vertical velocity and grounds.
    pub fn step(
        &mut self,
        position: &mut Vec3,
        dt: f32,
        surface: &dyn CollisionQuery,
    ) -> Option<Contact> {
        self.gravity_velocity =
            (self.gravity_velocity + GRAVITY_ACCELERATION * dt).max(TERMINAL_VELOCITY);

        let delta = Vec3::new(0.0, self.gravity_velocity * dt, 0.0);
        self.translate(position, delta, surface)
    }

    /// Moves by `delta`, stopping at the first contact and reporting it so
    /// the caller can dispatch collide hooks.
    pub fn translate(
        &mut self,
        position: &mut Vec3,
        delta: Vec3,
        surface: &dyn CollisionQuery,
    ) -> Option<Contact> {
        match surface.sweep(*position, delta) {
            Some(contact) => {
                if self.gravity_velocity < 0.0 && contact.position.y <= position.y {
                    self.grounded = true;
                    self.gravity_velocity = 0.0;
                }
                *position = contact.position;
                Some(contact)
            }
            None => {
                *position += delta;
                None
            }
        }
    }

    /// Launches upward. Refused while airborne; the stamina cost is the
    /// caller's to apply through the damage pipeline.
    pub fn jump(&mut self) -> bool {
        if !self.grounded {
            return false;
        }
        self.gravity_velocity = JUMP_FORCE;
        self.grounded = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_clamps_at_terminal_velocity() {
        let mut motion = MotionState::new();
        let mut pos = Vec3::new(0.0, 1000.0, 0.0);
        let ground = FlatGround { height: -2000.0 };

        for _ in 0..600 {
            motion.step(&mut pos, 1.0 / 60.0, &ground);
        }
        assert_eq!(motion.gravity_velocity, TERMINAL_VELOCITY);
    }

    #[test]
    fn landing_grounds_and_zeroes_velocity() {
        let mut motion = MotionState::new();
        let mut pos = Vec3::new(0.0, 0.5, 0.0);
        let ground = FlatGround::default();

        for _ in 0..120 {
            motion.step(&mut pos, 1.0 / 60.0, &ground);
        }
        assert!(motion.grounded);
        assert_eq!(motion.gravity_velocity, 0.0);
        assert_eq!(pos.y, 0.0);
    }

    #[test]
    fn jump_requires_ground_contact() {
        let mut motion = MotionState::new();
        assert!(!motion.jump());

        motion.grounded = true;
        assert!(motion.jump());
        assert_eq!(motion.gravity_velocity, JUMP_FORCE);
        assert!(!motion.grounded);
    }

    #[test]
    fn pitch_clamp_range() {
        assert_eq!(clamp_pitch(120.0), PITCH_MAX_DEG);
        assert_eq!(clamp_pitch(-75.0), PITCH_MIN_DEG);
        assert_eq!(clamp_pitch(10.0), 10.0);
    }
}
