use super::ActionError;

/// One damage application. Transient: built, applied, discarded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DamageEvent {
    pub amount: i32,
    pub stamina_cost: i32,
    pub sender: Option<String>,
}

impl DamageEvent {
    pub fn new(amount: i32) -> Self {
        Self {
            amount,
            ..Default::default()
        }
    }

    pub fn stamina(cost: i32) -> Self {
        Self {
            stamina_cost: cost,
            ..Default::default()
        }
    }

    pub fn from_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }
}

/// Health and stamina counters. Health hitting zero is one-way; stamina
/// drains and regenerates but never kills.
#[derive(Debug, Clone)]
pub struct Vitality {
    health: i32,
    health_max: i32,
    stamina: i32,
    stamina_max: i32,
    regen_accum: f32,
}

impl Vitality {
    pub const STAMINA_REGEN_PER_SEC: f32 = 5.0;

    pub fn new(health_max: i32, stamina_max: i32) -> Self {
        Self {
            health: health_max,
            health_max,
            stamina: stamina_max,
            stamina_max,
            regen_accum: 0.0,
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn health_max(&self) -> i32 {
        self.health_max
    }

    pub fn stamina(&self) -> i32 {
        self.stamina
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Applies one damage event, clamping health at zero, and returns the
    /// signed health delta. A dead actor accepts nothing further.
    pub fn apply_damage(&mut self, event: &DamageEvent) -> Result<i32, ActionError> {
        if self.is_dead() {
            return Err(ActionError::AlreadyDead);
        }

        let before = self.health;
        self.health = (self.health - event.amount).clamp(0, self.health_max);
        self.stamina = (self.stamina - event.stamina_cost).clamp(0, self.stamina_max);

        Ok(self.health - before)
    }

    /// Passive per-tick resource movement. Callers diff health across this
    /// call the same way they do for `apply_damage`.
    pub fn update(&mut self, dt: f32) {
        if self.is_dead() {
            return;
        }
        self.regen_accum += Self::STAMINA_REGEN_PER_SEC * dt;
        if self.regen_accum >= 1.0 {
            let whole = self.regen_accum as i32;
            self.regen_accum -= whole as f32;
            self.stamina = (self.stamina + whole).min(self.stamina_max);
        }
    }
}
