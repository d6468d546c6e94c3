use super::vitality::DamageEvent;
use super::{ActionError, ActorId};
use crate::item::{behavior_for, ItemBehavior, ItemRecord, UseKind};

pub struct EquippedItem {
    pub record: ItemRecord,
    pub behavior: Box<dyn ItemBehavior>,
    /// Picked up directly from the world rather than drawn from inventory.
    /// Displacing such an item returns it to the world, not the inventory.
    pub from_world: bool,
}

impl EquippedItem {
    /// Detaches the behavior and folds its current state back into the record.
    pub(crate) fn into_record(mut self) -> ItemRecord {
        self.behavior.on_unequip();
        self.record.state = self.behavior.serialize_state();
        self.record
    }
}

/// Single wield slot plus the unarmed fallback. At most one item is attached
/// at a time; the hand always exists and stands in whenever the slot clears.
pub struct Equipment {
    active: Option<EquippedItem>,
    hand: ItemRecord,
}

impl Equipment {
    pub fn new(hand: ItemRecord) -> Self {
        Self { active: None, hand }
    }

    pub fn is_armed(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&EquippedItem> {
        self.active.as_ref()
    }

    pub fn hand(&self) -> &ItemRecord {
        &self.hand
    }

    /// Attaches `record` as the active item, returning whatever it displaced.
    pub fn arm(
        &mut self,
        record: ItemRecord,
        from_world: bool,
        owner: ActorId,
    ) -> Option<EquippedItem> {
        let displaced = self.active.take();
        if let Some(item) = &displaced {
            log::debug!("displacing active item {}", item.record.name);
        }

        let mut behavior = behavior_for(&record);
        behavior.on_equip(owner);
        self.active = Some(EquippedItem {
            record,
            behavior,
            from_world,
        });

        displaced
    }

    /// Detaches the active item and hands its record back. Only legal while
    /// armed; the fallback hand is conceptually re-armed afterwards.
    pub fn stash(&mut self) -> Result<ItemRecord, ActionError> {
        let item = self.active.take().ok_or(ActionError::InvalidTransition)?;
        Ok(item.into_record())
    }

    /// Forwards a use to the active behavior. The behavior's own busy state
    /// guards re-entry; a started strike comes back as a damage event.
    pub fn use_item(
        &mut self,
        kind: UseKind,
        released: bool,
    ) -> Result<Option<DamageEvent>, ActionError> {
        let item = self.active.as_mut().ok_or(ActionError::InvalidTransition)?;
        Ok(item.behavior.use_item(kind, released))
    }

    /// Collide dispatch for the active behavior: a mid-swing weapon strikes
    /// whatever body touched its wielder.
    pub fn on_collide(&mut self, other: ActorId) -> Option<DamageEvent> {
        self.active.as_mut()?.behavior.on_collide(other)
    }

    pub fn is_busy(&self) -> bool {
        self.active.as_ref().is_some_and(|i| i.behavior.is_busy())
    }

    pub fn tick(&mut self, dt: f32) {
        if let Some(item) = &mut self.active {
            item.behavior.tick(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;

    fn hand() -> ItemRecord {
        ItemRecord::new(0, ItemKind::Hand, "hand")
    }

    fn sword(id: u32) -> ItemRecord {
        ItemRecord::new(id, ItemKind::MeleeWeapon, "sword")
    }

    #[test]
    fn at_most_one_item_attached() {
        let mut equipment = Equipment::new(hand());
        assert!(!equipment.is_armed());

        assert!(equipment.arm(sword(1), false, 9).is_none());
        assert!(equipment.is_armed());

        let displaced = equipment.arm(sword(2), false, 9).unwrap();
        assert_eq!(displaced.record.id, 1);
        assert_eq!(equipment.active().unwrap().record.id, 2);
    }

    #[test]
    fn stash_round_trip() {
        let mut equipment = Equipment::new(hand());
        equipment.arm(sword(1), false, 9);

        let record = equipment.stash().unwrap();
        assert_eq!(record.id, 1);
        assert!(!equipment.is_armed());
        // Weapon state was folded back into the record blob.
        assert!(!record.state.is_empty());
    }

    #[test]
    fn stash_while_unarmed_is_invalid() {
        let mut equipment = Equipment::new(hand());
        assert_eq!(equipment.stash(), Err(ActionError::InvalidTransition));
    }

    #[test]
    fn use_while_unarmed_is_invalid() {
        let mut equipment = Equipment::new(hand());
        assert_eq!(
            equipment.use_item(UseKind::Primary, false),
            Err(ActionError::InvalidTransition)
        );
    }

    #[test]
    fn use_sets_busy_through_behavior() {
        let mut equipment = Equipment::new(hand());
        equipment.arm(sword(1), false, 9);
        equipment.use_item(UseKind::Primary, false).unwrap();
        assert!(equipment.is_busy());

        equipment.tick(1.0);
        assert!(!equipment.is_busy());
    }
}
