use super::record::{ItemKind, ItemRecord};

/// Slot-stable item storage for one actor. Removal nulls the slot instead of
/// compacting so indices referenced by in-flight network messages stay valid.
#[derive(Debug, Default)]
pub struct Inventory {
    slots: Vec<Option<ItemRecord>>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the record at `index`. Missing or emptied slots
    /// report `None`; callers treat that as a no-op.
    pub fn retrieve(&mut self, index: usize) -> Option<ItemRecord> {
        self.slots.get_mut(index)?.take()
    }

    /// Removes up to `max` records matching `(kind, name)`. `max == 0` means
    /// all available. Returns fewer when stock is short.
    pub fn retrieve_by_query(&mut self, kind: ItemKind, name: &str, max: usize) -> Vec<ItemRecord> {
        let mut result = Vec::new();
        for slot in &mut self.slots {
            if max != 0 && result.len() == max {
                break;
            }
            if slot.as_ref().is_some_and(|r| r.matches(kind, name)) {
                result.push(slot.take().unwrap());
            }
        }
        result
    }

    /// Stores a record in the first empty slot, growing the slot list when
    /// none is free.
    pub fn store(&mut self, record: ItemRecord) {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.is_none()) {
            *slot = Some(record);
        } else {
            self.slots.push(Some(record));
        }
    }

    pub fn quantity(&self, kind: ItemKind, name: &str) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|r| r.matches(kind, name))
            .count()
    }

    pub fn index_of(&self, kind: ItemKind, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|r| r.matches(kind, name)))
    }

    pub fn get(&self, index: usize) -> Option<&ItemRecord> {
        self.slots.get(index)?.as_ref()
    }

    pub fn count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemRecord> {
        self.slots.iter().flatten()
    }
}
