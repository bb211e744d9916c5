/// An object that lives in a [`Pool`] slot and is recycled instead of dropped.
pub trait Poolable {
    fn is_active(&self) -> bool;

    /// Clears the active flag and parks the object off-world.
    fn deactivate(&mut self);
}

/// Fixed-capacity arena of reusable objects.
///
/// Slots are created lazily until `capacity` is reached and are never removed afterwards.
/// Acquisition hands back an inactive slot; the caller activates it in the same call chain.
#[derive(Debug, Clone)]
pub struct Pool<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T: Poolable> Pool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots created so far, active or not.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_active()).count()
    }

    /// First inactive slot, else a fresh one from `create` while below capacity.
    ///
    /// Returns `None` when every slot is active and the pool is full; the request is dropped.
    pub fn acquire_with<F>(&mut self, create: F) -> Option<(usize, &mut T)>
    where
        F: FnOnce() -> T,
    {
        if let Some(slot) = self.items.iter().position(|item| !item.is_active()) {
            return Some((slot, &mut self.items[slot]));
        }
        if self.items.len() >= self.capacity {
            return None;
        }
        let slot = self.items.len();
        self.items.push(create());
        Some((slot, &mut self.items[slot]))
    }

    pub fn get(&self, slot: usize) -> Option<&T> {
        self.items.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        self.items.get_mut(slot)
    }

    pub fn release(&mut self, slot: usize) {
        if let Some(item) = self.items.get_mut(slot) {
            item.deactivate();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &T)> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_active())
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.items
            .iter_mut()
            .enumerate()
            .filter(|(_, item)| item.is_active())
    }
}
