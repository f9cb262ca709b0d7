use std::{fmt, hash::Hash, marker::PhantomData, num::NonZeroU64};

/// Nonzero identifier of an item in a [`Pool`]. The identifier is unique for
/// the lifetime of the pool that created it: once an item is removed, its
/// identifier never resolves again, even if the slot gets reused.
pub struct Id<T>(NonZeroU64, PhantomData<fn() -> T>);

impl<T> Id<T> {
    fn new(index: u32, generation: u32) -> Self {
        debug_assert!(generation != 0);

        let bits = u64::from(generation) << 32 | u64::from(index);
        // generations start at 1, so the upper half is never zero
        Self(NonZeroU64::new(bits).unwrap_or(NonZeroU64::MIN), PhantomData)
    }

    #[must_use]
    pub fn index(&self) -> u32 {
        self.0.get() as u32
    }

    #[must_use]
    pub fn generation(&self) -> u32 {
        (self.0.get() >> 32) as u32
    }

    /// The packed representation of the identifier. Two identifiers from the
    /// same pool are equal if and only if their bits are equal.
    #[must_use]
    pub fn to_bits(&self) -> u64 {
        self.0.get()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Id")
            .field("index", &self.index())
            .field("generation", &self.generation())
            .finish()
    }
}

struct Slot<T> {
    // Bumped every time the slot is vacated, so that stale ids stop matching.
    generation: u32,
    value: Option<T>,
}

/// A pool of items addressed by generational [`Id`]s.
///
/// Vacated slots are recycled. A slot whose generation saturates is retired
/// for good instead of being recycled.
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pool<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts a new value into the pool and returns its identifier.
    ///
    /// ## Panics
    ///
    /// Panics if the pool would hold more than `u32::MAX` slots.
    pub fn insert(&mut self, value: T) -> Id<T> {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            Id::new(index, slot.generation)
        } else {
            let index = u32::try_from(self.slots.len()).expect("max u32::MAX slots!");
            self.slots.push(Slot {
                generation: 1,
                value: Some(value),
            });
            Id::new(index, 1)
        }
    }

    #[must_use]
    pub fn get(&self, id: Id<T>) -> Option<&T> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.value.as_ref())
    }

    #[must_use]
    pub fn get_mut(&mut self, id: Id<T>) -> Option<&mut T> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.value.as_mut())
    }

    #[must_use]
    pub fn contains(&self, id: Id<T>) -> bool {
        self.get(id).is_some()
    }

    /// Removes the value identified by `id`.
    ///
    /// ## Returns
    ///
    /// The value if the identifier was live, and `None` otherwise.
    pub fn remove(&mut self, id: Id<T>) -> Option<T> {
        let index = id.index();
        let slot = self.slots.get_mut(index as usize)?;

        if slot.generation != id.generation() {
            return None;
        }

        let value = slot.value.take()?;
        self.len -= 1;

        if slot.generation < u32::MAX {
            slot.generation += 1;
            self.free.push(index);
        }

        Some(value)
    }

    /// Iterates over live items in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (Id::new(index as u32, slot.generation), value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove_one() {
        let mut pool = Pool::<u32>::new();
        let id = pool.insert(42);

        assert_eq!(id.index(), 0);
        assert_eq!(id.generation(), 1);
        assert_eq!(pool.get(id), Some(&42));
        assert_eq!(pool.get_mut(id), Some(&mut 42));
        assert_eq!(pool.len(), 1);

        assert_eq!(pool.remove(id), Some(42));
        assert!(!pool.contains(id));
        assert!(pool.is_empty());
        assert_eq!(pool.slots[0].generation, 2);
    }

    #[test]
    fn remove_twice() {
        let mut pool = Pool::<u32>::new();
        let id = pool.insert(42);

        assert_eq!(pool.remove(id), Some(42));
        assert_eq!(pool.remove(id), None);

        let _ = pool.insert(43);
        assert_eq!(pool.remove(id), None);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn reused_slot_gets_fresh_id() {
        let mut pool = Pool::<u32>::new();

        let a = pool.insert(42);
        pool.remove(a);
        let b = pool.insert(43);

        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert_ne!(a.to_bits(), b.to_bits());
        assert_eq!(pool.get(a), None);
        assert_eq!(pool.get(b), Some(&43));
    }

    #[test]
    fn iter_skips_vacated_slots() {
        let mut pool = Pool::new();
        let ids: Vec<_> = (0..5).map(|i| pool.insert(i)).collect();

        pool.remove(ids[1]);
        pool.remove(ids[3]);

        let live: Vec<_> = pool.iter().map(|(id, value)| (id, *value)).collect();
        assert_eq!(live, vec![(ids[0], 0), (ids[2], 2), (ids[4], 4)]);
    }

    #[test]
    fn saturated_slot_is_retired() {
        let mut pool = Pool::<u32>::new();
        let id = pool.insert(1);
        pool.slots[0].generation = u32::MAX;

        let id = Id::new(id.index(), u32::MAX);
        assert_eq!(pool.remove(id), Some(1));
        assert!(pool.free.is_empty());

        let next = pool.insert(2);
        assert_eq!(next.index(), 1);
    }

    #[test]
    fn debug() {
        let mut pool = Pool::<u32>::new();
        let id = pool.insert(42);

        assert_eq!(format!("{:?}", id), "Id { index: 0, generation: 1 }");
    }
}
