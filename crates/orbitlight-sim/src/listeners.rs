//! Position-change listener registry.
//!
//! Subscription ids map to callbacks; notification order is insertion
//! order. Callbacks are reference counted so a tick can snapshot the list
//! and invoke it without holding the registry lock.

use std::sync::Arc;

use orbitlight_core::types::Vector3;

/// Callback invoked with each newly published position.
pub type PositionListener = Arc<dyn Fn(Vector3) + Send + Sync>;

/// Handle returned by a registration, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct ListenerRegistry {
    entries: Vec<(SubscriptionId, PositionListener)>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: PositionListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Remove a registration. Returns false if the id was not registered.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Listeners in insertion order.
    pub fn snapshot(&self) -> Vec<PositionListener> {
        self.entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_ids_are_unique_and_removal_works() {
        let mut registry = ListenerRegistry::new();
        let a = registry.add(Arc::new(|_| {}));
        let b = registry.add(Arc::new(|_| {}));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);

        assert!(registry.remove(a));
        assert!(!registry.remove(a));
        assert_eq!(registry.len(), 1);

        // Ids are never reused after removal
        let c = registry.add(Arc::new(|_| {}));
        assert_ne!(c, a);
        assert_ne!(c, b);
    }

    #[test]
    fn test_snapshot_preserves_insertion_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::new();
        for tag in 0..4 {
            let seen = Arc::clone(&seen);
            registry.add(Arc::new(move |_| seen.lock().unwrap().push(tag)));
        }

        for listener in registry.snapshot() {
            listener(Vector3::default());
        }
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3]);
    }
}
