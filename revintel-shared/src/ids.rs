/// Identifier generation
///
/// Every record id in the system comes from an [`IdGenerator`] injected into
/// the application state, so tests can swap the random generator for a
/// deterministic one.
///
/// # Example
///
/// ```
/// use revintel_shared::ids::{IdGenerator, SequentialIdGenerator};
///
/// let ids = SequentialIdGenerator::new();
/// let first = ids.next_id();
/// let second = ids.next_id();
/// assert!(second > first);
/// ```

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of unique record identifiers
pub trait IdGenerator: Send + Sync {
    /// Returns a new identifier, never returned before by this generator
    fn next_id(&self) -> Uuid;
}

/// Random UUID v4 generator used in production
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Monotonic counter generator for deterministic tests
///
/// Produces `00000000-0000-0000-0000-000000000001`, `...0002`, and so on.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    /// Creates a generator starting at 1
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> Uuid {
        let next = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        Uuid::from_u128(u128::from(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids_are_predictable() {
        let ids = SequentialIdGenerator::new();
        assert_eq!(ids.next_id(), Uuid::from_u128(1));
        assert_eq!(ids.next_id(), Uuid::from_u128(2));
        assert_eq!(ids.next_id(), Uuid::from_u128(3));
    }

    #[test]
    fn test_random_ids_do_not_repeat() {
        let ids = RandomIdGenerator;
        let set: HashSet<Uuid> = (0..1000).map(|_| ids.next_id()).collect();
        assert_eq!(set.len(), 1000);
    }
}
