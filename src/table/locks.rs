//! Write Lock Stripes
//!
//! A fixed set of mutexes; a key's writes take the stripe picked by the
//! key's hash. Two keys may share a stripe, which only costs some
//! parallelism. Memory stays constant no matter how many keys exist.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use parking_lot::{Mutex, MutexGuard};

/// Number of stripes per table handle
pub(crate) const STRIPE_COUNT: usize = 64;

#[derive(Debug)]
pub(crate) struct KeyLocks {
    stripes: Vec<Mutex<()>>,
}

impl KeyLocks {
    pub(crate) fn new() -> Self {
        Self {
            stripes: (0..STRIPE_COUNT).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Block until `key`'s stripe is free
    pub(crate) fn lock(&self, key: &[u8]) -> MutexGuard<'_, ()> {
        self.stripes[Self::stripe(key)].lock()
    }

    fn stripe(key: &[u8]) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % STRIPE_COUNT as u64) as usize
    }
}
