//! In-memory price store

use std::sync::{Arc, RwLock};

use common::PriceSnapshot;

/// Current price of every registered symbol.
///
/// The store holds an immutable [`PriceSnapshot`] behind an `Arc` and swaps
/// the whole snapshot on write, so a reader always sees one complete tick.
/// Only the simulator in this crate can replace the snapshot.
#[derive(Debug)]
pub struct PriceStore {
    current: RwLock<Arc<PriceSnapshot>>,
}

impl PriceStore {
    /// Create a store seeded with an initial snapshot
    pub fn new(initial: PriceSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// The current snapshot
    pub fn snapshot(&self) -> Arc<PriceSnapshot> {
        // The lock only guards an Arc swap, a poisoned guard still holds a complete snapshot
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Current price of a symbol, `None` if the symbol is not registered
    pub fn price(&self, symbol: &str) -> Option<f64> {
        self.snapshot().price(symbol)
    }

    /// Replace the snapshot wholesale
    pub(crate) fn replace(&self, snapshot: Arc<PriceSnapshot>) {
        match self.current.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => *poisoned.into_inner() = snapshot,
        }
    }
}

impl Default for PriceStore {
    fn default() -> Self {
        Self::new(PriceSnapshot::default_instruments())
    }
}
