//! Exclusive resources arranged in a ring.
//!
//! Each ring position owns one async mutex. Pairs are always locked in
//! ascending index order, whichever order the caller names them in. With a
//! single global order no cycle of waiters can form, so the ring never
//! deadlocks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{CoordError, Result};

/// Marks a resource with no recorded owner
const FREE: usize = usize::MAX;

/// Bookkeeping behind one resource lock
#[derive(Debug, Default)]
struct Slot {
    uses: u64,
}

/// One exclusive resource per ring position
///
/// Owners are tracked beside the locks rather than inside them, so a second
/// holder of the same resource is caught by a failed compare-exchange.
#[derive(Debug)]
pub struct ResourceRing {
    slots: Vec<Arc<Mutex<Slot>>>,
    owners: Arc<Vec<AtomicUsize>>,
    violations: Arc<AtomicU64>,
}

impl ResourceRing {
    /// Create a ring of `size` free resources
    pub fn new(size: usize) -> Self {
        Self {
            slots: (0..size).map(|_| Arc::new(Mutex::new(Slot::default()))).collect(),
            owners: Arc::new((0..size).map(|_| AtomicUsize::new(FREE)).collect()),
            violations: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Times a resource was found already owned when acquired or released
    ///
    /// Stays at zero unless mutual exclusion is broken.
    pub fn violations(&self) -> u64 {
        self.violations.load(Ordering::SeqCst)
    }

    /// Agent currently recorded as holding the resource at `index`
    pub fn owner(&self, index: usize) -> Option<usize> {
        let owner = self.owners.get(index)?.load(Ordering::SeqCst);
        (owner != FREE).then_some(owner)
    }

    /// Completed acquisitions of the resource at `index`
    pub async fn uses(&self, index: usize) -> Option<u64> {
        let slot = self.slots.get(index)?;
        Some(slot.lock().await.uses)
    }

    /// Acquire both resources for `agent`, lower index first
    pub async fn acquire_pair(&self, agent: usize, a: usize, b: usize) -> Result<PairGuard> {
        self.acquire_pair_with(agent, a, b, |_| {}).await
    }

    /// Acquire both resources, calling `on_acquired` as each lock is taken
    ///
    /// Ownership is only recorded once both locks are held. Dropping the
    /// future midway releases whatever was locked.
    pub async fn acquire_pair_with<F>(&self, agent: usize, a: usize, b: usize, mut on_acquired: F) -> Result<PairGuard>
    where
        F: FnMut(usize),
    {
        let (low, high) = self.order(a, b)?;

        let mut low_guard = Arc::clone(&self.slots[low]).lock_owned().await;
        on_acquired(low);
        let mut high_guard = Arc::clone(&self.slots[high]).lock_owned().await;
        on_acquired(high);

        for (index, slot) in [(low, &mut low_guard), (high, &mut high_guard)] {
            if let Err(previous) = self.owners[index].compare_exchange(FREE, agent, Ordering::SeqCst, Ordering::SeqCst) {
                self.violations.fetch_add(1, Ordering::SeqCst);
                tracing::error!(resource = index, previous, agent, "Resource acquired while owned");
                self.owners[index].store(agent, Ordering::SeqCst);
            }
            slot.uses += 1;
        }

        tracing::debug!(agent, low, high, "Pair acquired");
        Ok(PairGuard {
            agent,
            low: (low, low_guard),
            high: (high, high_guard),
            owners: Arc::clone(&self.owners),
            violations: Arc::clone(&self.violations),
        })
    }

    /// Sort a pair into acquisition order and check it against the ring
    fn order(&self, a: usize, b: usize) -> Result<(usize, usize)> {
        let size = self.len();
        if a >= size || b >= size {
            return Err(CoordError::InvalidResource(format!(
                "pair ({}, {}) outside ring of {}",
                a, b, size
            )));
        }
        if a == b {
            return Err(CoordError::InvalidResource(format!("pair uses resource {} twice", a)));
        }
        Ok((a.min(b), a.max(b)))
    }
}

/// Scoped ownership of two resources
///
/// Dropping the guard releases both, so a failed or cancelled use step still
/// frees the pair.
#[derive(Debug)]
pub struct PairGuard {
    agent: usize,
    low: (usize, OwnedMutexGuard<Slot>),
    high: (usize, OwnedMutexGuard<Slot>),
    owners: Arc<Vec<AtomicUsize>>,
    violations: Arc<AtomicU64>,
}

impl PairGuard {
    /// Indices held, lower first
    pub fn indices(&self) -> (usize, usize) {
        (self.low.0, self.high.0)
    }

    /// Release both resources, returning their indices
    pub fn release(self) -> (usize, usize) {
        self.indices()
    }
}

impl Drop for PairGuard {
    fn drop(&mut self) {
        // Owners clear before the locks are released with the guard fields
        let agent = self.agent;
        for index in [self.low.0, self.high.0] {
            if let Err(owner) = self.owners[index].compare_exchange(agent, FREE, Ordering::SeqCst, Ordering::SeqCst) {
                self.violations.fetch_add(1, Ordering::SeqCst);
                tracing::error!(resource = index, agent, owner, "Released resource not owned by agent");
                self.owners[index].store(FREE, Ordering::SeqCst);
            }
        }
    }
}
