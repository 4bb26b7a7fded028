// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Recycling allocator for task instances.
//!
//! Pools retire tasks constantly; recycling the allocations keeps a busy
//! scheduler from churning the heap. The allocator is injected
//! (`Arc<dyn ReuseAllocator<T>>`) so the enqueueing side and the pool share
//! one instance, and so tests can substitute a counting spy.

use crate::task::Reusable;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Hands out cleared instances and takes retired ones back.
///
/// `acquire` and `release` take `&self`: implementations use interior
/// mutability so one allocator can be shared behind an `Arc`. A released
/// value is moved into the allocator, so releasing the same instance twice
/// is not expressible.
pub trait ReuseAllocator<T: Reusable>: Send + Sync {
    /// Returns a cleared instance, recycling a pooled one when possible.
    fn acquire(&self) -> T;

    /// Clears a retired instance and pools it for reuse.
    fn release(&self, value: T);
}

/// Counters describing a [`ReusePool`]'s traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReusePoolStats {
    /// Instances constructed because the free list was empty.
    pub created: u64,
    /// Total `acquire` calls served.
    pub acquired: u64,
    /// Total `release` calls taken back.
    pub released: u64,
    /// Instances sitting in the free list right now.
    pub pooled: usize,
    /// Instances currently out with callers.
    pub in_use: u64,
}

/// The default [`ReuseAllocator`]: a mutexed free list with traffic
/// counters.
///
/// Values are stored cleared, so `acquire` is a plain pop. The counters
/// are atomics read with `Ordering::Relaxed`; the snapshot in
/// [`ReusePoolStats`] is advisory, not a synchronization point.
pub struct ReusePool<T> {
    free: Mutex<Vec<T>>,
    created: AtomicU64,
    acquired: AtomicU64,
    released: AtomicU64,
}

impl<T: Reusable> ReusePool<T> {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            created: AtomicU64::new(0),
            acquired: AtomicU64::new(0),
            released: AtomicU64::new(0),
        }
    }

    /// Pre-fills the free list so the next `count` acquires skip
    /// construction.
    pub fn reserve(&self, count: usize) {
        let mut free = self.free.lock().unwrap();
        free.reserve(count);
        for _ in 0..count {
            free.push(T::default());
        }
        self.created.fetch_add(count as u64, Ordering::Relaxed);
        log::debug!(
            "ReusePool: reserved {} instances ({} now pooled).",
            count,
            free.len()
        );
    }

    /// Returns a snapshot of the pool's traffic counters.
    #[must_use]
    pub fn stats(&self) -> ReusePoolStats {
        let pooled = self.free.lock().unwrap().len();
        let acquired = self.acquired.load(Ordering::Relaxed);
        let released = self.released.load(Ordering::Relaxed);
        ReusePoolStats {
            created: self.created.load(Ordering::Relaxed),
            acquired,
            released,
            pooled,
            in_use: acquired.saturating_sub(released),
        }
    }
}

impl<T: Reusable> ReuseAllocator<T> for ReusePool<T> {
    fn acquire(&self) -> T {
        self.acquired.fetch_add(1, Ordering::Relaxed);
        let recycled = self.free.lock().unwrap().pop();
        match recycled {
            Some(value) => {
                log::trace!("ReusePool: recycling a pooled instance.");
                value
            }
            None => {
                self.created.fetch_add(1, Ordering::Relaxed);
                log::trace!("ReusePool: free list empty, constructing a new instance.");
                T::default()
            }
        }
    }

    fn release(&self, mut value: T) {
        value.clear();
        self.released.fetch_add(1, Ordering::Relaxed);
        self.free.lock().unwrap().push(value);
    }
}

impl<T: Reusable> Default for ReusePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ReusePool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReusePool")
            .field("pooled", &self.free.lock().unwrap().len())
            .field("created", &self.created.load(Ordering::Relaxed))
            .field("acquired", &self.acquired.load(Ordering::Relaxed))
            .field("released", &self.released.load(Ordering::Relaxed))
            .finish()
    }
}
