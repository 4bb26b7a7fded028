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

//! Serial identifiers for tasks and their generator.

use serde::Serialize;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};

/// A unique, monotonically increasing identifier for a scheduled task.
///
/// Serial ids are assigned once, at initialization, and never recycled for
/// the lifetime of the process. The value `0` is reserved for tasks that
/// have not been initialized yet; [`SerialCounter`] starts handing out ids
/// at `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SerialId(pub u64);

impl SerialId {
    /// Returns the raw numeric value of the id.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl Display for SerialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out process-unique [`SerialId`]s.
///
/// The counter is atomic so a single instance can be shared between the
/// thread that enqueues tasks and any helpers that pre-build them.
#[derive(Debug)]
pub struct SerialCounter {
    next: AtomicU64,
}

impl SerialCounter {
    /// Creates a counter whose first issued id is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Returns the next serial id.
    pub fn next_id(&self) -> SerialId {
        SerialId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SerialCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_start_at_one() {
        let counter = SerialCounter::new();
        assert_eq!(counter.next_id(), SerialId(1));
        assert_eq!(counter.next_id(), SerialId(2));
        assert_eq!(counter.next_id(), SerialId(3));
    }

    #[test]
    fn test_ids_are_unique_across_threads() {
        use std::collections::HashSet;
        use std::sync::Arc;

        let counter = Arc::new(SerialCounter::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let counter = Arc::clone(&counter);
            handles.push(std::thread::spawn(move || {
                (0..100).map(|_| counter.next_id()).collect::<Vec<_>>()
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "id {id} issued twice");
            }
        }
        assert_eq!(seen.len(), 400);
    }
}
