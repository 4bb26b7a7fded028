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

//! The task model: identity, lifecycle state, and the schedulable contract.

mod base;
mod info;
mod serial;
mod status;

pub use base::TaskBase;
pub use info::TaskInfo;
pub use serial::{SerialCounter, SerialId};
pub use status::{StartTaskStatus, TaskStatus};

/// Priority given to tasks whose caller does not care about ordering.
pub const DEFAULT_PRIORITY: i32 = 0;

/// Contract for values that cycle through a
/// [`ReuseAllocator`](crate::reuse::ReuseAllocator).
///
/// `clear` must be idempotent and return the value to the state `Default`
/// produces, dropping every piece of caller data so a recycled value cannot
/// leak state into its next life.
pub trait Reusable: Default + Send {
    /// Resets the value to its pristine state.
    fn clear(&mut self);
}

/// The minimal contract a schedulable task must satisfy.
///
/// Concrete tasks embed a [`TaskBase`] for the bookkeeping fields, forward
/// these accessors to it, and add whatever payload their agent needs on top.
/// While a task is bound to an agent, only that agent holds `&mut` access,
/// so the done flag can only be flipped by the worker responsible for it.
pub trait Task: Reusable {
    /// Opaque caller context carried with the task and echoed in snapshots.
    ///
    /// Snapshots clone it, so wrap heavy payloads in `Arc` to keep the
    /// clone cheap.
    type UserData: Clone;

    /// Unique serial id assigned at initialization.
    fn serial_id(&self) -> SerialId;

    /// Grouping tag used by bulk removal and queries, if any.
    fn tag(&self) -> Option<&str>;

    /// Scheduling priority; higher values start earlier.
    fn priority(&self) -> i32;

    /// Caller context attached at initialization, if any.
    fn user_data(&self) -> Option<&Self::UserData>;

    /// Whether the bound agent has finished this task.
    fn done(&self) -> bool;

    /// Marks the task finished (or un-finishes it during a reset).
    fn set_done(&mut self, done: bool);

    /// Human-readable progress line for snapshots.
    fn description(&self) -> Option<String> {
        None
    }
}
