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

//! Embeddable bookkeeping block for concrete task types.

use super::{SerialId, DEFAULT_PRIORITY};

/// The fields every schedulable task tracks: identity, grouping tag,
/// priority, caller context, and the done flag.
///
/// Concrete tasks embed one and forward the [`Task`](super::Task)
/// accessors to it:
///
/// ```
/// use ergon_core::{Reusable, SerialId, Task, TaskBase};
///
/// #[derive(Default)]
/// struct DownloadTask {
///     base: TaskBase<String>,
///     bytes_received: u64,
/// }
///
/// impl Reusable for DownloadTask {
///     fn clear(&mut self) {
///         self.base.clear_base();
///         self.bytes_received = 0;
///     }
/// }
///
/// impl Task for DownloadTask {
///     type UserData = String;
///
///     fn serial_id(&self) -> SerialId {
///         self.base.serial_id()
///     }
///
///     fn tag(&self) -> Option<&str> {
///         self.base.tag()
///     }
///
///     fn priority(&self) -> i32 {
///         self.base.priority()
///     }
///
///     fn user_data(&self) -> Option<&String> {
///         self.base.user_data()
///     }
///
///     fn done(&self) -> bool {
///         self.base.done()
///     }
///
///     fn set_done(&mut self, done: bool) {
///         self.base.set_done(done);
///     }
/// }
/// ```
#[derive(Debug)]
pub struct TaskBase<U> {
    serial_id: SerialId,
    tag: Option<String>,
    priority: i32,
    user_data: Option<U>,
    done: bool,
}

impl<U> TaskBase<U> {
    /// Binds identity and caller context to the task.
    ///
    /// Called once when the task is handed to a pool; `clear_base` undoes
    /// it when the task retires.
    pub fn initialize(
        &mut self,
        serial_id: SerialId,
        tag: Option<String>,
        priority: i32,
        user_data: Option<U>,
    ) {
        self.serial_id = serial_id;
        self.tag = tag;
        self.priority = priority;
        self.user_data = user_data;
        self.done = false;
    }

    /// Drops identity and caller context, returning the block to the state
    /// `Default` produces.
    pub fn clear_base(&mut self) {
        self.serial_id = SerialId(0);
        self.tag = None;
        self.priority = DEFAULT_PRIORITY;
        self.user_data = None;
        self.done = false;
    }

    /// Serial id assigned at initialization, or `SerialId(0)` before.
    #[must_use]
    pub fn serial_id(&self) -> SerialId {
        self.serial_id
    }

    /// Grouping tag, if any.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Scheduling priority.
    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Caller context, if any.
    #[must_use]
    pub fn user_data(&self) -> Option<&U> {
        self.user_data.as_ref()
    }

    /// Whether the bound agent has finished this task.
    #[must_use]
    pub fn done(&self) -> bool {
        self.done
    }

    /// Sets the done flag.
    pub fn set_done(&mut self, done: bool) {
        self.done = done;
    }
}

impl<U> Default for TaskBase<U> {
    fn default() -> Self {
        Self {
            serial_id: SerialId(0),
            tag: None,
            priority: DEFAULT_PRIORITY,
            user_data: None,
            done: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_sets_all_fields() {
        let mut base: TaskBase<u32> = TaskBase::default();
        base.initialize(SerialId(7), Some("assets".to_owned()), 5, Some(42));

        assert_eq!(base.serial_id(), SerialId(7));
        assert_eq!(base.tag(), Some("assets"));
        assert_eq!(base.priority(), 5);
        assert_eq!(base.user_data(), Some(&42));
        assert!(!base.done());
    }

    #[test]
    fn test_clear_base_restores_default_state() {
        let mut base: TaskBase<u32> = TaskBase::default();
        base.initialize(SerialId(7), Some("assets".to_owned()), 5, Some(42));
        base.set_done(true);

        base.clear_base();

        assert_eq!(base.serial_id(), SerialId(0));
        assert_eq!(base.tag(), None);
        assert_eq!(base.priority(), DEFAULT_PRIORITY);
        assert_eq!(base.user_data(), None);
        assert!(!base.done());
    }

    #[test]
    fn initialize_resets_done_from_previous_life() {
        let mut base: TaskBase<u32> = TaskBase::default();
        base.initialize(SerialId(1), None, 0, None);
        base.set_done(true);

        base.initialize(SerialId(2), None, 0, None);
        assert!(!base.done(), "a freshly initialized task must not be done");
    }
}
