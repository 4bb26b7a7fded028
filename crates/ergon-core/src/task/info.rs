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

//! Read-only task snapshots for host-side listings.

use super::{SerialId, Task, TaskStatus};
use serde::Serialize;

/// A point-in-time snapshot of one task known to a pool.
///
/// Snapshots are plain data: they stay valid (and serializable) after the
/// task they describe has moved on or been retired.
#[derive(Debug, Clone, Serialize)]
pub struct TaskInfo<U> {
    /// Serial id of the task.
    pub serial_id: SerialId,
    /// Grouping tag, if any.
    pub tag: Option<String>,
    /// Scheduling priority.
    pub priority: i32,
    /// Caller context attached to the task, if any.
    pub user_data: Option<U>,
    /// Lifecycle state at snapshot time.
    pub status: TaskStatus,
    /// Progress line supplied by the task, if any.
    pub description: Option<String>,
}

impl<U: Clone> TaskInfo<U> {
    /// Captures a snapshot of `task` with the given lifecycle state.
    pub fn capture<T>(task: &T, status: TaskStatus) -> Self
    where
        T: Task<UserData = U>,
    {
        Self {
            serial_id: task.serial_id(),
            tag: task.tag().map(str::to_owned),
            priority: task.priority(),
            user_data: task.user_data().cloned(),
            status,
            description: task.description(),
        }
    }
}
